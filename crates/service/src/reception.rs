//! Reception lifecycle operations.

use chrono::Utc;

use common::{PickupPointId, ReceptionId};
use domain::{Action, DomainError, Reception, ReceptionStatus, authorize};
use store::ReceptionStore;

use crate::map_store_error;

/// Controls the open/close lifecycle of receptions.
///
/// Enforces the one-open-reception-per-pickup-point rule together with the
/// store, which executes each operation as a single transaction.
pub struct ReceptionService<S> {
    store: S,
}

impl<S: ReceptionStore> ReceptionService<S> {
    /// Creates a new reception service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Opens a new reception at the pickup point.
    ///
    /// Only employees may open receptions. Fails with
    /// [`DomainError::PickupPointNotFound`] if the pickup point does not
    /// exist and [`DomainError::OpenReceptionAlreadyExists`] if one is
    /// already open.
    #[tracing::instrument(skip(self))]
    pub async fn open_reception(
        &self,
        role_claim: &str,
        pickup_point_id: PickupPointId,
    ) -> Result<Reception, DomainError> {
        authorize(role_claim, Action::OpenReception)?;

        let reception = Reception {
            id: ReceptionId::new(),
            date_time: Utc::now(),
            pickup_point_id,
            status: ReceptionStatus::InProgress,
        };

        self.store
            .open_reception(&reception)
            .await
            .map_err(map_store_error)?;

        metrics::counter!("receptions_created_total").increment(1);

        Ok(reception)
    }

    /// Closes the currently open reception of the pickup point and returns
    /// it with its final status.
    #[tracing::instrument(skip(self))]
    pub async fn close_last_reception(
        &self,
        role_claim: &str,
        pickup_point_id: PickupPointId,
    ) -> Result<Reception, DomainError> {
        authorize(role_claim, Action::CloseReception)?;

        self.store
            .close_last_reception(pickup_point_id)
            .await
            .map_err(map_store_error)
    }
}
