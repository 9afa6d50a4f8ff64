//! Pickup-point creation and the aggregate read side.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::PickupPointId;
use domain::{
    Action, City, DomainError, ListFilter, PickupPoint, PickupPointWithReceptions, authorize,
};
use store::PickupPointStore;

use crate::map_store_error;

/// Creates pickup points and assembles the paginated aggregate view.
pub struct PickupPointService<S> {
    store: S,
}

impl<S: PickupPointStore> PickupPointService<S> {
    /// Creates a new pickup-point service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new pickup point.
    ///
    /// Only moderators may create pickup points. A caller-supplied
    /// identifier that already exists fails with
    /// [`DomainError::DuplicatePickupPoint`]; missing identifier or
    /// registration date are generated here.
    #[tracing::instrument(skip(self))]
    pub async fn create_pickup_point(
        &self,
        role_claim: &str,
        city_claim: &str,
        id: Option<Uuid>,
        registration_date: Option<DateTime<Utc>>,
    ) -> Result<PickupPoint, DomainError> {
        authorize(role_claim, Action::CreatePickupPoint)?;

        let city: City = city_claim.parse()?;

        let point = PickupPoint {
            id: id.map(PickupPointId::from_uuid).unwrap_or_default(),
            registration_date: registration_date.unwrap_or_else(Utc::now),
            city,
        };

        self.store
            .create_pickup_point(&point)
            .await
            .map_err(map_store_error)?;

        metrics::counter!("pvz_created_total").increment(1);

        Ok(point)
    }

    /// Returns one page of pickup points with nested receptions and
    /// products, optionally restricted to receptions created in
    /// `[start_date, end_date]`.
    ///
    /// The filter is validated before any query is issued.
    #[tracing::instrument(skip(self))]
    pub async fn list_pickup_points(
        &self,
        role_claim: &str,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Vec<PickupPointWithReceptions>, DomainError> {
        authorize(role_claim, Action::ListPickupPoints)?;

        let filter = ListFilter::new(start_date, end_date, page, page_size);
        filter.validate()?;

        self.store
            .list_pickup_points(&filter)
            .await
            .map_err(map_store_error)
    }

    /// Returns every pickup point without pagination or children.
    ///
    /// Serves reporting and export paths, which carry no caller role.
    #[tracing::instrument(skip(self))]
    pub async fn all_pickup_points(&self) -> Result<Vec<PickupPoint>, DomainError> {
        self.store
            .all_pickup_points()
            .await
            .map_err(map_store_error)
    }
}
