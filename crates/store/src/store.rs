//! Storage traits implemented by the PostgreSQL and in-memory backends.
//!
//! Every mutation executes as a single transaction: it either commits fully
//! or leaves no trace. Within one pickup point the mutations behave as if
//! serialized; operations on distinct pickup points are independent.

use async_trait::async_trait;

use common::PickupPointId;
use domain::{
    ListFilter, NewProduct, PickupPoint, PickupPointWithReceptions, Product, Reception,
};

use crate::error::Result;

/// Persistence for pickup points and the aggregate read side.
#[async_trait]
pub trait PickupPointStore: Send + Sync {
    /// Inserts a new pickup point.
    ///
    /// Fails with [`StoreError::DuplicatePickupPoint`](crate::StoreError::DuplicatePickupPoint)
    /// if the identifier is already taken.
    async fn create_pickup_point(&self, point: &PickupPoint) -> Result<()>;

    /// Returns one page of pickup points with their receptions and products.
    ///
    /// Pagination applies to pickup points only. Without date bounds every
    /// pickup point on the page is returned, including those with no
    /// receptions; with bounds only pickup points owning at least one
    /// reception inside the range are returned, and only those receptions.
    /// Products are never filtered.
    async fn list_pickup_points(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<PickupPointWithReceptions>>;

    /// Returns every pickup point, without receptions and without pagination.
    async fn all_pickup_points(&self) -> Result<Vec<PickupPoint>>;
}

/// Persistence for the reception lifecycle.
#[async_trait]
pub trait ReceptionStore: Send + Sync {
    /// Inserts the reception if its pickup point exists and has no open
    /// reception, holding a lock on the pickup-point row for the duration
    /// so concurrent opens on the same point serialize.
    async fn open_reception(&self, reception: &Reception) -> Result<()>;

    /// Flips the single open reception of the pickup point to `close` and
    /// returns it, in one conditional update.
    async fn close_last_reception(&self, pickup_point_id: PickupPointId) -> Result<Reception>;
}

/// Persistence for products within the currently open reception.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Resolves the open reception of the pickup point and inserts the
    /// product into it, both inside the same transaction.
    async fn add_product(&self, product: &NewProduct) -> Result<Product>;

    /// Deletes the most recently created product of the open reception.
    /// Ordering is by creation timestamp, ties broken by identifier.
    async fn remove_last_product(&self, pickup_point_id: PickupPointId) -> Result<()>;
}
