use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::{PickupPointId, ReceptionId};
use domain::{
    ListFilter, NewProduct, PickupPoint, PickupPointWithReceptions, Product, Reception,
    ReceptionStatus, ReceptionWithProducts,
};

use crate::{
    error::{Result, StoreError},
    store::{PickupPointStore, ProductStore, ReceptionStore},
};

/// In-memory storage implementation for testing.
///
/// Provides the same interface and error semantics as the PostgreSQL
/// implementation. The single write lock stands in for the per-pickup-point
/// transaction serialization the database gives the real backend.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    points: Vec<PickupPoint>,
    receptions: Vec<Reception>,
    products: Vec<Product>,
}

impl Inner {
    fn open_reception_id(&self, pickup_point_id: PickupPointId) -> Option<ReceptionId> {
        self.receptions
            .iter()
            .find(|r| r.pickup_point_id == pickup_point_id && r.status.is_open())
            .map(|r| r.id)
    }
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of products currently attached to a reception.
    pub async fn product_count(&self, reception_id: ReceptionId) -> usize {
        let inner = self.inner.read().await;
        inner
            .products
            .iter()
            .filter(|p| p.reception_id == reception_id)
            .count()
    }
}

#[async_trait]
impl PickupPointStore for InMemoryStore {
    async fn create_pickup_point(&self, point: &PickupPoint) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.points.iter().any(|p| p.id == point.id) {
            return Err(StoreError::DuplicatePickupPoint);
        }

        inner.points.push(point.clone());
        Ok(())
    }

    async fn list_pickup_points(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<PickupPointWithReceptions>> {
        let inner = self.inner.read().await;

        let mut points = inner.points.clone();
        points.sort_by(|a, b| {
            b.registration_date
                .cmp(&a.registration_date)
                .then(a.id.as_uuid().cmp(&b.id.as_uuid()))
        });

        let offset = filter.offset().max(0) as usize;
        let limit = filter.page_size.max(0) as usize;

        let mut result = Vec::new();

        for point in points.into_iter().skip(offset).take(limit) {
            let mut receptions: Vec<Reception> = inner
                .receptions
                .iter()
                .filter(|r| r.pickup_point_id == point.id)
                .filter(|r| {
                    filter.start_date.is_none_or(|start| r.date_time >= start)
                        && filter.end_date.is_none_or(|end| r.date_time <= end)
                })
                .cloned()
                .collect();

            // A date filter drops pickup points with no matching receptions.
            if filter.has_date_bounds() && receptions.is_empty() {
                continue;
            }

            receptions.sort_by(|a, b| {
                b.date_time
                    .cmp(&a.date_time)
                    .then(a.id.as_uuid().cmp(&b.id.as_uuid()))
            });

            let receptions = receptions
                .into_iter()
                .map(|reception| {
                    let mut products: Vec<Product> = inner
                        .products
                        .iter()
                        .filter(|p| p.reception_id == reception.id)
                        .cloned()
                        .collect();
                    products.sort_by(|a, b| {
                        a.date_time
                            .cmp(&b.date_time)
                            .then(a.id.as_uuid().cmp(&b.id.as_uuid()))
                    });
                    ReceptionWithProducts {
                        reception,
                        products,
                    }
                })
                .collect();

            result.push(PickupPointWithReceptions {
                pickup_point: point,
                receptions,
            });
        }

        Ok(result)
    }

    async fn all_pickup_points(&self) -> Result<Vec<PickupPoint>> {
        let inner = self.inner.read().await;

        let mut points = inner.points.clone();
        points.sort_by(|a, b| b.registration_date.cmp(&a.registration_date));
        Ok(points)
    }
}

#[async_trait]
impl ReceptionStore for InMemoryStore {
    async fn open_reception(&self, reception: &Reception) -> Result<()> {
        let mut inner = self.inner.write().await;

        if !inner
            .points
            .iter()
            .any(|p| p.id == reception.pickup_point_id)
        {
            return Err(StoreError::PickupPointMissing);
        }

        if inner
            .open_reception_id(reception.pickup_point_id)
            .is_some()
        {
            return Err(StoreError::OpenReceptionExists);
        }

        inner.receptions.push(reception.clone());
        Ok(())
    }

    async fn close_last_reception(&self, pickup_point_id: PickupPointId) -> Result<Reception> {
        let mut inner = self.inner.write().await;

        let reception = inner
            .receptions
            .iter_mut()
            .find(|r| r.pickup_point_id == pickup_point_id && r.status.is_open())
            .ok_or(StoreError::NoOpenReception)?;

        reception.status = ReceptionStatus::Closed;
        Ok(reception.clone())
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn add_product(&self, product: &NewProduct) -> Result<Product> {
        let mut inner = self.inner.write().await;

        let reception_id = inner
            .open_reception_id(product.pickup_point_id)
            .ok_or(StoreError::NoOpenReception)?;

        let stored = Product {
            id: product.id,
            date_time: product.date_time,
            product_type: product.product_type,
            reception_id,
        };
        inner.products.push(stored.clone());
        Ok(stored)
    }

    async fn remove_last_product(&self, pickup_point_id: PickupPointId) -> Result<()> {
        let mut inner = self.inner.write().await;

        let reception_id = inner
            .open_reception_id(pickup_point_id)
            .ok_or(StoreError::NoOpenReception)?;

        // Latest creation timestamp wins; identifier breaks ties.
        let last = inner
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.reception_id == reception_id)
            .max_by_key(|(_, p)| (p.date_time, p.id.as_uuid()))
            .map(|(idx, _)| idx)
            .ok_or(StoreError::NoProductsInReception)?;

        inner.products.remove(last);
        Ok(())
    }
}
