//! Product ledger operations.

use chrono::Utc;

use common::{PickupPointId, ProductId};
use domain::{Action, DomainError, NewProduct, Product, ProductType, authorize};
use store::ProductStore;

use crate::map_store_error;

/// Attaches products to the currently open reception and removes them
/// last-in-first-out.
pub struct ProductService<S> {
    store: S,
}

impl<S: ProductStore> ProductService<S> {
    /// Creates a new product service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Records a product against the open reception of the pickup point.
    ///
    /// The type claim is validated before storage is touched; the open
    /// reception is resolved and the row inserted inside one transaction.
    #[tracing::instrument(skip(self))]
    pub async fn add_product(
        &self,
        role_claim: &str,
        type_claim: &str,
        pickup_point_id: PickupPointId,
    ) -> Result<Product, DomainError> {
        authorize(role_claim, Action::AddProduct)?;

        let product_type: ProductType = type_claim.parse()?;

        let product = self
            .store
            .add_product(&NewProduct {
                id: ProductId::new(),
                date_time: Utc::now(),
                product_type,
                pickup_point_id,
            })
            .await
            .map_err(map_store_error)?;

        metrics::counter!("products_added_total").increment(1);

        Ok(product)
    }

    /// Removes the most recently created product from the open reception.
    ///
    /// An empty reception is a distinct failure from a missing one, so the
    /// caller can tell "nothing left to remove" from "nothing is open".
    #[tracing::instrument(skip(self))]
    pub async fn remove_last_product(
        &self,
        role_claim: &str,
        pickup_point_id: PickupPointId,
    ) -> Result<(), DomainError> {
        authorize(role_claim, Action::RemoveProduct)?;

        self.store
            .remove_last_product(pickup_point_id)
            .await
            .map_err(map_store_error)
    }
}

#[cfg(test)]
mod tests {
    use common::ReceptionId;
    use domain::{City, PickupPoint, Reception, ReceptionStatus};
    use store::{InMemoryStore, PickupPointStore, ReceptionStore};

    use super::*;

    async fn seeded_open() -> (ProductService<InMemoryStore>, InMemoryStore, PickupPointId) {
        let store = InMemoryStore::new();
        let point = PickupPoint {
            id: PickupPointId::new(),
            registration_date: Utc::now(),
            city: City::Kazan,
        };
        store.create_pickup_point(&point).await.unwrap();
        store
            .open_reception(&Reception {
                id: ReceptionId::new(),
                date_time: Utc::now(),
                pickup_point_id: point.id,
                status: ReceptionStatus::InProgress,
            })
            .await
            .unwrap();
        (ProductService::new(store.clone()), store, point.id)
    }

    #[tokio::test]
    async fn employee_adds_product_to_open_reception() {
        let (service, _store, point_id) = seeded_open().await;

        let product = service
            .add_product("employee", "одежда", point_id)
            .await
            .unwrap();
        assert_eq!(product.product_type, ProductType::Clothes);
    }

    #[tokio::test]
    async fn invalid_type_fails_before_storage() {
        let (service, store, point_id) = seeded_open().await;

        let err = service
            .add_product("employee", "мебель", point_id)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidProductType("мебель".to_string()));

        let reception_id = service
            .add_product("employee", "обувь", point_id)
            .await
            .unwrap()
            .reception_id;
        // Only the valid product landed.
        assert_eq!(store.product_count(reception_id).await, 1);
    }

    #[tokio::test]
    async fn moderator_may_not_touch_products() {
        let (service, _store, point_id) = seeded_open().await;

        let err = service
            .add_product("moderator", "обувь", point_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotEnoughRights { .. }));

        let err = service
            .remove_last_product("moderator", point_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotEnoughRights { .. }));
    }

    #[tokio::test]
    async fn add_without_open_reception_fails() {
        let store = InMemoryStore::new();
        let point = PickupPoint {
            id: PickupPointId::new(),
            registration_date: Utc::now(),
            city: City::Moscow,
        };
        store.create_pickup_point(&point).await.unwrap();
        let service = ProductService::new(store);

        let err = service
            .add_product("employee", "одежда", point.id)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NoOpenReception);
    }

    #[tokio::test]
    async fn add_then_remove_round_trips() {
        let (service, store, point_id) = seeded_open().await;

        let first = service
            .add_product("employee", "электроника", point_id)
            .await
            .unwrap();
        service
            .add_product("employee", "электроника", point_id)
            .await
            .unwrap();

        service
            .remove_last_product("employee", point_id)
            .await
            .unwrap();
        assert_eq!(store.product_count(first.reception_id).await, 1);
    }

    #[tokio::test]
    async fn remove_from_empty_reception_is_distinct_error() {
        let (service, _store, point_id) = seeded_open().await;

        let err = service
            .remove_last_product("employee", point_id)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NoProductsInReception);
    }
}
