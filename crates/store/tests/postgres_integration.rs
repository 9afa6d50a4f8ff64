//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use common::{PickupPointId, ProductId, ReceptionId};
use domain::{
    City, ListFilter, NewProduct, PickupPoint, ProductType, Reception, ReceptionStatus,
};
use store::{
    PgStore, PickupPointStore, ProductStore, ReceptionStore, StoreError,
};

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for the schema
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_pvz_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PgStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE products, receptions, pickup_points")
        .execute(&pool)
        .await
        .unwrap();

    PgStore::new(pool)
}

fn ts(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, minute, 0).unwrap()
}

fn test_point(minute: u32, city: City) -> PickupPoint {
    PickupPoint {
        id: PickupPointId::new(),
        registration_date: ts(minute),
        city,
    }
}

fn test_reception(pickup_point_id: PickupPointId, minute: u32) -> Reception {
    Reception {
        id: ReceptionId::new(),
        date_time: ts(minute),
        pickup_point_id,
        status: ReceptionStatus::InProgress,
    }
}

fn test_product(pickup_point_id: PickupPointId, minute: u32) -> NewProduct {
    NewProduct {
        id: ProductId::new(),
        date_time: ts(minute),
        product_type: ProductType::Electronics,
        pickup_point_id,
    }
}

#[tokio::test]
async fn create_and_list_pickup_point() {
    let store = get_test_store().await;

    let point = test_point(0, City::Moscow);
    store.create_pickup_point(&point).await.unwrap();

    let tree = store
        .list_pickup_points(&ListFilter::default())
        .await
        .unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].pickup_point, point);
    assert!(tree[0].receptions.is_empty());
}

#[tokio::test]
async fn duplicate_pickup_point_id_is_a_distinct_error() {
    let store = get_test_store().await;

    let point = test_point(0, City::Kazan);
    store.create_pickup_point(&point).await.unwrap();

    let mut clone = test_point(1, City::Moscow);
    clone.id = point.id;
    let err = store.create_pickup_point(&clone).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicatePickupPoint));
}

#[tokio::test]
async fn open_reception_on_missing_point_fails_fast() {
    let store = get_test_store().await;

    let err = store
        .open_reception(&test_reception(PickupPointId::new(), 0))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::PickupPointMissing));
}

#[tokio::test]
async fn reception_lifecycle_open_conflict_close() {
    let store = get_test_store().await;
    let point = test_point(0, City::SaintPetersburg);
    store.create_pickup_point(&point).await.unwrap();

    store
        .open_reception(&test_reception(point.id, 1))
        .await
        .unwrap();

    let err = store
        .open_reception(&test_reception(point.id, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::OpenReceptionExists));

    let closed = store.close_last_reception(point.id).await.unwrap();
    assert_eq!(closed.status, ReceptionStatus::Closed);
    assert_eq!(closed.pickup_point_id, point.id);

    let err = store.close_last_reception(point.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NoOpenReception));
}

#[tokio::test]
async fn concurrent_opens_leave_exactly_one_open_reception() {
    let store = get_test_store().await;
    let point = test_point(0, City::Moscow);
    store.create_pickup_point(&point).await.unwrap();

    let a = store.clone();
    let b = store.clone();
    let point_id = point.id;

    let (first, second) = tokio::join!(
        tokio::spawn(async move { a.open_reception(&test_reception(point_id, 1)).await }),
        tokio::spawn(async move { b.open_reception(&test_reception(point_id, 2)).await }),
    );

    let outcomes = [first.unwrap(), second.unwrap()];
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(StoreError::OpenReceptionExists))));

    let open_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM receptions WHERE pvz_id = $1 AND status = 'in_progress'",
    )
    .bind(point_id.as_uuid())
    .fetch_one(store.pool())
    .await
    .unwrap();
    assert_eq!(open_count, 1);
}

#[tokio::test]
async fn products_attach_to_open_reception_and_remove_lifo() {
    let store = get_test_store().await;
    let point = test_point(0, City::Moscow);
    store.create_pickup_point(&point).await.unwrap();
    store
        .open_reception(&test_reception(point.id, 1))
        .await
        .unwrap();

    let first = store.add_product(&test_product(point.id, 2)).await.unwrap();
    let second = store.add_product(&test_product(point.id, 3)).await.unwrap();
    let third = store.add_product(&test_product(point.id, 4)).await.unwrap();
    assert_eq!(first.reception_id, second.reception_id);

    store.remove_last_product(point.id).await.unwrap();

    let remaining: Vec<uuid::Uuid> =
        sqlx::query_scalar("SELECT id FROM products WHERE reception_id = $1 ORDER BY date_time")
            .bind(first.reception_id.as_uuid())
            .fetch_all(store.pool())
            .await
            .unwrap();

    assert_eq!(remaining, vec![first.id.as_uuid(), second.id.as_uuid()]);
    assert!(!remaining.contains(&third.id.as_uuid()));
}

#[tokio::test]
async fn remove_last_product_reports_empty_reception() {
    let store = get_test_store().await;
    let point = test_point(0, City::Kazan);
    store.create_pickup_point(&point).await.unwrap();
    store
        .open_reception(&test_reception(point.id, 1))
        .await
        .unwrap();

    let err = store.remove_last_product(point.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NoProductsInReception));
}

#[tokio::test]
async fn product_mutations_require_open_reception() {
    let store = get_test_store().await;
    let point = test_point(0, City::Moscow);
    store.create_pickup_point(&point).await.unwrap();

    let err = store.add_product(&test_product(point.id, 1)).await.unwrap_err();
    assert!(matches!(err, StoreError::NoOpenReception));

    store
        .open_reception(&test_reception(point.id, 1))
        .await
        .unwrap();
    store.add_product(&test_product(point.id, 2)).await.unwrap();
    store.close_last_reception(point.id).await.unwrap();

    // Closed reception is frozen: its product set no longer changes.
    let err = store.add_product(&test_product(point.id, 3)).await.unwrap_err();
    assert!(matches!(err, StoreError::NoOpenReception));
    let err = store.remove_last_product(point.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NoOpenReception));
}

#[tokio::test]
async fn listing_nests_receptions_and_products_in_order() {
    let store = get_test_store().await;
    let point = test_point(0, City::Moscow);
    store.create_pickup_point(&point).await.unwrap();

    store
        .open_reception(&test_reception(point.id, 1))
        .await
        .unwrap();
    store.add_product(&test_product(point.id, 2)).await.unwrap();
    store.add_product(&test_product(point.id, 3)).await.unwrap();
    store.close_last_reception(point.id).await.unwrap();

    store
        .open_reception(&test_reception(point.id, 10))
        .await
        .unwrap();
    store.add_product(&test_product(point.id, 11)).await.unwrap();

    let tree = store
        .list_pickup_points(&ListFilter::default())
        .await
        .unwrap();

    assert_eq!(tree.len(), 1);
    let receptions = &tree[0].receptions;
    assert_eq!(receptions.len(), 2);
    // Receptions are ordered by creation time descending.
    assert_eq!(receptions[0].reception.date_time, ts(10));
    assert_eq!(receptions[0].products.len(), 1);
    assert_eq!(receptions[1].reception.date_time, ts(1));
    assert_eq!(receptions[1].products.len(), 2);
}

#[tokio::test]
async fn date_filter_restricts_receptions_not_products() {
    let store = get_test_store().await;

    let matching = test_point(0, City::Moscow);
    let outside = test_point(1, City::Kazan);
    store.create_pickup_point(&matching).await.unwrap();
    store.create_pickup_point(&outside).await.unwrap();

    store
        .open_reception(&test_reception(matching.id, 10))
        .await
        .unwrap();
    // Product timestamp outside the queried window; it must still appear.
    store
        .add_product(&test_product(matching.id, 50))
        .await
        .unwrap();
    store.close_last_reception(matching.id).await.unwrap();
    store
        .open_reception(&test_reception(matching.id, 40))
        .await
        .unwrap();

    store
        .open_reception(&test_reception(outside.id, 45))
        .await
        .unwrap();

    let filter = ListFilter::new(Some(ts(5)), Some(ts(20)), None, None);
    let tree = store.list_pickup_points(&filter).await.unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].pickup_point.id, matching.id);
    assert_eq!(tree[0].receptions.len(), 1);
    assert_eq!(tree[0].receptions[0].reception.date_time, ts(10));
    assert_eq!(tree[0].receptions[0].products.len(), 1);
}

#[tokio::test]
async fn pagination_selects_pickup_point_pages() {
    let store = get_test_store().await;
    for minute in 0..5 {
        store
            .create_pickup_point(&test_point(minute, City::Moscow))
            .await
            .unwrap();
    }

    let mut sizes = Vec::new();
    for page in 1..=4 {
        let filter = ListFilter::new(None, None, Some(page), Some(2));
        sizes.push(store.list_pickup_points(&filter).await.unwrap().len());
    }
    assert_eq!(sizes, vec![2, 2, 1, 0]);

    // Page one carries the most recently registered points.
    let first_page = store
        .list_pickup_points(&ListFilter::new(None, None, Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(first_page[0].pickup_point.registration_date, ts(4));
    assert_eq!(first_page[1].pickup_point.registration_date, ts(3));
}

#[tokio::test]
async fn all_pickup_points_returns_bare_rows() {
    let store = get_test_store().await;
    for minute in 0..3 {
        store
            .create_pickup_point(&test_point(minute, City::SaintPetersburg))
            .await
            .unwrap();
    }

    let all = store.all_pickup_points().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].registration_date >= w[1].registration_date));
}

#[tokio::test]
async fn removal_prefers_greater_id_on_equal_timestamps() {
    let store = get_test_store().await;
    let point = test_point(0, City::Moscow);
    store.create_pickup_point(&point).await.unwrap();
    store
        .open_reception(&test_reception(point.id, 1))
        .await
        .unwrap();

    let mut a = test_product(point.id, 2);
    let mut b = test_product(point.id, 2);
    // Force a deterministic identifier ordering for the tie.
    a.id = ProductId::from_uuid(uuid::Uuid::from_u128(1));
    b.id = ProductId::from_uuid(uuid::Uuid::from_u128(2));
    store.add_product(&a).await.unwrap();
    store.add_product(&b).await.unwrap();

    store.remove_last_product(point.id).await.unwrap();

    let remaining: Vec<uuid::Uuid> =
        sqlx::query_scalar("SELECT id FROM products WHERE reception_id IS NOT NULL")
            .fetch_all(store.pool())
            .await
            .unwrap();
    assert_eq!(remaining, vec![a.id.as_uuid()]);
}

#[tokio::test]
async fn inclusive_filter_bounds_match_exact_timestamps() {
    let store = get_test_store().await;
    let point = test_point(0, City::Moscow);
    store.create_pickup_point(&point).await.unwrap();
    store
        .open_reception(&test_reception(point.id, 10))
        .await
        .unwrap();

    let exact = ListFilter::new(Some(ts(10)), Some(ts(10)), None, None);
    assert_eq!(store.list_pickup_points(&exact).await.unwrap().len(), 1);

    let just_after = ListFilter::new(
        Some(ts(10) + Duration::seconds(1)),
        Some(ts(20)),
        None,
        None,
    );
    assert!(store.list_pickup_points(&just_after).await.unwrap().is_empty());
}
