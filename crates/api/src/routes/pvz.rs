//! Pickup-point creation and listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::{PickupPoint, PickupPointWithReceptions, Product, Reception};
use service::{PickupPointService, ProductService, ReceptionService};
use store::{PickupPointStore, ProductStore, ReceptionStore};

use crate::error::ApiError;
use crate::routes::role_claim;

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub pickup_points: PickupPointService<S>,
    pub receptions: ReceptionService<S>,
    pub products: ProductService<S>,
}

impl<S: Clone + PickupPointStore + ReceptionStore + ProductStore> AppState<S> {
    /// Builds the state by handing each service its own store handle.
    pub fn new(store: S) -> Self {
        Self {
            pickup_points: PickupPointService::new(store.clone()),
            receptions: ReceptionService::new(store.clone()),
            products: ProductService::new(store),
        }
    }
}

// -- Request types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickupPointRequest {
    pub city: String,
    pub id: Option<Uuid>,
    pub registration_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointResponse {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub city: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionResponse {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    pub pvz_id: Uuid,
    pub status: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub product_type: String,
    pub reception_id: Uuid,
}

#[derive(Serialize)]
pub struct ReceptionWithProductsResponse {
    pub reception: ReceptionResponse,
    pub products: Vec<ProductResponse>,
}

#[derive(Serialize)]
pub struct PickupPointWithReceptionsResponse {
    pub pvz: PickupPointResponse,
    pub receptions: Vec<ReceptionWithProductsResponse>,
}

impl From<&PickupPoint> for PickupPointResponse {
    fn from(point: &PickupPoint) -> Self {
        Self {
            id: point.id.as_uuid(),
            registration_date: point.registration_date,
            city: point.city.to_string(),
        }
    }
}

impl From<&Reception> for ReceptionResponse {
    fn from(reception: &Reception) -> Self {
        Self {
            id: reception.id.as_uuid(),
            date_time: reception.date_time,
            pvz_id: reception.pickup_point_id.as_uuid(),
            status: reception.status.to_string(),
        }
    }
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_uuid(),
            date_time: product.date_time,
            product_type: product.product_type.to_string(),
            reception_id: product.reception_id.as_uuid(),
        }
    }
}

impl From<&PickupPointWithReceptions> for PickupPointWithReceptionsResponse {
    fn from(entry: &PickupPointWithReceptions) -> Self {
        Self {
            pvz: (&entry.pickup_point).into(),
            receptions: entry
                .receptions
                .iter()
                .map(|r| ReceptionWithProductsResponse {
                    reception: (&r.reception).into(),
                    products: r.products.iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// POST /pvz — register a new pickup point (moderator only).
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<CreatePickupPointRequest>,
) -> Result<(StatusCode, Json<PickupPointResponse>), ApiError>
where
    S: PickupPointStore + ReceptionStore + ProductStore + Clone + Send + Sync + 'static,
{
    let role = role_claim(&headers)?;

    let point = state
        .pickup_points
        .create_pickup_point(role, &req.city, req.id, req.registration_date)
        .await?;

    Ok((StatusCode::CREATED, Json((&point).into())))
}

/// GET /pvz — paginated aggregate listing with optional reception date filter.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PickupPointWithReceptionsResponse>>, ApiError>
where
    S: PickupPointStore + ReceptionStore + ProductStore + Clone + Send + Sync + 'static,
{
    let role = role_claim(&headers)?;

    let tree = state
        .pickup_points
        .list_pickup_points(role, query.start_date, query.end_date, query.page, query.limit)
        .await?;

    Ok(Json(tree.iter().map(Into::into).collect()))
}

/// GET /pvz/all — every pickup point, no pagination, no children.
#[tracing::instrument(skip(state))]
pub async fn all<S>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<PickupPointResponse>>, ApiError>
where
    S: PickupPointStore + ReceptionStore + ProductStore + Clone + Send + Sync + 'static,
{
    let points = state.pickup_points.all_pickup_points().await?;
    Ok(Json(points.iter().map(Into::into).collect()))
}
