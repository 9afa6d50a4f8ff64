//! Product ledger endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use common::PickupPointId;
use store::{PickupPointStore, ProductStore, ReceptionStore};

use crate::error::ApiError;
use crate::routes::pvz::{AppState, ProductResponse};
use crate::routes::role_claim;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    #[serde(rename = "type")]
    pub product_type: String,
    pub pvz_id: Uuid,
}

/// POST /products — record a product against the open reception.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<AddProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError>
where
    S: PickupPointStore + ReceptionStore + ProductStore + Clone + Send + Sync + 'static,
{
    let role = role_claim(&headers)?;

    let product = state
        .products
        .add_product(role, &req.product_type, PickupPointId::from_uuid(req.pvz_id))
        .await?;

    Ok((StatusCode::CREATED, Json((&product).into())))
}

/// POST /pvz/{pvzId}/delete_last_product — remove the newest product.
#[tracing::instrument(skip(state, headers))]
pub async fn delete_last<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(pvz_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
    S: PickupPointStore + ReceptionStore + ProductStore + Clone + Send + Sync + 'static,
{
    let role = role_claim(&headers)?;

    state
        .products
        .remove_last_product(role, PickupPointId::from_uuid(pvz_id))
        .await?;

    Ok(StatusCode::OK)
}
