//! Reception lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use common::PickupPointId;
use store::{PickupPointStore, ProductStore, ReceptionStore};

use crate::error::ApiError;
use crate::routes::pvz::{AppState, ReceptionResponse};
use crate::routes::role_claim;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenReceptionRequest {
    pub pvz_id: Uuid,
}

/// POST /receptions — open a reception at a pickup point (employee only).
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<OpenReceptionRequest>,
) -> Result<(StatusCode, Json<ReceptionResponse>), ApiError>
where
    S: PickupPointStore + ReceptionStore + ProductStore + Clone + Send + Sync + 'static,
{
    let role = role_claim(&headers)?;

    let reception = state
        .receptions
        .open_reception(role, PickupPointId::from_uuid(req.pvz_id))
        .await?;

    Ok((StatusCode::CREATED, Json((&reception).into())))
}

/// POST /pvz/{pvzId}/close_last_reception — close the open reception.
#[tracing::instrument(skip(state, headers))]
pub async fn close_last<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(pvz_id): Path<Uuid>,
) -> Result<Json<ReceptionResponse>, ApiError>
where
    S: PickupPointStore + ReceptionStore + ProductStore + Clone + Send + Sync + 'static,
{
    let role = role_claim(&headers)?;

    let reception = state
        .receptions
        .close_last_reception(role, PickupPointId::from_uuid(pvz_id))
        .await?;

    Ok(Json((&reception).into()))
}
