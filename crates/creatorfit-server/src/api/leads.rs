//! `POST /api/v1/leads`: creator sign-up from the landing page.

use axum::{extract::State, http::StatusCode, Extension, Json};
use creatorfit_core::LeadInput;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CreatedLead {
    public_id: Uuid,
    status: String,
    /// Where the landing page sends the creator next.
    connect_url: String,
}

pub(super) async fn create_lead(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LeadInput>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedLead>>), ApiError> {
    let rid = &req_id.0;

    let lead = body
        .validate()
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let row = creatorfit_db::create_creator(&state.pool, &lead)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                ApiError::new(rid, "conflict", "a creator with that email already exists")
            } else {
                map_db_error(rid.clone(), &e)
            }
        })?;

    tracing::info!(creator_id = row.id, public_id = %row.public_id, "lead created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreatedLead {
                public_id: row.public_id,
                connect_url: format!("/auth/instagram/start?creator={}", row.public_id),
                status: row.status,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
