//! `POST /api/v1/admin/creators/{public_id}/qualify`: run the pipeline again.
//!
//! Every call appends a new run; re-posting after a failure is always safe.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use creatorfit_core::{CreatorStatus, Qualification};
use creatorfit_qualify::QualifyError;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::super::{ApiError, ApiResponse, AppState, ResponseMeta};
use super::resolve_creator;

#[derive(Debug, Serialize)]
pub(in crate::api) struct QualifyResponse {
    pub run_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub status: CreatorStatus,
    pub qualification: Qualification,
}

pub(in crate::api) async fn qualify_creator(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(public_id): Path<String>,
) -> Result<Json<ApiResponse<QualifyResponse>>, ApiError> {
    let rid = &req_id.0;
    let creator = resolve_creator(&state.pool, &public_id, rid).await?;

    let run = creatorfit_qualify::run_qualification(
        &state.pool,
        &state.signals,
        &state.taxonomy,
        state.config.zero_hit_policy,
        creator.id,
    )
    .await
    .map_err(|e| match e {
        QualifyError::InvalidInput(message) => {
            tracing::warn!(creator_id = creator.id, %message, "qualification rejected");
            ApiError::new(rid, "validation_error", message)
        }
        QualifyError::CreatorNotFound(_) => {
            ApiError::new(rid, "not_found", format!("creator '{public_id}' not found"))
        }
        other => {
            tracing::error!(creator_id = creator.id, error = %other, "qualification failed");
            ApiError::new(rid, "internal_error", "qualification failed")
        }
    })?;

    Ok(Json(ApiResponse {
        data: QualifyResponse {
            run_id: run.run_id,
            computed_at: run.computed_at,
            status: run.status,
            qualification: run.qualification,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
