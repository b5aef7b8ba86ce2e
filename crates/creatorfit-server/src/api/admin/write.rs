//! Admin write handlers: manual signal snapshots and lifecycle transitions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use creatorfit_core::CreatorStatus;
use creatorfit_db::{DbError, NewSignalSnapshot};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use super::detail::SignalSnapshotItem;
use super::resolve_creator;

/// Upper bound of `NUMERIC(8, 4)`.
const MAX_REACH_RATIO: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Omitted fields are stored as unavailable, which is not the same as zero.
#[derive(Debug, Default, Deserialize)]
pub(in crate::api) struct CreateSignalSnapshotRequest {
    pub followers: Option<i64>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub content_count_30d: Option<i32>,
    pub reach_ratio: Option<f64>,
    pub bio: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(in crate::api) struct StatusChangeResponse {
    pub previous_status: CreatorStatus,
    pub status: CreatorStatus,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_non_negative<T>(req_id: &str, field: &str, value: Option<T>) -> Result<(), ApiError>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    match value {
        Some(v) if v < T::default() => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("'{field}' must not be negative, got {v}"),
        )),
        _ => Ok(()),
    }
}

fn parse_reach_ratio(req_id: &str, value: Option<f64>) -> Result<Option<Decimal>, ApiError> {
    let Some(v) = value else {
        return Ok(None);
    };
    if !v.is_finite() || !(0.0..MAX_REACH_RATIO).contains(&v) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("'reach_ratio' must be between 0 and {MAX_REACH_RATIO}, got {v}"),
        ));
    }
    Decimal::from_f64(v)
        .map(|d| Some(d.round_dp(4)))
        .ok_or_else(|| ApiError::new(req_id, "validation_error", "'reach_ratio' is not representable"))
}

/// Admins may only move a creator into one of these states by hand.
/// `connected` comes from OAuth. `qualified` is accepted only to turn sharing
/// back off; a connected creator reaches it through a qualification run.
fn parse_admin_status(req_id: &str, raw: &str) -> Result<CreatorStatus, ApiError> {
    match raw.trim().parse::<CreatorStatus>() {
        Ok(
            s @ (CreatorStatus::ShareEnabled | CreatorStatus::Revoked | CreatorStatus::Qualified),
        ) => Ok(s),
        _ => Err(ApiError::new(
            req_id,
            "validation_error",
            format!("status must be 'share_enabled', 'revoked' or 'qualified', got '{raw}'"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/creators/{public_id}/signals: append a snapshot.
pub(in crate::api) async fn create_signal_snapshot(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(public_id): Path<String>,
    Json(body): Json<CreateSignalSnapshotRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SignalSnapshotItem>>), ApiError> {
    let rid = &req_id.0;

    validate_non_negative(rid, "followers", body.followers)?;
    validate_non_negative(rid, "likes", body.likes)?;
    validate_non_negative(rid, "comments", body.comments)?;
    validate_non_negative(rid, "content_count_30d", body.content_count_30d)?;
    let reach_ratio = parse_reach_ratio(rid, body.reach_ratio)?;

    let creator = resolve_creator(&state.pool, &public_id, rid).await?;

    let snapshot = NewSignalSnapshot {
        followers: body.followers,
        likes: body.likes,
        comments: body.comments,
        content_count_30d: body.content_count_30d,
        reach_ratio,
        bio: body.bio.filter(|b| !b.trim().is_empty()),
        source: body.source.filter(|s| !s.trim().is_empty()),
    };

    let row = creatorfit_db::insert_signal_snapshot(&state.pool, creator.id, &snapshot)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(creator_id = creator.id, snapshot_id = row.id, "signal snapshot recorded");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: SignalSnapshotItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PATCH /api/v1/admin/creators/{public_id}/status: lifecycle transition.
pub(in crate::api) async fn update_creator_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(public_id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<StatusChangeResponse>>, ApiError> {
    let rid = &req_id.0;

    let next = parse_admin_status(rid, &body.status)?;
    let creator = resolve_creator(&state.pool, &public_id, rid).await?;

    let previous = creatorfit_db::transition_creator_status(&state.pool, creator.id, next)
        .await
        .map_err(|e| match e {
            DbError::Core(core) => ApiError::new(rid, "conflict", core.to_string()),
            DbError::NotFound => {
                ApiError::new(rid, "not_found", format!("creator '{public_id}' not found"))
            }
            other => map_db_error(rid.clone(), &other),
        })?;

    tracing::info!(
        creator_id = creator.id,
        from = %previous,
        to = %next,
        "creator status changed by admin"
    );

    Ok(Json(ApiResponse {
        data: StatusChangeResponse {
            previous_status: previous,
            status: next,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
