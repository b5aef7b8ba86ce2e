//! `GET /api/v1/admin/creators`: creators with their latest score.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};
use super::parse_status_filter;

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ListCreatorsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct CreatorSummaryItem {
    pub public_id: Uuid,
    pub name: String,
    pub email: String,
    pub instagram_handle: Option<String>,
    pub instagram_username: Option<String>,
    pub declared_category: Option<String>,
    pub status: String,
    pub primary_niche: Option<String>,
    pub confidence: Option<Decimal>,
    pub total_score: Option<i16>,
    pub grade: Option<String>,
    pub scored_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<creatorfit_db::CreatorOverviewRow> for CreatorSummaryItem {
    fn from(row: creatorfit_db::CreatorOverviewRow) -> Self {
        Self {
            public_id: row.public_id,
            name: row.name,
            email: row.email,
            instagram_handle: row.instagram_handle,
            instagram_username: row.instagram_username,
            declared_category: row.declared_category,
            status: row.status,
            primary_niche: row.primary_niche,
            confidence: row.confidence,
            total_score: row.total_score,
            grade: row.grade,
            scored_at: row.scored_at,
            created_at: row.created_at,
        }
    }
}

pub(in crate::api) async fn list_creators(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ListCreatorsQuery>,
) -> Result<Json<ApiResponse<Vec<CreatorSummaryItem>>>, ApiError> {
    let status = parse_status_filter(&req_id.0, params.status.as_deref())?;
    let limit = normalize_limit(params.limit);

    let rows = creatorfit_db::list_creators_overview(&state.pool, status.as_deref(), limit)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(CreatorSummaryItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
