//! `GET /api/v1/admin/creators.csv`: the overview list as a CSV download.

use std::borrow::Cow;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::super::{map_db_error, ApiError, AppState};
use super::parse_status_filter;

const CSV_HEADERS: [&str; 12] = [
    "public_id",
    "name",
    "email",
    "instagram_handle",
    "instagram_username",
    "declared_category",
    "status",
    "primary_niche",
    "confidence",
    "total_score",
    "grade",
    "scored_at",
];

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ExportQuery {
    pub status: Option<String>,
}

pub(in crate::api) async fn export_creators_csv(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let rid = &req_id.0;
    let status = parse_status_filter(rid, params.status.as_deref())?;

    let rows = creatorfit_db::list_creators_overview(
        &state.pool,
        status.as_deref(),
        creatorfit_db::MAX_OVERVIEW_LIMIT,
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    let body = write_csv(&rows).map_err(|e| {
        tracing::error!(error = %e, "failed to write creators CSV");
        ApiError::new(rid, "internal_error", "failed to build CSV export")
    })?;

    tracing::info!(rows = rows.len(), "creators CSV exported");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"creators.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

pub(in crate::api) fn write_csv(
    rows: &[creatorfit_db::CreatorOverviewRow],
) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for row in rows {
        let text = |value: Option<&str>| neutralize_formula(value.unwrap_or_default()).into_owned();
        writer.write_record([
            row.public_id.to_string(),
            text(Some(row.name.as_str())),
            text(Some(row.email.as_str())),
            text(row.instagram_handle.as_deref()),
            text(row.instagram_username.as_deref()),
            text(row.declared_category.as_deref()),
            row.status.clone(),
            text(row.primary_niche.as_deref()),
            row.confidence.map(|c| c.to_string()).unwrap_or_default(),
            row.total_score.map(|s| s.to_string()).unwrap_or_default(),
            text(row.grade.as_deref()),
            row.scored_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Spreadsheet apps evaluate cells starting with these as formulas.
const FORMULA_PREFIXES: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Prefixes a leading `'` onto creator-supplied text that a spreadsheet would
/// otherwise run as a formula.
fn neutralize_formula(value: &str) -> Cow<'_, str> {
    if value.starts_with(FORMULA_PREFIXES) {
        Cow::Owned(format!("'{value}"))
    } else {
        Cow::Borrowed(value)
    }
}
