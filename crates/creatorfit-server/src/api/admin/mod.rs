//! Admin API handlers. All routes sit behind the bearer-token layer.
//!
//! - `GET /api/v1/admin/creators`: overview list
//! - `GET /api/v1/admin/creators.csv`: overview as CSV
//! - `GET /api/v1/admin/creators/{public_id}`: creator detail
//! - `POST /api/v1/admin/creators/{public_id}/signals`: append a signal snapshot
//! - `POST /api/v1/admin/creators/{public_id}/qualify`: re-run qualification
//! - `PATCH /api/v1/admin/creators/{public_id}/status`: lifecycle transition

mod detail;
mod export;
mod list;
mod qualify;
mod write;

pub(super) use detail::get_creator_detail;
pub(super) use export::export_creators_csv;
#[cfg(test)]
pub(super) use export::write_csv;
pub(super) use list::list_creators;
pub(super) use qualify::qualify_creator;
pub(super) use write::{create_signal_snapshot, update_creator_status};

use creatorfit_core::CreatorStatus;
use uuid::Uuid;

use super::{map_db_error, ApiError};

/// Resolve a creator's public id to its row, returning 404 if not found.
async fn resolve_creator(
    pool: &sqlx::PgPool,
    public_id: &str,
    request_id: &str,
) -> Result<creatorfit_db::CreatorRow, ApiError> {
    let parsed = Uuid::parse_str(public_id).map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("'{public_id}' is not a valid creator id"),
        )
    })?;

    creatorfit_db::get_creator_by_public_id(pool, parsed)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                request_id,
                "not_found",
                format!("creator '{public_id}' not found"),
            )
        })
}

/// Parse an optional `status` filter into its canonical string form.
fn parse_status_filter(request_id: &str, raw: Option<&str>) -> Result<Option<String>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<CreatorStatus>()
            .map(|s| Some(s.as_str().to_owned()))
            .map_err(|_| {
                ApiError::new(
                    request_id,
                    "validation_error",
                    format!("unknown status '{value}'"),
                )
            }),
    }
}
