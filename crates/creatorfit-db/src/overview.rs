//! Admin overview: one row per creator with its current qualification.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Upper bound for `limit` in [`list_creators_overview`].
pub const MAX_OVERVIEW_LIMIT: i64 = 1000;

/// A creator joined with its latest score and classification.
///
/// Score and classification fields are `None` for creators never qualified.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorOverviewRow {
    pub id: i64,
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

/// List creators newest first, optionally filtered by status.
///
/// `limit` is clamped to `1..=MAX_OVERVIEW_LIMIT`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_creators_overview(
    pool: &PgPool,
    status: Option<&str>,
    limit: i64,
) -> Result<Vec<CreatorOverviewRow>, DbError> {
    let limit = limit.clamp(1, MAX_OVERVIEW_LIMIT);

    let rows = sqlx::query_as::<_, CreatorOverviewRow>(
        "SELECT c.id, c.public_id, c.name, c.email, c.instagram_handle, \
                sa.username AS instagram_username, c.declared_category, c.status, \
                nc.primary_niche, nc.confidence, \
                cs.total_score, cs.grade, cs.computed_at AS scored_at, \
                c.created_at \
         FROM creators c \
         LEFT JOIN social_accounts sa \
                ON sa.creator_id = c.id AND sa.platform = 'instagram' \
         LEFT JOIN LATERAL ( \
             SELECT primary_niche, confidence \
             FROM niche_classifications \
             WHERE creator_id = c.id \
             ORDER BY computed_at DESC, id DESC \
             LIMIT 1 \
         ) nc ON TRUE \
         LEFT JOIN LATERAL ( \
             SELECT total_score, grade, computed_at \
             FROM creator_scores \
             WHERE creator_id = c.id \
             ORDER BY computed_at DESC, id DESC \
             LIMIT 1 \
         ) cs ON TRUE \
         WHERE ($1::TEXT IS NULL OR c.status = $1) \
         ORDER BY c.created_at DESC, c.id DESC \
         LIMIT $2",
    )
    .bind(status)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
