//! Manually entered signal snapshots.
//!
//! Every metric column is nullable: `NULL` means the value was not available
//! when the snapshot was taken, which is different from a measured zero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `creator_signal_snapshots` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SignalSnapshotRow {
    pub id: i64,
    pub creator_id: i64,
    pub followers: Option<i64>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub content_count_30d: Option<i32>,
    pub reach_ratio: Option<Decimal>,
    pub bio: Option<String>,
    pub source: String,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSignalSnapshot {
    pub followers: Option<i64>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub content_count_30d: Option<i32>,
    pub reach_ratio: Option<Decimal>,
    pub bio: Option<String>,
    /// Defaults to `manual` when `None`.
    pub source: Option<String>,
}

/// Append a snapshot for a creator.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including the non-negative
/// CHECK constraints and unknown `creator_id`).
pub async fn insert_signal_snapshot(
    pool: &PgPool,
    creator_id: i64,
    snapshot: &NewSignalSnapshot,
) -> Result<SignalSnapshotRow, DbError> {
    let row = sqlx::query_as::<_, SignalSnapshotRow>(
        "INSERT INTO creator_signal_snapshots \
             (creator_id, followers, likes, comments, content_count_30d, reach_ratio, bio, source) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'manual')) \
         RETURNING id, creator_id, followers, likes, comments, content_count_30d, \
                   reach_ratio, bio, source, captured_at",
    )
    .bind(creator_id)
    .bind(snapshot.followers)
    .bind(snapshot.likes)
    .bind(snapshot.comments)
    .bind(snapshot.content_count_30d)
    .bind(snapshot.reach_ratio)
    .bind(&snapshot.bio)
    .bind(&snapshot.source)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Most recent snapshot for a creator, or `None` if none was ever entered.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_signal_snapshot(
    pool: &PgPool,
    creator_id: i64,
) -> Result<Option<SignalSnapshotRow>, DbError> {
    let row = sqlx::query_as::<_, SignalSnapshotRow>(
        "SELECT id, creator_id, followers, likes, comments, content_count_30d, \
                reach_ratio, bio, source, captured_at \
         FROM creator_signal_snapshots \
         WHERE creator_id = $1 \
         ORDER BY captured_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(creator_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
