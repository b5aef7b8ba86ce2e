//! Database operations for the `creators` table.

use chrono::{DateTime, Utc};
use creatorfit_core::{CreatorStatus, LeadInput};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `creators` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub email: String,
    pub instagram_handle: Option<String>,
    pub declared_category: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreatorRow {
    /// Parse the stored status column.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Core`] if the column holds an unknown value.
    pub fn status(&self) -> Result<CreatorStatus, DbError> {
        Ok(self.status.parse::<CreatorStatus>()?)
    }
}

const CREATOR_COLUMNS: &str = "id, public_id, name, email, instagram_handle, declared_category, \
                               bio, status, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a new lead. The caller is expected to have run [`LeadInput::validate`].
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including unique violations
/// on `email` (see [`DbError::is_unique_violation`]).
pub async fn create_creator(pool: &PgPool, lead: &LeadInput) -> Result<CreatorRow, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(&format!(
        "INSERT INTO creators (name, email, instagram_handle, declared_category, bio, status) \
         VALUES ($1, $2, $3, $4, $5, 'lead') \
         RETURNING {CREATOR_COLUMNS}"
    ))
    .bind(&lead.name)
    .bind(&lead.email)
    .bind(&lead.instagram_handle)
    .bind(&lead.declared_category)
    .bind(&lead.bio)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns a creator by internal id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_creator_by_id(pool: &PgPool, id: i64) -> Result<Option<CreatorRow>, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(&format!(
        "SELECT {CREATOR_COLUMNS} FROM creators WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns a creator by its public UUID, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_creator_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<CreatorRow>, DbError> {
    let row = sqlx::query_as::<_, CreatorRow>(&format!(
        "SELECT {CREATOR_COLUMNS} FROM creators WHERE public_id = $1"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Move a creator to `next`, enforcing the lifecycle rules.
///
/// The row is locked for the duration of the check so concurrent transitions
/// cannot both pass validation. Returns the status the creator had before.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] for an unknown id, [`DbError::Core`] for a
/// disallowed transition, or [`DbError::Sqlx`] on query failure.
pub async fn transition_creator_status(
    pool: &PgPool,
    creator_id: i64,
    next: CreatorStatus,
) -> Result<CreatorStatus, DbError> {
    let mut tx = pool.begin().await?;

    let current: String =
        sqlx::query_scalar("SELECT status FROM creators WHERE id = $1 FOR UPDATE")
            .bind(creator_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;
    let current = current.parse::<CreatorStatus>()?;

    current.transition_to(next)?;

    crate::qualification::set_creator_status(&mut *tx, creator_id, next, Utc::now()).await?;

    tx.commit().await?;
    Ok(current)
}
