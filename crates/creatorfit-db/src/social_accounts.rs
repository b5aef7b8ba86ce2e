//! Database operations for the `social_accounts` table.

use chrono::{DateTime, Utc};
use creatorfit_core::CreatorStatus;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `social_accounts` table.
///
/// `access_token` is never serialized or logged by callers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SocialAccountRow {
    pub id: i64,
    pub creator_id: i64,
    pub platform: String,
    pub platform_user_id: String,
    pub username: Option<String>,
    pub account_type: Option<String>,
    pub media_count: Option<i64>,
    pub access_token: String,
    pub connected_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written on every connect or reconnect.
#[derive(Debug, Clone)]
pub struct NewSocialAccount<'a> {
    pub platform: &'a str,
    pub platform_user_id: &'a str,
    pub username: Option<&'a str>,
    pub account_type: Option<&'a str>,
    pub media_count: Option<i64>,
    pub access_token: &'a str,
}

/// Insert or refresh a creator's account for `account.platform` and advance
/// the creator's status for the connection, in one transaction.
///
/// A reconnect overwrites the token and profile fields and keeps the original
/// `connected_at`. Status moves `lead → connected`; later statuses are kept.
/// Returns the stored account and the creator's resulting status.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] for an unknown creator, [`DbError::Core`] if
/// the creator is revoked, or [`DbError::Sqlx`] on query failure.
pub async fn upsert_social_account(
    pool: &PgPool,
    creator_id: i64,
    account: &NewSocialAccount<'_>,
) -> Result<(SocialAccountRow, CreatorStatus), DbError> {
    let mut tx = pool.begin().await?;

    let current: String =
        sqlx::query_scalar("SELECT status FROM creators WHERE id = $1 FOR UPDATE")
            .bind(creator_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;
    let current = current.parse::<CreatorStatus>()?;
    if current == CreatorStatus::Revoked {
        current.transition_to(CreatorStatus::Connected)?;
    }
    let next = current.after_connection();

    let row = sqlx::query_as::<_, SocialAccountRow>(
        "INSERT INTO social_accounts \
             (creator_id, platform, platform_user_id, username, account_type, media_count, \
              access_token) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (creator_id, platform) DO UPDATE SET \
             platform_user_id = EXCLUDED.platform_user_id, \
             username = EXCLUDED.username, \
             account_type = EXCLUDED.account_type, \
             media_count = EXCLUDED.media_count, \
             access_token = EXCLUDED.access_token, \
             updated_at = NOW() \
         RETURNING id, creator_id, platform, platform_user_id, username, account_type, \
                   media_count, access_token, connected_at, updated_at",
    )
    .bind(creator_id)
    .bind(account.platform)
    .bind(account.platform_user_id)
    .bind(account.username)
    .bind(account.account_type)
    .bind(account.media_count)
    .bind(account.access_token)
    .fetch_one(&mut *tx)
    .await?;

    if next != current {
        crate::qualification::set_creator_status(&mut *tx, creator_id, next, Utc::now()).await?;
    }

    tx.commit().await?;
    Ok((row, next))
}

/// Username of the creator's account on `platform`, if connected.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_social_username(
    pool: &PgPool,
    creator_id: i64,
    platform: &str,
) -> Result<Option<String>, DbError> {
    let username: Option<Option<String>> = sqlx::query_scalar(
        "SELECT username FROM social_accounts WHERE creator_id = $1 AND platform = $2",
    )
    .bind(creator_id)
    .bind(platform)
    .fetch_optional(pool)
    .await?;

    Ok(username.flatten())
}
