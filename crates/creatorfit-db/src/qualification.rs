//! Append-only storage for qualification outputs.
//!
//! `niche_classifications`, `creator_scores` and `brand_targets` only ever get
//! INSERTs (a trigger rejects UPDATE/DELETE). The "current" row for a creator
//! is the newest by `computed_at`, with the `BIGSERIAL id` breaking ties between
//! runs that share a timestamp.

use chrono::{DateTime, Utc};
use creatorfit_core::{
    CreatorScore, CreatorStatus, NicheClassification, Qualification, TargetType,
};
use rust_decimal::prelude::*;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `niche_classifications` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NicheClassificationRow {
    pub id: i64,
    pub creator_id: i64,
    pub run_id: Uuid,
    pub primary_niche: String,
    pub secondary_niches: Vec<String>,
    pub confidence: Decimal,
    pub evidence_keywords: Vec<String>,
    pub model_version: String,
    pub computed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `creator_scores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CreatorScoreRow {
    pub id: i64,
    pub creator_id: i64,
    pub run_id: Uuid,
    pub engagement_score: i16,
    pub reach_score: Option<i16>,
    pub consistency_score: i16,
    pub niche_score: i16,
    pub fraud_penalty: i16,
    pub total_score: i16,
    pub grade: String,
    pub algorithm_version: String,
    pub computed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `brand_targets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandTargetRow {
    pub id: i64,
    pub creator_id: i64,
    pub run_id: Uuid,
    pub target_type: String,
    pub niche_segment: String,
    pub categories: Vec<String>,
    pub computed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Identifiers of the rows written by one [`record_qualification`] call.
#[derive(Debug, Clone)]
pub struct RecordedQualification {
    pub run_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub classification_id: i64,
    pub score_id: i64,
    pub brand_target_ids: [i64; 2],
    pub status: CreatorStatus,
}

/// Convert a classifier confidence to the `NUMERIC(3,2)` column value.
fn confidence_to_decimal(confidence: f64) -> Decimal {
    Decimal::from_f64(confidence.clamp(0.0, 1.0))
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}

// ---------------------------------------------------------------------------
// Appends (run inside the caller's transaction)
// ---------------------------------------------------------------------------

/// Append one classification row and return its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn append_niche_classification(
    conn: &mut PgConnection,
    creator_id: i64,
    run_id: Uuid,
    result: &NicheClassification,
    computed_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO niche_classifications \
             (creator_id, run_id, primary_niche, secondary_niches, confidence, \
              evidence_keywords, model_version, computed_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(creator_id)
    .bind(run_id)
    .bind(&result.primary_niche)
    .bind(&result.secondary_niches)
    .bind(confidence_to_decimal(result.confidence))
    .bind(&result.evidence_keywords)
    .bind(&result.model_version)
    .bind(computed_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Append one score row and return its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn append_creator_score(
    conn: &mut PgConnection,
    creator_id: i64,
    run_id: Uuid,
    result: &CreatorScore,
    computed_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO creator_scores \
             (creator_id, run_id, engagement_score, reach_score, consistency_score, \
              niche_score, fraud_penalty, total_score, grade, algorithm_version, computed_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING id",
    )
    .bind(creator_id)
    .bind(run_id)
    .bind(result.engagement)
    .bind(result.reach)
    .bind(result.consistency)
    .bind(result.niche)
    .bind(result.fraud_penalty)
    .bind(result.total)
    .bind(result.grade.as_str())
    .bind(&result.algorithm_version)
    .bind(computed_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Append the `local` and `ecommerce` rows for one run. Returns `[local_id, ecommerce_id]`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either insert fails.
pub async fn append_brand_targets(
    conn: &mut PgConnection,
    creator_id: i64,
    run_id: Uuid,
    niche_segment: &str,
    local: &[String],
    ecommerce: &[String],
    computed_at: DateTime<Utc>,
) -> Result<[i64; 2], DbError> {
    let mut ids = [0_i64; 2];

    for (slot, (target_type, categories)) in [
        (TargetType::Local, local),
        (TargetType::Ecommerce, ecommerce),
    ]
    .into_iter()
    .enumerate()
    {
        ids[slot] = sqlx::query_scalar(
            "INSERT INTO brand_targets \
                 (creator_id, run_id, target_type, niche_segment, categories, computed_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(creator_id)
        .bind(run_id)
        .bind(target_type.as_str())
        .bind(niche_segment)
        .bind(categories)
        .bind(computed_at)
        .fetch_one(&mut *conn)
        .await?;
    }

    Ok(ids)
}

/// Set a creator's lifecycle status without validating the transition.
///
/// Callers validate first; see [`crate::transition_creator_status`] and
/// [`record_qualification`].
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no creator has this id, or [`DbError::Sqlx`].
pub async fn set_creator_status(
    conn: &mut PgConnection,
    creator_id: i64,
    status: CreatorStatus,
    updated_at: DateTime<Utc>,
) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE creators SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(status.as_str())
        .bind(updated_at)
        .bind(creator_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Persist one complete qualification run atomically.
///
/// In a single transaction: locks the creator row, checks it can be qualified,
/// appends the classification, the score and both brand-target rows under the
/// same `run_id` and `computed_at`, then advances the status (see
/// [`CreatorStatus::after_qualification`]). Any failure rolls everything back,
/// so a failed run never becomes the "current" result and never changes status.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] for an unknown creator,
/// [`DbError::NotQualifiable`] if the creator is a lead or revoked, or
/// [`DbError::Sqlx`] on any query failure.
pub async fn record_qualification(
    pool: &PgPool,
    creator_id: i64,
    qualification: &Qualification,
    computed_at: DateTime<Utc>,
) -> Result<RecordedQualification, DbError> {
    let run_id = Uuid::new_v4();
    let mut tx = pool.begin().await?;

    let current: String =
        sqlx::query_scalar("SELECT status FROM creators WHERE id = $1 FOR UPDATE")
            .bind(creator_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;
    let next = current
        .parse::<CreatorStatus>()?
        .after_qualification()
        .ok_or_else(|| DbError::NotQualifiable(current.clone()))?;

    let classification_id = append_niche_classification(
        &mut *tx,
        creator_id,
        run_id,
        &qualification.classification,
        computed_at,
    )
    .await?;

    let score_id =
        append_creator_score(&mut *tx, creator_id, run_id, &qualification.score, computed_at)
            .await?;

    let targets = &qualification.brand_targets;
    let brand_target_ids = append_brand_targets(
        &mut *tx,
        creator_id,
        run_id,
        &targets.niche_segment,
        &targets.local,
        &targets.ecommerce,
        computed_at,
    )
    .await?;

    set_creator_status(&mut *tx, creator_id, next, computed_at).await?;

    tx.commit().await?;

    tracing::debug!(
        creator_id,
        %run_id,
        classification_id,
        score_id,
        "qualification rows committed"
    );

    Ok(RecordedQualification {
        run_id,
        computed_at,
        classification_id,
        score_id,
        brand_target_ids,
        status: next,
    })
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Most recent classification for a creator, or `None` if never qualified.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_niche_classification(
    pool: &PgPool,
    creator_id: i64,
) -> Result<Option<NicheClassificationRow>, DbError> {
    let row = sqlx::query_as::<_, NicheClassificationRow>(
        "SELECT id, creator_id, run_id, primary_niche, secondary_niches, confidence, \
                evidence_keywords, model_version, computed_at, created_at \
         FROM niche_classifications \
         WHERE creator_id = $1 \
         ORDER BY computed_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(creator_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Most recent score for a creator, or `None` if never qualified.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_creator_score(
    pool: &PgPool,
    creator_id: i64,
) -> Result<Option<CreatorScoreRow>, DbError> {
    let row = sqlx::query_as::<_, CreatorScoreRow>(
        "SELECT id, creator_id, run_id, engagement_score, reach_score, consistency_score, \
                niche_score, fraud_penalty, total_score, grade, algorithm_version, \
                computed_at, created_at \
         FROM creator_scores \
         WHERE creator_id = $1 \
         ORDER BY computed_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(creator_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Every brand-target row for a creator, newest run first.
///
/// Within a run, `local` precedes `ecommerce`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_all_brand_targets(
    pool: &PgPool,
    creator_id: i64,
) -> Result<Vec<BrandTargetRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandTargetRow>(
        "SELECT id, creator_id, run_id, target_type, niche_segment, categories, \
                computed_at, created_at \
         FROM brand_targets \
         WHERE creator_id = $1 \
         ORDER BY computed_at DESC, id DESC",
    )
    .bind(creator_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_stored_with_two_decimals() {
        assert_eq!(confidence_to_decimal(0.666_666), Decimal::new(67, 2));
        assert_eq!(confidence_to_decimal(1.0), Decimal::ONE);
        assert_eq!(confidence_to_decimal(0.0), Decimal::ZERO);
    }

    #[test]
    fn confidence_out_of_range_is_clamped() {
        assert_eq!(confidence_to_decimal(1.7), Decimal::ONE);
        assert_eq!(confidence_to_decimal(-0.2), Decimal::ZERO);
        assert_eq!(confidence_to_decimal(f64::NAN), Decimal::ZERO);
    }
}
