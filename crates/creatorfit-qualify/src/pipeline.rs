//! Qualification pipeline orchestration.

use chrono::{DateTime, Utc};
use creatorfit_core::{CreatorStatus, Qualification, Taxonomy, ZeroHitPolicy};
use creatorfit_db::{get_creator_by_id, record_qualification};
use sqlx::PgPool;
use uuid::Uuid;

use crate::brand_targets::map_brand_targets;
use crate::classifier::classify;
use crate::error::QualifyError;
use crate::scorer::score_creator;
use crate::signals::SignalsProvider;
use crate::types::ScoreInputs;

/// Outcome of one persisted run.
#[derive(Debug, Clone)]
pub struct QualificationRun {
    pub run_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub status: CreatorStatus,
    pub qualification: Qualification,
}

/// Classify, score and map brand targets. Pure.
#[must_use]
pub fn evaluate(
    taxonomy: &Taxonomy,
    policy: ZeroHitPolicy,
    inputs: &ScoreInputs,
    bio: &str,
    declared_category: &str,
) -> Qualification {
    let classification = classify(taxonomy, policy, bio, declared_category);
    let score = score_creator(inputs, classification.confidence);
    let brand_targets = map_brand_targets(taxonomy, &classification.primary_niche);

    Qualification {
        classification,
        score,
        brand_targets,
    }
}

/// Run the full pipeline for one creator.
///
/// 1. Load the creator and reject states that cannot be qualified.
/// 2. Gather signals from `provider`; required signals must be present.
/// 3. [`evaluate`] against the provider bio, or the self-reported bio.
/// 4. Persist all rows and the status change in one transaction.
///
/// Nothing is written unless every step succeeds, so calling this again after
/// a failure is safe. Each successful call appends a new run.
///
/// # Errors
///
/// Returns [`QualifyError::CreatorNotFound`], [`QualifyError::InvalidInput`]
/// for unqualifiable creators or missing signals, [`QualifyError::Signals`] if
/// the provider fails, or [`QualifyError::Persistence`] if the write fails.
pub async fn run_qualification<P: SignalsProvider>(
    pool: &PgPool,
    provider: &P,
    taxonomy: &Taxonomy,
    policy: ZeroHitPolicy,
    creator_id: i64,
) -> Result<QualificationRun, QualifyError> {
    let creator = get_creator_by_id(pool, creator_id)
        .await?
        .ok_or(QualifyError::CreatorNotFound(creator_id))?;

    let status = creator.status()?;
    if status.after_qualification().is_none() {
        return Err(QualifyError::InvalidInput(format!(
            "creator in status '{status}' cannot be qualified"
        )));
    }

    let signals = provider.signals(&creator).await?;
    let inputs = signals.score_inputs()?;

    let bio = signals
        .bio
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .or(creator.bio.as_deref())
        .unwrap_or("");
    let declared_category = creator.declared_category.as_deref().unwrap_or("");

    let qualification = evaluate(taxonomy, policy, &inputs, bio, declared_category);

    let computed_at = Utc::now();
    let recorded = record_qualification(pool, creator_id, &qualification, computed_at).await?;

    tracing::info!(
        creator_id,
        run_id = %recorded.run_id,
        niche = %qualification.classification.primary_niche,
        total = qualification.score.total,
        grade = %qualification.score.grade,
        status = %recorded.status,
        "qualification run recorded"
    );

    Ok(QualificationRun {
        run_id: recorded.run_id,
        computed_at: recorded.computed_at,
        status: recorded.status,
        qualification,
    })
}
