//! `GET /api/v1/admin/creators/{public_id}`: creator profile with every
//! qualification artefact an admin needs to review it.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use super::resolve_creator;

#[derive(Debug, Serialize)]
pub(in crate::api) struct CreatorDetailResponse {
    pub public_id: Uuid,
    pub name: String,
    pub email: String,
    pub instagram_handle: Option<String>,
    pub instagram_username: Option<String>,
    pub declared_category: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub classification: Option<ClassificationDetail>,
    pub score: Option<ScoreDetail>,
    /// Every run's brand targets, newest first.
    pub brand_targets: Vec<BrandTargetItem>,
    pub latest_signals: Option<SignalSnapshotItem>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ClassificationDetail {
    pub run_id: Uuid,
    pub primary_niche: String,
    pub secondary_niches: Vec<String>,
    pub confidence: Decimal,
    pub evidence_keywords: Vec<String>,
    pub model_version: String,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ScoreDetail {
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
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct BrandTargetItem {
    pub run_id: Uuid,
    pub target_type: String,
    pub niche_segment: String,
    pub categories: Vec<String>,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct SignalSnapshotItem {
    pub followers: Option<i64>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub content_count_30d: Option<i32>,
    pub reach_ratio: Option<Decimal>,
    pub bio: Option<String>,
    pub source: String,
    pub captured_at: DateTime<Utc>,
}

impl From<creatorfit_db::SignalSnapshotRow> for SignalSnapshotItem {
    fn from(row: creatorfit_db::SignalSnapshotRow) -> Self {
        Self {
            followers: row.followers,
            likes: row.likes,
            comments: row.comments,
            content_count_30d: row.content_count_30d,
            reach_ratio: row.reach_ratio,
            bio: row.bio,
            source: row.source,
            captured_at: row.captured_at,
        }
    }
}

pub(in crate::api) async fn get_creator_detail(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(public_id): Path<String>,
) -> Result<Json<ApiResponse<CreatorDetailResponse>>, ApiError> {
    let creator = resolve_creator(&state.pool, &public_id, &req_id.0).await?;

    let instagram_username =
        creatorfit_db::get_social_username(&state.pool, creator.id, "instagram")
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let classification = creatorfit_db::get_latest_niche_classification(&state.pool, creator.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let score = creatorfit_db::get_latest_creator_score(&state.pool, creator.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let brand_targets = creatorfit_db::get_all_brand_targets(&state.pool, creator.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let latest_signals = creatorfit_db::get_latest_signal_snapshot(&state.pool, creator.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = CreatorDetailResponse {
        public_id: creator.public_id,
        name: creator.name,
        email: creator.email,
        instagram_handle: creator.instagram_handle,
        instagram_username,
        declared_category: creator.declared_category,
        bio: creator.bio,
        status: creator.status,
        created_at: creator.created_at,
        updated_at: creator.updated_at,
        classification: classification.map(|c| ClassificationDetail {
            run_id: c.run_id,
            primary_niche: c.primary_niche,
            secondary_niches: c.secondary_niches,
            confidence: c.confidence,
            evidence_keywords: c.evidence_keywords,
            model_version: c.model_version,
            computed_at: c.computed_at,
        }),
        score: score.map(|s| ScoreDetail {
            run_id: s.run_id,
            engagement_score: s.engagement_score,
            reach_score: s.reach_score,
            consistency_score: s.consistency_score,
            niche_score: s.niche_score,
            fraud_penalty: s.fraud_penalty,
            total_score: s.total_score,
            grade: s.grade,
            algorithm_version: s.algorithm_version,
            computed_at: s.computed_at,
        }),
        brand_targets: brand_targets
            .into_iter()
            .map(|t| BrandTargetItem {
                run_id: t.run_id,
                target_type: t.target_type,
                niche_segment: t.niche_segment,
                categories: t.categories,
                computed_at: t.computed_at,
            })
            .collect(),
        latest_signals: latest_signals.map(SignalSnapshotItem::from),
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
