//! Live integration tests for creatorfit-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/creatorfit-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{Duration, Utc};
use creatorfit_core::{
    BrandTargets, CreatorScore, CreatorStatus, Grade, LeadInput, NicheClassification,
    Qualification, CLASSIFIER_MODEL_VERSION, SCORING_ALGORITHM_VERSION,
};
use creatorfit_db::{
    create_creator, get_all_brand_targets, get_creator_by_id, get_creator_by_public_id,
    get_latest_creator_score, get_latest_niche_classification, get_latest_signal_snapshot,
    get_social_username, insert_signal_snapshot, list_creators_overview, record_qualification,
    transition_creator_status, upsert_social_account, DbError, NewSignalSnapshot,
    NewSocialAccount,
};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lead(email: &str) -> LeadInput {
    LeadInput {
        name: "Jiwoo Park".to_string(),
        email: email.to_string(),
        instagram_handle: Some("jiwoo.eats".to_string()),
        declared_category: Some("food".to_string()),
        bio: Some("sushi lover in seoul".to_string()),
    }
}

async fn insert_lead(pool: &sqlx::PgPool, email: &str) -> i64 {
    create_creator(pool, &lead(email))
        .await
        .unwrap_or_else(|e| panic!("create_creator failed for '{email}': {e}"))
        .id
}

async fn insert_connected(pool: &sqlx::PgPool, email: &str) -> i64 {
    let id = insert_lead(pool, email).await;
    upsert_social_account(pool, id, &account("ig-1", "tok-1"))
        .await
        .expect("upsert_social_account failed");
    id
}

fn account<'a>(user_id: &'a str, token: &'a str) -> NewSocialAccount<'a> {
    NewSocialAccount {
        platform: "instagram",
        platform_user_id: user_id,
        username: Some("jiwoo.eats"),
        account_type: Some("CREATOR"),
        media_count: Some(120),
        access_token: token,
    }
}

fn qualification(primary: &str, total: i16) -> Qualification {
    Qualification {
        classification: NicheClassification {
            primary_niche: primary.to_string(),
            secondary_niches: vec![],
            confidence: 1.0,
            evidence_keywords: vec!["sushi".to_string()],
            model_version: CLASSIFIER_MODEL_VERSION.to_string(),
        },
        score: CreatorScore {
            engagement: 70,
            reach: None,
            consistency: 70,
            niche: 100,
            fraud_penalty: 0,
            total,
            grade: Grade::B,
            algorithm_version: SCORING_ALGORITHM_VERSION.to_string(),
        },
        brand_targets: BrandTargets {
            niche_segment: primary.to_string(),
            local: vec!["restaurants".to_string()],
            ecommerce: vec!["meal kits".to_string()],
        },
    }
}

async fn count_rows(pool: &sqlx::PgPool, table: &str, creator_id: i64) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {table} WHERE creator_id = $1"
    ))
    .bind(creator_id)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("count on {table} failed: {e}"))
}

// ---------------------------------------------------------------------------
// Creators
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn create_creator_starts_as_lead(pool: sqlx::PgPool) {
    let row = create_creator(&pool, &lead("a@example.com"))
        .await
        .expect("create_creator failed");

    assert_eq!(row.status().expect("status"), CreatorStatus::Lead);

    let fetched = get_creator_by_public_id(&pool, row.public_id)
        .await
        .expect("query failed")
        .expect("creator missing");
    assert_eq!(fetched.id, row.id);
    assert_eq!(fetched.bio.as_deref(), Some("sushi lover in seoul"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_email_is_a_unique_violation(pool: sqlx::PgPool) {
    insert_lead(&pool, "dup@example.com").await;

    let err = create_creator(&pool, &lead("dup@example.com"))
        .await
        .expect_err("second insert should fail");
    assert!(err.is_unique_violation(), "got: {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn revoked_is_terminal(pool: sqlx::PgPool) {
    let id = insert_connected(&pool, "r@example.com").await;

    let previous = transition_creator_status(&pool, id, CreatorStatus::Revoked)
        .await
        .expect("revoke failed");
    assert_eq!(previous, CreatorStatus::Connected);

    let err = transition_creator_status(&pool, id, CreatorStatus::Qualified)
        .await
        .expect_err("revoked must be terminal");
    assert!(matches!(err, DbError::Core(_)), "got: {err:?}");
}

// ---------------------------------------------------------------------------
// Social accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn connecting_advances_lead_and_reconnect_keeps_later_status(pool: sqlx::PgPool) {
    let id = insert_lead(&pool, "c@example.com").await;

    let (first, status) = upsert_social_account(&pool, id, &account("ig-1", "tok-1"))
        .await
        .expect("first connect failed");
    assert_eq!(status, CreatorStatus::Connected);

    record_qualification(&pool, id, &qualification("food", 66), Utc::now())
        .await
        .expect("qualification failed");

    let (second, status) = upsert_social_account(&pool, id, &account("ig-1", "tok-2"))
        .await
        .expect("reconnect failed");
    assert_eq!(status, CreatorStatus::Qualified);
    assert_eq!(second.id, first.id);
    assert_eq!(second.access_token, "tok-2");
    assert_eq!(second.connected_at, first.connected_at);

    let username = get_social_username(&pool, id, "instagram")
        .await
        .expect("query failed");
    assert_eq!(username.as_deref(), Some("jiwoo.eats"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn revoked_creator_cannot_reconnect(pool: sqlx::PgPool) {
    let id = insert_connected(&pool, "rv@example.com").await;
    transition_creator_status(&pool, id, CreatorStatus::Revoked)
        .await
        .expect("revoke failed");

    let err = upsert_social_account(&pool, id, &account("ig-1", "tok-9"))
        .await
        .expect_err("revoked reconnect should fail");
    assert!(matches!(err, DbError::Core(_)), "got: {err:?}");

    let creator = get_creator_by_id(&pool, id).await.expect("query").expect("row");
    assert_eq!(creator.status, "revoked");
}

// ---------------------------------------------------------------------------
// Qualification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn record_qualification_writes_one_run_and_qualifies(pool: sqlx::PgPool) {
    let id = insert_connected(&pool, "q@example.com").await;
    let computed_at = Utc::now();

    let recorded = record_qualification(&pool, id, &qualification("food", 66), computed_at)
        .await
        .expect("record_qualification failed");
    assert_eq!(recorded.status, CreatorStatus::Qualified);

    let classification = get_latest_niche_classification(&pool, id)
        .await
        .expect("query failed")
        .expect("classification missing");
    assert_eq!(classification.run_id, recorded.run_id);
    assert_eq!(classification.primary_niche, "food");
    assert_eq!(classification.confidence, Decimal::ONE);
    assert_eq!(classification.evidence_keywords, vec!["sushi".to_string()]);

    let score = get_latest_creator_score(&pool, id)
        .await
        .expect("query failed")
        .expect("score missing");
    assert_eq!(score.run_id, recorded.run_id);
    assert_eq!(score.total_score, 66);
    assert_eq!(score.grade, "B");
    assert!(score.reach_score.is_none());

    let targets = get_all_brand_targets(&pool, id).await.expect("query failed");
    assert_eq!(targets.len(), 2);
    assert!(targets.iter().all(|t| t.run_id == recorded.run_id));
    assert!(targets.iter().all(|t| t.computed_at == score.computed_at));

    let creator = get_creator_by_id(&pool, id).await.expect("query").expect("row");
    assert_eq!(creator.status, "qualified");
}

#[sqlx::test(migrations = "../../migrations")]
async fn lead_cannot_be_qualified_and_nothing_is_written(pool: sqlx::PgPool) {
    let id = insert_lead(&pool, "l@example.com").await;

    let err = record_qualification(&pool, id, &qualification("food", 66), Utc::now())
        .await
        .expect_err("lead must not be qualifiable");
    assert!(matches!(err, DbError::NotQualifiable(ref s) if s == "lead"), "got: {err:?}");

    assert_eq!(count_rows(&pool, "niche_classifications", id).await, 0);
    assert_eq!(count_rows(&pool, "creator_scores", id).await, 0);
    assert_eq!(count_rows(&pool, "brand_targets", id).await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_write_rolls_back_the_whole_run(pool: sqlx::PgPool) {
    let id = insert_connected(&pool, "f@example.com").await;

    // Empty brand-target list violates the cardinality CHECK after the
    // classification and score rows were already inserted.
    let mut bad = qualification("food", 66);
    bad.brand_targets.ecommerce.clear();

    record_qualification(&pool, id, &bad, Utc::now())
        .await
        .expect_err("constraint violation expected");

    assert_eq!(count_rows(&pool, "niche_classifications", id).await, 0);
    assert_eq!(count_rows(&pool, "creator_scores", id).await, 0);
    let creator = get_creator_by_id(&pool, id).await.expect("query").expect("row");
    assert_eq!(creator.status, "connected");
}

#[sqlx::test(migrations = "../../migrations")]
async fn latest_breaks_identical_timestamps_by_insert_order(pool: sqlx::PgPool) {
    let id = insert_connected(&pool, "t@example.com").await;
    let computed_at = Utc::now();

    record_qualification(&pool, id, &qualification("food", 50), computed_at)
        .await
        .expect("first run failed");
    let second = record_qualification(&pool, id, &qualification("cafe", 61), computed_at)
        .await
        .expect("second run failed");

    let score = get_latest_creator_score(&pool, id)
        .await
        .expect("query failed")
        .expect("score missing");
    assert_eq!(score.run_id, second.run_id);
    assert_eq!(score.total_score, 61);

    let classification = get_latest_niche_classification(&pool, id)
        .await
        .expect("query failed")
        .expect("classification missing");
    assert_eq!(classification.primary_niche, "cafe");

    let targets = get_all_brand_targets(&pool, id).await.expect("query failed");
    assert_eq!(targets.len(), 4);
    assert_eq!(targets[0].run_id, second.run_id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn older_timestamp_does_not_become_current(pool: sqlx::PgPool) {
    let id = insert_connected(&pool, "o@example.com").await;
    let now = Utc::now();

    record_qualification(&pool, id, &qualification("food", 70), now)
        .await
        .expect("newer run failed");
    record_qualification(&pool, id, &qualification("cafe", 40), now - Duration::minutes(5))
        .await
        .expect("older run failed");

    let score = get_latest_creator_score(&pool, id)
        .await
        .expect("query failed")
        .expect("score missing");
    assert_eq!(score.total_score, 70);
}

#[sqlx::test(migrations = "../../migrations")]
async fn share_enabled_survives_requalification(pool: sqlx::PgPool) {
    let id = insert_connected(&pool, "s@example.com").await;
    record_qualification(&pool, id, &qualification("food", 66), Utc::now())
        .await
        .expect("first run failed");
    transition_creator_status(&pool, id, CreatorStatus::ShareEnabled)
        .await
        .expect("enable sharing failed");

    let recorded = record_qualification(&pool, id, &qualification("food", 81), Utc::now())
        .await
        .expect("re-run failed");
    assert_eq!(recorded.status, CreatorStatus::ShareEnabled);
}

#[sqlx::test(migrations = "../../migrations")]
async fn qualification_tables_reject_updates(pool: sqlx::PgPool) {
    let id = insert_connected(&pool, "u@example.com").await;
    record_qualification(&pool, id, &qualification("food", 66), Utc::now())
        .await
        .expect("run failed");

    let update = sqlx::query("UPDATE creator_scores SET total_score = 99 WHERE creator_id = $1")
        .bind(id)
        .execute(&pool)
        .await;
    assert!(update.is_err(), "append-only trigger should reject UPDATE");

    let delete = sqlx::query("DELETE FROM niche_classifications WHERE creator_id = $1")
        .bind(id)
        .execute(&pool)
        .await;
    assert!(delete.is_err(), "append-only trigger should reject DELETE");
}

// ---------------------------------------------------------------------------
// Signal snapshots and overview
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn latest_snapshot_keeps_unavailable_distinct_from_zero(pool: sqlx::PgPool) {
    let id = insert_lead(&pool, "snap@example.com").await;

    assert!(get_latest_signal_snapshot(&pool, id)
        .await
        .expect("query failed")
        .is_none());

    insert_signal_snapshot(
        &pool,
        id,
        &NewSignalSnapshot {
            followers: Some(10),
            ..NewSignalSnapshot::default()
        },
    )
    .await
    .expect("first insert failed");

    let second = insert_signal_snapshot(
        &pool,
        id,
        &NewSignalSnapshot {
            followers: Some(0),
            likes: Some(0),
            reach_ratio: Some(Decimal::new(85, 2)),
            ..NewSignalSnapshot::default()
        },
    )
    .await
    .expect("second insert failed");
    assert_eq!(second.source, "manual");

    let latest = get_latest_signal_snapshot(&pool, id)
        .await
        .expect("query failed")
        .expect("snapshot missing");
    assert_eq!(latest.id, second.id);
    assert_eq!(latest.followers, Some(0));
    assert_eq!(latest.comments, None);
    assert_eq!(latest.reach_ratio, Some(Decimal::new(85, 2)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn negative_snapshot_values_are_rejected(pool: sqlx::PgPool) {
    let id = insert_lead(&pool, "neg@example.com").await;

    let result = insert_signal_snapshot(
        &pool,
        id,
        &NewSignalSnapshot {
            followers: Some(-1),
            ..NewSignalSnapshot::default()
        },
    )
    .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../migrations")]
async fn overview_joins_latest_score_and_filters_by_status(pool: sqlx::PgPool) {
    let qualified = insert_connected(&pool, "ov1@example.com").await;
    insert_lead(&pool, "ov2@example.com").await;

    record_qualification(&pool, qualified, &qualification("food", 50), Utc::now())
        .await
        .expect("first run failed");
    record_qualification(&pool, qualified, &qualification("food", 66), Utc::now())
        .await
        .expect("second run failed");

    let all = list_creators_overview(&pool, None, 50)
        .await
        .expect("overview failed");
    assert_eq!(all.len(), 2);

    let only_qualified = list_creators_overview(&pool, Some("qualified"), 50)
        .await
        .expect("overview failed");
    assert_eq!(only_qualified.len(), 1);
    let row = &only_qualified[0];
    assert_eq!(row.id, qualified);
    assert_eq!(row.total_score, Some(66));
    assert_eq!(row.grade.as_deref(), Some("B"));
    assert_eq!(row.primary_niche.as_deref(), Some("food"));
    assert_eq!(row.instagram_username.as_deref(), Some("jiwoo.eats"));

    let leads = list_creators_overview(&pool, Some("lead"), 50)
        .await
        .expect("overview failed");
    assert_eq!(leads.len(), 1);
    assert!(leads[0].total_score.is_none());
}
