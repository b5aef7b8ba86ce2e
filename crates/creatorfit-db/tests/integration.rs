//! Offline unit tests for creatorfit-db pool configuration and row types.
//! These tests do not require a live database connection.

use creatorfit_core::{AppConfig, Environment, SignalsMode, ZeroHitPolicy};
use creatorfit_db::{CreatorScoreRow, NewSignalSnapshot, PoolConfig, SignalSnapshotRow};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        static_dir: PathBuf::from("./public"),
        taxonomy_path: None,
        signals_mode: SignalsMode::Snapshot,
        zero_hit_policy: ZeroHitPolicy::General,
        oauth_state_secret: "secret".to_string(),
        instagram: None,
        http_timeout_secs: 15,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`CreatorScoreRow`] carries a
/// nullable reach score. No database required.
#[test]
fn creator_score_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = CreatorScoreRow {
        id: 1_i64,
        creator_id: 9_i64,
        run_id: Uuid::new_v4(),
        engagement_score: 70_i16,
        reach_score: None,
        consistency_score: 70,
        niche_score: 100,
        fraud_penalty: 0,
        total_score: 66,
        grade: "B".to_string(),
        algorithm_version: "rules-v1".to_string(),
        computed_at: Utc::now(),
        created_at: Utc::now(),
    };

    assert!(row.reach_score.is_none());
    assert_eq!(row.total_score, 66);
    assert_eq!(row.grade, "B");
}

/// Compile-time smoke test: every metric on [`SignalSnapshotRow`] is optional.
#[test]
fn signal_snapshot_row_metrics_are_optional() {
    use chrono::Utc;

    let row = SignalSnapshotRow {
        id: 1,
        creator_id: 2,
        followers: None,
        likes: None,
        comments: None,
        content_count_30d: None,
        reach_ratio: None,
        bio: None,
        source: "manual".to_string(),
        captured_at: Utc::now(),
    };

    assert!(row.followers.is_none());
    assert!(row.reach_ratio.is_none());
}

#[test]
fn new_signal_snapshot_default_is_all_unavailable() {
    let snapshot = NewSignalSnapshot::default();
    assert!(snapshot.followers.is_none());
    assert!(snapshot.content_count_30d.is_none());
    assert!(snapshot.source.is_none());
}
