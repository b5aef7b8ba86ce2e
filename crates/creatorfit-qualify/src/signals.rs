//! Where creator signals come from.
//!
//! No live metrics collection exists. Signals are either the fixed demo numbers
//! (explicitly opted into with `CREATORFIT_SIGNALS_MODE=demo`) or the latest
//! snapshot an admin entered.

use std::future::Future;

use creatorfit_core::SignalsMode;
use creatorfit_db::{get_latest_signal_snapshot, CreatorRow};
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;

use crate::error::QualifyError;
use crate::types::CreatorSignals;

/// Supplies signals for one creator, marking anything it lacks as `None`.
pub trait SignalsProvider {
    /// # Errors
    ///
    /// Returns [`QualifyError::Signals`] if the backing source fails.
    fn signals(
        &self,
        creator: &CreatorRow,
    ) -> impl Future<Output = Result<CreatorSignals, QualifyError>> + Send;
}

/// Fixed placeholder numbers. Reach is reported unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSignals;

impl DemoSignals {
    pub const FOLLOWERS: i64 = 1000;
    pub const LIKES: i64 = 50;
    pub const COMMENTS: i64 = 5;
    pub const CONTENT_COUNT_30D: i64 = 8;

    #[must_use]
    pub fn values() -> CreatorSignals {
        CreatorSignals {
            followers: Some(Self::FOLLOWERS),
            likes: Some(Self::LIKES),
            comments: Some(Self::COMMENTS),
            content_count_30d: Some(Self::CONTENT_COUNT_30D),
            reach_ratio: None,
            bio: None,
        }
    }
}

impl SignalsProvider for DemoSignals {
    async fn signals(&self, creator: &CreatorRow) -> Result<CreatorSignals, QualifyError> {
        tracing::warn!(
            creator_id = creator.id,
            "scoring with demo signals; numbers are placeholders, not real metrics"
        );
        Ok(Self::values())
    }
}

/// Latest admin-entered snapshot. A creator with no snapshot has every signal
/// unavailable.
#[derive(Debug, Clone)]
pub struct SnapshotSignals {
    pool: PgPool,
}

impl SnapshotSignals {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SignalsProvider for SnapshotSignals {
    async fn signals(&self, creator: &CreatorRow) -> Result<CreatorSignals, QualifyError> {
        let snapshot = get_latest_signal_snapshot(&self.pool, creator.id)
            .await
            .map_err(|e| QualifyError::Signals(e.to_string()))?;

        let Some(snapshot) = snapshot else {
            tracing::debug!(creator_id = creator.id, "no signal snapshot recorded");
            return Ok(CreatorSignals::default());
        };

        Ok(CreatorSignals {
            followers: snapshot.followers,
            likes: snapshot.likes,
            comments: snapshot.comments,
            content_count_30d: snapshot.content_count_30d.map(i64::from),
            reach_ratio: snapshot.reach_ratio.and_then(|r| r.to_f64()),
            bio: snapshot.bio,
        })
    }
}

/// The provider selected by configuration.
#[derive(Debug, Clone)]
pub enum SignalsSource {
    Demo(DemoSignals),
    Snapshot(SnapshotSignals),
}

impl SignalsSource {
    #[must_use]
    pub fn from_mode(mode: SignalsMode, pool: PgPool) -> Self {
        match mode {
            SignalsMode::Demo => SignalsSource::Demo(DemoSignals),
            SignalsMode::Snapshot => SignalsSource::Snapshot(SnapshotSignals::new(pool)),
        }
    }
}

impl SignalsProvider for SignalsSource {
    async fn signals(&self, creator: &CreatorRow) -> Result<CreatorSignals, QualifyError> {
        match self {
            SignalsSource::Demo(p) => p.signals(creator).await,
            SignalsSource::Snapshot(p) => p.signals(creator).await,
        }
    }
}
