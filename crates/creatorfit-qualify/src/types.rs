use serde::Serialize;

use crate::error::QualifyError;

/// Raw signals for one creator as supplied by a [`SignalsProvider`](crate::SignalsProvider).
///
/// `None` means "unavailable", which is distinct from a measured zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreatorSignals {
    pub followers: Option<i64>,
    /// Likes summed over the sampling window.
    pub likes: Option<i64>,
    /// Comments summed over the sampling window.
    pub comments: Option<i64>,
    /// Posts published in the last 30 days.
    pub content_count_30d: Option<i64>,
    /// Reach divided by followers.
    pub reach_ratio: Option<f64>,
    pub bio: Option<String>,
}

/// Validated, non-negative numbers the scorer runs on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub followers: u64,
    pub likes: u64,
    pub comments: u64,
    pub content_count_30d: u64,
    pub reach_ratio: Option<f64>,
}

impl CreatorSignals {
    /// Check the signals needed for scoring and convert them.
    ///
    /// Followers, likes, comments and content count are required. Reach is
    /// optional but must be finite and non-negative when present.
    ///
    /// # Errors
    ///
    /// Returns [`QualifyError::InvalidInput`] naming the first missing or
    /// negative signal.
    pub fn score_inputs(&self) -> Result<ScoreInputs, QualifyError> {
        let reach_ratio = match self.reach_ratio {
            Some(r) if !r.is_finite() || r < 0.0 => {
                return Err(QualifyError::InvalidInput(format!(
                    "reach_ratio must be a non-negative number, got {r}"
                )));
            }
            other => other,
        };

        Ok(ScoreInputs {
            followers: require("followers", self.followers)?,
            likes: require("likes", self.likes)?,
            comments: require("comments", self.comments)?,
            content_count_30d: require("content_count_30d", self.content_count_30d)?,
            reach_ratio,
        })
    }
}

fn require(name: &str, value: Option<i64>) -> Result<u64, QualifyError> {
    let value =
        value.ok_or_else(|| QualifyError::InvalidInput(format!("{name} is unavailable")))?;
    u64::try_from(value)
        .map_err(|_| QualifyError::InvalidInput(format!("{name} must be >= 0, got {value}")))
}
