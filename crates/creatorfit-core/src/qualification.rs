//! Result types produced by one qualification run.
//!
//! These are values, not rows: they are computed by `creatorfit-qualify` and
//! appended as new rows by `creatorfit-db`. Nothing here is ever updated in place.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Tag stored with every classification.
pub const CLASSIFIER_MODEL_VERSION: &str = "keyword-dict-v1";

/// Tag stored with every score.
pub const SCORING_ALGORITHM_VERSION: &str = "rules-v1";

/// Maximum number of evidence keywords kept per classification.
pub const MAX_EVIDENCE_KEYWORDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NicheClassification {
    pub primary_niche: String,
    /// At most one entry.
    pub secondary_niches: Vec<String>,
    /// In `[0.0, 1.0]`, rounded to two decimals.
    pub confidence: f64,
    pub evidence_keywords: Vec<String>,
    pub model_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
}

impl Grade {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Grade {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            other => Err(CoreError::InvalidGrade(other.to_string())),
        }
    }
}

/// Sub-scores and total for one run. All scores are in `0..=100`, the fraud
/// penalty in `0..=30`. `reach` is `None` when reach data was unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorScore {
    pub engagement: i16,
    pub reach: Option<i16>,
    pub consistency: i16,
    pub niche: i16,
    pub fraud_penalty: i16,
    pub total: i16,
    pub grade: Grade,
    pub algorithm_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Local,
    Ecommerce,
}

impl TargetType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Local => "local",
            TargetType::Ecommerce => "ecommerce",
        }
    }
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Brand categories suggested for a niche segment, one list per target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandTargets {
    pub niche_segment: String,
    pub local: Vec<String>,
    pub ecommerce: Vec<String>,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Qualification {
    pub classification: NicheClassification,
    pub score: CreatorScore,
    pub brand_targets: BrandTargets,
}
