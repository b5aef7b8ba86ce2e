pub mod app_config;
pub mod config;
pub mod creators;
pub mod qualification;
pub mod taxonomy;

pub use app_config::{AppConfig, Environment, InstagramAppConfig, SignalsMode, ZeroHitPolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use creators::{CreatorStatus, LeadInput};
pub use qualification::{
    BrandTargets, CreatorScore, Grade, NicheClassification, Qualification, TargetType,
    CLASSIFIER_MODEL_VERSION, MAX_EVIDENCE_KEYWORDS, SCORING_ALGORITHM_VERSION,
};
pub use taxonomy::{load_taxonomy, BrandTargetLists, NicheEntry, Taxonomy, GENERAL_NICHE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read taxonomy file {path}: {source}")]
    TaxonomyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy file: {0}")]
    TaxonomyFileParse(#[from] serde_yaml::Error),

    #[error("taxonomy validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid creator status: {0}")]
    InvalidStatus(String),

    #[error("status transition {from} -> {to} is not allowed")]
    InvalidStatusTransition {
        from: CreatorStatus,
        to: CreatorStatus,
    },

    #[error("invalid grade: {0}")]
    InvalidGrade(String),

    #[error("invalid lead: {0}")]
    InvalidLead(String),
}
