//! Creator qualification: niche classification, fit scoring and brand-target
//! mapping over whatever signals are available for a creator.
//!
//! The classifier, scorer and mapper are pure functions over the shared
//! [`Taxonomy`](creatorfit_core::Taxonomy). [`run_qualification`] gathers
//! signals, evaluates them and persists one append-only run.

pub mod brand_targets;
pub mod classifier;
pub mod error;
pub mod pipeline;
pub mod scorer;
pub mod signals;
pub mod types;

pub use brand_targets::map_brand_targets;
pub use classifier::classify;
pub use error::QualifyError;
pub use pipeline::{evaluate, run_qualification, QualificationRun};
pub use scorer::score_creator;
pub use signals::{DemoSignals, SignalsProvider, SignalsSource, SnapshotSignals};
pub use types::{CreatorSignals, ScoreInputs};
