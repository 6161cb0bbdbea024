//! Assessment intake: request validation, the scoring pipeline, and the
//! persistence boundary for results.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{ScoreRequest, ScoreSubmission, UserId, ValidationError};
pub use router::assessment_router;
pub use service::{AssessmentScoringService, AssessmentServiceError, ScoredAssessment};
pub use store::{
    AssessmentRecord, AssessmentStore, ProfileRollup, StoreError, WriteMode,
};
