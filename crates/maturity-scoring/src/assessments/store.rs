use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::UserId;
use crate::scoring::{AnswerSet, Bracket, DiagnosticSet};

/// How an assessment type stores its records: keep only the latest per user
/// (idempotent upsert) or append every submission (historical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    Latest,
    Historical,
}

/// The computed result written to an assessment-type-specific record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub user_id: UserId,
    pub assessment_type: String,
    pub preliminary_score: f64,
    pub final_score: f64,
    pub bracket: Bracket,
    pub scored: bool,
    pub answers: AnswerSet,
    pub diagnostics: DiagnosticSet,
    pub write_mode: WriteMode,
    pub recorded_at: DateTime<Utc>,
}

/// Rolled-up profile score consumed by dashboards. Always an idempotent
/// upsert, so retrying it after a timeout is safe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRollup {
    pub user_id: UserId,
    pub assessment_type: String,
    pub score: f64,
    pub scored: bool,
    pub updated_at: DateTime<Utc>,
}

/// Storage boundary for scoring results. The two writes are sequential and
/// not transactional; callers surface which half failed so only the missing
/// write is retried. At-least-once delivery, not exactly-once.
pub trait AssessmentStore: Send + Sync {
    fn save_assessment(&self, record: &AssessmentRecord) -> Result<(), StoreError>;
    fn upsert_profile_score(&self, rollup: &ProfileRollup) -> Result<(), StoreError>;
}

/// Error enumeration for downstream store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store rejected write: {0}")]
    Rejected(String),
}
