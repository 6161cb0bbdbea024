use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{ScoreSubmission, UserId, ValidationError};
use super::store::{AssessmentRecord, AssessmentStore, ProfileRollup, StoreError};
use crate::scoring::{ScoringEngine, ScoringMapRepository, ScoringMapError, ScoringResult};

/// Service composing request validation, the scoring engine, and the two
/// persistence writes.
pub struct AssessmentScoringService<S> {
    engine: ScoringEngine,
    store: Arc<S>,
}

impl<S> AssessmentScoringService<S>
where
    S: AssessmentStore + 'static,
{
    pub fn new(repository: Arc<ScoringMapRepository>, store: Arc<S>) -> Self {
        Self {
            engine: ScoringEngine::new(repository),
            store,
        }
    }

    /// Score a submission and persist the result.
    ///
    /// Write order is fixed: the assessment record first, then the profile
    /// rollup — the rollup is meaningless without a stored assessment. A
    /// configuration defect (no rubric for the selected bracket) blocks
    /// both writes. A rollup failure after a successful assessment write is
    /// reported as such, never as success.
    pub fn score(
        &self,
        assessment_type: &str,
        submission: ScoreSubmission,
    ) -> Result<ScoredAssessment, AssessmentServiceError> {
        let request = submission.validate()?;
        let result =
            self.engine
                .score(assessment_type, &request.answers, request.preliminary_score)?;
        let write_mode = self.engine.repository().write_mode_for(assessment_type)?;

        if !result.diagnostics.is_empty() {
            warn!(
                %assessment_type,
                user_id = %request.user_id.0,
                unmatched = result.diagnostics.unmatched_keys.len(),
                mismatched = result.diagnostics.type_mismatches.len(),
                defaulted = result.diagnostics.defaulted_scores.len(),
                "scoring completed with diagnostics"
            );
        }

        let now = Utc::now();
        let record = AssessmentRecord {
            user_id: request.user_id.clone(),
            assessment_type: assessment_type.to_string(),
            preliminary_score: request.preliminary_score,
            final_score: result.final_score,
            bracket: result.bracket,
            scored: result.scored,
            answers: request.answers.clone(),
            diagnostics: result.diagnostics.clone(),
            write_mode,
            recorded_at: now,
        };
        self.store
            .save_assessment(&record)
            .map_err(AssessmentServiceError::AssessmentWrite)?;

        let rollup = ProfileRollup {
            user_id: request.user_id.clone(),
            assessment_type: assessment_type.to_string(),
            score: result.final_score,
            scored: result.scored,
            updated_at: now,
        };
        self.store
            .upsert_profile_score(&rollup)
            .map_err(AssessmentServiceError::ProfileRollup)?;

        info!(
            %assessment_type,
            user_id = %request.user_id.0,
            bracket = result.bracket.key(),
            score = result.final_score,
            "assessment scored and recorded"
        );

        Ok(ScoredAssessment {
            assessment_type: assessment_type.to_string(),
            user_id: request.user_id,
            include_diagnostics: request.include_diagnostics,
            result,
        })
    }
}

/// Successful scoring outcome handed back to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredAssessment {
    pub assessment_type: String,
    pub user_id: UserId,
    #[serde(skip)]
    pub include_diagnostics: bool,
    pub result: ScoringResult,
}

/// Error raised by the scoring pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    ScoringMap(#[from] ScoringMapError),
    #[error("assessment write failed: {0}")]
    AssessmentWrite(#[source] StoreError),
    #[error("profile rollup failed after assessment write: {0}")]
    ProfileRollup(#[source] StoreError),
}
