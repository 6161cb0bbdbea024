//! The scoring engine: bracket selection, rubric lookup, and the weighted
//! average over a heterogeneously-typed answer set.

mod answers;
mod bracket;
mod diagnostics;
mod map;
mod policy;
mod repository;
mod scorer;

pub use answers::{AnswerSet, AnswerValue};
pub use bracket::Bracket;
pub use diagnostics::{DefaultedScore, DiagnosticSet, TypeMismatch};
pub use map::{QuestionKind, QuestionRule, Rubric, ScoringMap, ScoringMapError};
pub use policy::{FreeTextPolicy, ScoringPolicy};
pub use repository::{AssessmentTypeSpec, KeyAliases, ScoringMapRepository};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stateless scorer over the shared, read-only scoring map repository.
///
/// Pure from the caller's perspective: identical inputs yield identical
/// results, so arbitrarily many requests may score concurrently.
pub struct ScoringEngine {
    repository: Arc<ScoringMapRepository>,
}

impl ScoringEngine {
    pub fn new(repository: Arc<ScoringMapRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &ScoringMapRepository {
        &self.repository
    }

    /// Score one answer set: select the bracket from the preliminary score,
    /// fetch that bracket's rubric, and run the weighted pass.
    ///
    /// Errors here are configuration defects (unknown type, missing rubric);
    /// anything wrong with individual answers lands in the diagnostics.
    pub fn score(
        &self,
        assessment_type: &str,
        answers: &AnswerSet,
        preliminary_score: f64,
    ) -> Result<ScoringResult, ScoringMapError> {
        let bracket = Bracket::for_score(preliminary_score);
        let rubric = self.repository.rubric_for(assessment_type, bracket)?;
        let policy = self.repository.policy_for(assessment_type)?;
        let aliases = self.repository.aliases_for(assessment_type, bracket);

        let totals = scorer::score_answers(answers, rubric, aliases, &policy);

        let scored = totals.weight_sum > 0.0;
        let mut final_score = if scored {
            totals.total / totals.weight_sum
        } else {
            0.0
        };
        if policy.round_to_half_point {
            final_score = (final_score * 2.0).round() / 2.0;
        }
        final_score = final_score.clamp(0.0, 5.0);

        Ok(ScoringResult {
            final_score,
            bracket,
            scored,
            diagnostics: totals.diagnostics,
        })
    }
}

/// Normalized score plus the metadata describing how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    /// Weighted average in `[0, 5]`. `0.0` when nothing contributed; check
    /// `scored` to distinguish that from a genuine minimum score.
    pub final_score: f64,
    pub bracket: Bracket,
    /// False when no answer contributed any weight.
    pub scored: bool,
    pub diagnostics: DiagnosticSet,
}
