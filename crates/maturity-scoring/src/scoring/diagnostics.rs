use serde::{Deserialize, Serialize};

use super::answers::AnswerValue;

/// Non-fatal, advisory records explaining anything the scorer could not
/// value the way the rubric expected. Never abort a computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSet {
    /// Answer keys with no corresponding rubric entry.
    pub unmatched_keys: Vec<String>,
    /// Answers whose shape does not match the rubric's declared type.
    pub type_mismatches: Vec<TypeMismatch>,
    /// Rubric entry found but no value could be resolved from it.
    pub defaulted_scores: Vec<DefaultedScore>,
}

impl DiagnosticSet {
    pub fn is_empty(&self) -> bool {
        self.unmatched_keys.is_empty()
            && self.type_mismatches.is_empty()
            && self.defaulted_scores.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMismatch {
    pub key: String,
    pub expected: String,
    pub received: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultedScore {
    pub key: String,
    pub answer: AnswerValue,
    pub reason: String,
}
