use serde::{Deserialize, Serialize};

use crate::scoring::AnswerSet;

/// Identifier wrapper for the user a submission belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Raw scoring request as received on the wire. Every field is optional so
/// validation can report all missing fields at once instead of failing on
/// the first deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    #[serde(default)]
    pub answers: Option<AnswerSet>,
    #[serde(default)]
    pub preliminary_score: Option<f64>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Attach the diagnostic set to the response body.
    #[serde(default)]
    pub include_diagnostics: bool,
}

impl ScoreSubmission {
    pub fn validate(self) -> Result<ScoreRequest, ValidationError> {
        let mut missing = Vec::new();
        if self.answers.is_none() {
            missing.push("answers");
        }
        if self.preliminary_score.is_none() {
            missing.push("preliminaryScore");
        }
        if self.user_id.as_deref().map_or(true, str::is_empty) {
            missing.push("userId");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing });
        }

        let preliminary_score = self.preliminary_score.unwrap_or_default();
        if !preliminary_score.is_finite() {
            return Err(ValidationError::InvalidField {
                field: "preliminaryScore",
                reason: "must be a finite number".to_string(),
            });
        }

        Ok(ScoreRequest {
            answers: self.answers.unwrap_or_default(),
            preliminary_score,
            user_id: UserId(self.user_id.unwrap_or_default()),
            include_diagnostics: self.include_diagnostics,
        })
    }
}

/// A validated scoring request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRequest {
    pub answers: AnswerSet,
    pub preliminary_score: f64,
    pub user_id: UserId,
    pub include_diagnostics: bool,
}

/// Malformed or incomplete request, surfaced to the caller with field-level
/// detail. Never retried automatically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },
    #[error("field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            ValidationError::MissingFields { fields } => fields.clone(),
            ValidationError::InvalidField { field, .. } => vec![field],
        }
    }
}
