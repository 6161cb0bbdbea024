use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::bracket::Bracket;

/// Valuation rule for a single question within a bracket's rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRule {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub weight: f64,
    /// Option label to numeric contribution. Required (and non-empty) for
    /// choice questions, absent for free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<BTreeMap<String, f64>>,
}

/// Question kinds, using the tokens the rubric files have always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "multiple_choice")]
    SingleChoice,
    #[serde(rename = "multi_select")]
    MultiSelect,
    #[serde(rename = "text_area")]
    FreeText,
}

/// One bracket's rubric: question key to valuation rule.
pub type Rubric = BTreeMap<String, QuestionRule>;

/// Immutable per-assessment-type scoring configuration, one rubric per bracket.
///
/// Constructed only through [`ScoringMap::from_rubrics`] so every map in
/// circulation has passed schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Rubric>")]
pub struct ScoringMap {
    rubrics: BTreeMap<Bracket, Rubric>,
}

impl ScoringMap {
    /// Validate and build a scoring map from raw per-bracket rubrics.
    pub fn from_rubrics(raw: BTreeMap<String, Rubric>) -> Result<Self, ScoringMapError> {
        let mut rubrics = BTreeMap::new();

        for (key, rubric) in raw {
            let bracket = Bracket::from_key(&key)
                .ok_or_else(|| ScoringMapError::UnknownBracketKey { key: key.clone() })?;

            for (question, rule) in &rubric {
                if !(rule.weight > 0.0 && rule.weight.is_finite()) {
                    return Err(ScoringMapError::InvalidWeight {
                        bracket,
                        question: question.clone(),
                        weight: rule.weight,
                    });
                }
                match rule.kind {
                    QuestionKind::SingleChoice | QuestionKind::MultiSelect => {
                        let empty = rule.values.as_ref().map_or(true, BTreeMap::is_empty);
                        if empty {
                            return Err(ScoringMapError::MissingValues {
                                bracket,
                                question: question.clone(),
                            });
                        }
                    }
                    QuestionKind::FreeText => {}
                }
            }

            rubrics.insert(bracket, rubric);
        }

        for bracket in Bracket::ALL {
            if !rubrics.contains_key(&bracket) {
                return Err(ScoringMapError::MissingBracket { bracket });
            }
        }

        Ok(Self { rubrics })
    }

    pub fn parse(json: &str) -> Result<Self, ScoringMapError> {
        serde_json::from_str(json).map_err(ScoringMapError::Parse)
    }

    /// Rubric for a bracket. `None` only for maps built before a bracket was
    /// retired; callers surface this as a configuration defect.
    pub fn rubric(&self, bracket: Bracket) -> Option<&Rubric> {
        self.rubrics.get(&bracket)
    }

    /// Bypass bracket-completeness validation. Exists so tests can exercise
    /// the missing-rubric defect path, which `from_rubrics` makes
    /// unconstructible.
    #[cfg(test)]
    pub(crate) fn from_rubrics_unchecked(rubrics: BTreeMap<Bracket, Rubric>) -> Self {
        Self { rubrics }
    }
}

impl TryFrom<BTreeMap<String, Rubric>> for ScoringMap {
    type Error = ScoringMapError;

    fn try_from(raw: BTreeMap<String, Rubric>) -> Result<Self, Self::Error> {
        Self::from_rubrics(raw)
    }
}

/// Configuration defects in scoring map content or availability. Fatal:
/// surfaced at startup (load) or as an internal failure (lookup), never
/// substituted with an empty rubric.
#[derive(Debug, thiserror::Error)]
pub enum ScoringMapError {
    #[error("failed to read scoring map file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed scoring map: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("scoring map declares unknown bracket id '{key}'")]
    UnknownBracketKey { key: String },
    #[error("scoring map has no rubric for bracket '{}'", bracket.key())]
    MissingBracket { bracket: Bracket },
    #[error(
        "question '{question}' in bracket '{}' has non-positive weight {weight}",
        bracket.key()
    )]
    InvalidWeight {
        bracket: Bracket,
        question: String,
        weight: f64,
    },
    #[error(
        "choice question '{question}' in bracket '{}' has no values mapping",
        bracket.key()
    )]
    MissingValues { bracket: Bracket, question: String },
    #[error("no scoring map registered for assessment type '{assessment_type}'")]
    UnknownAssessmentType { assessment_type: String },
}
