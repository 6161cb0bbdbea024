use serde::{Deserialize, Serialize};

/// Per-assessment-type knobs that used to live as silent divergence between
/// the copied scoring routes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Round the final score to the nearest half point.
    pub round_to_half_point: bool,
    /// How free-text questions participate in the weighted average.
    pub free_text: FreeTextPolicy,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            round_to_half_point: false,
            free_text: FreeTextPolicy::Exclude,
        }
    }
}

/// Free-text contribution policy. The source variants disagreed; each
/// assessment type now declares one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreeTextPolicy {
    /// Skip free-text questions entirely: no numerator, no denominator.
    Exclude,
    /// Contribute a constant value at the question's full weight.
    Constant(f64),
}
