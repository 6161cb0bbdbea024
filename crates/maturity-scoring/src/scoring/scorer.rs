use std::collections::BTreeMap;

use tracing::debug;

use super::answers::{AnswerSet, AnswerValue};
use super::diagnostics::{DefaultedScore, DiagnosticSet, TypeMismatch};
use super::map::{QuestionKind, QuestionRule, Rubric};
use super::policy::{FreeTextPolicy, ScoringPolicy};

/// Raw accumulation produced by one scoring pass, before normalization.
pub(crate) struct WeightedTotals {
    pub(crate) total: f64,
    pub(crate) weight_sum: f64,
    pub(crate) diagnostics: DiagnosticSet,
}

/// Walk the answer set against a bracket's rubric, accumulating
/// `value * weight` for every key that resolves cleanly.
///
/// Pure and total: malformed answers only reduce the weighted denominator
/// and leave a diagnostic behind; they never abort the pass or disturb the
/// contribution of other keys.
pub(crate) fn score_answers(
    answers: &AnswerSet,
    rubric: &Rubric,
    aliases: Option<&BTreeMap<String, String>>,
    policy: &ScoringPolicy,
) -> WeightedTotals {
    let mut total = 0.0;
    let mut weight_sum = 0.0;
    let mut diagnostics = DiagnosticSet::default();

    for (submitted_key, answer) in answers {
        let rubric_key = aliases
            .and_then(|table| table.get(submitted_key))
            .unwrap_or(submitted_key);

        let Some(rule) = rubric.get(rubric_key) else {
            debug!(key = %submitted_key, "answer key has no rubric entry");
            diagnostics.unmatched_keys.push(submitted_key.clone());
            continue;
        };

        match rule.kind {
            QuestionKind::SingleChoice => {
                let AnswerValue::Text(choice) = answer else {
                    diagnostics.type_mismatches.push(TypeMismatch {
                        key: submitted_key.clone(),
                        expected: "string".to_string(),
                        received: answer.shape().to_string(),
                    });
                    continue;
                };

                match rule.values.as_ref().and_then(|values| values.get(choice)) {
                    Some(value) => {
                        total += value * rule.weight;
                        weight_sum += rule.weight;
                    }
                    None => {
                        debug!(key = %submitted_key, %choice, "no value for single-choice answer");
                        diagnostics.defaulted_scores.push(DefaultedScore {
                            key: submitted_key.clone(),
                            answer: answer.clone(),
                            reason: format!(
                                "no matching value in scoring map; available: {}",
                                available_options(rule)
                            ),
                        });
                    }
                }
            }
            QuestionKind::MultiSelect => {
                let Some(options) = answer.selections() else {
                    diagnostics.type_mismatches.push(TypeMismatch {
                        key: submitted_key.clone(),
                        expected: "array".to_string(),
                        received: answer.shape().to_string(),
                    });
                    continue;
                };

                let resolved: Vec<f64> = options
                    .iter()
                    .filter_map(|option| {
                        rule.values
                            .as_ref()
                            .and_then(|values| values.get(option))
                            .copied()
                    })
                    .collect();

                if resolved.is_empty() {
                    debug!(key = %submitted_key, "no values for multi-select answer");
                    diagnostics.defaulted_scores.push(DefaultedScore {
                        key: submitted_key.clone(),
                        answer: answer.clone(),
                        reason: format!(
                            "no matching values in scoring map; available: {}",
                            available_options(rule)
                        ),
                    });
                } else {
                    let value = resolved.iter().sum::<f64>() / resolved.len() as f64;
                    total += value * rule.weight;
                    weight_sum += rule.weight;
                }
            }
            QuestionKind::FreeText => match policy.free_text {
                FreeTextPolicy::Exclude => {}
                FreeTextPolicy::Constant(value) => {
                    total += value * rule.weight;
                    weight_sum += rule.weight;
                }
            },
        }
    }

    WeightedTotals {
        total,
        weight_sum,
        diagnostics,
    }
}

fn available_options(rule: &QuestionRule) -> String {
    rule.values
        .as_ref()
        .map(|values| {
            values
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}
