use crate::infra::{default_assessment_catalog, InMemoryAssessmentStore};
use clap::Args;
use maturity_scoring::assessments::{AssessmentScoringService, ScoreSubmission};
use maturity_scoring::error::AppError;
use maturity_scoring::scoring::{
    AnswerValue, AssessmentTypeSpec, Bracket, QuestionKind, QuestionRule, Rubric, ScoringMap,
    ScoringMapRepository,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Assessment type to score (defaults to bpm).
    #[arg(long, default_value = "bpm")]
    pub(crate) assessment_type: String,
    /// Preliminary self-assessment score used to select the bracket.
    #[arg(long, default_value_t = 2.8)]
    pub(crate) preliminary_score: f64,
    /// User identifier attached to the stored records.
    #[arg(long, default_value = "demo-user")]
    pub(crate) user_id: String,
    /// Load scoring maps from this directory instead of the built-in sample.
    #[arg(long)]
    pub(crate) map_dir: Option<PathBuf>,
    /// Print the diagnostic set alongside the score.
    #[arg(long)]
    pub(crate) include_diagnostics: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        assessment_type,
        preliminary_score,
        user_id,
        map_dir,
        include_diagnostics,
    } = args;

    println!("Maturity scoring demo");

    let repository = match map_dir {
        Some(dir) => {
            println!("Scoring maps: {}", dir.display());
            Arc::new(ScoringMapRepository::load_from_dir(
                &dir,
                default_assessment_catalog(),
            )?)
        }
        None => {
            println!("Scoring maps: built-in sample");
            Arc::new(sample_repository(&assessment_type))
        }
    };

    let store = Arc::new(InMemoryAssessmentStore::default());
    let service = AssessmentScoringService::new(repository, store.clone());

    let submission = ScoreSubmission {
        answers: Some(sample_answers()),
        preliminary_score: Some(preliminary_score),
        user_id: Some(user_id),
        include_diagnostics,
    };

    println!(
        "\nScoring '{}' with preliminary score {:.2} (bracket {})",
        assessment_type,
        preliminary_score,
        Bracket::for_score(preliminary_score).key()
    );

    let outcome = match service.score(&assessment_type, submission) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Scoring failed: {}", err);
            return Ok(());
        }
    };

    if outcome.result.scored {
        println!(
            "  Final score: {:.2} (bracket {})",
            outcome.result.final_score,
            outcome.result.bracket.key()
        );
    } else {
        println!("  No answer carried weight; score recorded as unscored");
    }

    if include_diagnostics {
        match serde_json::to_string_pretty(&outcome.result.diagnostics) {
            Ok(json) => println!("  Diagnostics:\n{}", json),
            Err(err) => println!("  Diagnostics unavailable: {}", err),
        }
    } else if !outcome.result.diagnostics.is_empty() {
        println!(
            "  Diagnostics: {} unmatched, {} type mismatches, {} defaulted (rerun with --include-diagnostics)",
            outcome.result.diagnostics.unmatched_keys.len(),
            outcome.result.diagnostics.type_mismatches.len(),
            outcome.result.diagnostics.defaulted_scores.len()
        );
    }

    println!("\nStored records");
    for record in store.assessments() {
        println!(
            "  - assessment {} / {} -> {:.2} ({:?} write, recorded {})",
            record.assessment_type,
            record.user_id.0,
            record.final_score,
            record.write_mode,
            record.recorded_at
        );
    }
    for rollup in store.profiles() {
        println!(
            "  - profile rollup {} / {} -> {:.2}",
            rollup.assessment_type, rollup.user_id.0, rollup.score
        );
    }

    Ok(())
}

/// Builds a nine-bracket map with one question of each kind so the demo
/// exercises choice lookup, multi-select averaging, and free-text exclusion.
fn sample_repository(assessment_type: &str) -> ScoringMapRepository {
    let mut raw: BTreeMap<String, Rubric> = BTreeMap::new();
    for bracket in Bracket::ALL {
        let mut rubric = Rubric::new();
        rubric.insert(
            "process_documentation".to_string(),
            QuestionRule {
                kind: QuestionKind::SingleChoice,
                weight: 2.0,
                values: Some(BTreeMap::from([
                    ("none".to_string(), 1.0),
                    ("partial".to_string(), 2.5),
                    ("complete".to_string(), 4.0),
                    ("automated".to_string(), 5.0),
                ])),
            },
        );
        rubric.insert(
            "tooling_in_use".to_string(),
            QuestionRule {
                kind: QuestionKind::MultiSelect,
                weight: 1.0,
                values: Some(BTreeMap::from([
                    ("spreadsheets".to_string(), 1.5),
                    ("crm".to_string(), 3.0),
                    ("workflow_automation".to_string(), 4.5),
                ])),
            },
        );
        rubric.insert(
            "bottleneck_narrative".to_string(),
            QuestionRule {
                kind: QuestionKind::FreeText,
                weight: 1.0,
                values: None,
            },
        );
        raw.insert(bracket.key().to_string(), rubric);
    }

    let map = ScoringMap::from_rubrics(raw).expect("sample rubric is well formed");
    let spec = default_assessment_catalog()
        .into_iter()
        .find(|spec| spec.name == assessment_type)
        .unwrap_or_else(|| AssessmentTypeSpec {
            name: assessment_type.to_string(),
            policy: Default::default(),
            write_mode: maturity_scoring::assessments::WriteMode::Latest,
        });
    ScoringMapRepository::from_maps(vec![(spec, map, None)])
}

fn sample_answers() -> BTreeMap<String, AnswerValue> {
    BTreeMap::from([
        (
            "process_documentation".to_string(),
            AnswerValue::Text("partial".to_string()),
        ),
        (
            "tooling_in_use".to_string(),
            AnswerValue::Selections(vec!["crm".to_string(), "spreadsheets".to_string()]),
        ),
        (
            "bottleneck_narrative".to_string(),
            AnswerValue::Text("Handovers between sales and delivery are manual.".to_string()),
        ),
    ])
}
