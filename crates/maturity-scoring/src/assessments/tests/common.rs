use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::assessments::domain::ScoreSubmission;
use crate::assessments::service::AssessmentScoringService;
use crate::assessments::store::{
    AssessmentRecord, AssessmentStore, ProfileRollup, StoreError, WriteMode,
};
use crate::scoring::{
    AnswerSet, AnswerValue, AssessmentTypeSpec, Bracket, QuestionKind, QuestionRule, Rubric,
    ScoringEngine, ScoringMap, ScoringMapRepository, ScoringPolicy,
};

pub(super) const TYPE_NAME: &str = "bpm";

pub(super) fn standard_rubric() -> Rubric {
    let mut rubric = Rubric::new();
    rubric.insert(
        "q1".to_string(),
        QuestionRule {
            kind: QuestionKind::SingleChoice,
            weight: 2.0,
            values: Some(BTreeMap::from([
                ("a".to_string(), 3.0),
                ("b".to_string(), 5.0),
            ])),
        },
    );
    rubric.insert(
        "q2".to_string(),
        QuestionRule {
            kind: QuestionKind::MultiSelect,
            weight: 1.0,
            values: Some(BTreeMap::from([
                ("x".to_string(), 2.0),
                ("y".to_string(), 4.0),
            ])),
        },
    );
    rubric.insert(
        "q3".to_string(),
        QuestionRule {
            kind: QuestionKind::FreeText,
            weight: 1.0,
            values: None,
        },
    );
    rubric
}

/// Replicate one rubric across all nine brackets so any preliminary score
/// hits the same rules.
pub(super) fn map_with(rubric: Rubric) -> ScoringMap {
    let mut raw: BTreeMap<String, Rubric> = BTreeMap::new();
    for bracket in Bracket::ALL {
        raw.insert(bracket.key().to_string(), rubric.clone());
    }
    ScoringMap::from_rubrics(raw).expect("fixture map is valid")
}

pub(super) fn type_spec(policy: ScoringPolicy, write_mode: WriteMode) -> AssessmentTypeSpec {
    AssessmentTypeSpec {
        name: TYPE_NAME.to_string(),
        policy,
        write_mode,
    }
}

pub(super) fn repository(policy: ScoringPolicy) -> Arc<ScoringMapRepository> {
    Arc::new(ScoringMapRepository::from_maps(vec![(
        type_spec(policy, WriteMode::Latest),
        map_with(standard_rubric()),
        None,
    )]))
}

/// A map with a rubric only for `B1`, so any other bracket exercises the
/// missing-rubric configuration defect.
pub(super) fn repository_missing_brackets() -> Arc<ScoringMapRepository> {
    let mut rubrics = BTreeMap::new();
    rubrics.insert(Bracket::B1, standard_rubric());
    let map = ScoringMap::from_rubrics_unchecked(rubrics);
    Arc::new(ScoringMapRepository::from_maps(vec![(
        type_spec(ScoringPolicy::default(), WriteMode::Latest),
        map,
        None,
    )]))
}

pub(super) fn engine(policy: ScoringPolicy) -> ScoringEngine {
    ScoringEngine::new(repository(policy))
}

pub(super) fn text(value: &str) -> AnswerValue {
    AnswerValue::Text(value.to_string())
}

pub(super) fn selections(options: &[&str]) -> AnswerValue {
    AnswerValue::Selections(options.iter().map(|option| option.to_string()).collect())
}

pub(super) fn answers(pairs: &[(&str, AnswerValue)]) -> AnswerSet {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub(super) fn submission(answers: AnswerSet, preliminary_score: f64) -> ScoreSubmission {
    ScoreSubmission {
        answers: Some(answers),
        preliminary_score: Some(preliminary_score),
        user_id: Some("u-1".to_string()),
        include_diagnostics: true,
    }
}

pub(super) fn build_service(
    policy: ScoringPolicy,
) -> (
    AssessmentScoringService<MemoryStore>,
    Arc<MemoryStore>,
) {
    let store = Arc::new(MemoryStore::default());
    let service = AssessmentScoringService::new(repository(policy), store.clone());
    (service, store)
}

#[derive(Default)]
pub(super) struct MemoryStore {
    assessments: Mutex<Vec<AssessmentRecord>>,
    profiles: Mutex<BTreeMap<(String, String), ProfileRollup>>,
}

impl MemoryStore {
    pub(super) fn assessments(&self) -> Vec<AssessmentRecord> {
        self.assessments
            .lock()
            .expect("store mutex poisoned")
            .clone()
    }

    pub(super) fn profile(&self, user_id: &str, assessment_type: &str) -> Option<ProfileRollup> {
        self.profiles
            .lock()
            .expect("store mutex poisoned")
            .get(&(user_id.to_string(), assessment_type.to_string()))
            .cloned()
    }
}

impl AssessmentStore for MemoryStore {
    fn save_assessment(&self, record: &AssessmentRecord) -> Result<(), StoreError> {
        let mut guard = self.assessments.lock().expect("store mutex poisoned");
        if record.write_mode == WriteMode::Latest {
            guard.retain(|existing| {
                !(existing.user_id == record.user_id
                    && existing.assessment_type == record.assessment_type)
            });
        }
        guard.push(record.clone());
        Ok(())
    }

    fn upsert_profile_score(&self, rollup: &ProfileRollup) -> Result<(), StoreError> {
        self.profiles.lock().expect("store mutex poisoned").insert(
            (rollup.user_id.0.clone(), rollup.assessment_type.clone()),
            rollup.clone(),
        );
        Ok(())
    }
}

/// Fails the first write; nothing should reach the rollup.
pub(super) struct UnavailableStore;

impl AssessmentStore for UnavailableStore {
    fn save_assessment(&self, _record: &AssessmentRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn upsert_profile_score(&self, _rollup: &ProfileRollup) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Accepts the assessment write but fails the profile rollup, to exercise
/// partial-failure reporting.
#[derive(Default)]
pub(super) struct RollupFailsStore {
    pub(super) inner: MemoryStore,
}

impl AssessmentStore for RollupFailsStore {
    fn save_assessment(&self, record: &AssessmentRecord) -> Result<(), StoreError> {
        self.inner.save_assessment(record)
    }

    fn upsert_profile_score(&self, _rollup: &ProfileRollup) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("rollup column locked".to_string()))
    }
}
