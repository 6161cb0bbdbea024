use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use maturity_scoring::assessments::{
    AssessmentRecord, AssessmentStore, ProfileRollup, StoreError, WriteMode,
};
use maturity_scoring::scoring::{AssessmentTypeSpec, FreeTextPolicy, ScoringPolicy};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The assessment types this deployment scores, with the policy divergence
/// that used to hide inside copied route handlers.
pub(crate) fn default_assessment_catalog() -> Vec<AssessmentTypeSpec> {
    vec![
        AssessmentTypeSpec {
            name: "bpm".to_string(),
            policy: ScoringPolicy {
                round_to_half_point: false,
                free_text: FreeTextPolicy::Exclude,
            },
            write_mode: WriteMode::Latest,
        },
        AssessmentTypeSpec {
            name: "sales_performance".to_string(),
            policy: ScoringPolicy {
                round_to_half_point: true,
                free_text: FreeTextPolicy::Exclude,
            },
            write_mode: WriteMode::Historical,
        },
        AssessmentTypeSpec {
            name: "strategy".to_string(),
            policy: ScoringPolicy {
                round_to_half_point: false,
                free_text: FreeTextPolicy::Constant(1.0),
            },
            write_mode: WriteMode::Latest,
        },
    ]
}

/// Reference store used until a real backend adapter is wired in; keeps
/// latest-or-historical semantics per record and the rolled-up profile
/// scores dashboards would read.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentStore {
    assessments: Arc<Mutex<Vec<AssessmentRecord>>>,
    profiles: Arc<Mutex<HashMap<(String, String), ProfileRollup>>>,
}

impl InMemoryAssessmentStore {
    pub(crate) fn assessments(&self) -> Vec<AssessmentRecord> {
        self.assessments
            .lock()
            .expect("assessment mutex poisoned")
            .clone()
    }

    pub(crate) fn profiles(&self) -> Vec<ProfileRollup> {
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl AssessmentStore for InMemoryAssessmentStore {
    fn save_assessment(&self, record: &AssessmentRecord) -> Result<(), StoreError> {
        let mut guard = self.assessments.lock().expect("assessment mutex poisoned");
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
        self.profiles.lock().expect("profile mutex poisoned").insert(
            (rollup.user_id.0.clone(), rollup.assessment_type.clone()),
            rollup.clone(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_preserves_per_type_divergence() {
        let catalog = default_assessment_catalog();

        let sales = catalog
            .iter()
            .find(|spec| spec.name == "sales_performance")
            .expect("sales_performance registered");
        assert!(sales.policy.round_to_half_point);
        assert_eq!(sales.write_mode, WriteMode::Historical);

        let bpm = catalog
            .iter()
            .find(|spec| spec.name == "bpm")
            .expect("bpm registered");
        assert!(!bpm.policy.round_to_half_point);
        assert_eq!(bpm.policy.free_text, FreeTextPolicy::Exclude);

        let strategy = catalog
            .iter()
            .find(|spec| spec.name == "strategy")
            .expect("strategy registered");
        assert_eq!(strategy.policy.free_text, FreeTextPolicy::Constant(1.0));
    }
}
