use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::bracket::Bracket;
use super::map::{Rubric, ScoringMap, ScoringMapError};
use super::policy::ScoringPolicy;
use crate::assessments::store::WriteMode;

/// Per-bracket mapping from the semantic keys some clients still submit to
/// the keys the rubric files use.
pub type KeyAliases = BTreeMap<Bracket, BTreeMap<String, String>>;

/// Declares one assessment type: where its rubric lives and how its scores
/// are computed and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentTypeSpec {
    pub name: String,
    pub policy: ScoringPolicy,
    pub write_mode: WriteMode,
}

struct TypeEntry {
    map: ScoringMap,
    aliases: Option<KeyAliases>,
    policy: ScoringPolicy,
    write_mode: WriteMode,
}

/// Read-only registry of validated scoring maps, loaded once at startup and
/// shared across all concurrent computations for the life of the process.
pub struct ScoringMapRepository {
    entries: BTreeMap<String, TypeEntry>,
}

impl ScoringMapRepository {
    /// Load `<dir>/<name>.json` (and the optional `<name>_aliases.json`
    /// sidecar) for every catalog entry. Any malformed rubric fails the
    /// whole load; a defect discovered here must block startup rather than
    /// surface mid-request.
    pub fn load_from_dir(
        dir: &Path,
        catalog: Vec<AssessmentTypeSpec>,
    ) -> Result<Self, ScoringMapError> {
        let mut entries = BTreeMap::new();

        for spec in catalog {
            let map_path = dir.join(format!("{}.json", spec.name));
            let raw = fs::read_to_string(&map_path).map_err(|source| ScoringMapError::Io {
                path: map_path.clone(),
                source,
            })?;
            let map = ScoringMap::parse(&raw)?;

            let alias_path = dir.join(format!("{}_aliases.json", spec.name));
            let aliases = if alias_path.is_file() {
                let raw = fs::read_to_string(&alias_path).map_err(|source| ScoringMapError::Io {
                    path: alias_path.clone(),
                    source,
                })?;
                Some(serde_json::from_str(&raw).map_err(ScoringMapError::Parse)?)
            } else {
                None
            };

            info!(assessment_type = %spec.name, path = %map_path.display(), "loaded scoring map");
            entries.insert(
                spec.name.clone(),
                TypeEntry {
                    map,
                    aliases,
                    policy: spec.policy,
                    write_mode: spec.write_mode,
                },
            );
        }

        Ok(Self { entries })
    }

    /// Build a repository from already-validated maps. Used by tests and the
    /// demo command, which assemble rubrics in code.
    pub fn from_maps(
        entries: Vec<(AssessmentTypeSpec, ScoringMap, Option<KeyAliases>)>,
    ) -> Self {
        let entries = entries
            .into_iter()
            .map(|(spec, map, aliases)| {
                (
                    spec.name,
                    TypeEntry {
                        map,
                        aliases,
                        policy: spec.policy,
                        write_mode: spec.write_mode,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn rubric_for(
        &self,
        assessment_type: &str,
        bracket: Bracket,
    ) -> Result<&Rubric, ScoringMapError> {
        let entry = self.entry(assessment_type)?;
        entry
            .map
            .rubric(bracket)
            .ok_or(ScoringMapError::MissingBracket { bracket })
    }

    pub fn policy_for(&self, assessment_type: &str) -> Result<ScoringPolicy, ScoringMapError> {
        Ok(self.entry(assessment_type)?.policy)
    }

    pub fn write_mode_for(&self, assessment_type: &str) -> Result<WriteMode, ScoringMapError> {
        Ok(self.entry(assessment_type)?.write_mode)
    }

    pub fn aliases_for(
        &self,
        assessment_type: &str,
        bracket: Bracket,
    ) -> Option<&BTreeMap<String, String>> {
        self.entries
            .get(assessment_type)?
            .aliases
            .as_ref()?
            .get(&bracket)
    }

    pub fn assessment_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn entry(&self, assessment_type: &str) -> Result<&TypeEntry, ScoringMapError> {
        self.entries
            .get(assessment_type)
            .ok_or_else(|| ScoringMapError::UnknownAssessmentType {
                assessment_type: assessment_type.to_string(),
            })
    }
}
