use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::assignment::BUCKET_COUNT;
use crate::registry::registry::RegisteredExperiment;
use crate::types::identifiers::{DefinitionVersion, ExperimentId};

// Describes the bucketing scheme. Part of the registry version, so a change
// here shows up as a different snapshot even for identical definitions.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignmentConfig {
    pub version: String,
    pub hash_algorithm: String,
    pub key_order: String,
    pub bucket_count: u32,
}

impl AssignmentConfig {
    pub fn v0() -> Self {
        Self {
            version: "1".into(),
            hash_algorithm: "utf16-polynomial-31-i32".into(),
            key_order: "subject+experiment".into(),
            bucket_count: BUCKET_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotEntry {
    pub id: ExperimentId,
    pub version: DefinitionVersion,
    pub is_active: bool,
    pub variant_count: usize,
    pub weight_total: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegistrySnapshot {
    pub registry_version: String,
    pub assignment_config: AssignmentConfig,
    pub created_at: DateTime<Utc>, // informational only
    pub experiment_count: usize,
    pub experiments: Vec<SnapshotEntry>,
}

impl RegistrySnapshot {
    pub(crate) fn build<'a>(
        config: AssignmentConfig,
        registered: impl IntoIterator<Item = &'a RegisteredExperiment>,
    ) -> Self {
        let mut experiments: Vec<SnapshotEntry> = registered
            .into_iter()
            .map(|entry| SnapshotEntry {
                id: entry.experiment.id.clone(),
                version: entry.version.clone(),
                is_active: entry.experiment.is_active,
                variant_count: entry.experiment.variants.len(),
                weight_total: entry.experiment.weight_total(),
            })
            .collect();

        // Registration order must not leak into the version
        experiments.sort_by(|a, b| a.id.cmp(&b.id));

        let mut version_hasher = Sha256::new();
        // Cannot fail: plain strings and integers
        let config_json = serde_json::to_vec(&config).unwrap_or_default();
        version_hasher.update(&config_json);

        for entry in &experiments {
            let line = format!("{}:{}\n", entry.id.as_str(), entry.version.as_str());
            version_hasher.update(line.as_bytes());
        }

        let registry_version = format!("sha256:{}", hex::encode(version_hasher.finalize()));

        Self {
            registry_version,
            assignment_config: config,
            created_at: Utc::now(),
            experiment_count: experiments.len(),
            experiments,
        }
    }
}
