use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::assignment;
use crate::experiment::{Experiment, Variant};
use crate::registry::catalog::ExperimentCatalog;
use crate::registry::snapshot::{AssignmentConfig, RegistrySnapshot};
use crate::types::assignment::Assignment;
use crate::types::identifiers::{DefinitionVersion, ExperimentId};

const LOG_TARGET: &str = "experiment_core::registry";

/// A definition as held by the registry. Never mutated after insertion;
/// replacement swaps in a new value.
#[derive(Debug, Clone)]
pub struct RegisteredExperiment {
    pub experiment: Arc<Experiment>,
    pub version: DefinitionVersion,
    pub registered_at: DateTime<Utc>, // informational only
    sequence: u64,
}

impl RegisteredExperiment {
    fn assign(&self, subject_id: &str) -> Option<Assignment> {
        let decision = assignment::assign(&self.experiment, subject_id)?;

        tracing::trace!(
            target: LOG_TARGET,
            experiment_id = %self.experiment.id,
            subject_id,
            bucket = decision.why.bucket,
            variant_id = %decision.variant.id,
            fallback = decision.why.fallback,
            "Assigned subject"
        );

        Some(Assignment {
            experiment_id: self.experiment.id.clone(),
            subject_id: subject_id.to_string(),
            version: self.version.clone(),
            variant: decision.variant.clone(),
            why: decision.why,
        })
    }
}

#[derive(Debug, Default)]
struct Entries {
    by_id: HashMap<ExperimentId, Arc<RegisteredExperiment>>,
    next_sequence: u64,
}

/// The set of live experiments, shared across request handlers.
///
/// Reads clone an `Arc` under a short read lock and compute outside it, so a
/// reader sees either the old or the new definition of an experiment, never
/// a blend of the two.
#[derive(Debug, Default)]
pub struct ExperimentRegistry {
    entries: RwLock<Entries>,
}

impl ExperimentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: ExperimentCatalog) -> Self {
        let registry = Self::new();
        registry.load_catalog(catalog);
        registry
    }

    // A panic while holding the lock cannot leave the map half-written:
    // every write is a single insert of a finished value.
    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `experiment` under its id, replacing any previous definition in
    /// full. Nothing is rejected; configuration problems are logged.
    pub fn register(&self, experiment: Experiment) -> DefinitionVersion {
        for diagnostic in experiment.diagnostics() {
            tracing::warn!(
                target: LOG_TARGET,
                experiment_id = %experiment.id,
                %diagnostic,
                "Experiment definition accepted with problems"
            );
        }

        let version = experiment.definition_version();
        let id = experiment.id.clone();
        let experiment = Arc::new(experiment);

        let replaced = {
            let mut entries = self.write();
            // A replaced experiment keeps its listing position
            let previous = entries.by_id.get(&id).map(|p| p.sequence);
            let (sequence, replaced) = match previous {
                Some(sequence) => (sequence, true),
                None => {
                    let sequence = entries.next_sequence;
                    entries.next_sequence += 1;
                    (sequence, false)
                }
            };
            entries.by_id.insert(
                id.clone(),
                Arc::new(RegisteredExperiment {
                    experiment,
                    version: version.clone(),
                    registered_at: Utc::now(),
                    sequence,
                }),
            );
            replaced
        };

        tracing::debug!(
            target: LOG_TARGET,
            experiment_id = %id,
            version = %version,
            replaced,
            "Registered experiment"
        );

        version
    }

    /// Register every catalog definition in file order. Returns how many
    /// definitions were applied.
    pub fn load_catalog(&self, catalog: ExperimentCatalog) -> usize {
        let experiments = catalog.into_experiments();
        let count = experiments.len();

        let mut seen = BTreeSet::new();
        for experiment in experiments {
            if !seen.insert(experiment.id.clone()) {
                tracing::warn!(
                    target: LOG_TARGET,
                    experiment_id = %experiment.id,
                    "Catalog defines experiment more than once; later definition wins"
                );
            }
            self.register(experiment);
        }

        tracing::debug!(target: LOG_TARGET, count, "Loaded experiment catalog");
        count
    }

    pub fn entry(&self, experiment_id: &str) -> Option<Arc<RegisteredExperiment>> {
        self.read().by_id.get(experiment_id).cloned()
    }

    pub fn get(&self, experiment_id: &str) -> Option<Arc<Experiment>> {
        self.entry(experiment_id).map(|e| Arc::clone(&e.experiment))
    }

    pub fn version(&self, experiment_id: &str) -> Option<DefinitionVersion> {
        self.entry(experiment_id).map(|e| e.version.clone())
    }

    /// False both for inactive and for unknown experiments.
    pub fn is_active(&self, experiment_id: &str) -> bool {
        self.entry(experiment_id)
            .map(|e| e.experiment.is_active)
            .unwrap_or(false)
    }

    /// The variant `subject_id` belongs to, or `None` when the experiment is
    /// unknown, inactive, or has no variants.
    ///
    /// Weights summing to less than 100 leave buckets uncovered; subjects in
    /// those buckets get the first variant.
    pub fn get_variant(&self, experiment_id: &str, subject_id: &str) -> Option<Variant> {
        self.assign(experiment_id, subject_id).map(|a| a.variant)
    }

    /// Same decision as [`get_variant`](Self::get_variant), with the bucket
    /// and walk explanation attached.
    pub fn assign(&self, experiment_id: &str, subject_id: &str) -> Option<Assignment> {
        let Some(entry) = self.entry(experiment_id) else {
            tracing::debug!(target: LOG_TARGET, experiment_id, "Unknown experiment");
            return None;
        };
        entry.assign(subject_id)
    }

    /// Assignments for every active experiment that has variants, in
    /// registration order.
    pub fn assign_all(&self, subject_id: &str) -> Vec<Assignment> {
        self.ordered_entries()
            .iter()
            .filter_map(|entry| entry.assign(subject_id))
            .collect()
    }

    /// All definitions in registration order.
    pub fn list(&self) -> Vec<Arc<Experiment>> {
        self.ordered_entries()
            .into_iter()
            .map(|e| Arc::clone(&e.experiment))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().by_id.is_empty()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let entries = self.ordered_entries();
        RegistrySnapshot::build(AssignmentConfig::v0(), entries.iter().map(|e| &**e))
    }

    fn ordered_entries(&self) -> Vec<Arc<RegisteredExperiment>> {
        let mut entries: Vec<_> = self.read().by_id.values().cloned().collect();
        entries.sort_by_key(|e| e.sequence);
        entries
    }
}
