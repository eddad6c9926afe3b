use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use super::config::VariantConfig;
use crate::types::identifiers::{DefinitionVersion, ExperimentId};

/// Weight total at which every bucket is covered by the cumulative walk.
pub const FULL_WEIGHT: f64 = 100.0;

/// One arm of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub weight: f64,
    #[serde(default)]
    pub config: VariantConfig,
}

impl Variant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight,
            config: VariantConfig::new(),
        }
    }

    pub fn with_config(mut self, config: VariantConfig) -> Self {
        self.config = config;
        self
    }
}

/// A single test and its competing variants.
///
/// Variant order is significant: it is the order of the cumulative weight
/// walk. Field names serialize in the dashboard's camelCase shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: ExperimentId,
    pub name: String,
    pub variants: Vec<Variant>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Stored and serialized only. Assignment does not consult it.
    #[serde(default = "default_traffic_split")]
    pub traffic_split: f64,
}

fn default_active() -> bool {
    true
}

fn default_traffic_split() -> f64 {
    FULL_WEIGHT
}

impl Experiment {
    /// An active experiment with a full traffic split.
    pub fn new(id: impl Into<ExperimentId>, name: impl Into<String>, variants: Vec<Variant>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variants,
            is_active: true,
            traffic_split: FULL_WEIGHT,
        }
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_traffic_split(mut self, traffic_split: f64) -> Self {
        self.traffic_split = traffic_split;
        self
    }

    pub fn weight_total(&self) -> f64 {
        self.variants.iter().map(|v| v.weight).sum()
    }

    /// Content hash over the canonical JSON form of this definition.
    pub fn definition_version(&self) -> DefinitionVersion {
        // Cannot fail: every map in the definition is keyed by strings.
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        DefinitionVersion::from_content(&bytes)
    }

    /// Configuration problems that degrade assignment without breaking it.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut found = Vec::new();

        if self.variants.is_empty() {
            found.push(Diagnostic::NoVariants);
        } else {
            let total = self.weight_total();
            if total < FULL_WEIGHT {
                found.push(Diagnostic::WeightTotalBelow { total });
            } else if total > FULL_WEIGHT {
                found.push(Diagnostic::WeightTotalAbove { total });
            }
        }

        let mut seen = BTreeSet::new();
        for variant in &self.variants {
            if variant.weight < 0.0 {
                found.push(Diagnostic::NegativeWeight {
                    variant_id: variant.id.clone(),
                    weight: variant.weight,
                });
            }
            if !seen.insert(variant.id.as_str()) {
                found.push(Diagnostic::DuplicateVariantId {
                    variant_id: variant.id.clone(),
                });
            }
        }

        if !(0.0..=FULL_WEIGHT).contains(&self.traffic_split) {
            found.push(Diagnostic::TrafficSplitOutOfRange {
                traffic_split: self.traffic_split,
            });
        }

        found
    }
}

/// A definition problem that is reported but never rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("Experiment has no variants; no subject will be assigned")]
    NoVariants,

    #[error("Variant weights total {total}; the first variant absorbs the uncovered buckets")]
    WeightTotalBelow { total: f64 },

    #[error("Variant weights total {total}; trailing variants are partly unreachable")]
    WeightTotalAbove { total: f64 },

    #[error("Variant {variant_id} has negative weight {weight}")]
    NegativeWeight { variant_id: String, weight: f64 },

    #[error("Variant id {variant_id} appears more than once")]
    DuplicateVariantId { variant_id: String },

    #[error("Traffic split {traffic_split} is outside 0..=100")]
    TrafficSplitOutOfRange { traffic_split: f64 },
}
