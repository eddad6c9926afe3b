use serde::{Deserialize, Serialize};

use crate::experiment::Variant;
use crate::types::identifiers::{DefinitionVersion, ExperimentId};

/// The outcome of assigning one subject to one experiment.
/// Fully self-contained and serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub experiment_id: ExperimentId,
    pub subject_id: String,
    pub version: DefinitionVersion,

    pub variant: Variant,

    pub why: AssignmentWhy,
}

/// Explanation for why a subject landed in its variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignmentWhy {
    pub hash: i32,
    pub bucket: u32,
    /// Running weight total at the point the walk stopped.
    pub cumulative_weight: f64,
    /// The walk never covered the bucket and the first variant was used.
    pub fallback: bool,
}

/// Internal: a decision against a borrowed definition, before it is
/// detached from the registry.
#[derive(Debug, Clone, Copy)]
pub struct Decision<'a> {
    pub variant: &'a Variant,
    pub why: AssignmentWhy,
}
