pub mod bucketing;
pub mod hashing;

pub use bucketing::{walk_weights, WalkResult};
pub use hashing::{assignment_key, bucket_for, bucket_for_hash, rolling_hash, BUCKET_COUNT};

use crate::experiment::Experiment;
use crate::types::assignment::{AssignmentWhy, Decision};

/// Pick the variant `subject_id` falls into under `experiment`.
///
/// Pure: the result depends only on the definition and the two ids, so any
/// process holding the same definition reproduces it. `None` when the
/// experiment is inactive or has no variants.
pub fn assign<'a>(experiment: &'a Experiment, subject_id: &str) -> Option<Decision<'a>> {
    if !experiment.is_active {
        return None;
    }

    let hash = rolling_hash(&assignment_key(subject_id, experiment.id.as_str()));
    let bucket = bucket_for_hash(hash);
    let walk = walk_weights(&experiment.variants, bucket)?;

    Some(Decision {
        variant: &experiment.variants[walk.index],
        why: AssignmentWhy {
            hash,
            bucket,
            cumulative_weight: walk.cumulative_weight,
            fallback: walk.fallback,
        },
    })
}
