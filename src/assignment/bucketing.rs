use crate::experiment::Variant;

/// Where the cumulative weight walk stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkResult {
    pub index: usize,
    pub cumulative_weight: f64,
    pub fallback: bool,
}

/// Walk variants in order, accumulating weights, and stop at the first
/// variant whose running total exceeds `bucket`.
///
/// When the weights never cover the bucket the first variant is returned
/// with `fallback` set. Returns `None` only for an empty slice.
pub fn walk_weights(variants: &[Variant], bucket: u32) -> Option<WalkResult> {
    if variants.is_empty() {
        return None;
    }

    let bucket = f64::from(bucket);
    let mut cumulative_weight = 0.0;

    for (index, variant) in variants.iter().enumerate() {
        cumulative_weight += variant.weight;
        if bucket < cumulative_weight {
            return Some(WalkResult {
                index,
                cumulative_weight,
                fallback: false,
            });
        }
    }

    Some(WalkResult {
        index: 0,
        cumulative_weight,
        fallback: true,
    })
}
