/// Number of buckets a subject can fall into. Variant weights are read as
/// shares of this range.
pub const BUCKET_COUNT: u32 = 100;

/// 32-bit signed polynomial rolling hash, `h = h * 31 + unit`.
///
/// Operates on UTF-16 code units and wraps at every step, matching Java's
/// `String.hashCode`. Existing deployments bucketed subjects with exactly this
/// arithmetic, so it must not be widened.
pub fn rolling_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// `|hash| mod 100`. `i32::MIN` has no positive counterpart in `i32`, so the
/// absolute value is taken as `u32`.
pub fn bucket_for_hash(hash: i32) -> u32 {
    hash.unsigned_abs() % BUCKET_COUNT
}

/// Subject id first, experiment id appended.
pub fn assignment_key(subject_id: &str, experiment_id: &str) -> String {
    let mut key = String::with_capacity(subject_id.len() + experiment_id.len());
    key.push_str(subject_id);
    key.push_str(experiment_id);
    key
}

pub fn bucket_for(subject_id: &str, experiment_id: &str) -> u32 {
    bucket_for_hash(rolling_hash(&assignment_key(subject_id, experiment_id)))
}
