use crate::models::Metric;

/// Similarity in [0, 1] between two already-normalized strings.
///
/// Identical strings report 1.0 under every metric; `Identity` reports 1.0
/// unconditionally.
#[must_use]
pub fn similarity(s1: &str, s2: &str, metric: Metric) -> f64 {
    match metric {
        Metric::JaroWinkler => strsim::jaro_winkler(s1, s2),
        Metric::Levenshtein => {
            let max_len = s1.chars().count().max(s2.chars().count());
            if max_len == 0 {
                return 1.0;
            }
            1.0 - distance_to_f64(strsim::levenshtein(s1, s2)) / distance_to_f64(max_len)
        }
        Metric::Identity => 1.0,
    }
}

/// Similarity with the caller's floor applied: anything below the floor
/// collapses to 0.0. Used at the post-traversal scoring step, never inside
/// the traversal itself.
#[must_use]
pub fn floored_similarity(s1: &str, s2: &str, metric: Metric, floor: f64) -> f64 {
    let raw = similarity(s1, s2, metric);
    if raw < floor { 0.0 } else { raw }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "edit distances are tiny relative to f64 mantissa range"
)]
const fn distance_to_f64(value: usize) -> f64 {
    value as f64
}
