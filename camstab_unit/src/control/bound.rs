//! Symmetric saturation.

/// Clamp `value` to `[-limit, +limit]`.
///
/// `limit` must be non-negative; settings validation rejects negative
/// limits before they reach the pipeline. Unlike `f64::clamp` this never
/// panics, and a NaN `value` is passed through unchanged.
#[inline]
pub fn bound(value: f64, limit: f64) -> f64 {
    if value > limit {
        limit
    } else if value < -limit {
        -limit
    } else {
        value
    }
}
