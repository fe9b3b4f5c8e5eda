//! Attitude low-pass filter.
//!
//! Discrete single-pole filter normalized by the tick interval:
//!
//! ```text
//! y[n] = (τ·y[n-1] + dT·x[n]) / (τ + dT)
//! ```
//!
//! `τ` (`response_time_ms`) and `dT` are both in milliseconds, so irregular
//! tick spacing is compensated automatically. `τ = 0` disables smoothing.

/// Internal state of the attitude low-pass filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttitudeFilterState {
    /// Previous output.
    filtered: f64,
}

impl AttitudeFilterState {
    /// Reset filter state to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Last filter output.
    #[inline]
    pub fn value(&self) -> f64 {
        self.filtered
    }
}

/// Apply one attitude sample through the low-pass filter.
///
/// Returns `raw` unchanged when `response_time_ms <= 0.0` (disabled); the
/// state still tracks the raw value so re-enabling starts from the current
/// attitude instead of from zero.
#[inline]
pub fn attitude_filter_apply(
    state: &mut AttitudeFilterState,
    response_time_ms: f64,
    raw: f64,
    dt_ms: f64,
) -> f64 {
    let denominator = response_time_ms + dt_ms;
    if response_time_ms <= 0.0 || denominator <= 0.0 {
        state.filtered = raw;
        return raw;
    }

    state.filtered = (response_time_ms * state.filtered + dt_ms * raw) / denominator;
    state.filtered
}
