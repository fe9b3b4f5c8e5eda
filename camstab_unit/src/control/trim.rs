//! Manual trim aggregation.
//!
//! - **Attitude**: `trim = sample × input_range`, overwritten every tick.
//! - **AxisLock**: `rate = sample × input_rate`; only when
//!   `|rate| > max_axis_lock_rate` is it integrated,
//!   `trim = bound(trim + rate·dT/1000, input_range)`. Below the threshold
//!   the trim holds, giving a rate-lock dead zone.
//!
//! A missing sample (no channel, or the lookup failed) holds the previous
//! trim in either mode.

use camstab_common::stab::settings::{AxisConfig, StabilizationMode};

use super::bound::bound;

/// Accumulated or pass-through trim for one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimState {
    value: f64,
}

impl TrimState {
    /// Reset the trim to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current trim value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Fold one trim sample into the trim state and return the new trim value.
#[inline]
pub fn trim_update(
    state: &mut TrimState,
    config: &AxisConfig,
    sample: Option<f64>,
    dt_ms: f64,
) -> f64 {
    let Some(sample) = sample else {
        return state.value;
    };

    match config.stabilization_mode {
        StabilizationMode::Attitude => {
            state.value = sample * config.input_range;
        }
        StabilizationMode::AxisLock => {
            let rate = sample * config.input_rate;
            if rate.abs() > config.max_axis_lock_rate {
                state.value = bound(state.value + rate * dt_ms / 1000.0, config.input_range);
            }
        }
    }

    state.value
}
