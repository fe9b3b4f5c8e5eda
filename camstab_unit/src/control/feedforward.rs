//! Feed-forward lead compensation.
//!
//! Anticipates rapid attitude changes so the gimbal leads instead of lags:
//!
//! 1. Gimbal-geometry correction `c` (1.0 unless a serial gimbal needs it).
//! 2. `acc += (θ - θ_last) · K · c`; `θ_last = θ`; `out = θ + acc`.
//! 3. Decay with `τ = accel_time` if `acc > 0` else `decel_time`:
//!    `acc -= acc / max(1, τ/dT)`; `out += acc`.
//! 4. Limit `|out - out_last| ≤ max_accel · dT / 1000`; `out_last = out`.
//!
//! The accumulator enters the output twice per tick, once before and once
//! after decay. That shapes the lead-then-settle response and is kept as is.
//! Zero gain disables the stage entirely and leaves its state untouched.

use camstab_common::consts::AXIS_COUNT;
use camstab_common::stab::axis::Axis;
use camstab_common::stab::settings::{AxisConfig, GimbalType, StabSettings};

/// Feed-forward parameters extracted from `AxisConfig`.
#[derive(Debug, Clone, Copy)]
pub struct FeedForwardGains {
    /// Rate-of-change gain (0 = disabled).
    pub gain: f64,
    /// Decay time constant for a positive accumulator [ms].
    pub accel_time_ms: f64,
    /// Decay time constant otherwise [ms].
    pub decel_time_ms: f64,
    /// Maximum output change [units/s].
    pub max_accel_per_sec: f64,
}

impl From<&AxisConfig> for FeedForwardGains {
    fn from(config: &AxisConfig) -> Self {
        Self {
            gain: config.feed_forward_gain,
            accel_time_ms: config.accel_time_ms,
            decel_time_ms: config.decel_time_ms,
            max_accel_per_sec: config.max_accel_per_sec,
        }
    }
}

/// Feed-forward filter memory for one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedForwardState {
    /// Attitude seen on the previous enabled tick.
    last_attitude: f64,
    /// Compensated output of the previous enabled tick.
    last_filtered: f64,
    /// Decaying lead accumulator.
    accumulator: f64,
}

impl FeedForwardState {
    /// Reset all memory to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current lead accumulator.
    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Compensated output of the previous enabled tick.
    #[inline]
    pub fn last_filtered(&self) -> f64 {
        self.last_filtered
    }
}

/// Scale factor reducing feed-forward authority on the inner axis of a
/// serial gimbal as the middle axis nears its output range.
///
/// ```text
/// YawRollPitch, Roll axis:  (range_pitch - |pitch|) / range_pitch
/// YawPitchRoll, Pitch axis: (range_roll  - |roll|)  / range_roll
/// ```
///
/// Every other combination returns 1.0. The range enters as a magnitude:
/// a negative `output_range` only reverses the servo and must not flip the
/// correction. The factor never exceeds 1.0; it goes negative once the
/// middle axis exceeds its range and that is not clamped.
///
/// `attitude` holds the current-tick raw attitude of every axis.
pub fn gimbal_correction(
    settings: &StabSettings,
    axis: Axis,
    attitude: &[f64; AXIS_COUNT],
) -> f64 {
    let reference = match (settings.gimbal_type, axis) {
        (GimbalType::YawRollPitch, Axis::Roll) => Axis::Pitch,
        (GimbalType::YawPitchRoll, Axis::Pitch) => Axis::Roll,
        _ => return 1.0,
    };

    let range = settings.axis(reference).output_range.abs();
    (range - attitude[reference.index()].abs()) / range
}

/// Apply feed-forward compensation to one attitude sample.
///
/// # Arguments
/// - `state`: Feed-forward memory for this axis.
/// - `gains`: Parameters for this axis.
/// - `correction`: Gimbal-geometry factor from [`gimbal_correction`].
/// - `attitude`: Filtered attitude for this tick.
/// - `dt_ms`: Tick interval [ms], strictly positive.
///
/// # Returns
/// Compensated and acceleration-limited attitude.
#[inline]
pub fn feedforward_apply(
    state: &mut FeedForwardState,
    gains: &FeedForwardGains,
    correction: f64,
    attitude: f64,
    dt_ms: f64,
) -> f64 {
    if gains.gain == 0.0 {
        return attitude;
    }

    // ── Rate-of-change accumulation ─────────────────────────
    state.accumulator += (attitude - state.last_attitude) * gains.gain * correction;
    state.last_attitude = attitude;
    let mut output = attitude + state.accumulator;

    // ── Exponential decay ───────────────────────────────────
    let time_constant = if state.accumulator > 0.0 {
        gains.accel_time_ms
    } else {
        gains.decel_time_ms
    };
    let filter = (time_constant / dt_ms).max(1.0);
    state.accumulator -= state.accumulator / filter;
    output += state.accumulator;

    // ── Acceleration limit ──────────────────────────────────
    let delta = output - state.last_filtered;
    let max_delta = gains.max_accel_per_sec * dt_ms / 1000.0;
    if delta.abs() > max_delta {
        output = state.last_filtered + if delta > 0.0 { max_delta } else { -max_delta };
    }
    state.last_filtered = output;

    output
}
