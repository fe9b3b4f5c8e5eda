//! Per-axis pipeline assembly and output mapping.
//!
//! Runs trim → attitude filter → feed-forward → output mapping for one axis
//! and normalizes the result to a `[-1, 1]` command.
//!
//! Also defines `AxisState`, which holds all per-axis controller memory
//! (trim, filter, feed-forward). It is created zeroed at activation, lives
//! until deactivation, and is only ever touched by the loop driver.

use camstab_common::consts::OUTPUT_LIMIT;
use camstab_common::stab::settings::AxisConfig;

use super::bound::bound;
use super::feedforward::{FeedForwardGains, FeedForwardState, feedforward_apply};
use super::filters::{AttitudeFilterState, attitude_filter_apply};
use super::trim::{TrimState, trim_update};

// ─── AxisState ──────────────────────────────────────────────────────

/// Per-axis control engine state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisState {
    /// Manual trim.
    pub trim: TrimState,
    /// Attitude low-pass memory.
    pub filter: AttitudeFilterState,
    /// Feed-forward memory.
    pub feedforward: FeedForwardState,
}

impl AxisState {
    /// Reset all internal controller state to zero.
    #[inline]
    pub fn reset(&mut self) {
        self.trim.reset();
        self.filter.reset();
        self.feedforward.reset();
    }
}

// ─── Output Mapping ─────────────────────────────────────────────────

/// Map a compensated attitude plus trim to a normalized command.
///
/// ```text
/// command = bound((attitude + trim) / output_range, 1)
/// ```
///
/// `output_range` must be nonzero; settings validation guarantees it.
#[inline]
pub fn output_map(compensated_attitude: f64, trim: f64, output_range: f64) -> f64 {
    bound((compensated_attitude + trim) / output_range, OUTPUT_LIMIT)
}

// ─── Axis Pipeline ──────────────────────────────────────────────────

/// Input data needed by the pipeline for one axis in one tick.
#[derive(Debug, Clone, Copy)]
pub struct AxisInput {
    /// Trim sample, `None` when no channel is assigned or the lookup failed.
    pub trim_sample: Option<f64>,
    /// Raw attitude for this axis.
    pub attitude: f64,
    /// Gimbal-geometry correction for feed-forward.
    pub gimbal_correction: f64,
    /// Tick interval [ms], strictly positive.
    pub dt_ms: f64,
}

/// Result of one axis pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOutput {
    /// Trim value after aggregation.
    pub trim: f64,
    /// Attitude after filtering and feed-forward.
    pub compensated_attitude: f64,
    /// Normalized command in `[-1, 1]`.
    pub command: f64,
}

/// Run the full pipeline for one axis.
///
/// 1. Trim aggregation
/// 2. Attitude low-pass (skipped when `response_time_ms == 0`)
/// 3. Feed-forward (skipped when `feed_forward_gain == 0`)
/// 4. Output mapping
pub fn compute_axis_output(
    state: &mut AxisState,
    config: &AxisConfig,
    input: &AxisInput,
) -> AxisOutput {
    let dt = input.dt_ms;

    // ── 1. Trim ─────────────────────────────────────────────
    let trim = trim_update(&mut state.trim, config, input.trim_sample, dt);

    // ── 2. Attitude filter ──────────────────────────────────
    let filtered = attitude_filter_apply(
        &mut state.filter,
        config.response_time_ms,
        input.attitude,
        dt,
    );

    // ── 3. Feed-forward ─────────────────────────────────────
    let compensated = if config.feed_forward_enabled() {
        feedforward_apply(
            &mut state.feedforward,
            &FeedForwardGains::from(config),
            input.gimbal_correction,
            filtered,
            dt,
        )
    } else {
        filtered
    };

    // ── 4. Output ───────────────────────────────────────────
    AxisOutput {
        trim,
        compensated_attitude: compensated,
        command: output_map(compensated, trim, config.output_range),
    }
}
