//! Loop driver: one invocation per scheduler tick.
//!
//! The host scheduler owns an `Option<ControlLoop>`: `None` when the module
//! is disabled, in which case no tick ever runs and no state exists.
//! Activation rejects a unit configuration whose nominal period is outside
//! `[TICK_PERIOD_MS_MIN, TICK_PERIOD_MS_MAX]`, so a substituted `dT` is
//! always strictly positive.
//!
//! ## Tick Body
//! 1. Read the settings snapshot; an invalid snapshot halts the loop.
//! 2. `dT = now - last` if the clock advanced, otherwise the nominal period.
//! 3. Read the raw attitude of every axis once.
//! 4. For Roll, Pitch, Yaw in that order: trim → filter → feed-forward →
//!    output, then write the command.
//!
//! Cross-axis gimbal correction uses the raw attitude read in step 3, so
//! every axis sees the same current-tick snapshot.
//!
//! ## Halting
//! A settings snapshot that fails validation is a build/settings mismatch.
//! The loop latches `halted`, writes nothing for that tick, and refuses all
//! later ticks. Recovery means constructing a new loop.

use std::num::NonZeroU32;

use camstab_common::config::ConfigError;
use camstab_common::consts::{AXIS_COUNT, OUTPUT_LIMIT};
use camstab_common::stab::axis::Axis;
use camstab_common::stab::bus::{MonotonicClock, StateBus};
use camstab_common::stab::settings::SettingsError;
use thiserror::Error;
use tracing::{debug, error, trace, warn};

use crate::config::UnitConfig;
use crate::control::feedforward::gimbal_correction;
use crate::control::output::{AxisInput, AxisState, compute_axis_output};

// ─── Tick Statistics ────────────────────────────────────────────────

/// O(1) per-tick statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct TickStats {
    /// Total ticks executed.
    pub tick_count: u64,
    /// Interval used by the last tick [ms].
    pub last_dt_ms: f64,
    /// Smallest interval used [ms].
    pub min_dt_ms: f64,
    /// Largest interval used [ms].
    pub max_dt_ms: f64,
    /// Ticks where the nominal period replaced a non-increasing clock.
    pub clock_anomalies: u64,
    /// Commands that hit the `±1` output limit.
    pub saturated_commands: u64,
}

impl TickStats {
    /// Create a new zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            tick_count: 0,
            last_dt_ms: 0.0,
            min_dt_ms: f64::INFINITY,
            max_dt_ms: 0.0,
            clock_anomalies: 0,
            saturated_commands: 0,
        }
    }

    /// Record one tick. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, dt_ms: f64, clock_anomaly: bool, commands: &[f64; AXIS_COUNT]) {
        self.tick_count += 1;
        self.last_dt_ms = dt_ms;
        if dt_ms < self.min_dt_ms {
            self.min_dt_ms = dt_ms;
        }
        if dt_ms > self.max_dt_ms {
            self.max_dt_ms = dt_ms;
        }
        if clock_anomaly {
            self.clock_anomalies += 1;
        }
        self.saturated_commands += commands
            .iter()
            .filter(|c| c.abs() >= OUTPUT_LIMIT)
            .count() as u64;
    }
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors returned by [`ControlLoop::tick`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CycleError {
    /// The settings snapshot failed validation; the loop is now halted.
    #[error("invalid settings snapshot: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// A previous tick halted the loop.
    #[error("stabilization loop halted")]
    Halted,
}

// ─── Control Loop ───────────────────────────────────────────────────

/// Outcome of one successful tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Interval used for this tick [ms].
    pub dt_ms: f64,
    /// Commands written, indexed by `Axis::index()`.
    pub commands: [f64; AXIS_COUNT],
}

/// Stabilization loop state, exclusively owned by the host scheduler.
#[derive(Debug, Clone)]
pub struct ControlLoop {
    axes: [AxisState; AXIS_COUNT],
    last_sys_time: u32,
    default_period_ms: NonZeroU32,
    stats: TickStats,
    halted: bool,
}

impl ControlLoop {
    /// Create a loop with zeroed axis state, timing from `now_ms`.
    pub fn new(default_period_ms: NonZeroU32, now_ms: u32) -> Self {
        Self {
            axes: [AxisState::default(); AXIS_COUNT],
            last_sys_time: now_ms,
            default_period_ms,
            stats: TickStats::new(),
            halted: false,
        }
    }

    /// Construct the loop if the module is enabled.
    ///
    /// Consulted once at startup. Returns `Ok(None)` when disabled; the host
    /// then never registers a tick.
    ///
    /// # Errors
    /// `ConfigError::ValidationError` if `tick_period_ms` is out of range.
    pub fn activate<C: MonotonicClock>(
        config: &UnitConfig,
        clock: &C,
    ) -> Result<Option<Self>, ConfigError> {
        let period = config.tick_period()?;
        if !config.enabled {
            debug!("camera stabilization disabled, not activating");
            return Ok(None);
        }

        let now = clock.now_millis();
        debug!(
            tick_period_ms = config.tick_period_ms,
            now_ms = now,
            "camera stabilization activated"
        );
        Ok(Some(Self::new(period, now)))
    }

    /// Interval since the last tick [ms], and whether the nominal period
    /// had to be substituted.
    #[inline]
    pub fn elapsed_ms(&self, now_ms: u32) -> (f64, bool) {
        if now_ms > self.last_sys_time {
            ((now_ms - self.last_sys_time) as f64, false)
        } else {
            (self.default_period_ms.get() as f64, true)
        }
    }

    /// Run one tick against the host bus.
    ///
    /// # Errors
    /// - `CycleError::InvalidSettings` when the snapshot fails validation
    ///   (the loop halts and no command is written).
    /// - `CycleError::Halted` on every tick after a halt.
    pub fn tick<B, C>(&mut self, bus: &mut B, clock: &C) -> Result<TickReport, CycleError>
    where
        B: StateBus + ?Sized,
        C: MonotonicClock + ?Sized,
    {
        if self.halted {
            return Err(CycleError::Halted);
        }

        let settings = bus.settings();
        if let Err(e) = settings.validate() {
            self.halted = true;
            error!(error = %e, "invalid settings snapshot, halting stabilization loop");
            return Err(e.into());
        }

        let now = clock.now_millis();
        let (dt_ms, clock_anomaly) = self.elapsed_ms(now);
        if clock_anomaly && self.stats.tick_count > 0 {
            warn!(
                now_ms = now,
                last_ms = self.last_sys_time,
                dt_ms,
                "clock did not advance, using nominal period"
            );
        }
        self.last_sys_time = now;

        let attitude = Axis::ALL.map(|axis| bus.attitude(axis));
        let mut commands = [0.0; AXIS_COUNT];

        for axis in Axis::ALL {
            let config = settings.axis(axis);
            let input = AxisInput {
                trim_sample: config.input.channel().and_then(|ch| bus.trim_sample(ch)),
                attitude: attitude[axis.index()],
                gimbal_correction: gimbal_correction(&settings, axis, &attitude),
                dt_ms,
            };

            let output = compute_axis_output(&mut self.axes[axis.index()], config, &input);
            bus.set_command(axis, output.command);
            commands[axis.index()] = output.command;
        }

        self.stats.record(dt_ms, clock_anomaly, &commands);
        trace!(
            tick = self.stats.tick_count,
            dt_ms,
            roll = commands[Axis::Roll.index()],
            pitch = commands[Axis::Pitch.index()],
            yaw = commands[Axis::Yaw.index()],
            "tick"
        );

        Ok(TickReport { dt_ms, commands })
    }

    /// Zero every axis state. Timing, statistics and the halt latch are kept.
    pub fn reset(&mut self) {
        for state in &mut self.axes {
            state.reset();
        }
    }

    /// Controller state of one axis.
    #[inline]
    pub fn axis_state(&self, axis: Axis) -> &AxisState {
        &self.axes[axis.index()]
    }

    /// Tick statistics.
    #[inline]
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Returns true once an invalid settings snapshot halted the loop.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Clock reading of the last tick (or of activation).
    #[inline]
    pub fn last_sys_time(&self) -> u32 {
        self.last_sys_time
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
