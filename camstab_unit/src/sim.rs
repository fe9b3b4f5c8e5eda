//! Replay harness for the stabilization loop.
//!
//! Publishes a synthetic attitude profile and static trim samples on a
//! [`MemoryBus`], advances a [`ManualClock`] by the nominal period and ticks
//! the loop. No real-time pacing: a run of N ticks completes as fast as the
//! host can compute it.

use std::f64::consts::TAU;

use camstab_common::consts::AXIS_COUNT;
use camstab_common::stab::axis::Axis;
use tracing::debug;

use crate::bus::{ManualClock, MemoryBus};
use crate::config::{AttitudeProfile, LoadedConfig, SimulationConfig};
use crate::cycle::{ControlLoop, CycleError, TickReport};

// ─── Synthetic Attitude ─────────────────────────────────────────────

/// Per-axis sinusoidal attitude source.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticAttitude {
    profiles: [AttitudeProfile; AXIS_COUNT],
}

impl SyntheticAttitude {
    pub fn new(sim: &SimulationConfig) -> Self {
        Self {
            profiles: Axis::ALL.map(|axis| *sim.profile(axis)),
        }
    }

    /// Attitude of `axis` at `t_ms` since the start of the run.
    #[inline]
    pub fn sample(&self, axis: Axis, t_ms: u64) -> f64 {
        let p = &self.profiles[axis.index()];
        if p.period_ms == 0 {
            return p.offset;
        }
        let phase = (t_ms % p.period_ms as u64) as f64 / p.period_ms as f64;
        p.offset + p.amplitude * (TAU * phase).sin()
    }
}

// ─── Summary ────────────────────────────────────────────────────────

/// Command envelope of one axis over a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSummary {
    pub min_command: f64,
    pub max_command: f64,
}

impl Default for AxisSummary {
    fn default() -> Self {
        Self {
            min_command: f64::INFINITY,
            max_command: f64::NEG_INFINITY,
        }
    }
}

impl AxisSummary {
    #[inline]
    fn record(&mut self, command: f64) {
        self.min_command = self.min_command.min(command);
        self.max_command = self.max_command.max(command);
    }
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    /// Ticks completed.
    pub ticks: u64,
    /// Commands that hit the output limit.
    pub saturated_commands: u64,
    /// Ticks that used the nominal period instead of the clock delta.
    pub clock_anomalies: u64,
    pub axes: [AxisSummary; AXIS_COUNT],
}

impl SimulationSummary {
    pub fn axis(&self, axis: Axis) -> &AxisSummary {
        &self.axes[axis.index()]
    }
}

// ─── Simulation ─────────────────────────────────────────────────────

/// Owns the bus and attitude source for one run.
#[derive(Debug)]
pub struct Simulation {
    bus: MemoryBus,
    attitude: SyntheticAttitude,
    tick_period_ms: u32,
    elapsed_ms: u64,
}

impl Simulation {
    /// Build a bus publishing the configured settings and trim samples.
    pub fn new(config: &LoadedConfig) -> Self {
        let mut bus = MemoryBus::new(config.settings);
        for sample in &config.simulation.trim {
            bus.set_trim(sample.channel, Some(sample.value));
        }

        Self {
            bus,
            attitude: SyntheticAttitude::new(&config.simulation),
            tick_period_ms: config.unit.tick_period_ms,
            elapsed_ms: 0,
        }
    }

    /// Advance time by one period, publish attitude, run one tick.
    pub fn step(
        &mut self,
        ctl: &mut ControlLoop,
        clock: &ManualClock,
    ) -> Result<TickReport, CycleError> {
        clock.advance(self.tick_period_ms);
        self.elapsed_ms += self.tick_period_ms as u64;

        for axis in Axis::ALL {
            self.bus
                .set_attitude(axis, self.attitude.sample(axis, self.elapsed_ms));
        }

        // Only the latest tick is inspected; keep the record bounded.
        self.bus.clear_records();
        ctl.tick(&mut self.bus, clock)
    }

    /// Run `ticks` steps and summarize the commands.
    ///
    /// # Errors
    /// Stops at the first tick error (the loop is halted by then).
    pub fn run(
        &mut self,
        ctl: &mut ControlLoop,
        clock: &ManualClock,
        ticks: u32,
    ) -> Result<SimulationSummary, CycleError> {
        let mut axes = [AxisSummary::default(); AXIS_COUNT];

        for _ in 0..ticks {
            let report = self.step(ctl, clock)?;
            for (summary, &command) in axes.iter_mut().zip(report.commands.iter()) {
                summary.record(command);
            }
        }

        let stats = ctl.stats();
        debug!(
            ticks = stats.tick_count,
            min_dt_ms = stats.min_dt_ms,
            max_dt_ms = stats.max_dt_ms,
            "simulation finished"
        );

        Ok(SimulationSummary {
            ticks: stats.tick_count,
            saturated_commands: stats.saturated_commands,
            clock_anomalies: stats.clock_anomalies,
            axes,
        })
    }

    /// The simulated host bus.
    pub fn bus(&self) -> &MemoryBus {
        &self.bus
    }

    /// Mutable access to the bus, e.g. to change settings mid-run.
    pub fn bus_mut(&mut self) -> &mut MemoryBus {
        &mut self.bus
    }

    /// Simulated time since the start of the run [ms].
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}
