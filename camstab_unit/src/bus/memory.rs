//! In-memory state bus.
//!
//! Holds the values a host would publish (attitude, accessory trim samples,
//! settings) and records every command the loop writes, plus how often each
//! attitude was read.

use std::cell::Cell;

use camstab_common::consts::{AXIS_COUNT, MAX_TRIM_CHANNELS};
use camstab_common::stab::axis::Axis;
use camstab_common::stab::bus::StateBus;
use camstab_common::stab::settings::StabSettings;

/// Command written by the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandRecord {
    pub axis: Axis,
    pub value: f64,
}

/// State bus backed by plain fields.
///
/// The command log grows by one record per `set_command` until
/// [`MemoryBus::clear_records`] is called; long-running drivers clear it
/// every tick (the simulator and the tick benchmark both do). Read counters
/// saturate at `u32::MAX`.
#[derive(Debug, Default)]
pub struct MemoryBus {
    settings: StabSettings,
    attitude: [f64; AXIS_COUNT],
    trim: [Option<f64>; MAX_TRIM_CHANNELS],
    commands: Vec<CommandRecord>,
    attitude_reads: [Cell<u32>; AXIS_COUNT],
}

impl MemoryBus {
    /// Create a bus publishing `settings`, zero attitude and no trim.
    pub fn new(settings: StabSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Replace the published settings.
    pub fn set_settings(&mut self, settings: StabSettings) {
        self.settings = settings;
    }

    /// Mutable access to the published settings.
    pub fn settings_mut(&mut self) -> &mut StabSettings {
        &mut self.settings
    }

    /// Publish the attitude of one axis.
    pub fn set_attitude(&mut self, axis: Axis, value: f64) {
        self.attitude[axis.index()] = value;
    }

    /// Publish (or withdraw, with `None`) an accessory trim sample.
    ///
    /// Channels beyond `MAX_TRIM_CHANNELS` are ignored.
    pub fn set_trim(&mut self, channel: u8, sample: Option<f64>) {
        if let Some(slot) = self.trim.get_mut(channel as usize) {
            *slot = sample;
        }
    }

    /// Every command written, in order.
    pub fn commands(&self) -> &[CommandRecord] {
        &self.commands
    }

    /// Most recent command for one axis.
    pub fn last_command(&self, axis: Axis) -> Option<f64> {
        self.commands
            .iter()
            .rev()
            .find(|c| c.axis == axis)
            .map(|c| c.value)
    }

    /// Number of commands written for one axis.
    pub fn command_count(&self, axis: Axis) -> usize {
        self.commands.iter().filter(|c| c.axis == axis).count()
    }

    /// Number of attitude reads for one axis.
    pub fn attitude_reads(&self, axis: Axis) -> u32 {
        self.attitude_reads[axis.index()].get()
    }

    /// Forget recorded commands and read counters.
    pub fn clear_records(&mut self) {
        self.commands.clear();
        for reads in &self.attitude_reads {
            reads.set(0);
        }
    }
}

impl StateBus for MemoryBus {
    fn attitude(&self, axis: Axis) -> f64 {
        let reads = &self.attitude_reads[axis.index()];
        reads.set(reads.get().saturating_add(1));
        self.attitude[axis.index()]
    }

    fn trim_sample(&self, channel: u8) -> Option<f64> {
        self.trim.get(channel as usize).copied().flatten()
    }

    fn settings(&self) -> StabSettings {
        self.settings
    }

    fn set_command(&mut self, axis: Axis, value: f64) {
        self.commands.push(CommandRecord { axis, value });
    }
}
