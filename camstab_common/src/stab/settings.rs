//! Camera stabilization settings.
//!
//! The host publishes one [`StabSettings`] snapshot; the control loop reads
//! it at the start of every tick and treats it as immutable for that tick.
//! All types use `serde::Deserialize` for TOML loading. Optional fields fall
//! back to the host's settings-object defaults via `#[serde(default)]`.
//!
//! Each processing stage is switched off by a zero sentinel rather than a
//! separate flag: `response_time_ms = 0` disables the attitude filter and
//! `feed_forward_gain = 0` disables feed-forward.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::axis::Axis;

// ─── Enumerations ───────────────────────────────────────────────────

/// Source of the manual trim for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TrimInput {
    /// No trim; the trim value holds whatever it last was.
    #[default]
    None,
    Accessory0,
    Accessory1,
    Accessory2,
    Accessory3,
    Accessory4,
    Accessory5,
}

impl TrimInput {
    /// Accessory channel number, or `None` when no channel is assigned.
    #[inline]
    pub const fn channel(self) -> Option<u8> {
        match self {
            Self::None => None,
            Self::Accessory0 => Some(0),
            Self::Accessory1 => Some(1),
            Self::Accessory2 => Some(2),
            Self::Accessory3 => Some(3),
            Self::Accessory4 => Some(4),
            Self::Accessory5 => Some(5),
        }
    }

    /// Inverse of [`TrimInput::channel`].
    #[inline]
    pub const fn from_channel(channel: u8) -> Option<Self> {
        match channel {
            0 => Some(Self::Accessory0),
            1 => Some(Self::Accessory1),
            2 => Some(Self::Accessory2),
            3 => Some(Self::Accessory3),
            4 => Some(Self::Accessory4),
            5 => Some(Self::Accessory5),
            _ => None,
        }
    }
}

/// How a trim sample is turned into a trim value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StabilizationMode {
    /// Sample is an absolute offset: `trim = sample × input_range`.
    #[default]
    Attitude,
    /// Sample is a rate, integrated over time above a dead zone.
    AxisLock,
}

/// Mechanical axis order of the gimbal.
///
/// Serial gimbals lose authority on the inner axis as the middle axis
/// approaches its travel limit; feed-forward on that axis is scaled down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GimbalType {
    /// No cross-axis correction.
    #[default]
    Generic,
    /// Roll feed-forward scaled by remaining pitch travel.
    YawRollPitch,
    /// Pitch feed-forward scaled by remaining roll travel.
    YawPitchRoll,
}

// ─── Per-Axis Settings ──────────────────────────────────────────────

/// Per-axis settings snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Trim channel feeding this axis.
    #[serde(default)]
    pub input: TrimInput,

    /// Trim handling mode.
    #[serde(default)]
    pub stabilization_mode: StabilizationMode,

    /// Trim scale (Attitude) or trim limit (AxisLock).
    #[serde(default = "default_input_range")]
    pub input_range: f64,

    /// Trim rate scale [units/s per unit sample] (AxisLock).
    #[serde(default = "default_input_rate")]
    pub input_rate: f64,

    /// Dead zone: rates at or below this magnitude are not integrated.
    #[serde(default = "default_max_axis_lock_rate")]
    pub max_axis_lock_rate: f64,

    /// Attitude span mapped to a full-scale command. Must be nonzero.
    #[serde(default = "default_output_range")]
    pub output_range: f64,

    /// Attitude low-pass time constant [ms] (0 = disabled).
    #[serde(default)]
    pub response_time_ms: f64,

    /// Feed-forward gain (0 = disabled).
    #[serde(default)]
    pub feed_forward_gain: f64,

    /// Feed-forward decay time constant while the accumulator is positive [ms].
    #[serde(default = "default_shaping_time_ms")]
    pub accel_time_ms: f64,

    /// Feed-forward decay time constant otherwise [ms].
    #[serde(default = "default_shaping_time_ms")]
    pub decel_time_ms: f64,

    /// Maximum change of the compensated attitude [units/s].
    #[serde(default = "default_max_accel_per_sec")]
    pub max_accel_per_sec: f64,
}

fn default_input_range() -> f64 {
    20.0
}
fn default_input_rate() -> f64 {
    50.0
}
fn default_max_axis_lock_rate() -> f64 {
    1.0
}
fn default_output_range() -> f64 {
    20.0
}
fn default_shaping_time_ms() -> f64 {
    5.0
}
fn default_max_accel_per_sec() -> f64 {
    500.0
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            input: TrimInput::default(),
            stabilization_mode: StabilizationMode::default(),
            input_range: default_input_range(),
            input_rate: default_input_rate(),
            max_axis_lock_rate: default_max_axis_lock_rate(),
            output_range: default_output_range(),
            response_time_ms: 0.0,
            feed_forward_gain: 0.0,
            accel_time_ms: default_shaping_time_ms(),
            decel_time_ms: default_shaping_time_ms(),
            max_accel_per_sec: default_max_accel_per_sec(),
        }
    }
}

impl AxisConfig {
    /// Returns true when the attitude low-pass stage is active.
    #[inline]
    pub fn filter_enabled(&self) -> bool {
        self.response_time_ms > 0.0
    }

    /// Returns true when the feed-forward stage is active.
    #[inline]
    pub fn feed_forward_enabled(&self) -> bool {
        self.feed_forward_gain != 0.0
    }

    /// Validate bounds for one axis.
    pub fn validate(&self, axis: Axis) -> Result<(), SettingsError> {
        let fields = [
            ("input_range", self.input_range),
            ("input_rate", self.input_rate),
            ("max_axis_lock_rate", self.max_axis_lock_rate),
            ("output_range", self.output_range),
            ("response_time_ms", self.response_time_ms),
            ("feed_forward_gain", self.feed_forward_gain),
            ("accel_time_ms", self.accel_time_ms),
            ("decel_time_ms", self.decel_time_ms),
            ("max_accel_per_sec", self.max_accel_per_sec),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(SettingsError::NonFinite { axis, field });
            }
        }

        if self.output_range == 0.0 {
            return Err(SettingsError::ZeroOutputRange { axis });
        }

        // input_rate and output_range carry a direction; everything else is a
        // magnitude or a time constant.
        for (field, value) in fields {
            if matches!(field, "input_rate" | "output_range") {
                continue;
            }
            if value < 0.0 {
                return Err(SettingsError::Negative { axis, field, value });
            }
        }

        Ok(())
    }
}

// ─── Settings Snapshot ──────────────────────────────────────────────

/// Complete settings snapshot for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StabSettings {
    /// Gimbal geometry, shared by all axes.
    #[serde(default)]
    pub gimbal_type: GimbalType,
    /// Roll axis settings.
    #[serde(default)]
    pub roll: AxisConfig,
    /// Pitch axis settings.
    #[serde(default)]
    pub pitch: AxisConfig,
    /// Yaw axis settings.
    #[serde(default)]
    pub yaw: AxisConfig,
}

impl StabSettings {
    /// Settings of one axis.
    #[inline]
    pub fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::Roll => &self.roll,
            Axis::Pitch => &self.pitch,
            Axis::Yaw => &self.yaw,
        }
    }

    /// Mutable settings of one axis.
    #[inline]
    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisConfig {
        match axis {
            Axis::Roll => &mut self.roll,
            Axis::Pitch => &mut self.pitch,
            Axis::Yaw => &mut self.yaw,
        }
    }

    /// Validate every axis. Stops at the first failure.
    pub fn validate(&self) -> Result<(), SettingsError> {
        Axis::ALL
            .iter()
            .try_for_each(|&axis| self.axis(axis).validate(axis))
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Settings rejected by validation.
///
/// Any of these in a live snapshot is a build/settings mismatch, so the
/// control loop halts instead of commanding the gimbal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// A field is NaN or infinite.
    #[error("{axis}.{field} is not finite")]
    NonFinite { axis: Axis, field: &'static str },

    /// `output_range` is zero; the output mapper divides by it.
    #[error("{axis}.output_range must be nonzero")]
    ZeroOutputRange { axis: Axis },

    /// A magnitude or time constant is negative.
    #[error("{axis}.{field} must not be negative (got {value})")]
    Negative {
        axis: Axis,
        field: &'static str,
        value: f64,
    },
}
