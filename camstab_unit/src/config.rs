//! TOML configuration loader with validation.
//!
//! Loads the unit activation settings, the initial stabilization settings
//! snapshot and the optional simulation profile from one `camstab.toml`.
//! Validates: tick period bounds, settings invariants, trim channel range
//! and simulation profile values.

use std::num::NonZeroU32;
use std::path::Path;

use camstab_common::config::{ConfigError, ConfigLoader, SharedConfig};
use camstab_common::consts::{
    DEFAULT_TICK_PERIOD_MS, MAX_TRIM_CHANNELS, TICK_PERIOD_MS_MAX, TICK_PERIOD_MS_MIN,
};
use camstab_common::stab::axis::Axis;
use camstab_common::stab::settings::StabSettings;
use serde::{Deserialize, Serialize};

// ─── Unit Activation ────────────────────────────────────────────────

/// Module activation settings, consulted once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Whether the stabilization module runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Nominal scheduler period [ms]; also the fallback `dT`.
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u32,
}

fn default_enabled() -> bool {
    true
}
fn default_tick_period_ms() -> u32 {
    DEFAULT_TICK_PERIOD_MS
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            tick_period_ms: default_tick_period_ms(),
        }
    }
}

impl UnitConfig {
    /// Check `tick_period_ms` against `[TICK_PERIOD_MS_MIN, TICK_PERIOD_MS_MAX]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(TICK_PERIOD_MS_MIN..=TICK_PERIOD_MS_MAX).contains(&self.tick_period_ms) {
            return Err(ConfigError::ValidationError(format!(
                "unit.tick_period_ms {} out of range [{TICK_PERIOD_MS_MIN}, {TICK_PERIOD_MS_MAX}]",
                self.tick_period_ms
            )));
        }
        Ok(())
    }

    /// Validated nominal period.
    ///
    /// # Errors
    /// `ConfigError::ValidationError` when `tick_period_ms` is out of range.
    pub fn tick_period(&self) -> Result<NonZeroU32, ConfigError> {
        self.validate()?;
        NonZeroU32::new(self.tick_period_ms).ok_or_else(|| {
            ConfigError::ValidationError("unit.tick_period_ms must be nonzero".to_string())
        })
    }
}

// ─── Simulation Profile ─────────────────────────────────────────────

/// Synthetic attitude for one axis: `offset + amplitude·sin(2π·t/period_ms)`.
///
/// `period_ms = 0` yields a constant `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct AttitudeProfile {
    #[serde(default)]
    pub amplitude: f64,
    #[serde(default)]
    pub period_ms: u32,
    #[serde(default)]
    pub offset: f64,
}

/// Static accessory sample published for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimSampleConfig {
    pub channel: u8,
    pub value: f64,
}

/// Replay parameters for the simulation binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of ticks to run.
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    #[serde(default)]
    pub roll: AttitudeProfile,
    #[serde(default)]
    pub pitch: AttitudeProfile,
    #[serde(default)]
    pub yaw: AttitudeProfile,
    /// Accessory samples, one entry per channel.
    #[serde(default)]
    pub trim: Vec<TrimSampleConfig>,
}

fn default_ticks() -> u32 {
    500
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            roll: AttitudeProfile::default(),
            pitch: AttitudeProfile::default(),
            yaw: AttitudeProfile::default(),
            trim: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Attitude profile of one axis.
    pub fn profile(&self, axis: Axis) -> &AttitudeProfile {
        match axis {
            Axis::Roll => &self.roll,
            Axis::Pitch => &self.pitch,
            Axis::Yaw => &self.yaw,
        }
    }

    /// Check profile values and trim channels.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for axis in Axis::ALL {
            let p = self.profile(axis);
            if !p.amplitude.is_finite() || !p.offset.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "simulation.{axis} amplitude and offset must be finite"
                )));
            }
        }

        for (i, sample) in self.trim.iter().enumerate() {
            if sample.channel as usize >= MAX_TRIM_CHANNELS {
                return Err(ConfigError::ValidationError(format!(
                    "simulation.trim[{i}] channel {} out of range [0, {}]",
                    sample.channel,
                    MAX_TRIM_CHANNELS - 1
                )));
            }
            if !sample.value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "simulation.trim[{i}] value must be finite"
                )));
            }
            if self.trim[..i].iter().any(|s| s.channel == sample.channel) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate simulation trim channel {}",
                    sample.channel
                )));
            }
        }
        Ok(())
    }
}

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// On-disk shape of `camstab.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CamStabConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub unit: UnitConfig,
    #[serde(default)]
    pub settings: StabSettings,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Complete validated configuration bundle, ready for runtime use.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub shared: SharedConfig,
    pub unit: UnitConfig,
    pub settings: StabSettings,
    pub simulation: SimulationConfig,
}

impl TryFrom<CamStabConfig> for LoadedConfig {
    type Error = ConfigError;

    fn try_from(raw: CamStabConfig) -> Result<Self, Self::Error> {
        raw.shared.validate()?;
        raw.unit.validate()?;
        raw.settings
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("settings: {e}")))?;
        raw.simulation.validate()?;

        Ok(Self {
            shared: raw.shared,
            unit: raw.unit,
            settings: raw.settings,
            simulation: raw.simulation,
        })
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate `camstab.toml`.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    CamStabConfig::load(path)?.try_into()
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    CamStabConfig::from_toml_str(content)?.try_into()
}
