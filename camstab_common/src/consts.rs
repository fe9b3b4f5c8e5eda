//! System-wide constants for the camera stabilization workspace.
//!
//! Single source of truth for all numeric limits and default paths.

/// Number of controlled gimbal axes (roll, pitch, yaw).
pub const AXIS_COUNT: usize = 3;

/// Number of accessory trim channels published by the host.
pub const MAX_TRIM_CHANNELS: usize = 6;

/// Nominal tick period [ms]. Substituted for `dT` on the first tick
/// after a clock anomaly.
pub const DEFAULT_TICK_PERIOD_MS: u32 = 10;

/// Smallest accepted tick period [ms].
pub const TICK_PERIOD_MS_MIN: u32 = 1;

/// Largest accepted tick period [ms].
pub const TICK_PERIOD_MS_MAX: u32 = 1000;

/// Output commands are normalized to `[-OUTPUT_LIMIT, OUTPUT_LIMIT]`.
pub const OUTPUT_LIMIT: f64 = 1.0;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/camstab.toml";
