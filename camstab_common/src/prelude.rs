//! Prelude module for common re-exports.
//!
//! ```rust
//! use camstab_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{AXIS_COUNT, DEFAULT_TICK_PERIOD_MS, MAX_TRIM_CHANNELS, OUTPUT_LIMIT};

// ─── Stabilization ──────────────────────────────────────────────────
pub use crate::stab::axis::Axis;
pub use crate::stab::bus::{MonotonicClock, StateBus};
pub use crate::stab::settings::{
    AxisConfig, GimbalType, SettingsError, StabSettings, StabilizationMode, TrimInput,
};
