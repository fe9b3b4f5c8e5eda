//! `camstab.toml` loading.
//!
//! The simulator, the benches and any host embedding the loop read one TOML
//! document holding the `[shared]` table below plus their own sections
//! (unit activation, gimbal settings, simulation profile). Those sections
//! are plain `serde` structs; [`ConfigLoader`] gives each of them file and
//! string loading.
//!
//! ```rust,no_run
//! use camstab_common::config::{ConfigError, ConfigLoader, SharedConfig};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Debug, Deserialize)]
//! struct GimbalHost {
//!     shared: SharedConfig,
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let host = GimbalHost::load(Path::new("config/camstab.toml"))?;
//!     println!("{} logs at {:?}", host.shared.service_name, host.shared.log_level);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a `camstab.toml` cannot be turned into a runnable configuration.
///
/// Every variant is fatal at startup: the loop is never activated with a
/// partially read file.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file exists but could not be read (permissions, not UTF-8, ...).
    #[error("cannot read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// TOML syntax error, unknown enum variant or missing required table.
    #[error("malformed camstab config: {0}")]
    ParseError(String),

    /// Well-formed TOML whose values the loop cannot run with.
    #[error("rejected camstab config: {0}")]
    ValidationError(String),
}

impl ConfigError {
    fn from_read(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound(path.to_path_buf()),
            _ => Self::Unreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        }
    }
}

/// Verbosity of the `tracing` subscriber when `RUST_LOG` is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-tick commands and intervals.
    Trace,
    /// Activation and clock anomaly details.
    Debug,
    /// Startup, configuration summary and run totals.
    #[default]
    Info,
    /// Substituted intervals and other recoverable conditions.
    Warn,
    /// Halts and fatal configuration errors.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// The `[shared]` table: how a camstab process names itself and how much it logs.
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "camstab-sim"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Name printed in the startup and shutdown log lines.
    pub service_name: String,
}

impl SharedConfig {
    /// Reject a blank `service_name`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "shared.service_name must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// TOML loading for any deserializable camstab section bundle.
///
/// Only syntax and shape are checked here. Range checks belong to the
/// bundle's own `validate` or `TryFrom` step.
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Read and parse `path`. Parse errors name the file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::from_read(path, e))?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))
    }

    /// Parse an in-memory document.
    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
