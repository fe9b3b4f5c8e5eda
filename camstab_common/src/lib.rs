//! Camera Stabilization Common Library
//!
//! This crate provides the shared types, constants and configuration
//! loading utilities used by the camera stabilization workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide numeric limits and defaults
//! - [`config`] - Configuration loading traits and types
//! - [`stab`] - Axis, settings and state-bus definitions
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use camstab_common::prelude::*;
//!
//! let settings = StabSettings::default();
//! assert!(settings.validate().is_ok());
//! assert_eq!(settings.axis(Axis::Pitch).output_range, 20.0);
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod stab;
