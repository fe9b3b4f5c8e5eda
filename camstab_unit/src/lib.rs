//! # Camera Stabilization Unit
//!
//! Fixed-rate control loop that turns vehicle attitude and optional manual
//! trim into normalized gimbal commands. The host scheduler calls
//! [`cycle::ControlLoop::tick`] once per period; the loop reads the state
//! bus, runs the per-axis pipeline and writes one command per axis.
//!
//! ## Per-Axis Pipeline
//!
//! 1. **Trim**: pass-through or rate-integrated manual offset
//! 2. **Attitude filter**: single-pole low-pass on the raw attitude
//! 3. **Feed-forward**: lead compensation with gimbal-geometry
//!    correction, exponential decay and acceleration limiting
//! 4. **Output**: `bound((attitude + trim) / output_range, 1)`
//!
//! Stages are disabled by zero settings, never by conditional compilation.
//!
//! ## Zero-Allocation Tick
//!
//! All per-axis state is a fixed-size array created at activation. A tick
//! performs no heap allocation and never blocks.

#![deny(clippy::disallowed_types)]

pub mod bus;
pub mod config;
pub mod control;
pub mod cycle;
pub mod sim;
