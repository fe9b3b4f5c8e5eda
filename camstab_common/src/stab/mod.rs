//! Camera stabilization shared types.
//!
//! Everything the control loop exchanges with its host lives here: the axis
//! identifiers, the per-tick settings snapshot, and the state-bus and clock
//! interfaces.

pub mod axis;
pub mod bus;
pub mod settings;
