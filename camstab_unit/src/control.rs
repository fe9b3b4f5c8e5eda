//! Control engine root.
//!
//! Per-axis stabilization pipeline: trim → attitude filter → feed-forward →
//! output mapping. Each stage is deactivated by setting its parameter to zero.

pub mod bound;
pub mod feedforward;
pub mod filters;
pub mod output;
pub mod trim;

pub use bound::bound;
