//! State bus and clock implementations.
//!
//! The production host supplies its own `StateBus`; the types here back the
//! simulation binary, the integration tests and the benchmarks.

pub mod clock;
pub mod memory;

pub use clock::ManualClock;
pub use memory::MemoryBus;
