//! Host interfaces consumed and produced by the control loop.
//!
//! The control loop owns no hardware. Each tick it reads the attitude
//! estimate, trim samples and settings from a [`StateBus`], reads the tick
//! count from a [`MonotonicClock`], and writes exactly one command per axis
//! back to the bus. All accesses are single-value get/set operations with
//! no partial-read risk.

use super::axis::Axis;
use super::settings::StabSettings;

/// Object bus shared with the host.
pub trait StateBus {
    /// Current orientation estimate for one axis.
    ///
    /// Unit-agnostic; must match the units of `input_range`/`output_range`.
    fn attitude(&self, axis: Axis) -> f64;

    /// Manual trim sample from an accessory channel, typically in `[-1, 1]`.
    ///
    /// `None` when the channel is not published or the lookup fails.
    fn trim_sample(&self, channel: u8) -> Option<f64>;

    /// Settings snapshot for this tick.
    fn settings(&self) -> StabSettings;

    /// Publish the normalized command (`[-1, 1]`) for one axis.
    fn set_command(&mut self, axis: Axis, value: f64);
}

/// Monotonic millisecond tick source.
///
/// Wraps like an RTOS tick counter; the control loop treats any
/// non-increasing reading as a clock anomaly.
pub trait MonotonicClock {
    /// Milliseconds since an arbitrary epoch.
    fn now_millis(&self) -> u32;
}

impl<T: StateBus + ?Sized> StateBus for &mut T {
    #[inline]
    fn attitude(&self, axis: Axis) -> f64 {
        (**self).attitude(axis)
    }

    #[inline]
    fn trim_sample(&self, channel: u8) -> Option<f64> {
        (**self).trim_sample(channel)
    }

    #[inline]
    fn settings(&self) -> StabSettings {
        (**self).settings()
    }

    #[inline]
    fn set_command(&mut self, axis: Axis, value: f64) {
        (**self).set_command(axis, value)
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    #[inline]
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}
