//! Gimbal axis identifiers.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;

use crate::consts::AXIS_COUNT;

/// Independently controlled gimbal degree of freedom.
///
/// Discriminants double as array indices into per-axis state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Axis {
    Roll = 0,
    Pitch = 1,
    Yaw = 2,
}

const_assert_eq!(Axis::ALL.len(), AXIS_COUNT);

impl Axis {
    /// All axes in processing order.
    pub const ALL: [Axis; 3] = [Axis::Roll, Axis::Pitch, Axis::Yaw];

    /// Array index of this axis.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Roll),
            1 => Some(Self::Pitch),
            2 => Some(Self::Yaw),
            _ => None,
        }
    }

    /// Lowercase name, as used for settings tables.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Pitch => "pitch",
            Self::Yaw => "yaw",
        }
    }
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
