//! Control loop phases.

use core::fmt;

/// Where the control loop is within its current cycle.
///
/// ```text
/// Sampling → Deciding ─┬─▶ Idle ────────────────────────────────────────┬─▶ Sleeping
///                      └─▶ IrrigatingWater → Pause → IrrigatingFertilizer ┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Sampling = 0,
    Deciding = 1,
    Idle = 2,
    IrrigatingWater = 3,
    Pause = 4,
    IrrigatingFertilizer = 5,
    Sleeping = 6,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sampling => "SAMPLING",
            Self::Deciding => "DECIDING",
            Self::Idle => "IDLE",
            Self::IrrigatingWater => "IRRIGATING_WATER",
            Self::Pause => "PAUSE",
            Self::IrrigatingFertilizer => "IRRIGATING_FERTILIZER",
            Self::Sleeping => "SLEEPING",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
