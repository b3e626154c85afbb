//! Pure decision rules used by the control loop.
//!
//! Kept free of state and I/O so they can be checked exhaustively on the
//! host.

use crate::state::Pump;

/// Whether the loop may irrigate on its own this cycle.
///
/// A manual override on *either* pump closes the gate for *both*.
pub const fn autonomous_gate(auto_mode: bool, overrides: [bool; 2]) -> bool {
    auto_mode && !overrides[Pump::Water.index()] && !overrides[Pump::Fertilizer.index()]
}

/// Dry soil reads *above* the threshold (higher ADC = drier).
pub const fn needs_water(soil_moisture: i32, threshold: i32) -> bool {
    soil_moisture > threshold
}

/// An alert LED is lit while its tank is not full.
pub const fn alert_active(tank_full: bool) -> bool {
    !tank_full
}
