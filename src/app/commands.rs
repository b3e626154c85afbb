//! Inbound commands to the request service.
//!
//! These represent operator actions that arrive over the HTTP API and
//! that the [`RequestService`](super::service::RequestService) applies
//! to the shared control state.

use crate::state::Pump;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Switch a pump on or off by hand.  Switching on takes the pump out
    /// of autonomous control; switching off hands it back.
    SetPump { pump: Pump, on: bool },

    /// Enable or disable autonomous irrigation.
    SetAutoMode(bool),

    /// Replace all four tunable parameters.
    UpdateSettings(Settings),
}

/// The operator-tunable parameter group.  Values are applied verbatim;
/// nothing is range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub soil_dry_threshold: i32,
    pub water_pump_duration_ms: i32,
    pub fertilizer_pump_duration_ms: i32,
    pub check_interval_ms: i32,
}
