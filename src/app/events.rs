//! Outbound application events.
//!
//! The control loop and the request service emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log today).

use core::time::Duration;

use serde::Serialize;

use crate::control::Phase;
use crate::error::{Error, RequestError};
use crate::state::{Pump, Tank};

use super::commands::Settings;

/// Who switched a pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpSource {
    /// The control loop, as part of an irrigation cycle.
    Auto,
    /// An operator command.
    Manual,
}

/// Why an irrigation sequence stopped short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Water tank empty: nothing was pumped this cycle.
    WaterTankEmpty,
    /// Fertilizer tank empty: water ran, fertilizer did not.
    FertilizerTankEmpty,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The control loop has started.
    Started,

    /// The control loop moved to a new phase.
    PhaseChanged { from: Phase, to: Phase },

    /// Fresh readings were written to the shared state.
    Sampled {
        soil_moisture: i32,
        water_tank_full: bool,
        fertilizer_tank_full: bool,
    },

    /// An alert indicator was driven.
    AlertIndicator { tank: Tank, active: bool },

    /// Autonomous irrigation is gated off this cycle.
    AutoSuppressed { auto_mode: bool, overrides: [bool; 2] },

    /// Soil reading is above the dry threshold.
    SoilDry { soil_moisture: i32, threshold: i32 },

    /// Soil reading is at or below the dry threshold.
    SoilAdequate { soil_moisture: i32, threshold: i32 },

    /// A pump was switched on.  `hold` is set for automatic runs.
    PumpStarted {
        pump: Pump,
        source: PumpSource,
        hold: Option<Duration>,
    },

    /// A pump was switched off.
    PumpStopped { pump: Pump, source: PumpSource },

    /// Part of the irrigation sequence was skipped.
    IrrigationSkipped(SkipReason),

    /// A sensor or actuator failure cut the cycle short.
    CycleAborted(Error),

    /// The loop is about to sleep until the next cycle.
    Sleeping(Duration),

    /// Operator toggled automatic mode.
    AutoModeChanged(bool),

    /// Operator replaced the tunables.
    SettingsUpdated(Settings),

    /// An operator request was rejected at the API boundary.
    RequestRejected(RequestError),
}

/// A point-in-time snapshot of every status and parameter field, in the
/// JSON shape served by `GET /api/data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub soil_moisture: i32,
    #[serde(rename = "water_tank")]
    pub water_tank_full: bool,
    #[serde(rename = "fert_tank")]
    pub fertilizer_tank_full: bool,
    #[serde(rename = "pump1")]
    pub water_pump_running: bool,
    #[serde(rename = "pump2")]
    pub fertilizer_pump_running: bool,
    pub auto_mode: bool,
    #[serde(rename = "threshold")]
    pub soil_dry_threshold: i32,
    #[serde(rename = "pump_duration")]
    pub water_pump_duration_ms: i32,
    #[serde(rename = "fert_duration")]
    pub fertilizer_pump_duration_ms: i32,
    #[serde(rename = "interval")]
    pub check_interval_ms: i32,
}
