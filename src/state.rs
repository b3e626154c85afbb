//! Shared control state.
//!
//! One [`SharedState`] exists for the lifetime of the firmware.  It is the
//! single source of truth for sensor readings, mode flags, and tunable
//! parameters, and is shared as an `Arc` between the control loop thread
//! and the HTTP request handlers.
//!
//! Every field is its own atomic cell with no lock over the whole
//! structure: a request handler reading the status never waits
//! on the control loop, and the control loop never waits on a request.
//! Multi-field operations ([`SharedState::apply_settings`],
//! [`SharedState::status`]) are sequences of independent field accesses,
//! not transactions.
//!
//! | Field                 | Written by                         |
//! |-----------------------|------------------------------------|
//! | soil moisture, tanks  | control loop                       |
//! | pump running          | whoever last drove the pump        |
//! | auto mode, overrides  | request interface                  |
//! | threshold, durations  | request interface                  |

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use core::time::Duration;

use crate::app::commands::Settings;
use crate::app::events::StatusReport;
use crate::config::IrrigationConfig;

// ---------------------------------------------------------------------------
// Pump / tank identity
// ---------------------------------------------------------------------------

/// The two pumps on the board.  The discriminant is the slot index used
/// for per-pump state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Pump {
    Water = 0,
    Fertilizer = 1,
}

impl Pump {
    pub const ALL: [Pump; 2] = [Pump::Water, Pump::Fertilizer];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Operator-facing pump number (`1` = water, `2` = fertilizer).
    pub const fn id(self) -> u8 {
        self as u8 + 1
    }

    /// Inverse of [`Pump::id`].
    pub const fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Water),
            2 => Some(Self::Fertilizer),
            _ => None,
        }
    }

    /// The tank this pump draws from.
    pub const fn tank(self) -> Tank {
        match self {
            Self::Water => Tank::Water,
            Self::Fertilizer => Tank::Fertilizer,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Fertilizer => "fertilizer",
        }
    }
}

/// The two supply tanks, each with a binary level switch and an alert LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tank {
    Water = 0,
    Fertilizer = 1,
}

impl Tank {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Fertilizer => "fertilizer",
        }
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Lock-free container for the controller's shared fields.
pub struct SharedState {
    // -- Sensor readings (control loop) --
    soil_moisture: AtomicI32,
    tank_full: [AtomicBool; 2],

    // -- Actuation --
    pump_running: [AtomicBool; 2],

    // -- Mode (request interface) --
    auto_mode: AtomicBool,
    manual_override: [AtomicBool; 2],

    // -- Tunables (request interface) --
    soil_dry_threshold: AtomicI32,
    pump_duration_ms: [AtomicI32; 2],
    check_interval_ms: AtomicI32,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new(&IrrigationConfig::default())
    }
}

impl SharedState {
    /// Create the state block with the given startup values.  Readings
    /// start at zero / empty and every pump flag starts cleared.
    pub fn new(config: &IrrigationConfig) -> Self {
        Self {
            soil_moisture: AtomicI32::new(0),
            tank_full: [AtomicBool::new(false), AtomicBool::new(false)],
            pump_running: [AtomicBool::new(false), AtomicBool::new(false)],
            auto_mode: AtomicBool::new(config.auto_mode),
            manual_override: [AtomicBool::new(false), AtomicBool::new(false)],
            soil_dry_threshold: AtomicI32::new(config.soil_dry_threshold),
            pump_duration_ms: [
                AtomicI32::new(config.water_pump_duration_ms),
                AtomicI32::new(config.fertilizer_pump_duration_ms),
            ],
            check_interval_ms: AtomicI32::new(config.check_interval_ms),
        }
    }

    // ── Sensor readings ───────────────────────────────────────

    pub fn soil_moisture(&self) -> i32 {
        self.soil_moisture.load(Ordering::Acquire)
    }

    pub fn set_soil_moisture(&self, value: i32) {
        self.soil_moisture.store(value, Ordering::Release);
    }

    pub fn tank_full(&self, tank: Tank) -> bool {
        self.tank_full[tank.index()].load(Ordering::Acquire)
    }

    pub fn set_tank_full(&self, tank: Tank, full: bool) {
        self.tank_full[tank.index()].store(full, Ordering::Release);
    }

    // ── Pumps ─────────────────────────────────────────────────

    pub fn pump_running(&self, pump: Pump) -> bool {
        self.pump_running[pump.index()].load(Ordering::Acquire)
    }

    pub fn set_pump_running(&self, pump: Pump, running: bool) {
        self.pump_running[pump.index()].store(running, Ordering::Release);
    }

    pub fn manual_override(&self, pump: Pump) -> bool {
        self.manual_override[pump.index()].load(Ordering::Acquire)
    }

    pub fn set_manual_override(&self, pump: Pump, active: bool) {
        self.manual_override[pump.index()].store(active, Ordering::Release);
    }

    // ── Mode ──────────────────────────────────────────────────

    pub fn auto_mode(&self) -> bool {
        self.auto_mode.load(Ordering::Acquire)
    }

    pub fn set_auto_mode(&self, enabled: bool) {
        self.auto_mode.store(enabled, Ordering::Release);
    }

    // ── Tunables ──────────────────────────────────────────────

    pub fn soil_dry_threshold(&self) -> i32 {
        self.soil_dry_threshold.load(Ordering::Acquire)
    }

    pub fn set_soil_dry_threshold(&self, threshold: i32) {
        self.soil_dry_threshold.store(threshold, Ordering::Release);
    }

    /// Raw configured hold time for `pump`, exactly as the operator set it.
    pub fn pump_duration_ms(&self, pump: Pump) -> i32 {
        self.pump_duration_ms[pump.index()].load(Ordering::Acquire)
    }

    pub fn set_pump_duration_ms(&self, pump: Pump, ms: i32) {
        self.pump_duration_ms[pump.index()].store(ms, Ordering::Release);
    }

    /// Hold time for `pump`.  Negative settings hold for zero time.
    pub fn pump_duration(&self, pump: Pump) -> Duration {
        ms_to_duration(self.pump_duration_ms(pump))
    }

    pub fn check_interval_ms(&self) -> i32 {
        self.check_interval_ms.load(Ordering::Acquire)
    }

    pub fn set_check_interval_ms(&self, ms: i32) {
        self.check_interval_ms.store(ms, Ordering::Release);
    }

    /// Sleep between cycles.  Negative settings sleep for zero time.
    pub fn check_interval(&self) -> Duration {
        ms_to_duration(self.check_interval_ms())
    }

    // ── Grouped access ────────────────────────────────────────

    /// Write all four tunables, one field at a time.
    pub fn apply_settings(&self, settings: &Settings) {
        self.set_soil_dry_threshold(settings.soil_dry_threshold);
        self.set_pump_duration_ms(Pump::Water, settings.water_pump_duration_ms);
        self.set_pump_duration_ms(Pump::Fertilizer, settings.fertilizer_pump_duration_ms);
        self.set_check_interval_ms(settings.check_interval_ms);
    }

    pub fn settings(&self) -> Settings {
        Settings {
            soil_dry_threshold: self.soil_dry_threshold(),
            water_pump_duration_ms: self.pump_duration_ms(Pump::Water),
            fertilizer_pump_duration_ms: self.pump_duration_ms(Pump::Fertilizer),
            check_interval_ms: self.check_interval_ms(),
        }
    }

    /// Snapshot every status and parameter field.
    pub fn status(&self) -> StatusReport {
        StatusReport {
            soil_moisture: self.soil_moisture(),
            water_tank_full: self.tank_full(Tank::Water),
            fertilizer_tank_full: self.tank_full(Tank::Fertilizer),
            water_pump_running: self.pump_running(Pump::Water),
            fertilizer_pump_running: self.pump_running(Pump::Fertilizer),
            auto_mode: self.auto_mode(),
            soil_dry_threshold: self.soil_dry_threshold(),
            water_pump_duration_ms: self.pump_duration_ms(Pump::Water),
            fertilizer_pump_duration_ms: self.pump_duration_ms(Pump::Fertilizer),
            check_interval_ms: self.check_interval_ms(),
        }
    }
}

fn ms_to_duration(ms: i32) -> Duration {
    Duration::from_millis(ms.max(0) as u64)
}
