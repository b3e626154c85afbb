//! System configuration parameters
//!
//! Startup defaults for every operator-tunable parameter, plus the fixed
//! constants the control loop depends on.  Tunables live in RAM only; they
//! are reset to these defaults on every boot.

use serde::{Deserialize, Serialize};

// --- Fixed constants (not operator-tunable) ---

/// Number of consecutive raw ADC samples averaged into one moisture reading.
pub const SOIL_SAMPLE_COUNT: usize = 10;

/// Settle delay between the water and fertilizer pump runs (milliseconds).
pub const SETTLE_DELAY_MS: u64 = 1000;

/// Largest HTTP request body the API will accept (bytes).
pub const MAX_REQUEST_BODY: usize = 256;

// --- Network (build-time) ---

/// Station SSID, taken from the build environment (`WIFI_SSID`).
pub const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(ssid) => ssid,
    None => "",
};

/// Station password, taken from the build environment (`WIFI_PASS`).
pub const WIFI_PASS: &str = match option_env!("WIFI_PASS") {
    Some(pass) => pass,
    None => "",
};

/// Connection attempts before the station gives up.
pub const WIFI_MAX_RETRY: u32 = 5;

/// Startup values for the shared control state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrigationConfig {
    // --- Decision ---
    /// Raw ADC value above which the soil counts as dry.
    pub soil_dry_threshold: i32,
    /// Whether the control loop may irrigate on its own after boot.
    pub auto_mode: bool,

    // --- Pump run times ---
    /// Water pump hold time per irrigation (milliseconds).
    pub water_pump_duration_ms: i32,
    /// Fertilizer pump hold time per irrigation (milliseconds).
    pub fertilizer_pump_duration_ms: i32,

    // --- Timing ---
    /// Sleep between control cycles (milliseconds).
    pub check_interval_ms: i32,
}

impl Default for IrrigationConfig {
    fn default() -> Self {
        Self {
            soil_dry_threshold: 2800,
            auto_mode: true,

            water_pump_duration_ms: 3000,
            fertilizer_pump_duration_ms: 1500,

            check_interval_ms: 5000,
        }
    }
}
