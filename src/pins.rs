//! GPIO / peripheral pin assignments for the irrigation controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Pump relays (active-low relay module: LOW = energised)
// ---------------------------------------------------------------------------

/// Relay channel switching the water pump.
pub const WATER_PUMP_RELAY_GPIO: i32 = 27;
/// Relay channel switching the fertilizer pump.
pub const FERTILIZER_PUMP_RELAY_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Tank level sensors (digital float switches, HIGH = liquid present)
// ---------------------------------------------------------------------------

/// Water tank level switch. Input-only pin on the ESP32.
pub const WATER_LEVEL_GPIO: i32 = 34;
/// Fertilizer tank level switch. Input-only pin on the ESP32.
pub const FERTILIZER_LEVEL_GPIO: i32 = 35;

// ---------------------------------------------------------------------------
// Soil moisture sensor (capacitive, analog)
// ---------------------------------------------------------------------------

/// ADC1 channel 0 (GPIO 36 / SENSOR_VP on the ESP32).
pub const SOIL_MOISTURE_ADC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Alert indicators (active-high LEDs)
// ---------------------------------------------------------------------------

/// Lit while the water tank is empty.
pub const WATER_ALERT_LED_GPIO: i32 = 22;
/// Lit while the fertilizer tank is empty.
pub const FERTILIZER_ALERT_LED_GPIO: i32 = 23;
