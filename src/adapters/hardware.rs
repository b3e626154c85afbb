//! Hardware adapters: bridge the board's drivers to the domain ports.
//!
//! [`HardwareSensors`] owns the [`SensorHub`] and is handed to the control
//! loop.  [`HardwareActuators`] owns the relay and LED drivers and lives
//! inside a [`SharedActuator`](crate::app::ports::SharedActuator) so the
//! request handlers can reach the pumps too.  On non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::alert_led::AlertLed;
use crate::drivers::relay::PumpRelay;
use crate::error::{ActuatorError, SensorError};
use crate::pins;
use crate::sensors::SensorHub;
use crate::state::{Pump, Tank};

// ── SensorPort implementation ─────────────────────────────────

pub struct HardwareSensors {
    hub: SensorHub,
}

impl HardwareSensors {
    pub fn new(hub: SensorHub) -> Self {
        Self { hub }
    }
}

impl SensorPort for HardwareSensors {
    fn sample_soil_moisture(&mut self) -> Result<i32, SensorError> {
        self.hub.soil_moisture()
    }

    fn read_tank_level(&mut self, tank: Tank) -> Result<bool, SensorError> {
        self.hub.tank_full(tank)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

pub struct HardwareActuators {
    relays: [PumpRelay; 2],
    alerts: [AlertLed; 2],
}

impl HardwareActuators {
    pub fn new(relays: [PumpRelay; 2], alerts: [AlertLed; 2]) -> Self {
        Self { relays, alerts }
    }

    /// Drivers wired to the board's pin map.
    pub fn from_pins() -> Self {
        Self::new(
            [
                PumpRelay::new(pins::WATER_PUMP_RELAY_GPIO),
                PumpRelay::new(pins::FERTILIZER_PUMP_RELAY_GPIO),
            ],
            [
                AlertLed::new(pins::WATER_ALERT_LED_GPIO),
                AlertLed::new(pins::FERTILIZER_ALERT_LED_GPIO),
            ],
        )
    }

    pub fn relay(&self, pump: Pump) -> &PumpRelay {
        &self.relays[pump.index()]
    }

    pub fn alert(&self, tank: Tank) -> &AlertLed {
        &self.alerts[tank.index()]
    }
}

impl ActuatorPort for HardwareActuators {
    fn set_pump(&mut self, pump: Pump, on: bool) -> Result<(), ActuatorError> {
        self.relays[pump.index()].set(on)
    }

    fn set_alert_indicator(&mut self, tank: Tank, on: bool) -> Result<(), ActuatorError> {
        self.alerts[tank.index()].set(on)
    }
}
