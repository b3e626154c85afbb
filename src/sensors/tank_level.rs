//! Float-switch level sensors for the water and fertilizer tanks.
//!
//! Each switch is a digital input reading HIGH while liquid is present.
//! GPIO 34/35 are input-only on the ESP32 and have no internal pulls, so
//! the switches carry external resistors.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads real GPIO levels via hw_init helpers.
//! On host/test: defaults to full, settable per tank.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

use crate::error::SensorError;
use crate::state::Tank;

#[cfg(not(target_os = "espidf"))]
static SIM_TANK_FULL: [AtomicBool; 2] = [AtomicBool::new(true), AtomicBool::new(true)];

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_tank_full(tank: Tank, full: bool) {
    SIM_TANK_FULL[tank.index()].store(full, Ordering::Relaxed);
}

pub struct TankLevelSensor {
    gpio: [i32; 2],
}

impl TankLevelSensor {
    pub fn new(water_gpio: i32, fertilizer_gpio: i32) -> Self {
        Self {
            gpio: [water_gpio, fertilizer_gpio],
        }
    }

    pub fn gpio(&self, tank: Tank) -> i32 {
        self.gpio[tank.index()]
    }

    /// `true` while the tank's switch reports liquid.
    #[cfg(target_os = "espidf")]
    pub fn is_full(&mut self, tank: Tank) -> Result<bool, SensorError> {
        Ok(crate::drivers::hw_init::gpio_read(self.gpio(tank)))
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn is_full(&mut self, tank: Tank) -> Result<bool, SensorError> {
        Ok(SIM_TANK_FULL[tank.index()].load(Ordering::Relaxed))
    }
}
