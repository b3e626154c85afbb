//! Pump relay driver.
//!
//! The relay module is active-low: driving the input LOW energises the
//! coil and runs the pump, HIGH releases it.  Every call is one GPIO
//! write; repeating a command is harmless.

use crate::drivers::hw_init;
use crate::error::ActuatorError;

pub struct PumpRelay {
    gpio: i32,
    energised: bool,
}

impl PumpRelay {
    /// Wrap a relay output already parked HIGH by `hw_init`.
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            energised: false,
        }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        hw_init::gpio_write(self.gpio, !on)?;
        self.energised = on;
        Ok(())
    }

    /// Last level successfully commanded.
    pub fn is_energised(&self) -> bool {
        self.energised
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}
