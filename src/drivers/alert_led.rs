//! Tank alert LED (active-high).

use crate::drivers::hw_init;
use crate::error::ActuatorError;

pub struct AlertLed {
    gpio: i32,
    lit: bool,
}

impl AlertLed {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, lit: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        hw_init::gpio_write(self.gpio, on)?;
        self.lit = on;
        Ok(())
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
