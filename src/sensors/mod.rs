//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].

pub mod soil_moisture;
pub mod tank_level;

use crate::error::SensorError;
use crate::pins;
use crate::state::Tank;
use soil_moisture::SoilMoistureSensor;
use tank_level::TankLevelSensor;

/// Owns every sensor driver on the board.
pub struct SensorHub {
    pub soil: SoilMoistureSensor,
    pub tanks: TankLevelSensor,
}

impl SensorHub {
    pub fn new(soil: SoilMoistureSensor, tanks: TankLevelSensor) -> Self {
        Self { soil, tanks }
    }

    /// Hub wired to the board's pin map.
    pub fn from_pins() -> Self {
        Self::new(
            SoilMoistureSensor::new(pins::SOIL_MOISTURE_ADC_CHANNEL),
            TankLevelSensor::new(pins::WATER_LEVEL_GPIO, pins::FERTILIZER_LEVEL_GPIO),
        )
    }

    pub fn soil_moisture(&mut self) -> Result<i32, SensorError> {
        self.soil.sample()
    }

    pub fn tank_full(&mut self, tank: Tank) -> Result<bool, SensorError> {
        self.tanks.is_full(tank)
    }
}
