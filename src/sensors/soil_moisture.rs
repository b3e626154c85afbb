//! Capacitive soil moisture sensor on ADC1.
//!
//! Higher raw values mean drier soil.  Each reading is the truncating
//! integer mean of [`SOIL_SAMPLE_COUNT`] back-to-back raw conversions.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oneshot ADC1 reads via hw_init helpers.
//! On host/test: reads queued simulated conversions, one per read.

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

use crate::config::SOIL_SAMPLE_COUNT;
use crate::error::SensorError;

pub struct SoilMoistureSensor {
    channel: u32,
    /// Simulation: queued raw conversions, consumed one per read.
    #[cfg(not(target_os = "espidf"))]
    sim_queue: VecDeque<u16>,
    /// Simulation: returned once the queue is drained.
    #[cfg(not(target_os = "espidf"))]
    sim_idle: u16,
    #[cfg(not(target_os = "espidf"))]
    sim_reads: u32,
}

impl SoilMoistureSensor {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            #[cfg(not(target_os = "espidf"))]
            sim_queue: VecDeque::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_idle: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_reads: 0,
        }
    }

    /// Take [`SOIL_SAMPLE_COUNT`] conversions and return their mean.
    /// Any failed conversion fails the whole reading.
    pub fn sample(&mut self) -> Result<i32, SensorError> {
        let mut samples = [0u16; SOIL_SAMPLE_COUNT];
        for slot in &mut samples {
            *slot = self.read_raw()?;
        }
        Ok(average_raw(&samples))
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        crate::drivers::hw_init::adc1_read(self.channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let _ = self.channel;
        self.sim_reads += 1;
        Ok(self.sim_queue.pop_front().unwrap_or(self.sim_idle))
    }

    /// Raw value every simulated conversion returns once the queue is empty.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_raw(&mut self, raw: u16) {
        self.sim_idle = raw;
    }

    /// Queue raw values for the next simulated conversions, in order.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_feed(&mut self, raws: impl IntoIterator<Item = u16>) {
        self.sim_queue.extend(raws);
    }

    /// Simulated conversions taken so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_reads(&self) -> u32 {
        self.sim_reads
    }
}

/// Truncating integer mean.  An empty slice averages to zero.
pub fn average_raw(samples: &[u16]) -> i32 {
    if samples.is_empty() {
        return 0;
    }
    let sum: u32 = samples.iter().map(|&s| u32::from(s)).sum();
    (sum / samples.len() as u32) as i32
}
