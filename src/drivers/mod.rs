//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod alert_led;
pub mod hw_init;
pub mod relay;
pub mod task_pin;
