//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop / RequestService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, delays, event sinks) implement these
//! traits.  The domain consumes them via generics, so the control core never
//! touches hardware directly and runs unchanged against mocks on the host.

use core::cell::RefCell;
use core::time::Duration;
use std::sync::Arc;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::error::{ActuatorError, SensorError};
use crate::state::{Pump, Tank};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the control loop calls this to obtain sensor data.
pub trait SensorPort {
    /// Soil moisture as a raw ADC value, averaged over
    /// [`SOIL_SAMPLE_COUNT`](crate::config::SOIL_SAMPLE_COUNT) consecutive reads.
    fn sample_soil_moisture(&mut self) -> Result<i32, SensorError>;

    /// `true` when the tank's level switch reports liquid present.
    fn read_tank_level(&mut self, tank: Tank) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port.  Every method is a single idempotent pin write.
pub trait ActuatorPort {
    /// Energise or release a pump relay.
    fn set_pump(&mut self, pump: Pump, on: bool) -> Result<(), ActuatorError>;

    /// Light or clear a tank's alert LED.
    fn set_alert_indicator(&mut self, tank: Tank, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Delay port (driven adapter: domain → scheduler)
// ───────────────────────────────────────────────────────────────

/// Blocking timed wait in the caller's own execution context.
pub trait DelayPort {
    fn delay(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Shared actuator handle
// ───────────────────────────────────────────────────────────────

/// Cloneable handle to one [`ActuatorPort`] used by both the control loop
/// and the request handlers.
///
/// The lock is held for exactly one pin write.  Pump hold times are spent
/// outside the lock, so a manual command is never delayed by an
/// irrigation run in progress.
pub struct SharedActuator<A> {
    inner: Arc<Mutex<CriticalSectionRawMutex, RefCell<A>>>,
}

impl<A> Clone for SharedActuator<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: ActuatorPort> SharedActuator<A> {
    pub fn new(actuator: A) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RefCell::new(actuator))),
        }
    }

    pub fn set_pump(&self, pump: Pump, on: bool) -> Result<(), ActuatorError> {
        self.with(|a| a.set_pump(pump, on))
    }

    pub fn set_alert_indicator(&self, tank: Tank, on: bool) -> Result<(), ActuatorError> {
        self.with(|a| a.set_alert_indicator(tank, on))
    }

    /// Run `f` with exclusive access to the wrapped actuator.
    pub fn with<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}
