//! Unified error types for the irrigation firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's per-cycle error handling uniform.  All variants are `Copy`
//! so they can be carried in cycle reports and events without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error.
    AdcReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Request errors
// ---------------------------------------------------------------------------

/// Reasons an operator request is rejected at the API boundary.
/// A rejected request never touches the shared control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Request carried no body.
    EmptyBody,
    /// Request body exceeded the accepted size.
    BodyTooLarge,
    /// Body was not valid JSON or lacked a required field.
    MalformedPayload,
    /// Pump identifier outside `{1, 2}`.
    UnknownPump(i64),
    /// No handler for this method/path.
    NotFound,
    /// The pump pin write failed while serving the request.
    Actuator(ActuatorError),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "empty request body"),
            Self::BodyTooLarge => write!(f, "request body too large"),
            Self::MalformedPayload => write!(f, "malformed payload"),
            Self::UnknownPump(id) => write!(f, "unknown pump {id}"),
            Self::NotFound => write!(f, "not found"),
            Self::Actuator(e) => write!(f, "{e}"),
        }
    }
}

impl From<ActuatorError> for RequestError {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}
