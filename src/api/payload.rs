//! JSON request and response bodies for the HTTP API.
//!
//! Every request body is decoded completely into a typed [`AppCommand`]
//! before anything touches the shared state, so a malformed request can
//! never leave a partial write behind.

use core::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::app::commands::{AppCommand, Settings};
use crate::error::RequestError;
use crate::state::Pump;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `POST /api/pump`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PumpRequest {
    /// Operator pump number: `1` = water, `2` = fertilizer.
    pub pump: i64,
    #[serde(deserialize_with = "flag")]
    pub state: bool,
}

impl PumpRequest {
    pub fn into_command(self) -> Result<AppCommand, RequestError> {
        let pump = Pump::from_id(self.pump).ok_or(RequestError::UnknownPump(self.pump))?;
        Ok(AppCommand::SetPump {
            pump,
            on: self.state,
        })
    }
}

/// `POST /api/auto`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AutoRequest {
    #[serde(deserialize_with = "flag")]
    pub enabled: bool,
}

impl AutoRequest {
    pub fn into_command(self) -> AppCommand {
        AppCommand::SetAutoMode(self.enabled)
    }
}

/// `POST /api/settings`.  All four fields are required and read as
/// [`int`] numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SettingsRequest {
    #[serde(deserialize_with = "int")]
    pub threshold: i32,
    #[serde(deserialize_with = "int")]
    pub pump_duration: i32,
    #[serde(deserialize_with = "int")]
    pub fert_duration: i32,
    #[serde(deserialize_with = "int")]
    pub interval: i32,
}

impl SettingsRequest {
    pub fn into_command(self) -> AppCommand {
        AppCommand::UpdateSettings(Settings {
            soil_dry_threshold: self.threshold,
            water_pump_duration_ms: self.pump_duration,
            fertilizer_pump_duration_ms: self.fert_duration,
            check_interval_ms: self.interval,
        })
    }
}

/// Decode a request body of type `T`.
pub fn decode<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, RequestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RequestError::EmptyBody);
    }
    serde_json::from_slice(body).map_err(|_| RequestError::MalformedPayload)
}

/// On/off flag: a JSON boolean, or an integer where nonzero means on.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or an integer")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Any JSON number as an `i32`: fractions truncate toward zero and values
/// outside the `i32` range saturate.
fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    struct IntVisitor;

    impl Visitor<'_> for IntVisitor {
        type Value = i32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i32, E> {
            Ok(v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i32, E> {
            Ok(v.min(i32::MAX as u64) as i32)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i32, E> {
            // `as` truncates and saturates.
            Ok(v as i32)
        }
    }

    deserializer.deserialize_any(IntVisitor)
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// `{"status":"ok"}`
#[derive(Debug, Serialize)]
pub struct Ack {
    pub status: &'static str,
}

impl Ack {
    pub const OK: Self = Self { status: "ok" };
}

/// `{"status":"error","reason":"..."}`
#[derive(Debug, Serialize)]
pub struct Rejection {
    pub status: &'static str,
    pub reason: String,
}

impl From<RequestError> for Rejection {
    fn from(e: RequestError) -> Self {
        Self {
            status: "error",
            reason: e.to_string(),
        }
    }
}
