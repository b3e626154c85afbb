//! Fuzz target: `payload::decode`
//!
//! Feeds arbitrary bytes to each request payload decoder.  Decoding must
//! never panic, and a decoded pump request must either map to a known
//! pump or be rejected as unknown.
//!
//! cargo fuzz run fuzz_payload_decode

#![no_main]

use irrigation::api::payload::{AutoRequest, PumpRequest, SettingsRequest, decode};
use irrigation::error::RequestError;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(req) = decode::<PumpRequest>(data) {
        match req.into_command() {
            Ok(_) | Err(RequestError::UnknownPump(_)) => {}
            Err(other) => panic!("unexpected pump rejection: {other:?}"),
        }
    }
    let _ = decode::<AutoRequest>(data).map(AutoRequest::into_command);
    let _ = decode::<SettingsRequest>(data).map(SettingsRequest::into_command);
});
