//! Fuzz target: `Router::dispatch`
//!
//! Drives arbitrary request bodies at every POST endpoint and asserts that
//! the router never panics and that a rejected request leaves the shared
//! state exactly as it was.
//!
//! cargo fuzz run fuzz_api_dispatch

#![no_main]

use std::sync::Arc;

use irrigation::api::{Method, Router};
use irrigation::app::events::AppEvent;
use irrigation::app::ports::{ActuatorPort, EventSink, SharedActuator};
use irrigation::app::service::RequestService;
use irrigation::error::ActuatorError;
use irrigation::state::{Pump, SharedState, Tank};
use libfuzzer_sys::fuzz_target;

// Pulls in the std critical-section implementation for the actuator lock.
use critical_section as _;

struct Pins;

impl ActuatorPort for Pins {
    fn set_pump(&mut self, _pump: Pump, _on: bool) -> Result<(), ActuatorError> {
        Ok(())
    }

    fn set_alert_indicator(&mut self, _tank: Tank, _on: bool) -> Result<(), ActuatorError> {
        Ok(())
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

const PATHS: [&str; 3] = ["/api/pump", "/api/auto", "/api/settings"];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let path = PATHS[usize::from(selector) % PATHS.len()];

    let state = Arc::new(SharedState::default());
    let router = Router::new(RequestService::new(
        Arc::clone(&state),
        SharedActuator::new(Pins),
    ));
    let before = state.status();

    let resp = router.dispatch(Method::Post, path, body, &mut Discard);

    if resp.status != 200 {
        assert_eq!(state.status(), before, "rejected request changed state");
    }
    assert!(resp.body.starts_with('{'), "response body must be JSON");
});
