//! Request service: the operator-facing side of the control core.
//!
//! [`RequestService`] serves status queries and applies operator commands
//! against the [`SharedState`].  It runs on whatever task the HTTP server
//! dispatches from, concurrently with the control loop, and never blocks
//! for longer than one field store or one pin write.
//!
//! ```text
//!  HTTP handler ──▶ ┌────────────────────┐ ──▶ SharedState
//!                   │   RequestService    │
//!                   └────────────────────┘ ──▶ SharedActuator (manual pump)
//! ```

use std::sync::Arc;

use crate::error::RequestError;
use crate::state::SharedState;

use super::commands::AppCommand;
use super::events::{AppEvent, PumpSource, StatusReport};
use super::ports::{ActuatorPort, EventSink, SharedActuator};

/// Applies operator commands to the shared control state.
pub struct RequestService<A> {
    state: Arc<SharedState>,
    actuator: SharedActuator<A>,
}

impl<A> Clone for RequestService<A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            actuator: self.actuator.clone(),
        }
    }
}

impl<A: ActuatorPort> RequestService<A> {
    pub fn new(state: Arc<SharedState>, actuator: SharedActuator<A>) -> Self {
        Self { state, actuator }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of every status and parameter field.
    pub fn status(&self) -> StatusReport {
        self.state.status()
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one operator command.
    ///
    /// Each command touches individually atomic fields; none of them is a
    /// transaction over the whole state.
    pub fn handle(&self, cmd: AppCommand, sink: &mut impl EventSink) -> Result<(), RequestError> {
        match cmd {
            AppCommand::SetPump { pump, on } => {
                // Override first, so a cycle deciding right now already
                // sees the pump as operator-owned.
                self.state.set_manual_override(pump, on);
                self.actuator.set_pump(pump, on)?;
                self.state.set_pump_running(pump, on);

                let event = if on {
                    AppEvent::PumpStarted {
                        pump,
                        source: PumpSource::Manual,
                        hold: None,
                    }
                } else {
                    AppEvent::PumpStopped {
                        pump,
                        source: PumpSource::Manual,
                    }
                };
                sink.emit(&event);
            }
            AppCommand::SetAutoMode(enabled) => {
                self.state.set_auto_mode(enabled);
                sink.emit(&AppEvent::AutoModeChanged(enabled));
            }
            AppCommand::UpdateSettings(settings) => {
                self.state.apply_settings(&settings);
                sink.emit(&AppEvent::SettingsUpdated(settings));
            }
        }
        Ok(())
    }

    /// The state block this service writes to.
    pub fn state(&self) -> &Arc<SharedState> {
        &self.state
    }
}
