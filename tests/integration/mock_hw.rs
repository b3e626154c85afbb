//! Mock hardware for integration tests.
//!
//! Everything runs on a [`VirtualClock`]: [`MockDelay`] advances it instead
//! of sleeping and [`MockHardware`] stamps every actuator call with it, so
//! tests can assert exact on-durations and pauses without waiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use irrigation::api::{ApiResponse, Method, Router};
use irrigation::app::events::AppEvent;
use irrigation::app::ports::{ActuatorPort, DelayPort, EventSink, SensorPort, SharedActuator};
use irrigation::app::service::RequestService;
use irrigation::control::{ControlLoop, Phase};
use irrigation::error::{ActuatorError, SensorError};
use irrigation::state::{Pump, SharedState, Tank};

// ── Virtual clock ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct VirtualClock(Arc<AtomicU64>);

impl VirtualClock {
    pub fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn advance(&self, d: Duration) {
        self.0.fetch_add(d.as_millis() as u64, Ordering::SeqCst);
    }
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Pump { pump: Pump, on: bool },
    Alert { tank: Tank, on: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timed {
    pub at_ms: u64,
    pub call: ActuatorCall,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    clock: VirtualClock,
    pub calls: Vec<Timed>,
    /// The next call equal to this one fails, once.
    pub fail_next: Option<ActuatorCall>,
    /// Every call fails.
    pub fail_all: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            calls: Vec::new(),
            fail_next: None,
            fail_all: false,
        }
    }

    /// Successful pump writes as `(time, pump, on)`.
    pub fn pump_calls(&self) -> Vec<(u64, Pump, bool)> {
        self.calls
            .iter()
            .filter_map(|t| match t.call {
                ActuatorCall::Pump { pump, on } => Some((t.at_ms, pump, on)),
                ActuatorCall::Alert { .. } => None,
            })
            .collect()
    }

    /// Last level written to `pump`'s relay.
    pub fn pump_on(&self, pump: Pump) -> bool {
        self.pump_calls()
            .iter()
            .rev()
            .find(|(_, p, _)| *p == pump)
            .is_some_and(|(_, _, on)| *on)
    }

    /// Last level written to `tank`'s alert LED.
    pub fn alert_on(&self, tank: Tank) -> Option<bool> {
        self.calls.iter().rev().find_map(|t| match t.call {
            ActuatorCall::Alert { tank: t2, on } if t2 == tank => Some(on),
            _ => None,
        })
    }

    fn record(&mut self, call: ActuatorCall) -> Result<(), ActuatorError> {
        if self.fail_all || self.fail_next == Some(call) {
            self.fail_next = None;
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.calls.push(Timed {
            at_ms: self.clock.now_ms(),
            call,
        });
        Ok(())
    }
}

impl ActuatorPort for MockHardware {
    fn set_pump(&mut self, pump: Pump, on: bool) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Pump { pump, on })
    }

    fn set_alert_indicator(&mut self, tank: Tank, on: bool) -> Result<(), ActuatorError> {
        self.record(ActuatorCall::Alert { tank, on })
    }
}

// ── MockSensors ───────────────────────────────────────────────

pub struct MockSensors {
    pub soil: i32,
    pub tank_full: [bool; 2],
    pub fail_soil: bool,
    pub soil_reads: u32,
}

#[allow(dead_code)]
impl MockSensors {
    pub fn new(soil: i32, water_full: bool, fertilizer_full: bool) -> Self {
        Self {
            soil,
            tank_full: [water_full, fertilizer_full],
            fail_soil: false,
            soil_reads: 0,
        }
    }

    /// Dry soil, both tanks full.
    pub fn dry() -> Self {
        Self::new(3000, true, true)
    }
}

impl SensorPort for MockSensors {
    fn sample_soil_moisture(&mut self) -> Result<i32, SensorError> {
        self.soil_reads += 1;
        if self.fail_soil {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(self.soil)
    }

    fn read_tank_level(&mut self, tank: Tank) -> Result<bool, SensorError> {
        Ok(self.tank_full[tank.index()])
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Called after the clock has advanced, with the delay's index within the
/// test run and its duration.
pub type DelayHook = Box<dyn FnMut(usize, Duration) + Send>;

pub struct MockDelay {
    clock: VirtualClock,
    pub delays: Vec<Duration>,
    hook: Option<DelayHook>,
}

#[allow(dead_code)]
impl MockDelay {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            delays: Vec::new(),
            hook: None,
        }
    }

    pub fn with_hook(mut self, hook: impl FnMut(usize, Duration) + Send + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn delays_ms(&self) -> Vec<u64> {
        self.delays.iter().map(|d| d.as_millis() as u64).collect()
    }
}

impl DelayPort for MockDelay {
    fn delay(&mut self, duration: Duration) {
        let index = self.delays.len();
        self.delays.push(duration);
        self.clock.advance(duration);
        if let Some(hook) = self.hook.as_mut() {
            hook(index, duration);
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Test rig ──────────────────────────────────────────────────

pub type TestLoop = ControlLoop<MockSensors, MockHardware, MockDelay, RecordingSink>;

/// Shared state, mock actuators and an API router wired together the
/// way `main` wires the real ones.
#[derive(Clone)]
pub struct Rig {
    pub state: Arc<SharedState>,
    pub hw: SharedActuator<MockHardware>,
    pub clock: VirtualClock,
    pub router: Router<MockHardware>,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        let clock = VirtualClock::default();
        let state = Arc::new(SharedState::default());
        let hw = SharedActuator::new(MockHardware::new(clock.clone()));
        let router = Router::new(RequestService::new(Arc::clone(&state), hw.clone()));
        Self {
            state,
            hw,
            clock,
            router,
        }
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay::new(self.clock.clone())
    }

    pub fn control_loop(&self, sensors: MockSensors, delay: MockDelay) -> TestLoop {
        ControlLoop::new(
            sensors,
            self.hw.clone(),
            delay,
            RecordingSink::default(),
            Arc::clone(&self.state),
        )
    }

    pub fn post(&self, path: &str, body: &str) -> ApiResponse {
        self.router
            .dispatch(Method::Post, path, body.as_bytes(), &mut RecordingSink::default())
    }

    pub fn status(&self) -> serde_json::Value {
        let resp = self
            .router
            .dispatch(Method::Get, "/api/data", b"", &mut RecordingSink::default());
        assert_eq!(resp.status, 200);
        serde_json::from_str(&resp.body).unwrap()
    }

    pub fn pump_calls(&self) -> Vec<(u64, Pump, bool)> {
        self.hw.with(|hw| hw.pump_calls())
    }
}
