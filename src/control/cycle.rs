//! The control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  ControlLoop                                               │
//! │                                                            │
//! │  SensorPort ──▶ Sampling ──▶ SharedState (readings)        │
//! │                    │                                       │
//! │                    ▼  alert LEDs                           │
//! │                 Deciding ◀── SharedState (mode, threshold) │
//! │                    │                                       │
//! │          Idle ◀────┴────▶ IrrigatingWater ──▶ Pause        │
//! │            │                                   │           │
//! │            │              IrrigatingFertilizer ◀┘           │
//! │            ▼                       │                       │
//! │         Sleeping ◀─────────────────┘                       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each phase handler does its work and returns the phase to enter next.
//! Every wait is a literal blocking [`DelayPort::delay`] in the loop's own
//! thread; nothing here is asynchronous and no hold is ever cut short.
//!
//! A failed sensor read or pin write ends the cycle: the error is logged,
//! a pump the loop energised is released on a best-effort basis, and the
//! loop proceeds straight to `Sleeping`.

use core::time::Duration;
use std::sync::Arc;

use log::error;

use crate::app::events::{AppEvent, PumpSource, SkipReason};
use crate::app::ports::{ActuatorPort, DelayPort, EventSink, SensorPort, SharedActuator};
use crate::config::SETTLE_DELAY_MS;
use crate::error::Error;
use crate::state::{Pump, SharedState, Tank};

use super::decision::{alert_active, autonomous_gate, needs_water};
use super::phase::Phase;

/// What happened during one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Averaged soil reading, if sampling succeeded.
    pub soil_moisture: Option<i32>,
    /// The water pump completed an on/hold/off sequence.
    pub water_pumped: bool,
    /// The fertilizer pump completed an on/hold/off sequence.
    pub fertilizer_pumped: bool,
    pub skipped: Option<SkipReason>,
    /// Inter-cycle sleep that closed the cycle.
    pub slept: Duration,
    /// Set when a failure cut the cycle short.
    pub error: Option<Error>,
}

/// The autonomous irrigation loop.
///
/// Owns its sensors, delay and event sink.  The actuator is shared with
/// the request handlers through a [`SharedActuator`] handle and the
/// control state through an `Arc<SharedState>`.
pub struct ControlLoop<S, A, D, E> {
    sensors: S,
    actuator: SharedActuator<A>,
    delay: D,
    sink: E,
    state: Arc<SharedState>,
    phase: Phase,
    cycles: u64,
    /// Pump this loop switched on and has not yet switched off.
    energised: Option<Pump>,
}

impl<S, A, D, E> ControlLoop<S, A, D, E>
where
    S: SensorPort,
    A: ActuatorPort,
    D: DelayPort,
    E: EventSink,
{
    pub fn new(
        sensors: S,
        actuator: SharedActuator<A>,
        delay: D,
        sink: E,
        state: Arc<SharedState>,
    ) -> Self {
        Self {
            sensors,
            actuator,
            delay,
            sink,
            state,
            phase: Phase::Sampling,
            cycles: 0,
            energised: None,
        }
    }

    /// Run cycles forever.
    pub fn run(&mut self) -> ! {
        self.sink.emit(&AppEvent::Started);
        loop {
            self.run_cycle();
        }
    }

    /// Run exactly one cycle, `Sampling` through `Sleeping`.
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        self.cycles = self.cycles.wrapping_add(1);
        self.enter(Phase::Sampling);

        loop {
            let step = match self.phase {
                Phase::Sampling => self.sample(&mut report),
                Phase::Deciding => Ok(self.decide()),
                Phase::Idle => Ok(Phase::Sleeping),
                Phase::IrrigatingWater => self.irrigate(Pump::Water, &mut report),
                Phase::Pause => {
                    self.delay.delay(Duration::from_millis(SETTLE_DELAY_MS));
                    Ok(Phase::IrrigatingFertilizer)
                }
                Phase::IrrigatingFertilizer => self.irrigate(Pump::Fertilizer, &mut report),
                Phase::Sleeping => {
                    report.slept = self.sleep();
                    return report;
                }
            };

            match step {
                Ok(next) => self.enter(next),
                Err(e) => {
                    self.abort(e, &mut report);
                    self.enter(Phase::Sleeping);
                }
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cycles started since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn state(&self) -> &Arc<SharedState> {
        &self.state
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    // ── Phase handlers ────────────────────────────────────────

    fn sample(&mut self, report: &mut CycleReport) -> Result<Phase, Error> {
        let soil = self.sensors.sample_soil_moisture()?;
        let water_full = self.sensors.read_tank_level(Tank::Water)?;
        let fert_full = self.sensors.read_tank_level(Tank::Fertilizer)?;

        self.state.set_soil_moisture(soil);
        self.state.set_tank_full(Tank::Water, water_full);
        self.state.set_tank_full(Tank::Fertilizer, fert_full);
        report.soil_moisture = Some(soil);

        self.sink.emit(&AppEvent::Sampled {
            soil_moisture: soil,
            water_tank_full: water_full,
            fertilizer_tank_full: fert_full,
        });

        for (tank, full) in [(Tank::Water, water_full), (Tank::Fertilizer, fert_full)] {
            let active = alert_active(full);
            self.actuator.set_alert_indicator(tank, active)?;
            self.sink.emit(&AppEvent::AlertIndicator { tank, active });
        }

        Ok(Phase::Deciding)
    }

    fn decide(&mut self) -> Phase {
        let auto_mode = self.state.auto_mode();
        let overrides = Pump::ALL.map(|p| self.state.manual_override(p));
        if !autonomous_gate(auto_mode, overrides) {
            self.sink.emit(&AppEvent::AutoSuppressed { auto_mode, overrides });
            return Phase::Idle;
        }

        let soil_moisture = self.state.soil_moisture();
        let threshold = self.state.soil_dry_threshold();
        if needs_water(soil_moisture, threshold) {
            self.sink.emit(&AppEvent::SoilDry { soil_moisture, threshold });
            Phase::IrrigatingWater
        } else {
            self.sink.emit(&AppEvent::SoilAdequate { soil_moisture, threshold });
            Phase::Idle
        }
    }

    /// Run `pump` if the tank it draws from is full.  An empty water tank
    /// skips the whole irrigation; an empty fertilizer tank only its step.
    fn irrigate(&mut self, pump: Pump, report: &mut CycleReport) -> Result<Phase, Error> {
        if !self.state.tank_full(pump.tank()) {
            let reason = match pump {
                Pump::Water => SkipReason::WaterTankEmpty,
                Pump::Fertilizer => SkipReason::FertilizerTankEmpty,
            };
            report.skipped = Some(reason);
            self.sink.emit(&AppEvent::IrrigationSkipped(reason));
            return Ok(Phase::Sleeping);
        }
        self.run_pump(pump)?;
        match pump {
            Pump::Water => {
                report.water_pumped = true;
                Ok(Phase::Pause)
            }
            Pump::Fertilizer => {
                report.fertilizer_pumped = true;
                Ok(Phase::Sleeping)
            }
        }
    }

    fn sleep(&mut self) -> Duration {
        let interval = self.state.check_interval();
        self.sink.emit(&AppEvent::Sleeping(interval));
        self.delay.delay(interval);
        interval
    }

    // ── Internal ──────────────────────────────────────────────

    /// On, hold, off.  The hold is read fresh and always runs to completion.
    fn run_pump(&mut self, pump: Pump) -> Result<(), Error> {
        self.actuator.set_pump(pump, true)?;
        self.energised = Some(pump);
        self.state.set_pump_running(pump, true);

        let hold = self.state.pump_duration(pump);
        self.sink.emit(&AppEvent::PumpStarted {
            pump,
            source: PumpSource::Auto,
            hold: Some(hold),
        });
        self.delay.delay(hold);

        self.actuator.set_pump(pump, false)?;
        self.energised = None;
        self.state.set_pump_running(pump, false);
        self.sink.emit(&AppEvent::PumpStopped {
            pump,
            source: PumpSource::Auto,
        });
        Ok(())
    }

    fn abort(&mut self, err: Error, report: &mut CycleReport) {
        report.error = Some(err);
        self.sink.emit(&AppEvent::CycleAborted(err));

        let Some(pump) = self.energised.take() else {
            return;
        };
        match self.actuator.set_pump(pump, false) {
            Ok(()) => {
                self.state.set_pump_running(pump, false);
                self.sink.emit(&AppEvent::PumpStopped {
                    pump,
                    source: PumpSource::Auto,
                });
            }
            Err(e) => error!("Could not release {} pump: {}", pump.name(), e),
        }
    }

    fn enter(&mut self, next: Phase) {
        if next == self.phase {
            return;
        }
        let from = self.phase;
        self.phase = next;
        self.sink.emit(&AppEvent::PhaseChanged { from, to: next });
    }
}
