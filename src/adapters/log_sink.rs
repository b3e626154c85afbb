//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART in production, stderr on the host).  Lines
//! follow a `TAG | key=value` layout so they are easy to grep.

use log::{debug, error, info, warn};

use crate::app::events::{AppEvent, PumpSource, SkipReason};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | control loop running"),
            AppEvent::PhaseChanged { from, to } => debug!("PHASE | {} -> {}", from, to),
            AppEvent::Sampled {
                soil_moisture,
                water_tank_full,
                fertilizer_tank_full,
            } => {
                info!(
                    "SENSE | soil={} | water={} fert={}",
                    soil_moisture,
                    level(*water_tank_full),
                    level(*fertilizer_tank_full),
                );
            }
            AppEvent::AlertIndicator { tank, active } => {
                debug!("ALERT | {} led={}", tank.name(), if *active { "ON" } else { "OFF" });
            }
            AppEvent::AutoSuppressed { auto_mode, overrides } => {
                debug!(
                    "GATE  | closed auto={} override=[{},{}]",
                    auto_mode, overrides[0], overrides[1]
                );
            }
            AppEvent::SoilDry { soil_moisture, threshold } => {
                info!("SOIL  | dry {} > {}", soil_moisture, threshold);
            }
            AppEvent::SoilAdequate { soil_moisture, threshold } => {
                debug!("SOIL  | ok {} <= {}", soil_moisture, threshold);
            }
            AppEvent::PumpStarted { pump, source, hold } => match hold {
                Some(hold) => info!(
                    "PUMP  | {} ON src={} hold={}ms",
                    pump.name(),
                    source_name(*source),
                    hold.as_millis()
                ),
                None => info!("PUMP  | {} ON src={}", pump.name(), source_name(*source)),
            },
            AppEvent::PumpStopped { pump, source } => {
                info!("PUMP  | {} OFF src={}", pump.name(), source_name(*source));
            }
            AppEvent::IrrigationSkipped(reason) => match reason {
                SkipReason::WaterTankEmpty => warn!("SKIP  | water tank empty, no irrigation"),
                SkipReason::FertilizerTankEmpty => info!("SKIP  | fertilizer tank empty"),
            },
            AppEvent::CycleAborted(e) => error!("CYCLE | aborted: {}", e),
            AppEvent::Sleeping(d) => debug!("SLEEP | {}ms", d.as_millis()),
            AppEvent::AutoModeChanged(enabled) => info!("MODE  | auto={}", enabled),
            AppEvent::SettingsUpdated(s) => {
                info!(
                    "CONF  | threshold={} pump={}ms fert={}ms interval={}ms",
                    s.soil_dry_threshold,
                    s.water_pump_duration_ms,
                    s.fertilizer_pump_duration_ms,
                    s.check_interval_ms,
                );
            }
            AppEvent::RequestRejected(e) => warn!("HTTP  | rejected: {}", e),
        }
    }
}

fn level(full: bool) -> &'static str {
    if full { "FULL" } else { "EMPTY" }
}

fn source_name(source: PumpSource) -> &'static str {
    match source {
        PumpSource::Auto => "auto",
        PumpSource::Manual => "manual",
    }
}
