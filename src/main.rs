//! Irrigation controller firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareSensors   HardwareActuators   TaskDelay  LogEventSink │
//! │  WifiAdapter       http_server (Router)                        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌───────────────────────┐      ┌──────────────────────────┐   │
//! │  │ ControlLoop (core 1)  │      │ RequestService (httpd)   │   │
//! │  └───────────┬───────────┘      └────────────┬─────────────┘   │
//! │              └──────── Arc<SharedState> ─────┘                 │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{error, info, warn};

use irrigation::adapters::delay::TaskDelay;
use irrigation::adapters::hardware::{HardwareActuators, HardwareSensors};
use irrigation::adapters::http_server;
use irrigation::adapters::log_sink::LogEventSink;
use irrigation::adapters::wifi::WifiAdapter;
use irrigation::api::Router;
use irrigation::app::ports::SharedActuator;
use irrigation::app::service::RequestService;
use irrigation::config::{IrrigationConfig, WIFI_PASS, WIFI_SSID};
use irrigation::control::ControlLoop;
use irrigation::drivers::hw_init;
use irrigation::drivers::task_pin::{Core, spawn_on_core};
use irrigation::sensors::SensorHub;
use irrigation::state::SharedState;

/// Control loop task: priority and stack (KB).
const CONTROL_TASK_PRIORITY: u8 = 5;
const CONTROL_TASK_STACK_KB: usize = 8;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Irrigation Controller v{}        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals: relays released before anything else ──
    hw_init::init_peripherals().context("peripheral init")?;

    // ── 3. Shared state + actuator handle ─────────────────────
    let config = IrrigationConfig::default();
    info!(
        "Defaults: threshold={} pump={}ms fert={}ms interval={}ms auto={}",
        config.soil_dry_threshold,
        config.water_pump_duration_ms,
        config.fertilizer_pump_duration_ms,
        config.check_interval_ms,
        config.auto_mode,
    );
    let state = Arc::new(SharedState::new(&config));
    let actuator = SharedActuator::new(HardwareActuators::from_pins());

    // ── 4. Network: the controller runs offline if this fails ──
    let peripherals = Peripherals::take().context("Peripherals::take")?;
    let sysloop = EspSystemEventLoop::take().context("event loop")?;
    let nvs = EspDefaultNvsPartition::take().context("nvs")?;
    let wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?;
    let mut wifi = WifiAdapter::new(wifi);
    match wifi
        .set_credentials(WIFI_SSID, WIFI_PASS)
        .and_then(|()| wifi.connect())
    {
        Ok(()) => info!("WiFi up"),
        Err(e) => warn!("WiFi unavailable ({}), HTTP API will not be reachable", e),
    }

    // ── 5. HTTP API ───────────────────────────────────────────
    let router = Router::new(RequestService::new(Arc::clone(&state), actuator.clone()));
    let _server = match http_server::start(router) {
        Ok(server) => Some(server),
        Err(e) => {
            error!("HTTP server failed to start: {:#}", e);
            None
        }
    };

    // ── 6. Control loop on the application core ───────────────
    let mut control = ControlLoop::new(
        HardwareSensors::new(SensorHub::from_pins()),
        actuator,
        TaskDelay::new(),
        LogEventSink::new(),
        state,
    );
    let handle = spawn_on_core(
        Core::App,
        CONTROL_TASK_PRIORITY,
        CONTROL_TASK_STACK_KB,
        "control\0",
        move || control.run(),
    )
    .context("spawn control loop")?;

    // The control loop never returns; joining keeps `wifi` and `_server`
    // alive for the lifetime of the firmware.
    if handle.join().is_err() {
        error!("Control loop panicked");
    }
    drop(wifi);
    Ok(())
}
