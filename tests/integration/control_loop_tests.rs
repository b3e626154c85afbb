//! Control loop behaviour against mock hardware on a virtual clock.

use std::time::Duration;

use irrigation::app::events::{AppEvent, SkipReason};
use irrigation::control::Phase;
use irrigation::error::{ActuatorError, Error, SensorError};
use irrigation::state::{Pump, Tank};

use crate::mock_hw::{ActuatorCall, MockSensors, Rig};

const WATER: Pump = Pump::Water;
const FERT: Pump = Pump::Fertilizer;

// ── Full irrigation cycle ─────────────────────────────────────

#[test]
fn dry_soil_runs_water_pause_fertilizer_then_sleeps() {
    let rig = Rig::new();
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());

    let report = control.run_cycle();

    assert_eq!(
        rig.pump_calls(),
        vec![
            (0, WATER, true),
            (3000, WATER, false),
            (4000, FERT, true),
            (5500, FERT, false),
        ]
    );
    assert_eq!(control.delay().delays_ms(), vec![3000, 1000, 1500, 5000]);
    assert!(!rig.state.pump_running(WATER));
    assert!(!rig.state.pump_running(FERT));
    assert_eq!(rig.clock.now_ms(), 10_500);

    assert_eq!(report.soil_moisture, Some(3000));
    assert!(report.water_pumped);
    assert!(report.fertilizer_pumped);
    assert_eq!(report.skipped, None);
    assert_eq!(report.slept, Duration::from_millis(5000));
    assert_eq!(report.error, None);
}

#[test]
fn phases_follow_irrigation_path() {
    let rig = Rig::new();
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    control.run_cycle();
    control.run_cycle();

    assert_eq!(
        control.sink().phases(),
        vec![
            Phase::Deciding,
            Phase::IrrigatingWater,
            Phase::Pause,
            Phase::IrrigatingFertilizer,
            Phase::Sleeping,
            Phase::Sampling,
            Phase::Deciding,
            Phase::IrrigatingWater,
            Phase::Pause,
            Phase::IrrigatingFertilizer,
            Phase::Sleeping,
        ]
    );
    assert_eq!(control.phase(), Phase::Sleeping);
    assert_eq!(control.cycles(), 2);
}

#[test]
fn sampling_writes_readings_to_state() {
    let rig = Rig::new();
    let mut control = rig.control_loop(MockSensors::new(1234, false, true), rig.delay());
    control.run_cycle();

    assert_eq!(rig.state.soil_moisture(), 1234);
    assert!(!rig.state.tank_full(Tank::Water));
    assert!(rig.state.tank_full(Tank::Fertilizer));
    assert_eq!(control.sensors_mut().soil_reads, 1);
}

// ── Decision gate ─────────────────────────────────────────────

#[test]
fn moist_soil_never_actuates_a_pump() {
    for soil in [0, 1500, 2799, 2800] {
        let rig = Rig::new();
        let mut control = rig.control_loop(MockSensors::new(soil, true, true), rig.delay());
        let report = control.run_cycle();

        assert!(rig.pump_calls().is_empty(), "soil={soil}");
        assert_eq!(control.delay().delays_ms(), vec![5000]);
        assert!(!report.water_pumped);
        assert!(control.sink().phases().contains(&Phase::Idle));
    }
}

#[test]
fn auto_mode_off_suppresses_irrigation() {
    let rig = Rig::new();
    rig.state.set_auto_mode(false);
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    control.run_cycle();

    assert!(rig.pump_calls().is_empty());
    assert_eq!(
        control
            .sink()
            .count(|e| matches!(e, AppEvent::AutoSuppressed { auto_mode: false, .. })),
        1
    );
}

#[test]
fn water_override_suppresses_both_pumps() {
    let rig = Rig::new();
    assert_eq!(rig.post("/api/pump", r#"{"pump":1,"state":true}"#).status, 200);
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    control.run_cycle();

    assert_eq!(rig.pump_calls(), vec![(0, WATER, true)]);
    assert!(rig.state.pump_running(WATER));
    assert!(!rig.state.pump_running(FERT));
}

#[test]
fn fertilizer_override_also_suppresses_water() {
    let rig = Rig::new();
    rig.post("/api/pump", r#"{"pump":2,"state":true}"#);
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    control.run_cycle();

    assert_eq!(rig.pump_calls(), vec![(0, FERT, true)]);
}

#[test]
fn releasing_override_restores_autonomous_control() {
    let rig = Rig::new();
    rig.post("/api/pump", r#"{"pump":1,"state":true}"#);
    rig.post("/api/pump", r#"{"pump":1,"state":false}"#);
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    let report = control.run_cycle();

    assert!(report.water_pumped);
    assert!(report.fertilizer_pumped);
}

// ── Tank interlocks ───────────────────────────────────────────

#[test]
fn empty_water_tank_skips_everything() {
    for fert_full in [true, false] {
        let rig = Rig::new();
        let mut control = rig.control_loop(MockSensors::new(3000, false, fert_full), rig.delay());
        let report = control.run_cycle();

        assert!(rig.pump_calls().is_empty());
        assert_eq!(report.skipped, Some(SkipReason::WaterTankEmpty));
        assert_eq!(control.delay().delays_ms(), vec![5000]);
        assert!(!control.sink().phases().contains(&Phase::IrrigatingFertilizer));
    }
}

#[test]
fn empty_fertilizer_tank_skips_only_fertilizer() {
    let rig = Rig::new();
    let mut control = rig.control_loop(MockSensors::new(3000, true, false), rig.delay());
    let report = control.run_cycle();

    assert_eq!(rig.pump_calls(), vec![(0, WATER, true), (3000, WATER, false)]);
    assert!(report.water_pumped);
    assert!(!report.fertilizer_pumped);
    assert_eq!(report.skipped, Some(SkipReason::FertilizerTankEmpty));
    assert_eq!(control.delay().delays_ms(), vec![3000, 1000, 5000]);
    assert!(!rig.state.pump_running(WATER));
}

#[test]
fn alerts_follow_tank_levels_regardless_of_mode() {
    let rig = Rig::new();
    rig.state.set_auto_mode(false);
    let mut control = rig.control_loop(MockSensors::new(0, false, true), rig.delay());
    control.run_cycle();

    assert_eq!(rig.hw.with(|hw| hw.alert_on(Tank::Water)), Some(true));
    assert_eq!(rig.hw.with(|hw| hw.alert_on(Tank::Fertilizer)), Some(false));

    control.sensors_mut().tank_full = [true, false];
    control.run_cycle();
    assert_eq!(rig.hw.with(|hw| hw.alert_on(Tank::Water)), Some(false));
    assert_eq!(rig.hw.with(|hw| hw.alert_on(Tank::Fertilizer)), Some(true));
}

#[test]
fn alerts_are_driven_every_cycle() {
    let rig = Rig::new();
    let mut control = rig.control_loop(MockSensors::new(0, true, true), rig.delay());
    for _ in 0..3 {
        control.run_cycle();
    }
    let alert_writes = rig.hw.with(|hw| {
        hw.calls
            .iter()
            .filter(|t| matches!(t.call, ActuatorCall::Alert { .. }))
            .count()
    });
    assert_eq!(alert_writes, 6);
}

// ── Parameter freshness ───────────────────────────────────────

#[test]
fn threshold_update_applies_from_next_cycle() {
    let rig = Rig::new();
    let api = rig.clone();
    let delay = rig.delay().with_hook(move |_, d| {
        if d == Duration::from_millis(5000) {
            api.post(
                "/api/settings",
                r#"{"threshold":1500,"pump_duration":3000,"fert_duration":1500,"interval":5000}"#,
            );
        }
    });
    let mut control = rig.control_loop(MockSensors::new(2000, true, true), delay);

    let first = control.run_cycle();
    assert!(!first.water_pumped);
    assert_eq!(rig.state.soil_dry_threshold(), 1500);

    let second = control.run_cycle();
    assert!(second.water_pumped);
    assert!(second.fertilizer_pumped);
}

#[test]
fn threshold_change_mid_cycle_does_not_abort_sequence() {
    let rig = Rig::new();
    let api = rig.clone();
    let delay = rig.delay().with_hook(move |i, _| {
        if i == 0 {
            api.post(
                "/api/settings",
                r#"{"threshold":4000,"pump_duration":3000,"fert_duration":1500,"interval":5000}"#,
            );
        }
    });
    let mut control = rig.control_loop(MockSensors::dry(), delay);

    let first = control.run_cycle();
    assert!(first.water_pumped);
    assert!(first.fertilizer_pumped);

    let second = control.run_cycle();
    assert!(!second.water_pumped);
}

#[test]
fn durations_and_interval_are_read_fresh() {
    let rig = Rig::new();
    let api = rig.clone();
    let delay = rig.delay().with_hook(move |i, _| {
        if i == 0 {
            api.post(
                "/api/settings",
                r#"{"threshold":2800,"pump_duration":100,"fert_duration":250,"interval":700}"#,
            );
        }
    });
    let mut control = rig.control_loop(MockSensors::dry(), delay);
    control.run_cycle();

    // The water hold already started at 3000 ms; the fertilizer hold and
    // the sleep pick up the new values within the same cycle.
    assert_eq!(control.delay().delays_ms(), vec![3000, 1000, 250, 700]);

    control.run_cycle();
    assert_eq!(&control.delay().delays_ms()[4..], &[100, 1000, 250, 700]);
}

#[test]
fn negative_durations_hold_for_zero() {
    let rig = Rig::new();
    rig.post(
        "/api/settings",
        r#"{"threshold":2800,"pump_duration":-10,"fert_duration":-1,"interval":-5000}"#,
    );
    assert_eq!(rig.status()["interval"], -5000);

    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    let report = control.run_cycle();

    assert_eq!(control.delay().delays_ms(), vec![0, 1000, 0, 0]);
    assert_eq!(report.slept, Duration::ZERO);
    assert_eq!(
        rig.pump_calls(),
        vec![
            (0, WATER, true),
            (0, WATER, false),
            (1000, FERT, true),
            (1000, FERT, false),
        ]
    );
}

// ── Manual commands against a running loop ────────────────────

#[test]
fn manual_pump_on_while_sleeping_is_immediate_and_suppresses_next_cycle() {
    let rig = Rig::new();
    let api = rig.clone();
    let delay = rig.delay().with_hook(move |i, d| {
        // First cycle is idle (soil below threshold), so delay 0 is the sleep.
        if i == 0 {
            assert_eq!(d, Duration::from_millis(5000));
            let resp = api.post("/api/pump", r#"{"pump":1,"state":true}"#);
            assert_eq!(resp.status, 200);
            assert!(api.state.manual_override(Pump::Water));
            assert!(api.state.pump_running(Pump::Water));
            assert!(api.hw.with(|hw| hw.pump_on(Pump::Water)));
        }
    });
    let mut control = rig.control_loop(MockSensors::new(1000, true, true), delay);

    control.run_cycle();
    assert_eq!(rig.pump_calls(), vec![(5000, WATER, true)]);

    control.sensors_mut().soil = 3500;
    let report = control.run_cycle();

    assert!(!report.water_pumped);
    assert_eq!(rig.pump_calls(), vec![(5000, WATER, true)]);
    assert!(rig.state.pump_running(WATER));
    assert!(rig.hw.with(|hw| hw.pump_on(WATER)));
    let status = rig.status();
    assert_eq!(status["pump1"], true);
    assert_eq!(status["soil_moisture"], 3500);
}

#[test]
fn manual_command_mid_hold_does_not_cancel_sequence() {
    let rig = Rig::new();
    let api = rig.clone();
    let delay = rig.delay().with_hook(move |i, _| {
        if i == 0 {
            api.post("/api/pump", r#"{"pump":2,"state":true}"#);
        }
    });
    let mut control = rig.control_loop(MockSensors::dry(), delay);
    let report = control.run_cycle();

    assert!(report.water_pumped);
    assert!(report.fertilizer_pumped);
    assert_eq!(
        rig.pump_calls(),
        vec![
            (0, WATER, true),
            (3000, FERT, true),
            (3000, WATER, false),
            (4000, FERT, true),
            (5500, FERT, false),
        ]
    );
    // Override stays recorded and gates the next cycle.
    assert!(rig.state.manual_override(FERT));
    let next = control.run_cycle();
    assert!(!next.water_pumped);
}

// ── Failure handling ──────────────────────────────────────────

#[test]
fn sensor_failure_aborts_cycle_and_sleeps() {
    let rig = Rig::new();
    let mut sensors = MockSensors::dry();
    sensors.fail_soil = true;
    let mut control = rig.control_loop(sensors, rig.delay());

    let report = control.run_cycle();

    assert_eq!(report.error, Some(Error::Sensor(SensorError::AdcReadFailed)));
    assert_eq!(report.soil_moisture, None);
    assert_eq!(report.slept, Duration::from_millis(5000));
    assert!(rig.pump_calls().is_empty());
    assert_eq!(control.phase(), Phase::Sleeping);

    control.sensors_mut().fail_soil = false;
    let recovered = control.run_cycle();
    assert_eq!(recovered.error, None);
    assert!(recovered.water_pumped);
}

#[test]
fn failed_alert_write_aborts_before_deciding() {
    let rig = Rig::new();
    rig.hw.with(|hw| {
        hw.fail_next = Some(ActuatorCall::Alert {
            tank: Tank::Water,
            on: false,
        });
    });
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    let report = control.run_cycle();

    assert_eq!(
        report.error,
        Some(Error::Actuator(ActuatorError::GpioWriteFailed))
    );
    assert!(!control.sink().phases().contains(&Phase::Deciding));
    assert!(rig.pump_calls().is_empty());
}

#[test]
fn failed_pump_off_gets_best_effort_release() {
    let rig = Rig::new();
    rig.hw.with(|hw| {
        hw.fail_next = Some(ActuatorCall::Pump {
            pump: WATER,
            on: false,
        });
    });
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    let report = control.run_cycle();

    assert!(report.error.is_some());
    assert!(!report.water_pumped);
    assert!(!report.fertilizer_pumped);
    // The retry off-write lands after the 3 s hold; fertilizer never runs.
    assert_eq!(rig.pump_calls(), vec![(0, WATER, true), (3000, WATER, false)]);
    assert!(!rig.state.pump_running(WATER));
    assert_eq!(control.delay().delays_ms(), vec![3000, 5000]);
    assert_eq!(
        control
            .sink()
            .count(|e| matches!(e, AppEvent::CycleAborted(_))),
        1
    );
}

#[test]
fn failed_pump_on_leaves_running_flag_clear() {
    let rig = Rig::new();
    rig.hw.with(|hw| {
        hw.fail_next = Some(ActuatorCall::Pump {
            pump: WATER,
            on: true,
        });
    });
    let mut control = rig.control_loop(MockSensors::dry(), rig.delay());
    let report = control.run_cycle();

    assert!(report.error.is_some());
    assert!(rig.pump_calls().is_empty());
    assert!(!rig.state.pump_running(WATER));
    assert_eq!(control.delay().delays_ms(), vec![5000]);
}

#[test]
fn stuck_relay_keeps_running_flag_set() {
    let rig = Rig::new();
    let hw = rig.hw.clone();
    let delay = rig.delay().with_hook(move |i, _| {
        if i == 0 {
            hw.with(|m| m.fail_all = true);
        }
    });
    let mut control = rig.control_loop(MockSensors::dry(), delay);
    let report = control.run_cycle();

    assert_eq!(
        report.error,
        Some(Error::Actuator(ActuatorError::GpioWriteFailed))
    );
    assert_eq!(rig.pump_calls(), vec![(0, WATER, true)]);
    assert!(rig.state.pump_running(WATER), "flag mirrors the stuck relay");
    assert_eq!(report.slept, Duration::from_millis(5000));
}
