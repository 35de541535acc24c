//! End-to-end calibration, zeroing and persistence through the controller

mod common;

use common::{BaroState, Rig};
use glider_core::calibration::CalibrationOutcome;
use glider_core::{CalibrationTiming, Command, CommandAck, CommandError, FlightConfig, StorageError};

const STORED: &str = r#"{"basePressure":101325.0}"#;

fn phase(rig: &Rig) -> &'static str {
    rig.controller.calibration_snapshot().phase
}

fn quick_config() -> FlightConfig {
    FlightConfig {
        calibration: CalibrationTiming::default().with_warmup_ms(100).with_samples(10, 5),
        ..FlightConfig::default()
    }
}

#[test]
fn full_calibration_from_boot() {
    let mut baro = BaroState::new(100_800.0);
    baro.wobble = 6.0;
    let mut rig = Rig::boot_with(baro, None, FlightConfig::default());
    assert!(rig.controller.status().hardware_ok());
    assert!(!rig.controller.status().calibrated());

    assert_eq!(rig.execute(Command::StartCalibration), Ok(CommandAck::CalibrationStarted));
    assert_eq!(phase(&rig), "stabilization");

    rig.run_for(9_995, 5);
    assert_eq!(phase(&rig), "stabilization");
    assert_eq!(rig.controller.calibration_snapshot().progress, 99);

    rig.step(5);
    assert_eq!(phase(&rig), "measuring");
    let first_sample = rig.reads();

    for _ in 0..1_999 {
        assert!(rig.step(5).calibration.is_none());
        assert_eq!(phase(&rig), "measuring");
    }
    let finished = rig.step(5).calibration;

    let expected = rig.baro.borrow().mean_of(first_sample, 2_000);
    let Some(CalibrationOutcome::Calibrated { base_pressure }) = finished else {
        panic!("expected calibration outcome, got {finished:?}");
    };
    assert!((base_pressure - expected).abs() < 1e-6);
    assert_eq!(rig.reads(), first_sample + 2_000);

    let data = rig.controller.engine().calibration();
    assert_eq!(data.base_pressure, base_pressure);
    assert_eq!(data.adaptive_baseline, base_pressure);
    assert_eq!(rig.controller.engine().kalman().estimate(), 0.0);
    assert!(rig.controller.status().calibrated());
    assert_eq!(phase(&rig), "idle");

    let report = rig.controller.status_report(rig.now());
    assert!(!report.calibrating);
    assert_eq!(report.calib_progress, 0);
}

#[test]
fn cancel_mid_measurement_discards_samples() {
    let mut rig = Rig::boot_with(BaroState::new(99_000.0), Some(STORED), FlightConfig::default());
    assert!(rig.controller.status().calibrated());

    rig.execute(Command::StartCalibration).unwrap();
    assert!(!rig.controller.status().calibrated());
    rig.run_for(10_000, 5);
    assert_eq!(phase(&rig), "measuring");

    for _ in 0..1_000 {
        rig.step(5);
    }
    assert_eq!(rig.controller.calibration_snapshot().progress, 50);

    let before = *rig.controller.engine().calibration();
    assert_eq!(
        rig.execute(Command::Cancel),
        Ok(CommandAck::Cancelled { was_running: true })
    );
    assert_eq!(phase(&rig), "idle");
    assert_eq!(*rig.controller.engine().calibration(), before);
    assert_eq!(before.base_pressure, 101_325.0);

    // Nothing left over for the next run
    let reads = rig.reads();
    rig.run_for(100, 5);
    assert_eq!(rig.reads(), reads);

    rig.execute(Command::StartCalibration).unwrap();
    let snapshot = rig.controller.calibration_snapshot();
    assert_eq!(snapshot.phase, "stabilization");
    assert_eq!(snapshot.progress, 0);
}

#[test]
fn zeroing_moves_baseline_and_resets_streak() {
    let mut rig = Rig::boot_with(BaroState::new(101_325.0), Some(STORED), FlightConfig::default());
    rig.execute(Command::SetMonitoring(true)).unwrap();

    rig.run_for(4_000, 100);
    assert!(rig.controller.engine().stability().is_stable());

    rig.execute(Command::SetMonitoring(false)).unwrap();
    rig.baro.borrow_mut().pressure = 101_200.0;
    assert_eq!(rig.execute(Command::StartZeroing), Ok(CommandAck::ZeroingStarted));
    assert!(rig.controller.status().calibrated());

    let start = rig.reads();
    let mut finished = None;
    for tick in 1..=500 {
        let outcome = rig.step(1);
        if tick < 500 {
            assert!(outcome.calibration.is_none());
        } else {
            finished = outcome.calibration;
        }
    }

    assert_eq!(rig.reads(), start + 500);
    assert_eq!(finished, Some(CalibrationOutcome::Zeroed { baseline: 101_200.0 }));

    let engine = rig.controller.engine();
    assert_eq!(engine.calibration().adaptive_baseline, 101_200.0);
    assert_eq!(engine.calibration().base_pressure, 101_325.0);
    assert_eq!(engine.stability().stable_readings(), 0);
    assert!(rig.controller.status().calibrated());
    assert_eq!(phase(&rig), "idle");
}

#[test]
fn altitude_pauses_while_calibrating() {
    let mut rig = Rig::boot_with(BaroState::new(101_325.0), Some(STORED), FlightConfig::default());
    rig.execute(Command::SetMonitoring(true)).unwrap();
    rig.execute(Command::StartZeroing).unwrap();

    let produced = rig
        .run_for(499, 1)
        .into_iter()
        .filter(|outcome| outcome.telemetry.is_some())
        .count();
    assert_eq!(produced, 0);
}

#[test]
fn second_start_is_rejected_without_disturbing_the_first() {
    let mut rig = Rig::boot(101_000.0);
    rig.execute(Command::StartCalibration).unwrap();
    rig.run_for(2_500, 5);
    let progress = rig.controller.calibration_snapshot().progress;

    assert_eq!(rig.execute(Command::StartZeroing), Err(CommandError::OperationInProgress));
    assert_eq!(rig.execute(Command::StartCalibration), Err(CommandError::OperationInProgress));
    assert_eq!(phase(&rig), "stabilization");
    assert_eq!(rig.controller.calibration_snapshot().progress, progress);
}

#[test]
fn absent_sensor_rejects_everything_sensor_related() {
    let mut baro = BaroState::new(101_000.0);
    baro.present = false;
    let mut rig = Rig::boot_with(baro, Some(STORED), FlightConfig::default());

    assert!(!rig.controller.status().calibrated());
    assert_eq!(rig.execute(Command::StartCalibration), Err(CommandError::HardwareAbsent));
    assert_eq!(rig.execute(Command::StartZeroing), Err(CommandError::HardwareAbsent));

    rig.execute(Command::SetMonitoring(true)).unwrap();
    rig.run_for(2_000, 10);
    assert_eq!(rig.reads(), 0);
    assert!(!rig.controller.status_report(rig.now()).hw_ok);
}

#[test]
fn saved_calibration_survives_reboot() {
    let mut rig = Rig::boot_with(BaroState::new(100_750.0), None, quick_config());
    assert_eq!(rig.execute(Command::SaveCalibration), Err(CommandError::NotCalibrated));

    rig.execute(Command::StartCalibration).unwrap();
    rig.run_for(500, 5);
    assert!(rig.controller.status().calibrated());

    assert_eq!(
        rig.execute(Command::SaveCalibration),
        Ok(CommandAck::Saved { base_pressure: 100_750.0 })
    );
    assert_eq!(rig.controller.engine().calibration().stored_base_pressure, 100_750.0);
    let blob = rig.store.blob.borrow().clone().unwrap();
    assert_eq!(blob, r#"{"basePressure":100750.0}"#);

    let rebooted = Rig::boot_with(BaroState::new(100_750.0), Some(&blob), quick_config());
    assert!(rebooted.controller.status().calibrated());
    let report = rebooted.controller.status_report(0);
    assert_eq!(report.stored_base, 100_750.0);
}

#[test]
fn failed_save_keeps_previous_stored_value() {
    let mut rig = Rig::boot_with(BaroState::new(100_500.0), Some(STORED), quick_config());
    rig.execute(Command::StartCalibration).unwrap();
    rig.run_for(500, 5);

    rig.store.fail.set(true);
    assert_eq!(
        rig.execute(Command::SaveCalibration),
        Err(CommandError::Storage(StorageError::Io))
    );
    let data = rig.controller.engine().calibration();
    assert_eq!(data.base_pressure, 100_500.0);
    assert_eq!(data.stored_base_pressure, 101_325.0);
}

#[test]
fn status_report_tracks_monitoring_and_calibration() {
    let mut rig = Rig::boot_with(BaroState::new(101_325.0), Some(STORED), FlightConfig::default());

    let json = rig.controller.status_report(rig.now()).to_json().unwrap();
    assert!(!json.contains("current_p"));

    rig.execute(Command::SetMonitoring(true)).unwrap();
    rig.run_for(1_000, 100);
    let report = rig.controller.status_report(rig.now());
    assert_eq!(report.current_p, Some(101_325.0));
    assert_eq!(report.alt, Some(0.0));
    assert_eq!(report.temp, Some(21.5));
    assert_eq!(report.base, Some(101_325.0));
    assert_eq!(report.uptime_s, 1);
    assert_eq!(report.flight_mode, 0);
}
