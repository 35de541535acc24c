//! Bench simulation of a full sortie against fake hardware
//!
//! Calibrates, saves the baseline to a scratch directory, arms with a long
//! press, launches on release, climbs to about 60 m and aborts back to Armed
//! with a double click. Run with `cargo run --example bench_sim`.

use std::cell::Cell;
use std::rc::Rc;

use glider_connectors::FileStore;
use glider_core::constants::altitude::SEA_LEVEL_PRESSURE_PA;
use glider_core::hal::{Barometer, HallInput, PinLevel, RadioPower};
use glider_core::time::{FixedTime, MonotonicClock, TimeSource};
use glider_core::{Command, FlightConfig, FlightController, FlightState};

/// Airfield roughly 10 m above sea level
const GROUND_PA: f64 = SEA_LEVEL_PRESSURE_PA - 115.0;
/// Pressure drop per metre near sea level
const PA_PER_METRE: f64 = 12.0;
const TICK_MS: u64 = 5;

/// Altitude-driven pressure with a little quantisation noise
struct SimBarometer {
    altitude: Rc<Cell<f64>>,
    reads: u64,
}

impl Barometer for SimBarometer {
    fn detect(&mut self) -> bool {
        true
    }

    fn read_pressure(&mut self) -> f64 {
        self.reads += 1;
        let noise = ((self.reads * 7919) % 11) as f64 * 0.2 - 1.0;
        GROUND_PA - self.altitude.get() * PA_PER_METRE + noise
    }

    fn read_temperature(&mut self) -> f32 {
        24.0 - (self.altitude.get() * 0.0065) as f32
    }
}

/// `true` while the magnet is held against the sensor
struct Magnet(Rc<Cell<bool>>);

impl HallInput for Magnet {
    fn level(&mut self) -> PinLevel {
        PinLevel::from_high(!self.0.get())
    }
}

struct Wifi;

impl RadioPower for Wifi {
    fn enable(&mut self) {
        println!("      [wifi] access point up");
    }

    fn disable(&mut self) {
        println!("      [wifi] radio asleep");
    }
}

type Sim = FlightController<SimBarometer, Magnet, Wifi, FileStore>;

fn run(controller: &mut Sim, clock: &mut FixedTime, duration: u64, mut each: impl FnMut(u64)) {
    let end = clock.now() + duration;
    while clock.now() < end {
        clock.advance(TICK_MS);
        each(clock.now());
        controller.tick(clock.now());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let wall = MonotonicClock::new();

    let flash = tempfile::tempdir()?;
    let altitude = Rc::new(Cell::new(0.0));
    let magnet = Rc::new(Cell::new(false));
    let mut clock = FixedTime::new(0);

    let mut controller = FlightController::new(
        SimBarometer { altitude: altitude.clone(), reads: 0 },
        Magnet(magnet.clone()),
        Wifi,
        FileStore::open(flash.path())?,
        FlightConfig::default(),
        clock.now(),
    );

    controller.execute(Command::StartCalibration, clock.now())?;
    while !controller.status().calibrated() {
        run(&mut controller, &mut clock, 1_000, |_| {});
        let snapshot = controller.calibration_snapshot();
        if snapshot.calibrating {
            println!("      calibration {} {}%", snapshot.phase, snapshot.progress);
        }
    }
    controller.execute(Command::SaveCalibration, clock.now())?;
    controller.execute(Command::SetMonitoring(true), clock.now())?;
    controller.execute(Command::SetLogging(true), clock.now())?;

    // Arm
    magnet.set(true);
    run(&mut controller, &mut clock, 3_100, |_| {});
    magnet.set(false);
    run(&mut controller, &mut clock, 1_000, |_| {});

    // Hold for launch, release
    magnet.set(true);
    run(&mut controller, &mut clock, 3_500, |_| {});
    magnet.set(false);
    run(&mut controller, &mut clock, 100, |_| {});
    assert_eq!(controller.flight_state(), FlightState::Flight);

    // Climb at 3 m/s for 20 s, then glide level
    let launch = clock.now();
    let climb = altitude.clone();
    run(&mut controller, &mut clock, 25_000, move |now| {
        let seconds = (now - launch) as f64 / 1000.0;
        climb.set((seconds * 3.0).min(60.0));
    });

    // Abort: two short clicks
    for _ in 0..2 {
        magnet.set(true);
        run(&mut controller, &mut clock, 150, |_| {});
        magnet.set(false);
        run(&mut controller, &mut clock, 150, |_| {});
    }
    run(&mut controller, &mut clock, 600, |_| {});

    println!("{}", controller.status_report(clock.now()).to_json()?);
    for transition in controller.flight().history() {
        println!("      {:?} -> {:?} ({:?})", transition.from, transition.to, transition.radio);
    }
    println!(
        "      simulated {} s in {} ms (+/- {} ms)",
        clock.now() / 1000,
        wall.now(),
        wall.precision_ms()
    );
    Ok(())
}
