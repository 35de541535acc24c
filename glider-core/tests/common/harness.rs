//! Tick driver around a controller wired to the fakes

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glider_core::controller::TickOutcome;
use glider_core::flight::Transition;
use glider_core::hal::PinLevel;
use glider_core::time::{FixedTime, TimeSource, Timestamp};
use glider_core::{Command, CommandAck, CommandError, FlightConfig, FlightController};

use super::fakes::{BaroState, MemoryStore, RadioEvent, RecordingRadio, SharedBarometer, SharedPin};

/// Loop period used when advancing time
pub const TICK_MS: u64 = 10;

pub type TestController = FlightController<SharedBarometer, SharedPin, RecordingRadio, MemoryStore>;

pub struct Rig {
    pub controller: TestController,
    pub baro: Rc<RefCell<BaroState>>,
    pub pin: Rc<Cell<PinLevel>>,
    pub radio: Rc<RefCell<Vec<RadioEvent>>>,
    pub store: MemoryStore,
    pub clock: FixedTime,
}

impl Rig {
    /// Sensor present at `pressure`, nothing stored, default timing
    pub fn boot(pressure: f64) -> Self {
        Self::boot_with(BaroState::new(pressure), None, FlightConfig::default())
    }

    pub fn boot_with(baro: BaroState, stored: Option<&str>, config: FlightConfig) -> Self {
        let baro = Rc::new(RefCell::new(baro));
        let pin = Rc::new(Cell::new(PinLevel::High));
        let radio = RecordingRadio::default();
        let store = MemoryStore::default();
        *store.blob.borrow_mut() = stored.map(str::to_string);

        let clock = FixedTime::new(0);
        let controller = FlightController::new(
            SharedBarometer(baro.clone()),
            SharedPin(pin.clone()),
            radio.clone(),
            store.clone(),
            config,
            clock.now(),
        );

        Self {
            controller,
            baro,
            pin,
            radio: radio.0,
            store,
            clock,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn execute(&mut self, command: Command) -> Result<CommandAck, CommandError> {
        let now = self.now();
        self.controller.execute(command, now)
    }

    /// Tick at the current time
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.now();
        self.controller.tick(now)
    }

    /// Advance by `ms` and tick once
    pub fn step(&mut self, ms: u64) -> TickOutcome {
        self.clock.advance(ms);
        self.tick()
    }

    /// Tick every `period` ms until `duration` has passed
    pub fn run_for(&mut self, duration: u64, period: u64) -> Vec<TickOutcome> {
        let end = self.now() + duration;
        let mut outcomes = Vec::new();
        while self.now() < end {
            let ms = period.min(end - self.now());
            outcomes.push(self.step(ms));
        }
        outcomes
    }

    /// Press at the current time, hold for `duration`, release
    pub fn hold_for(&mut self, duration: u64) -> Vec<Transition> {
        self.pin.set(PinLevel::Low);
        let mut transitions: Vec<Transition> = self.tick().transitions.into_iter().collect();
        for outcome in self.run_for(duration, TICK_MS) {
            transitions.extend(outcome.transitions);
        }
        self.pin.set(PinLevel::High);
        transitions.extend(self.tick().transitions);
        transitions
    }

    /// Leave the magnet away for `duration`
    pub fn idle_for(&mut self, duration: u64) -> Vec<Transition> {
        self.pin.set(PinLevel::High);
        self.run_for(duration, TICK_MS)
            .into_iter()
            .flat_map(|outcome| outcome.transitions)
            .collect()
    }

    pub fn radio_events(&self) -> Vec<RadioEvent> {
        self.radio.borrow().clone()
    }

    pub fn reads(&self) -> usize {
        self.baro.borrow().served.len()
    }
}
