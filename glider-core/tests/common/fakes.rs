//! Hardware fakes

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glider_core::hal::{Barometer, CalibrationStore, HallInput, PinLevel, RadioPower};
use glider_core::StorageError;

/// Barometer state visible to the test
#[derive(Debug, Clone)]
pub struct BaroState {
    /// Acknowledge at detection
    pub present: bool,
    /// Centre of the generated readings (Pa)
    pub pressure: f64,
    /// Peak-to-peak amplitude of the deterministic wobble (Pa)
    pub wobble: f64,
    /// Die temperature (°C)
    pub temperature: f32,
    /// Every pressure handed out, in order
    pub served: Vec<f64>,
}

impl BaroState {
    pub fn new(pressure: f64) -> Self {
        Self {
            present: true,
            pressure,
            wobble: 0.0,
            temperature: 21.5,
            served: Vec::new(),
        }
    }

    /// Mean of `served[from..from + count]`
    pub fn mean_of(&self, from: usize, count: usize) -> f64 {
        let window = &self.served[from..from + count];
        window.iter().sum::<f64>() / count as f64
    }
}

#[derive(Clone)]
pub struct SharedBarometer(pub Rc<RefCell<BaroState>>);

impl Barometer for SharedBarometer {
    fn detect(&mut self) -> bool {
        self.0.borrow().present
    }

    fn read_pressure(&mut self) -> f64 {
        let mut state = self.0.borrow_mut();
        // Seven-step sawtooth around the centre
        let phase = (state.served.len() % 7) as f64 - 3.0;
        let value = state.pressure + phase * state.wobble / 6.0;
        state.served.push(value);
        value
    }

    fn read_temperature(&mut self) -> f32 {
        self.0.borrow().temperature
    }
}

/// Hall pin the test drives by hand
#[derive(Clone)]
pub struct SharedPin(pub Rc<Cell<PinLevel>>);

impl HallInput for SharedPin {
    fn level(&mut self) -> PinLevel {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioEvent {
    Enabled,
    Disabled,
}

#[derive(Clone, Default)]
pub struct RecordingRadio(pub Rc<RefCell<Vec<RadioEvent>>>);

impl RadioPower for RecordingRadio {
    fn enable(&mut self) {
        self.0.borrow_mut().push(RadioEvent::Enabled);
    }

    fn disable(&mut self) {
        self.0.borrow_mut().push(RadioEvent::Disabled);
    }
}

/// Single-slot store; `fail` makes every save return `Io`
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub blob: Rc<RefCell<Option<String>>>,
    pub fail: Rc<Cell<bool>>,
}

impl CalibrationStore for MemoryStore {
    fn load(&mut self) -> Option<String> {
        self.blob.borrow().clone()
    }

    fn save(&mut self, blob: &str) -> Result<(), StorageError> {
        if self.fail.get() {
            return Err(StorageError::Io);
        }
        *self.blob.borrow_mut() = Some(blob.to_string());
        Ok(())
    }
}
