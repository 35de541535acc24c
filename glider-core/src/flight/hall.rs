//! Hall sensor gesture classifier
//!
//! Pure edge/timestamp machine: no filtering on the pin itself, the timing
//! thresholds alone reject contact bounce. [`HallSensorHandler::step`] takes
//! the previous state by value and returns the next one together with the
//! gestures that tick produced, so sequences can be replayed in tests
//! without a clock.

use heapless::Vec;

use super::{FlightState, Gesture};
use crate::config::GestureTiming;
use crate::hal::PinLevel;
use crate::time::{elapsed_ms, Timestamp};

/// Gestures produced by one tick
///
/// A single tick can end a Setup hold, see the release edge and close a
/// click sequence, so three is the bound.
pub type Gestures = Vec<Gesture, 3>;

/// Press/hold/release/click-timeout tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HallSensorHandler {
    timing: GestureTiming,
    last_level: PinLevel,
    press_started_at: Timestamp,
    last_release_at: Timestamp,
    holding: bool,
    ready_for_launch: bool,
    click_count: u8,
}

impl HallSensorHandler {
    /// Start tracking from the level read at init
    pub fn new(timing: GestureTiming, initial_level: PinLevel) -> Self {
        Self {
            timing,
            last_level: initial_level,
            press_started_at: 0,
            last_release_at: 0,
            holding: false,
            ready_for_launch: false,
            click_count: 0,
        }
    }

    /// Classify one pin sample taken at `now` while the device is in `mode`
    pub fn step(mut self, level: PinLevel, now: Timestamp, mode: FlightState) -> (Self, Gestures) {
        let mut gestures = Gestures::new();

        // Press edge
        if level == PinLevel::Low && self.last_level == PinLevel::High {
            self.press_started_at = now;
            self.holding = true;
            self.ready_for_launch = false;
        }

        if self.holding && elapsed_ms(self.press_started_at, now) >= self.timing.long_press_ms {
            match mode {
                FlightState::Setup => {
                    push(&mut gestures, Gesture::LongPress);
                    self.holding = false;
                }
                FlightState::Armed if !self.ready_for_launch => {
                    log_info!("Ready for launch, release the magnet");
                    self.ready_for_launch = true;
                }
                _ => {}
            }
        }

        // Release edge
        if level == PinLevel::High && self.last_level == PinLevel::Low {
            let duration = elapsed_ms(self.press_started_at, now);
            self.holding = false;

            if self.ready_for_launch {
                push(&mut gestures, Gesture::Release { was_ready: true });
                self.ready_for_launch = false;
            } else {
                push(&mut gestures, Gesture::Release { was_ready: false });
                if duration >= self.timing.debounce_ms && duration < self.timing.long_press_ms {
                    self.click_count = self.click_count.saturating_add(1);
                    self.last_release_at = now;
                }
            }
        }

        // Click timeout
        if self.click_count > 0
            && elapsed_ms(self.last_release_at, now) >= self.timing.double_click_ms
        {
            if self.click_count == 2 {
                push(&mut gestures, Gesture::DoubleClick);
            } else {
                log_debug!("Discarding {} click(s)", self.click_count);
            }
            self.click_count = 0;
        }

        self.last_level = level;
        (self, gestures)
    }

    /// In-place form of [`step`](Self::step)
    pub fn update(&mut self, level: PinLevel, now: Timestamp, mode: FlightState) -> Gestures {
        let (next, gestures) = self.step(level, now, mode);
        *self = next;
        gestures
    }

    /// Magnet currently held past a press edge
    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Long hold in Armed seen, waiting for release
    pub fn is_ready_for_launch(&self) -> bool {
        self.ready_for_launch
    }

    /// Clicks recorded in the open sequence
    pub fn click_count(&self) -> u8 {
        self.click_count
    }
}

fn push(gestures: &mut Gestures, gesture: Gesture) {
    if gestures.push(gesture).is_err() {
        log_warn!("Gesture buffer full, dropping {:?}", gesture);
    }
}
