//! Flight mode state machine

use heapless::Deque;
use serde::{Deserialize, Serialize};

use super::Gesture;
use crate::hal::RadioPower;

/// Number of transitions kept for diagnostics
pub const TRANSITION_HISTORY: usize = 8;

/// Operating mode of the glider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlightState {
    /// On the bench, radio on, configuration allowed
    #[default]
    Setup,
    /// Waiting for the launch release
    Armed,
    /// Airborne, radio off
    Flight,
}

/// Effect a mode entry has on the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioAction {
    /// Bring the access point back up
    Enable,
    /// Shut the radio down
    Disable,
    /// Leave it as it is
    None,
}

/// One completed mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// Mode left
    pub from: FlightState,
    /// Mode entered
    pub to: FlightState,
    /// What was done to the radio
    pub radio: RadioAction,
}

impl FlightState {
    /// Numeric code used in the status payload
    pub const fn code(self) -> u8 {
        match self {
            FlightState::Setup => 0,
            FlightState::Armed => 1,
            FlightState::Flight => 2,
        }
    }

    /// Display name
    pub const fn name(self) -> &'static str {
        match self {
            FlightState::Setup => "SETUP",
            FlightState::Armed => "ARMED",
            FlightState::Flight => "FLIGHT",
        }
    }

    /// Target of a long press, if this mode reacts to one
    pub fn on_long_press(self) -> Option<FlightState> {
        match self {
            FlightState::Setup => Some(FlightState::Armed),
            _ => None,
        }
    }

    /// Target of a double click
    pub fn on_double_click(self) -> Option<FlightState> {
        match self {
            FlightState::Armed => Some(FlightState::Setup),
            FlightState::Flight => Some(FlightState::Armed),
            FlightState::Setup => None,
        }
    }

    /// Target of a release edge
    pub fn on_release(self, was_ready: bool) -> Option<FlightState> {
        match self {
            FlightState::Armed if was_ready => Some(FlightState::Flight),
            _ => None,
        }
    }

    /// Radio effect of entering this mode from `old`
    pub fn on_enter(self, old: FlightState) -> RadioAction {
        match (self, old) {
            (FlightState::Flight, _) => RadioAction::Disable,
            (_, FlightState::Flight) => RadioAction::Enable,
            _ => RadioAction::None,
        }
    }

    fn target(self, gesture: Gesture) -> Option<FlightState> {
        match gesture {
            Gesture::LongPress => self.on_long_press(),
            Gesture::DoubleClick => self.on_double_click(),
            Gesture::Release { was_ready } => self.on_release(was_ready),
        }
    }
}

/// Current mode plus a short transition history
#[derive(Debug, Clone)]
pub struct FlightModeStateMachine {
    state: FlightState,
    history: Deque<Transition, TRANSITION_HISTORY>,
}

impl FlightModeStateMachine {
    /// Boot state: Setup. The caller has already brought the radio up.
    pub fn new() -> Self {
        Self {
            state: FlightState::Setup,
            history: Deque::new(),
        }
    }

    /// Current mode
    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Apply a gesture, driving the radio on mode entry
    pub fn on_gesture<R: RadioPower>(
        &mut self,
        gesture: Gesture,
        radio: &mut R,
    ) -> Option<Transition> {
        let to = self.state.target(gesture)?;
        let from = self.state;
        let action = to.on_enter(from);

        match action {
            RadioAction::Enable => radio.enable(),
            RadioAction::Disable => radio.disable(),
            RadioAction::None => {}
        }
        self.state = to;

        let transition = Transition { from, to, radio: action };
        if self.history.is_full() {
            self.history.pop_front();
        }
        let _ = self.history.push_back(transition);

        log_info!("Mode {} -> {} (radio {:?})", from.name(), to.name(), action);
        Some(transition)
    }

    /// Transitions, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Transition> {
        self.history.iter()
    }
}

impl Default for FlightModeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
