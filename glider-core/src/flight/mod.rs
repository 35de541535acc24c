//! Hall Button and Flight Mode
//!
//! The device has exactly one input: a hall-effect switch operated by
//! holding a magnet against the fuselage. Two small machines turn that pin
//! into mode changes:
//!
//! ```text
//!  pin level ──► HallSensorHandler ──► Gesture ──► FlightModeStateMachine ──► RadioPower
//!                (press/hold/release/             (Setup / Armed / Flight)
//!                 click timeout)
//! ```
//!
//! | Mode   | Long press (3 s)  | Double click  | Release after ready |
//! |--------|-------------------|---------------|---------------------|
//! | Setup  | → Armed           | -             | -                   |
//! | Armed  | sets ready flag   | → Setup       | → Flight            |
//! | Flight | -                 | → Armed       | -                   |

pub mod hall;
pub mod mode;

pub use hall::{Gestures, HallSensorHandler};
pub use mode::{FlightModeStateMachine, FlightState, RadioAction, Transition};

/// Named input events produced by the hall button classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Held for the long-press threshold while in Setup
    LongPress,
    /// Exactly two short clicks followed by a quiet window
    DoubleClick,
    /// Release edge; `was_ready` when a long hold in Armed preceded it
    Release {
        /// Ready-for-launch flag at the moment of release
        was_ready: bool,
    },
}
