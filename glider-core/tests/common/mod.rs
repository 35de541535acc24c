//! Common fakes and a tick driver for the integration tests
//!
//! Every fake keeps its state behind an `Rc` so the test can keep a handle
//! after the collaborator has been moved into the controller.

#![allow(dead_code)]

pub mod fakes;
pub mod harness;

#[allow(unused_imports)]
pub use fakes::{BaroState, RadioEvent, SharedBarometer, SharedPin, RecordingRadio, MemoryStore};
#[allow(unused_imports)]
pub use harness::{Rig, TICK_MS};
