//! Autonomous irrigation control.
//!
//! [`ControlLoop`] is the single always-running activity that samples the
//! sensors, decides whether to irrigate and sequences the pumps.  The
//! decision rules live in [`decision`] as pure functions.

pub mod cycle;
pub mod decision;
pub mod phase;

pub use cycle::{ControlLoop, CycleReport};
pub use phase::Phase;
