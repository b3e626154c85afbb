//! Application core: pure domain logic, zero I/O.
//!
//! The operator-facing request service, the commands and events it
//! exchanges, and the **port traits** ([`ports`]) through which the
//! control core reaches hardware.  Everything here runs on the host
//! against mock adapters.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
