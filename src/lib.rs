//! Irrigation controller firmware library.
//!
//! Exposes the control core, the HTTP API router and the board adapters
//! for the firmware binary and for host-side integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod api;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod pins;
pub mod state;

pub mod adapters;
pub mod drivers;
pub mod sensors;
