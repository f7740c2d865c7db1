//! Plant-watering controller firmware library.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod fsm;
pub mod scheduler;
pub mod shared;

mod pins;

// Hardware-facing modules compile on every target; the register-level
// parts are cfg-gated inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
