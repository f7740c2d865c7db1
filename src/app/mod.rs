//! Application core: pure domain logic, zero I/O.
//!
//! The Second Ticker shim and the once-per-second sampling loop live
//! here.  All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer testable without a board.

pub mod events;
pub mod ports;
pub mod service;
