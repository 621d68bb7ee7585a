//! Modbus I/O controller library.
//!
//! Mirrors a controller's physical I/O (relays, inputs, variables, a
//! heartbeat) into Modbus register banks and drives every output into a
//! safe state when the client or the network goes away.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod devices;
pub mod error;
pub mod pins;
pub mod safety;
pub mod sync;

pub mod adapters;
pub mod drivers;
