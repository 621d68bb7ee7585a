//! Unified error types for the Modbus I/O controller.
//!
//! Only startup wiring is fallible: building the register map, adding
//! items to the orchestrator and validating configuration.  Once the
//! cycle loop runs, devices and the synchroniser absorb every fault as
//! a no-op or a sentinel value, so nothing here is produced per cycle.
//! All variants are `Copy` so they can be returned from `const`-sized
//! setup paths without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible setup operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The register address space cannot hold the device map.
    Map(MapError),
    /// The orchestrator's fixed-capacity item table is full.
    CapacityExceeded(usize),
    /// A backend could not bind a pin.
    Pin(PinError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Map(e) => write!(f, "register map: {e}"),
            Self::CapacityExceeded(cap) => write!(f, "device map full ({cap} items)"),
            Self::Pin(e) => write!(f, "pin: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Register map errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// Two register ranges share addresses.
    Overlap,
    /// A range runs past address 0xFFFF.
    OutOfRange,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overlap => write!(f, "register ranges overlap"),
            Self::OutOfRange => write!(f, "register range exceeds 16-bit address space"),
        }
    }
}

impl From<MapError> for Error {
    fn from(e: MapError) -> Self {
        Self::Map(e)
    }
}

// ---------------------------------------------------------------------------
// Pin binding errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// The pin number is already bound to a driver.
    AlreadyBound(u8),
    /// The backend's pin table is full.
    TableFull,
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyBound(pin) => write!(f, "pin {pin} already bound"),
            Self::TableFull => write!(f, "pin table full"),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::Pin(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
