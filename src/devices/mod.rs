//! Register-mapped devices and the capability interface they share.
//!
//! A device is anything the controller exposes through one Modbus register
//! kind: a relay output, a digital or analog input, a software variable or
//! the heartbeat.  The synchroniser ([`RegisterItem`]) treats them all
//! uniformly through [`Device`]:
//!
//! | Kind              | Read accessor     | Write accessor |
//! |-------------------|-------------------|----------------|
//! | `Coil`            | `bit()` + `word()`| `set_bit()` + `set_word()` |
//! | `DiscreteInput`   | `bit()`           | -              |
//! | `HoldingRegister` | `word()`          | `set_word()`   |
//! | `InputRegister`   | `input_word()`    | -              |
//!
//! Coils carry an extended holding register alongside the bit (a timed
//! relay exposes its on-time there).
//!
//! Every accessor a device does not own falls back to an explicit default:
//! bit reads are `false`, word reads are [`INVALID_VALUE`] and writes are
//! dropped.  No device operation fails.
//!
//! [`RegisterItem`]: crate::sync::item::RegisterItem

pub mod heartbeat;
pub mod input;
pub mod relay;
pub mod variable;

use crate::app::ports::PinBackend;

/// Word returned by accessors a device does not implement.
///
/// Only distinguishable from a real reading by convention: callers must not
/// treat it as numeric data.
pub const INVALID_VALUE: u16 = 0xFFFF;

/// Modbus register kind a device is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterKind {
    /// No mapping; the synchroniser leaves the device alone.
    #[default]
    Undefined,
    /// Single-bit read/write (plus an extended holding register).
    Coil,
    /// Single-bit read-only.
    DiscreteInput,
    /// 16-bit read/write.
    HoldingRegister,
    /// 16-bit read-only.
    InputRegister,
}

impl RegisterKind {
    /// Kinds the remote client can write, which the synchroniser pulls
    /// before pushing.
    pub fn is_writable(self) -> bool {
        matches!(self, Self::Coil | Self::HoldingRegister)
    }
}

/// Output behaviour applied on safe-state entry or exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafeAction {
    /// Leave the output alone.
    #[default]
    Ignore,
    SwitchOn,
    SwitchOff,
    /// Reapply the value held just before safe state was entered.  Only
    /// meaningful on exit; on entry it records the value without switching.
    Restore,
}

/// Per-call context handed to every device operation.
///
/// Devices share one pin backend and one clock; rather than each holding a
/// reference, the orchestrator lends them for the duration of a call.
pub struct DeviceContext<'a> {
    pub pins: &'a mut dyn PinBackend,
    /// Monotonic time of the current cycle.
    pub now_ms: u64,
}

impl<'a> DeviceContext<'a> {
    pub fn new(pins: &'a mut dyn PinBackend, now_ms: u64) -> Self {
        Self { pins, now_ms }
    }
}

/// Capability interface implemented by every register-mapped device.
///
/// `setup` runs once before the cycle loop; `update` runs once per cycle
/// and must not block.  Safe-state hooks default to no-ops so inputs and
/// purely informational devices need no safe-state logic.
pub trait Device {
    /// Register kind this device is mapped to.
    fn kind(&self) -> RegisterKind;

    fn setup(&mut self, _ctx: &mut DeviceContext<'_>) {}

    fn update(&mut self, _ctx: &mut DeviceContext<'_>) {}

    /// Connectivity lost.
    fn enter_safe_state(&mut self, _ctx: &mut DeviceContext<'_>) {}

    /// Connectivity restored.
    fn leave_safe_state(&mut self, _ctx: &mut DeviceContext<'_>) {}

    /// Coil or discrete-input value.
    fn bit(&self) -> bool {
        false
    }

    fn set_bit(&mut self, _value: bool, _ctx: &mut DeviceContext<'_>) {}

    /// Holding-register value.
    fn word(&self) -> u16 {
        INVALID_VALUE
    }

    /// Input-register value.
    fn input_word(&self) -> u16 {
        INVALID_VALUE
    }

    fn set_word(&mut self, _value: u16, _ctx: &mut DeviceContext<'_>) {}
}
