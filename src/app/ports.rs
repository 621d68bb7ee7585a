//! Port traits: the boundary between the synchronisation core and the
//! collaborators it consumes.
//!
//! ```text
//!   PinBackend ◀── devices ── RegisterItem ──▶ RegisterTransport
//!                               ▲
//!   LinkPort ──▶ LinkSupervisor ┘ (safe-state enter/exit)
//! ```
//!
//! Adapters (GPIO, expansion modules, the Modbus server's register banks,
//! the Ethernet stack) implement these traits.  The core consumes them
//! through `&mut dyn` context or generics and never touches hardware
//! directly.
//!
//! None of these calls may block: every method must return within a short,
//! bounded time because the whole object graph runs on a single
//! run-to-completion cycle.

use crate::sync::map::RegisterMap;

// ───────────────────────────────────────────────────────────────
// Pin backend (devices → physical I/O)
// ───────────────────────────────────────────────────────────────

/// Electrical mode of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    InputPullUp,
    Output,
}

/// Bit/analog I/O backend: local MCU pins, an expansion module, or nothing.
///
/// Backends absorb their own faults.  A failed read reads as `false` / 0
/// and a failed write is logged and dropped.
pub trait PinBackend {
    fn configure_pin(&mut self, pin: u8, mode: PinMode);

    fn write_digital(&mut self, pin: u8, high: bool);

    fn read_digital(&mut self, pin: u8) -> bool;

    /// Backends without analog inputs read 0.
    fn read_analog(&mut self, _pin: u8) -> u16 {
        0
    }

    /// Push buffered output changes to the hardware.  Backends that write
    /// through immediately treat this as a no-op.
    fn flush_outputs(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Register transport (synchroniser ↔ Modbus server banks)
// ───────────────────────────────────────────────────────────────

/// The register banks served to the remote Modbus client.
///
/// All four register kinds share one linear address space; the
/// [`RegisterMap`] keeps their ranges apart.  Coils and discrete inputs
/// are bits, holding and input registers are words.
pub trait RegisterTransport {
    /// Allocate `count` registers in every range of `map` and zero them.
    fn configure(&mut self, map: &RegisterMap, count: u16);

    fn read_bit(&self, addr: u16) -> bool;

    fn write_bit(&mut self, addr: u16, value: bool);

    fn read_word(&self, addr: u16) -> u16;

    fn write_word(&mut self, addr: u16, value: u16);
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

/// Monotonically increasing millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Link port (network stack → link supervisor)
// ───────────────────────────────────────────────────────────────

/// Outcome of a periodic DHCP lease maintenance call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseStatus {
    /// Nothing happened.
    Unchanged,
    RenewFailed,
    Renewed,
    /// Rebinding failed; the address must be reacquired.
    RebindFailed,
    Rebound,
}

/// Physical link and address management, owned by the network stack.
pub trait LinkPort {
    /// True while the cable/PHY reports link.
    fn is_link_up(&mut self) -> bool;

    /// Keep the address lease alive.
    fn maintain(&mut self) -> LeaseStatus;

    /// Reacquire an address.  Returns `false` if only the fallback static
    /// address could be applied.
    fn reacquire(&mut self) -> bool;
}
