//! Pin backends without real hardware.
//!
//! - [`NullBackend`]: safe default: writes vanish, reads are low / 0.
//! - [`SimBackend`]: in-memory pin table that records every write, used
//!   for host simulation and tests.  Input levels and analog values are
//!   injected with [`SimBackend::set_level`] / [`SimBackend::set_analog`].

use std::collections::HashMap;

use crate::app::ports::{PinBackend, PinMode};

/// Backend with nothing attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl PinBackend for NullBackend {
    fn configure_pin(&mut self, _pin: u8, _mode: PinMode) {}

    fn write_digital(&mut self, _pin: u8, _high: bool) {}

    fn read_digital(&mut self, _pin: u8) -> bool {
        false
    }

    fn flush_outputs(&mut self) {}
}

/// Recording in-memory backend.
#[derive(Debug, Default)]
pub struct SimBackend {
    modes: HashMap<u8, PinMode>,
    levels: HashMap<u8, bool>,
    analog: HashMap<u8, u16>,
    writes: Vec<(u8, bool)>,
    digital_reads: usize,
    flushes: usize,
}

impl SimBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive an input pin from outside.
    pub fn set_level(&mut self, pin: u8, high: bool) {
        self.levels.insert(pin, high);
    }

    pub fn set_analog(&mut self, pin: u8, raw: u16) {
        self.analog.insert(pin, raw);
    }

    pub fn mode(&self, pin: u8) -> Option<PinMode> {
        self.modes.get(&pin).copied()
    }

    /// Current level of a pin (last written or injected).
    pub fn level(&self, pin: u8) -> bool {
        self.levels.get(&pin).copied().unwrap_or(false)
    }

    /// Every digital write in order.
    pub fn writes(&self) -> &[(u8, bool)] {
        &self.writes
    }

    pub fn digital_reads(&self) -> usize {
        self.digital_reads
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl PinBackend for SimBackend {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) {
        self.modes.insert(pin, mode);
    }

    fn write_digital(&mut self, pin: u8, high: bool) {
        self.levels.insert(pin, high);
        self.writes.push((pin, high));
    }

    fn read_digital(&mut self, pin: u8) -> bool {
        self.digital_reads += 1;
        self.level(pin)
    }

    fn read_analog(&mut self, pin: u8) -> u16 {
        self.analog.get(&pin).copied().unwrap_or(0)
    }

    fn flush_outputs(&mut self) {
        self.flushes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_backend_reads_low() {
        let mut pins = NullBackend;
        pins.write_digital(1, true);
        assert!(!pins.read_digital(1));
        assert_eq!(pins.read_analog(1), 0);
    }

    #[test]
    fn sim_backend_records_writes_in_order() {
        let mut pins = SimBackend::new();
        pins.write_digital(1, true);
        pins.write_digital(2, false);
        pins.write_digital(1, false);
        assert_eq!(pins.writes(), &[(1, true), (2, false), (1, false)]);
        assert!(!pins.level(1));
    }
}
