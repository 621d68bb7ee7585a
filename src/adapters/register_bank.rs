//! In-memory register banks.
//!
//! [`RegisterBank`] is the storage a Modbus server serves to its client:
//! bit and word tables keyed by absolute address.  Only addresses
//! allocated by [`configure`](RegisterTransport::configure) exist; reads
//! elsewhere return `false` / 0 and writes elsewhere are dropped with a
//! warning, mirroring the server's illegal-address handling without
//! surfacing an error into the cycle.
//!
//! The remote client and the synchroniser both write through the same
//! [`RegisterTransport`] methods, so tests and simulations play the client
//! by calling them between cycles.

use std::collections::HashMap;

use log::warn;

use crate::app::ports::RegisterTransport;
use crate::sync::map::RegisterMap;

#[derive(Debug, Default)]
pub struct RegisterBank {
    bits: HashMap<u16, bool>,
    words: HashMap<u16, u16>,
}

impl RegisterBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `addr` was allocated as a bit register.
    pub fn has_bit(&self, addr: u16) -> bool {
        self.bits.contains_key(&addr)
    }

    /// Whether `addr` was allocated as a word register.
    pub fn has_word(&self, addr: u16) -> bool {
        self.words.contains_key(&addr)
    }

    fn allocate(&mut self, map: &RegisterMap, count: u16) {
        for base in 0..count {
            self.bits.insert(map.coil(base), false);
            self.bits.insert(map.discrete(base), false);
            self.words.insert(map.input(base), 0);
            self.words.insert(map.holding(base), 0);
        }
    }
}

impl RegisterTransport for RegisterBank {
    fn configure(&mut self, map: &RegisterMap, count: u16) {
        self.bits.clear();
        self.words.clear();
        self.allocate(map, count);
    }

    fn read_bit(&self, addr: u16) -> bool {
        self.bits.get(&addr).copied().unwrap_or(false)
    }

    fn write_bit(&mut self, addr: u16, value: bool) {
        match self.bits.get_mut(&addr) {
            Some(bit) => *bit = value,
            None => warn!("register bank: bit write to unmapped address {}", addr),
        }
    }

    fn read_word(&self, addr: u16) -> u16 {
        self.words.get(&addr).copied().unwrap_or(0)
    }

    fn write_word(&mut self, addr: u16, value: u16) {
        match self.words.get_mut(&addr) {
            Some(word) => *word = value,
            None => warn!("register bank: word write to unmapped address {}", addr),
        }
    }
}
