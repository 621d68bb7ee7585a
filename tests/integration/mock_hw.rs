//! Mock collaborators for integration tests.
//!
//! [`CountingTransport`] wraps the real register banks and records every
//! write the synchroniser makes, so tests can assert on register traffic.
//! The client side writes through [`CountingTransport::client`], which
//! bypasses the record.

use modbus_io::adapters::backend::SimBackend;
use modbus_io::adapters::register_bank::RegisterBank;
use modbus_io::adapters::time::ManualClock;
use modbus_io::app::ports::{LeaseStatus, LinkPort, RegisterTransport};
use modbus_io::sync::map::RegisterMap;
use modbus_io::sync::orchestrator::Orchestrator;

// ── Register write record ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterWrite {
    Bit { addr: u16, value: bool },
    Word { addr: u16, value: u16 },
}

// ── CountingTransport ─────────────────────────────────────────

#[derive(Default)]
pub struct CountingTransport {
    pub bank: RegisterBank,
    pub writes: Vec<RegisterWrite>,
    pub configures: usize,
}

#[allow(dead_code)]
impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// The remote client's view of the banks.
    pub fn client(&mut self) -> &mut RegisterBank {
        &mut self.bank
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }

    pub fn writes_to(&self, addr: u16) -> usize {
        self.writes
            .iter()
            .filter(|w| match w {
                RegisterWrite::Bit { addr: a, .. } | RegisterWrite::Word { addr: a, .. } => {
                    *a == addr
                }
            })
            .count()
    }
}

impl RegisterTransport for CountingTransport {
    fn configure(&mut self, map: &RegisterMap, count: u16) {
        self.configures += 1;
        self.bank.configure(map, count);
    }

    fn read_bit(&self, addr: u16) -> bool {
        self.bank.read_bit(addr)
    }

    fn write_bit(&mut self, addr: u16, value: bool) {
        self.writes.push(RegisterWrite::Bit { addr, value });
        self.bank.write_bit(addr, value);
    }

    fn read_word(&self, addr: u16) -> u16 {
        self.bank.read_word(addr)
    }

    fn write_word(&mut self, addr: u16, value: u16) {
        self.writes.push(RegisterWrite::Word { addr, value });
        self.bank.write_word(addr, value);
    }
}

// ── ScriptedLink ──────────────────────────────────────────────

pub struct ScriptedLink {
    pub up: bool,
    pub lease: LeaseStatus,
    pub reacquire_ok: bool,
}

impl Default for ScriptedLink {
    fn default() -> Self {
        Self {
            up: true,
            lease: LeaseStatus::Unchanged,
            reacquire_ok: true,
        }
    }
}

impl LinkPort for ScriptedLink {
    fn is_link_up(&mut self) -> bool {
        self.up
    }

    fn maintain(&mut self) -> LeaseStatus {
        self.lease
    }

    fn reacquire(&mut self) -> bool {
        self.reacquire_ok
    }
}

// ── Fixtures ──────────────────────────────────────────────────

pub type TestOrchestrator = Orchestrator<SimBackend, ManualClock>;

#[allow(dead_code)]
pub fn orchestrator() -> (TestOrchestrator, ManualClock) {
    let clock = ManualClock::new();
    let orch = Orchestrator::new(SimBackend::new(), clock.clone(), RegisterMap::default());
    (orch, clock)
}
