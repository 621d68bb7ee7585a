//! The orchestrator: owns the device map and drives the cycle.
//!
//! [`Orchestrator`] holds every [`RegisterItem`] in insertion order (which is
//! also address order), the pin backend and clock the devices share, and
//! the single global safe-state flag.
//!
//! ```text
//!  link supervisor ──┐                         ┌──▶ item 0: update → pull → push
//!  heartbeat signal ─┴▶ enter/exit_safe_state  ├──▶ item 1: update → pull → push
//!                       (idempotent, all items)└──▶ ...
//! ```
//!
//! Safe-state transitions are idempotent: requesting the state the system
//! is already in does nothing, and every real edge reaches every item
//! exactly once.  The link supervisor calls the public methods directly;
//! devices such as the heartbeat raise requests through a
//! [`SafeStateSignal`] which is drained right after each device update.

use heapless::Vec;
use log::{debug, info, warn};

use crate::app::ports::{Clock, PinBackend, RegisterTransport};
use crate::devices::heartbeat::{SafeStateRequest, SafeStateSignal};
use crate::devices::{Device, DeviceContext};
use crate::error::{Error, Result};
use crate::sync::item::RegisterItem;
use crate::sync::map::RegisterMap;

/// Upper bound on mapped devices.
pub const MAX_ITEMS: usize = 64;

pub struct Orchestrator<B: PinBackend, C: Clock> {
    items: Vec<RegisterItem, MAX_ITEMS>,
    backend: B,
    clock: C,
    map: RegisterMap,
    safe_state: bool,
    signal: SafeStateSignal,
    started: bool,
}

impl<B: PinBackend, C: Clock> Orchestrator<B, C> {
    pub fn new(backend: B, clock: C, map: RegisterMap) -> Self {
        Self {
            items: Vec::new(),
            backend,
            clock,
            map,
            safe_state: false,
            signal: SafeStateSignal::new(),
            started: false,
        }
    }

    /// Append a device.  Returns the base address it will be assigned.
    pub fn add(&mut self, device: Box<dyn Device>) -> Result<u16> {
        if self.started {
            return Err(Error::Config("device map is fixed once started"));
        }
        let base = self.items.len() as u16;
        self.items
            .push(RegisterItem::new(device))
            .map_err(|_| Error::CapacityExceeded(MAX_ITEMS))?;
        Ok(base)
    }

    /// Handle through which devices request global safe-state transitions.
    pub fn safe_state_signal(&self) -> SafeStateSignal {
        self.signal.clone()
    }

    /// Configure and zero the register banks, assign addresses in insertion
    /// order and run every device's setup once.
    pub fn start(&mut self, transport: &mut dyn RegisterTransport) -> Result<()> {
        if self.started {
            return Err(Error::Config("orchestrator already started"));
        }
        let count = self.items.len() as u16;
        self.map.validate(count)?;
        transport.configure(&self.map, count);

        let now_ms = self.clock.now_ms();
        let mut ctx = DeviceContext::new(&mut self.backend, now_ms);
        for (base, item) in self.items.iter_mut().enumerate() {
            item.setup(base as u16, self.map, &mut ctx);
        }
        self.started = true;
        info!("orchestrator started with {} items", count);
        Ok(())
    }

    /// Re-zero the register banks after the transport was restarted and
    /// re-export every device on the next cycle.
    pub fn restart_transport(&mut self, transport: &mut dyn RegisterTransport) {
        transport.configure(&self.map, self.items.len() as u16);
        for item in &mut self.items {
            item.reset_cache();
        }
        info!("register banks reset");
    }

    /// Run one cycle: for each item in order, update → pull → push.
    /// Does nothing until [`start`](Self::start) has run.
    pub fn update(&mut self, transport: &mut dyn RegisterTransport) {
        if !self.started {
            warn!("update before start ignored");
            return;
        }
        let now_ms = self.clock.now_ms();
        for idx in 0..self.items.len() {
            {
                let mut ctx = DeviceContext::new(&mut self.backend, now_ms);
                self.items[idx].update_device(&mut ctx);
            }
            self.apply_pending(now_ms);

            let mut ctx = DeviceContext::new(&mut self.backend, now_ms);
            let item = &mut self.items[idx];
            if item.kind().is_writable() {
                item.pull(transport, &mut ctx);
            }
            item.push(transport);
        }
    }

    /// Put every device into its safe state.  No-op if already there.
    pub fn enter_safe_state(&mut self) {
        let now_ms = self.clock.now_ms();
        self.enter_at(now_ms);
    }

    /// Release every device from its safe state.  No-op if not in it.
    pub fn exit_safe_state(&mut self) {
        let now_ms = self.clock.now_ms();
        self.exit_at(now_ms);
    }

    pub fn in_safe_state(&self) -> bool {
        self.safe_state
    }

    fn apply_pending(&mut self, now_ms: u64) {
        match self.signal.take() {
            Some(SafeStateRequest::Enter) => self.enter_at(now_ms),
            Some(SafeStateRequest::Exit) => self.exit_at(now_ms),
            None => {}
        }
    }

    fn enter_at(&mut self, now_ms: u64) {
        if self.safe_state {
            debug!("safe state already active");
            return;
        }
        self.safe_state = true;
        info!("entering safe state");
        let mut ctx = DeviceContext::new(&mut self.backend, now_ms);
        for item in &mut self.items {
            item.enter_safe_state(&mut ctx);
        }
    }

    fn exit_at(&mut self, now_ms: u64) {
        if !self.safe_state {
            return;
        }
        self.safe_state = false;
        info!("leaving safe state");
        let mut ctx = DeviceContext::new(&mut self.backend, now_ms);
        for item in &mut self.items {
            item.exit_safe_state(&mut ctx);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[RegisterItem] {
        &self.items
    }

    pub fn map(&self) -> &RegisterMap {
        &self.map
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
