//! One device bound to its registers.
//!
//! A [`RegisterItem`] owns a device and mirrors it into the transport's
//! register banks.  Traffic is edge-triggered: the item caches the last
//! value it saw for each register and only touches the transport when the
//! device or the client changed something.
//!
//! Per cycle the order is fixed:
//!
//! 1. `update_device()`: device-internal logic (sampling, auto-off, heartbeat)
//! 2. `pull()`: client writes → device (coils and holding registers only)
//! 3. `push()`: device → registers (every kind)
//!
//! so a client write made between two cycles reaches the device before the
//! device's resulting state is reported back.
//!
//! Writes during safe state are not filtered here.  A client write is
//! accepted into the cache and forwarded; whatever the device then does
//! with it is what gets pushed.

use log::debug;

use crate::app::ports::RegisterTransport;
use crate::devices::{Device, DeviceContext, RegisterKind};
use crate::sync::map::RegisterMap;

pub struct RegisterItem {
    device: Box<dyn Device>,
    base: u16,
    map: RegisterMap,
    /// Last bit or word seen for the primary register.
    last: u16,
    /// Last word seen for a coil's extended holding register.
    last_extended: u16,
}

impl RegisterItem {
    pub fn new(device: Box<dyn Device>) -> Self {
        Self {
            device,
            base: 0,
            map: RegisterMap::default(),
            last: 0,
            last_extended: 0,
        }
    }

    /// Assign the base address and run the device's one-time setup.
    pub fn setup(&mut self, base: u16, map: RegisterMap, ctx: &mut DeviceContext<'_>) {
        self.base = base;
        self.map = map;
        self.device.setup(ctx);
    }

    pub fn update_device(&mut self, ctx: &mut DeviceContext<'_>) {
        self.device.update(ctx);
    }

    pub fn enter_safe_state(&mut self, ctx: &mut DeviceContext<'_>) {
        self.device.enter_safe_state(ctx);
    }

    pub fn exit_safe_state(&mut self, ctx: &mut DeviceContext<'_>) {
        self.device.leave_safe_state(ctx);
    }

    /// Client → device.
    pub fn pull(&mut self, transport: &dyn RegisterTransport, ctx: &mut DeviceContext<'_>) {
        match self.device.kind() {
            RegisterKind::Coil => {
                let addr = self.map.coil(self.base);
                let bit = transport.read_bit(addr);
                if bit != (self.last != 0) {
                    debug!("coil {} <- client: {}", addr, bit);
                    self.device.set_bit(bit, ctx);
                    self.last = u16::from(bit);
                }

                let addr = self.map.holding(self.base);
                let word = transport.read_word(addr);
                if word != self.last_extended {
                    debug!("holding {} <- client: {}", addr, word);
                    self.device.set_word(word, ctx);
                    self.last_extended = word;
                }
            }
            RegisterKind::HoldingRegister => {
                let addr = self.map.holding(self.base);
                let word = transport.read_word(addr);
                if word != self.last {
                    debug!("holding {} <- client: {}", addr, word);
                    self.device.set_word(word, ctx);
                    self.last = word;
                }
            }
            RegisterKind::DiscreteInput | RegisterKind::InputRegister | RegisterKind::Undefined => {}
        }
    }

    /// Device → registers.
    pub fn push(&mut self, transport: &mut dyn RegisterTransport) {
        match self.device.kind() {
            RegisterKind::Coil => {
                let bit = self.device.bit();
                self.push_bit(transport, self.map.coil(self.base), bit);

                let word = self.device.word();
                if word != self.last_extended {
                    let addr = self.map.holding(self.base);
                    debug!("holding {} -> client: {}", addr, word);
                    transport.write_word(addr, word);
                    self.last_extended = word;
                }
            }
            RegisterKind::DiscreteInput => {
                let bit = self.device.bit();
                self.push_bit(transport, self.map.discrete(self.base), bit);
            }
            RegisterKind::HoldingRegister => {
                let word = self.device.word();
                self.push_word(transport, self.map.holding(self.base), word);
            }
            RegisterKind::InputRegister => {
                let word = self.device.input_word();
                self.push_word(transport, self.map.input(self.base), word);
            }
            RegisterKind::Undefined => {}
        }
    }

    /// Full cycle for this item: update, pull, push.
    pub fn sync(&mut self, transport: &mut dyn RegisterTransport, ctx: &mut DeviceContext<'_>) {
        self.update_device(ctx);
        self.pull(transport, ctx);
        self.push(transport);
    }

    /// Forget cached values after the transport zeroed its banks.
    pub fn reset_cache(&mut self) {
        self.last = 0;
        self.last_extended = 0;
    }

    fn push_bit(&mut self, transport: &mut dyn RegisterTransport, addr: u16, bit: bool) {
        if bit != (self.last != 0) {
            debug!("bit {} -> client: {}", addr, bit);
            transport.write_bit(addr, bit);
            self.last = u16::from(bit);
        }
    }

    fn push_word(&mut self, transport: &mut dyn RegisterTransport, addr: u16, word: u16) {
        if word != self.last {
            debug!("word {} -> client: {}", addr, word);
            transport.write_word(addr, word);
            self.last = word;
        }
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn kind(&self) -> RegisterKind {
        self.device.kind()
    }

    pub fn device(&self) -> &dyn Device {
        self.device.as_ref()
    }
}
