//! Digital and analog inputs.
//!
//! Each cycle `update()` samples exactly one pin through the backend and
//! stores it; the read accessor returns that sample and never triggers a
//! fresh read.  Inputs are inherently safe and ignore safe-state changes.

use log::trace;

use super::{Device, DeviceContext, RegisterKind};
use crate::app::ports::PinMode;

/// Digital pin exposed as a discrete input.
pub struct DigitalInput {
    pin: u8,
    mode: PinMode,
    state: bool,
}

impl DigitalInput {
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            mode: PinMode::Input,
            state: false,
        }
    }

    /// Enable the internal pull-up (open-contact inputs).
    #[must_use]
    pub fn with_pull_up(mut self) -> Self {
        self.mode = PinMode::InputPullUp;
        self
    }
}

impl Device for DigitalInput {
    fn kind(&self) -> RegisterKind {
        RegisterKind::DiscreteInput
    }

    fn setup(&mut self, ctx: &mut DeviceContext<'_>) {
        ctx.pins.configure_pin(self.pin, self.mode);
    }

    fn update(&mut self, ctx: &mut DeviceContext<'_>) {
        self.state = ctx.pins.read_digital(self.pin);
        trace!("digital input pin {}: {}", self.pin, self.state);
    }

    fn bit(&self) -> bool {
        self.state
    }
}

/// Analog channel exposed as an input register (raw ADC counts).
pub struct AnalogInput {
    pin: u8,
    raw: u16,
}

impl AnalogInput {
    pub fn new(pin: u8) -> Self {
        Self { pin, raw: 0 }
    }
}

impl Device for AnalogInput {
    fn kind(&self) -> RegisterKind {
        RegisterKind::InputRegister
    }

    fn setup(&mut self, ctx: &mut DeviceContext<'_>) {
        ctx.pins.configure_pin(self.pin, PinMode::Input);
    }

    fn update(&mut self, ctx: &mut DeviceContext<'_>) {
        self.raw = ctx.pins.read_analog(self.pin);
        trace!("analog input pin {}: {}", self.pin, self.raw);
    }

    fn input_word(&self) -> u16 {
        self.raw
    }
}
