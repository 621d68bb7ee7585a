//! `embedded-hal` pin backend.
//!
//! Binds controller pin numbers to any HAL pin driver implementing both
//! [`OutputPin`] and [`InputPin`] (e.g. an input/output `PinDriver` or an
//! expansion-module pin).  The electrical mode is fixed by the driver type,
//! so `configure_pin` only records the request.  `embedded-hal` 1.0 has no
//! ADC trait; analog reads go through an optional bound reader.
//!
//! HAL errors never reach the devices: a failed write is logged and a
//! failed read reads low.

use embedded_hal::digital::{Error as _, InputPin, OutputPin};
use heapless::Vec;
use log::warn;

use crate::app::ports::{PinBackend, PinMode};
use crate::error::{self, PinError};

/// Pins a [`HalBackend`] can hold.
pub const MAX_HAL_PINS: usize = 32;

pub type AnalogReader = Box<dyn FnMut(u8) -> u16>;

pub struct HalBackend<P> {
    pins: Vec<(u8, P), MAX_HAL_PINS>,
    analog: Option<AnalogReader>,
}

impl<P: OutputPin + InputPin> Default for HalBackend<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin + InputPin> HalBackend<P> {
    pub fn new() -> Self {
        Self {
            pins: Vec::new(),
            analog: None,
        }
    }

    /// Route analog reads to `reader` (pin number → raw counts).
    #[must_use]
    pub fn with_analog(mut self, reader: impl FnMut(u8) -> u16 + 'static) -> Self {
        self.analog = Some(Box::new(reader));
        self
    }

    /// Attach a driver to a controller pin number.
    pub fn bind(&mut self, pin: u8, driver: P) -> error::Result<()> {
        if self.pins.iter().any(|(n, _)| *n == pin) {
            return Err(PinError::AlreadyBound(pin).into());
        }
        self.pins
            .push((pin, driver))
            .map_err(|_| PinError::TableFull)?;
        Ok(())
    }

    fn driver(&mut self, pin: u8) -> Option<&mut P> {
        self.pins
            .iter_mut()
            .find(|(n, _)| *n == pin)
            .map(|(_, driver)| driver)
    }
}

impl<P: OutputPin + InputPin> PinBackend for HalBackend<P> {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) {
        if self.driver(pin).is_none() {
            warn!("hal: pin {} ({:?}) has no driver bound", pin, mode);
        }
    }

    fn write_digital(&mut self, pin: u8, high: bool) {
        let Some(driver) = self.driver(pin) else {
            return;
        };
        let result = if high {
            driver.set_high()
        } else {
            driver.set_low()
        };
        if let Err(e) = result {
            warn!("hal: write to pin {} failed: {:?}", pin, e.kind());
        }
    }

    fn read_digital(&mut self, pin: u8) -> bool {
        let Some(driver) = self.driver(pin) else {
            return false;
        };
        driver.is_high().unwrap_or_else(|e| {
            warn!("hal: read of pin {} failed: {:?}", pin, e.kind());
            false
        })
    }

    fn read_analog(&mut self, pin: u8) -> u16 {
        self.analog.as_mut().map_or(0, |read| read(pin))
    }

    // HAL drivers write through.
    fn flush_outputs(&mut self) {}
}
