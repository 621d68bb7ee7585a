//! Local MCU pin backend.
//!
//! Drives the controller's own GPIO and ADC through [`drivers::gpio`];
//! on host builds that module is a simulated pin table.  Local pins write
//! through immediately, so `flush_outputs` has nothing to do.
//!
//! [`drivers::gpio`]: crate::drivers::gpio

use heapless::Vec;
use log::{debug, warn};

use crate::app::ports::{PinBackend, PinMode};
use crate::drivers::gpio;

/// ADC channels that can be configured lazily.
const MAX_ADC_CHANNELS: usize = 10;

pub struct LocalPinBackend {
    adc_channels: Vec<u8, MAX_ADC_CHANNELS>,
    adc_ready: bool,
}

impl Default for LocalPinBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalPinBackend {
    pub fn new() -> Self {
        let adc_ready = match gpio::init_adc() {
            Ok(()) => true,
            Err(e) => {
                warn!("local pins: {}, analog inputs read 0", e);
                false
            }
        };
        Self {
            adc_channels: Vec::new(),
            adc_ready,
        }
    }

    fn ensure_adc_channel(&mut self, channel: u8) -> bool {
        if !self.adc_ready {
            return false;
        }
        if self.adc_channels.contains(&channel) {
            return true;
        }
        if let Err(e) = gpio::configure_adc_channel(channel) {
            warn!("local pins: ADC channel {}: {}", channel, e);
            return false;
        }
        if self.adc_channels.push(channel).is_err() {
            debug!("local pins: ADC table full, channel {} reconfigured per read", channel);
        }
        true
    }
}

impl PinBackend for LocalPinBackend {
    fn configure_pin(&mut self, pin: u8, mode: PinMode) {
        if let Err(e) = gpio::configure(pin, mode) {
            warn!("local pins: pin {}: {}", pin, e);
        }
    }

    fn write_digital(&mut self, pin: u8, high: bool) {
        gpio::write(pin, high);
    }

    fn read_digital(&mut self, pin: u8) -> bool {
        gpio::read(pin)
    }

    fn read_analog(&mut self, pin: u8) -> u16 {
        if self.ensure_adc_channel(pin) {
            gpio::adc_read(pin)
        } else {
            0
        }
    }

    fn flush_outputs(&mut self) {}
}
