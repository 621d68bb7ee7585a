//! Default device map for the controller's local I/O.
//!
//! | Base    | Device                         | Registers               |
//! |---------|--------------------------------|-------------------------|
//! | 0 – 3   | timed relays with indicator LED | coil + on-time holding |
//! | 4 – 7   | digital inputs (pull-up)       | discrete input          |
//! | 8 – 11  | analog inputs                  | input register          |
//! | 12      | relay default on-time (s)      | holding register        |
//! | 13      | heartbeat                      | holding register        |
//!
//! Relays switch off on safe-state entry and return to their saved state
//! when it is left.

use std::cell::Cell;
use std::rc::Rc;

use log::{info, warn};

use crate::app::ports::{Clock, PinBackend};
use crate::config::ControllerConfig;
use crate::devices::heartbeat::Heartbeat;
use crate::devices::input::{AnalogInput, DigitalInput};
use crate::devices::relay::Relay;
use crate::devices::variable::Variable;
use crate::devices::SafeAction;
use crate::error::Result;
use crate::pins;
use crate::sync::orchestrator::Orchestrator;

/// Items the default map registers.
pub const DEVICE_COUNT: u16 = 14;

/// Base address of the heartbeat register.
pub const HEARTBEAT_BASE: u16 = 13;

/// Base address of the relay default on-time variable.
pub const RELAY_DEFAULT_BASE: u16 = 12;

/// Build the orchestrator for the local I/O.  The orchestrator is not
/// started; the caller starts it against its transport.
pub fn build_device_map<B: PinBackend, C: Clock>(
    config: &ControllerConfig,
    backend: B,
    clock: C,
) -> Result<Orchestrator<B, C>> {
    config.validate(DEVICE_COUNT)?;

    let mut orch = Orchestrator::new(backend, clock, config.register_map);

    for (&pin, &led) in pins::RELAY_PINS.iter().zip(&pins::RELAY_LED_PINS) {
        orch.add(Box::new(
            Relay::timed(pin, config.relay_max_on_ms)
                .with_indicator(led)
                .with_safe_state(SafeAction::SwitchOff, SafeAction::Restore),
        ))?;
    }

    for &pin in &pins::DIGITAL_INPUT_PINS {
        orch.add(Box::new(DigitalInput::new(pin).with_pull_up()))?;
    }

    for &pin in &pins::ANALOG_INPUT_PINS {
        orch.add(Box::new(AnalogInput::new(pin)))?;
    }

    // validate() bounds the on-time to the register width.
    let default_on_s = Rc::new(Cell::new((config.relay_max_on_ms / 1000) as u16));
    let getter = Rc::clone(&default_on_s);
    orch.add(Box::new(Variable::read_write(
        move || getter.get(),
        move |seconds: u16| {
            info!("relay default on-time set to {} s", seconds);
            default_on_s.set(seconds);
        },
    )))?;

    let mut heartbeat = Heartbeat::new(config.heartbeat_timeout_ms).with_callback(|alive| {
        if alive {
            info!("heartbeat: client is back");
        } else {
            warn!("heartbeat: lost");
        }
    });
    heartbeat.attach(orch.safe_state_signal());
    orch.add(Box::new(heartbeat))?;

    Ok(orch)
}
