//! Link supervisor.
//!
//! The supervisor runs **every cycle after the orchestrator** but only
//! checks the network link once per `interval_ms`.  Losing the link puts
//! every device into its safe state; getting it back releases them.
//!
//! ## Link lifecycle
//!
//! 1. Link down: green LED off, red LED toggles on every check, the
//!    orchestrator enters safe state.  The outage is latched.
//! 2. Link up with a healthy lease: green on, red off.  If an outage was
//!    latched, the orchestrator leaves safe state.
//! 3. Link up but the lease could not be rebound: the address is
//!    reacquired.  If only the fallback address could be applied the red
//!    LED stays on.  Otherwise, after an outage, the register banks are
//!    re-zeroed and safe state is left.
//!
//! Safe state requested by the heartbeat is independent; the orchestrator
//! flag is shared, so whichever side recovers first releases the devices.

use log::{info, warn};

use crate::app::ports::{Clock, LeaseStatus, LinkPort, PinBackend, RegisterTransport};
use crate::sync::orchestrator::Orchestrator;

/// What the last check saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkHealth {
    Up,
    Down,
    /// Link up, running on the fallback static address.
    Fallback,
}

pub struct LinkSupervisor {
    interval_ms: u64,
    next_check_ms: u64,
    /// Latched until the link is confirmed healthy again.
    link_was_down: bool,
    blink: bool,
    green_pin: u8,
    red_pin: u8,
}

impl LinkSupervisor {
    pub fn new(interval_ms: u64, green_pin: u8, red_pin: u8) -> Self {
        Self {
            interval_ms,
            next_check_ms: 0,
            link_was_down: false,
            blink: false,
            green_pin,
            red_pin,
        }
    }

    /// Check the link if the interval has elapsed.  Returns `None` when no
    /// check was due.
    pub fn poll<B: PinBackend, C: Clock>(
        &mut self,
        link: &mut dyn LinkPort,
        orch: &mut Orchestrator<B, C>,
        transport: &mut dyn RegisterTransport,
    ) -> Option<LinkHealth> {
        let now_ms = orch.clock().now_ms();
        if now_ms < self.next_check_ms {
            return None;
        }
        self.next_check_ms = now_ms.saturating_add(self.interval_ms);
        Some(self.check(link, orch, transport))
    }

    pub fn link_was_down(&self) -> bool {
        self.link_was_down
    }

    fn check<B: PinBackend, C: Clock>(
        &mut self,
        link: &mut dyn LinkPort,
        orch: &mut Orchestrator<B, C>,
        transport: &mut dyn RegisterTransport,
    ) -> LinkHealth {
        if !link.is_link_up() {
            if !self.link_was_down {
                warn!("link: lost");
            }
            self.link_was_down = true;
            self.blink = !self.blink;
            self.set_leds(orch.backend_mut(), false, self.blink);
            orch.enter_safe_state();
            return LinkHealth::Down;
        }

        match link.maintain() {
            LeaseStatus::RebindFailed => {
                if !link.reacquire() {
                    warn!("link: address reacquire failed, using fallback");
                    self.set_leds(orch.backend_mut(), false, true);
                    return LinkHealth::Fallback;
                }
                if self.link_was_down {
                    info!("link: restored, restarting register server");
                    orch.restart_transport(transport);
                    orch.exit_safe_state();
                    self.link_was_down = false;
                }
                self.set_leds(orch.backend_mut(), true, false);
            }
            _ => {
                self.set_leds(orch.backend_mut(), true, false);
                if self.link_was_down {
                    info!("link: restored");
                    orch.exit_safe_state();
                    self.link_was_down = false;
                }
            }
        }
        LinkHealth::Up
    }

    fn set_leds(&self, pins: &mut dyn PinBackend, green: bool, red: bool) {
        pins.write_digital(self.green_pin, green);
        pins.write_digital(self.red_pin, red);
        pins.flush_outputs();
    }
}
