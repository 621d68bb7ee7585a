//! Relay output driver.
//!
//! A relay is a coil-mapped digital output with an optional indicator LED
//! that mirrors its state.  Two flavours:
//!
//! - **Stable**: plain on/off, never switches itself.
//! - **Timed**: switches itself off once it has been on longer than its
//!   maximum on-time.  The limit is exported through the coil's extended
//!   holding register in whole seconds and can be rewritten by the client.
//!
//! ## Safety contract
//!
//! The auto-off check runs inside `update()` on every cycle and does not
//! depend on register traffic, so a hung or malicious client cannot keep a
//! timed relay energised past its limit.  Safe-state entry and exit apply
//! the configured [`SafeAction`]s; client writes during safe state are still
//! effected (the device's own policy decides the final value, not the
//! synchroniser).

use log::{debug, info};

use super::{Device, DeviceContext, INVALID_VALUE, RegisterKind, SafeAction};
use crate::app::ports::PinMode;

/// Auto-off behaviour of a relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnTimer {
    Stable,
    Timed { max_on_ms: u64 },
}

pub struct Relay {
    pin: u8,
    indicator: Option<u8>,
    timer: OnTimer,
    on_enter: SafeAction,
    on_leave: SafeAction,

    state: bool,
    /// Cycle time of the last switch-on.
    on_since_ms: u64,
    in_safe_state: bool,
    state_before_safe_state: bool,
}

impl Relay {
    /// Relay without auto-off.
    pub fn stable(pin: u8) -> Self {
        Self::with_timer(pin, OnTimer::Stable)
    }

    /// Relay that switches itself off after `max_on_ms`.
    pub fn timed(pin: u8, max_on_ms: u64) -> Self {
        Self::with_timer(pin, OnTimer::Timed { max_on_ms })
    }

    fn with_timer(pin: u8, timer: OnTimer) -> Self {
        Self {
            pin,
            indicator: None,
            timer,
            on_enter: SafeAction::Ignore,
            on_leave: SafeAction::Ignore,
            state: false,
            on_since_ms: 0,
            in_safe_state: false,
            state_before_safe_state: false,
        }
    }

    /// Mirror the relay state on an indicator LED.
    #[must_use]
    pub fn with_indicator(mut self, pin: u8) -> Self {
        self.indicator = Some(pin);
        self
    }

    /// Actions applied on safe-state entry and exit.
    #[must_use]
    pub fn with_safe_state(mut self, on_enter: SafeAction, on_leave: SafeAction) -> Self {
        self.on_enter = on_enter;
        self.on_leave = on_leave;
        self
    }

    pub fn on(&mut self, ctx: &mut DeviceContext<'_>) {
        self.drive(true, ctx);
        self.on_since_ms = ctx.now_ms;
        debug!("relay pin {}: on", self.pin);
    }

    pub fn off(&mut self, ctx: &mut DeviceContext<'_>) {
        self.drive(false, ctx);
        self.on_since_ms = 0;
        debug!("relay pin {}: off", self.pin);
    }

    fn drive(&mut self, high: bool, ctx: &mut DeviceContext<'_>) {
        ctx.pins.write_digital(self.pin, high);
        if let Some(led) = self.indicator {
            ctx.pins.write_digital(led, high);
        }
        self.state = high;
        ctx.pins.flush_outputs();
    }

    fn apply(&mut self, action: SafeAction, ctx: &mut DeviceContext<'_>) {
        match action {
            SafeAction::SwitchOn => self.on(ctx),
            SafeAction::SwitchOff => self.off(ctx),
            SafeAction::Restore => {
                if self.state_before_safe_state {
                    self.on(ctx);
                } else {
                    self.off(ctx);
                }
            }
            SafeAction::Ignore => {}
        }
    }

    pub fn is_on(&self) -> bool {
        self.state
    }

    pub fn in_safe_state(&self) -> bool {
        self.in_safe_state
    }

    pub fn timer(&self) -> OnTimer {
        self.timer
    }
}

impl Device for Relay {
    fn kind(&self) -> RegisterKind {
        RegisterKind::Coil
    }

    fn setup(&mut self, ctx: &mut DeviceContext<'_>) {
        ctx.pins.configure_pin(self.pin, PinMode::Output);
        ctx.pins.write_digital(self.pin, false);
        if let Some(led) = self.indicator {
            ctx.pins.configure_pin(led, PinMode::Output);
            ctx.pins.write_digital(led, false);
        }
        ctx.pins.flush_outputs();
    }

    fn update(&mut self, ctx: &mut DeviceContext<'_>) {
        if let OnTimer::Timed { max_on_ms } = self.timer {
            if self.state && ctx.now_ms.saturating_sub(self.on_since_ms) > max_on_ms {
                info!("relay pin {}: auto-off after {} ms", self.pin, max_on_ms);
                self.off(ctx);
            }
        }
        ctx.pins.flush_outputs();
    }

    fn enter_safe_state(&mut self, ctx: &mut DeviceContext<'_>) {
        if self.in_safe_state || self.on_enter == SafeAction::Ignore {
            return;
        }
        debug!(
            "relay pin {}: entering safe state ({:?}), saving {}",
            self.pin, self.on_enter, self.state
        );

        self.in_safe_state = true;
        self.state_before_safe_state = self.state;

        // Restore has nothing to restore yet.
        if self.on_enter != SafeAction::Restore {
            self.apply(self.on_enter, ctx);
        }
    }

    fn leave_safe_state(&mut self, ctx: &mut DeviceContext<'_>) {
        if !self.in_safe_state {
            return;
        }
        self.in_safe_state = false;
        debug!(
            "relay pin {}: leaving safe state ({:?}), saved {}",
            self.pin, self.on_leave, self.state_before_safe_state
        );
        self.apply(self.on_leave, ctx);
    }

    fn bit(&self) -> bool {
        self.state
    }

    fn set_bit(&mut self, value: bool, ctx: &mut DeviceContext<'_>) {
        if value {
            self.on(ctx);
        } else {
            self.off(ctx);
        }
    }

    fn word(&self) -> u16 {
        match self.timer {
            OnTimer::Timed { max_on_ms } => (max_on_ms / 1000).min(u64::from(u16::MAX)) as u16,
            OnTimer::Stable => INVALID_VALUE,
        }
    }

    fn set_word(&mut self, value: u16, _ctx: &mut DeviceContext<'_>) {
        if let OnTimer::Timed { max_on_ms } = &mut self.timer {
            *max_on_ms = u64::from(value) * 1000;
            debug!("relay pin {}: max on-time {} s", self.pin, value);
        }
    }
}
