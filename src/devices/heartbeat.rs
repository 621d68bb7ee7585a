//! Client liveness monitor.
//!
//! The heartbeat is a holding register the remote client must keep
//! rewriting.  Every write the synchroniser forwards counts as a refresh;
//! the value itself is only cached so it can be read back.  When no
//! refresh arrives for `timeout_ms` the heartbeat is lost: the global safe
//! state is requested through the attached [`SafeStateSignal`] and the
//! optional callback is told `false`.  The next refresh restores it.
//!
//! Both transitions are edge-triggered and fire once per change.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};

use super::{Device, DeviceContext, RegisterKind};

/// Global safe-state transition requested by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafeStateRequest {
    Enter,
    Exit,
}

/// Non-owning handle to the orchestrator's safe-state flag.
///
/// Obtained from [`Orchestrator::safe_state_signal`] after construction and
/// handed to devices that may escalate.  Requests are applied by the
/// orchestrator right after the raising device's `update()`; when several
/// arrive before that, the last one wins.
///
/// [`Orchestrator::safe_state_signal`]: crate::sync::orchestrator::Orchestrator::safe_state_signal
#[derive(Debug, Clone, Default)]
pub struct SafeStateSignal(Rc<Cell<Option<SafeStateRequest>>>);

impl SafeStateSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self, request: SafeStateRequest) {
        self.0.set(Some(request));
    }

    /// Take the pending request, if any.
    pub fn take(&self) -> Option<SafeStateRequest> {
        self.0.take()
    }
}

pub type AliveCallback = Box<dyn FnMut(bool)>;

pub struct Heartbeat {
    timeout_ms: u64,
    signal: Option<SafeStateSignal>,
    on_change: Option<AliveCallback>,
    alive: bool,
    last_refresh_ms: u64,
    value: u16,
}

impl Heartbeat {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            signal: None,
            on_change: None,
            alive: false,
            last_refresh_ms: 0,
            value: 0,
        }
    }

    /// Called with the new alive state on every transition.
    #[must_use]
    pub fn with_callback(mut self, on_change: impl FnMut(bool) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Escalate lapses to the global safe state.
    pub fn attach(&mut self, signal: SafeStateSignal) {
        self.signal = Some(signal);
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    fn transition(&mut self, alive: bool) {
        self.alive = alive;
        if let Some(signal) = &self.signal {
            signal.request(if alive {
                SafeStateRequest::Exit
            } else {
                SafeStateRequest::Enter
            });
        }
        if let Some(cb) = self.on_change.as_mut() {
            cb(alive);
        }
    }
}

impl Device for Heartbeat {
    fn kind(&self) -> RegisterKind {
        RegisterKind::HoldingRegister
    }

    fn update(&mut self, ctx: &mut DeviceContext<'_>) {
        let lapsed = ctx.now_ms.saturating_sub(self.last_refresh_ms) >= self.timeout_ms;
        if lapsed && self.alive {
            warn!("heartbeat lost (no refresh for {} ms)", self.timeout_ms);
            self.transition(false);
        } else if !lapsed && !self.alive {
            debug!("heartbeat alive");
            self.transition(true);
        }
    }

    fn word(&self) -> u16 {
        self.value
    }

    fn set_word(&mut self, value: u16, ctx: &mut DeviceContext<'_>) {
        self.value = value;
        self.last_refresh_ms = ctx.now_ms;
        debug!("heartbeat refresh: {}", value);
    }
}
