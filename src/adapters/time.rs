//! Millisecond clocks.
//!
//! - [`MonotonicClock`]: uptime since boot.
//!   - **`target_os = "espidf"`** wraps `esp_timer_get_time()` from the
//!     ESP-IDF high-resolution timer (microsecond precision, monotonic).
//!   - **`not(target_os = "espidf")`** uses `std::time::Instant`.
//! - [`ManualClock`]: shared, manually advanced clock for tests and
//!   deterministic simulation.  Clones observe the same time.

use std::cell::Cell;
use std::rc::Rc;

use crate::app::ports::Clock;

pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[cfg(target_os = "espidf")]
    fn now_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time has no preconditions once the system
        // timer is running, which ESP-IDF guarantees before app_main.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    #[cfg(not(target_os = "espidf"))]
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: u64) {
        self.0.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}
