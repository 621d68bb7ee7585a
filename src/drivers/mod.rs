//! Raw hardware access: local GPIO/ADC and the task watchdog.

pub mod gpio;
pub mod watchdog;
