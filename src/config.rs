//! Controller configuration parameters
//!
//! All tunable parameters for the Modbus I/O controller.
//! The binary loads overrides from a JSON file; anything missing keeps its
//! default.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sync::map::RegisterMap;

/// Longest relay on-time the holding register can express (seconds → ms).
pub const MAX_RELAY_ON_MS: u64 = u16::MAX as u64 * 1000;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Outputs ---
    /// Default maximum on-time for timed relays (milliseconds)
    pub relay_max_on_ms: u64,

    // --- Safety ---
    /// Heartbeat register must change at least this often (milliseconds)
    pub heartbeat_timeout_ms: u64,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,

    // --- Timing ---
    /// Sync cycle period (milliseconds)
    pub cycle_interval_ms: u32,
    /// Network link check period (milliseconds)
    pub link_check_interval_ms: u64,

    // --- Registers ---
    pub register_map: RegisterMap,

    // --- Network ---
    pub hostname: String,
    pub mac_address: [u8; 6],
    /// Static address used when DHCP cannot be renewed
    pub fallback_ip: [u8; 4],
    pub modbus_port: u16,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Outputs
            relay_max_on_ms: 300_000, // 5 min

            // Safety
            heartbeat_timeout_ms: 300_000,
            watchdog_timeout_ms: 300_000,

            // Timing
            cycle_interval_ms: 10,
            link_check_interval_ms: 500,

            register_map: RegisterMap::default(),

            // Network
            hostname: "opta01".into(),
            mac_address: [0xA8, 0x61, 0x0A, 0x50, 0xA7, 0xD4],
            fallback_ip: [192, 168, 1, 100],
            modbus_port: 502,
        }
    }
}

impl ControllerConfig {
    /// Check the configuration against a device map of `device_count` items.
    pub fn validate(&self, device_count: u16) -> Result<()> {
        if self.relay_max_on_ms == 0 {
            return Err(Error::Config("relay on-time must be non-zero"));
        }
        if self.relay_max_on_ms > MAX_RELAY_ON_MS {
            return Err(Error::Config("relay on-time exceeds 65535 s"));
        }
        if self.heartbeat_timeout_ms == 0 {
            return Err(Error::Config("heartbeat timeout must be non-zero"));
        }
        if self.cycle_interval_ms == 0 || self.link_check_interval_ms == 0 {
            return Err(Error::Config("intervals must be non-zero"));
        }
        if self.watchdog_timeout_ms <= self.cycle_interval_ms {
            return Err(Error::Config("watchdog timeout must exceed the cycle interval"));
        }
        if self.hostname.is_empty() {
            return Err(Error::Config("hostname must not be empty"));
        }
        self.register_map.validate(device_count)?;
        Ok(())
    }
}
