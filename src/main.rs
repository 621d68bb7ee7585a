//! Modbus I/O controller: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  LocalPinBackend    RegisterBank        MonotonicClock       │
//! │  (PinBackend)       (RegisterTransport) (Clock)              │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │   Orchestrator: devices ⇄ registers, safe state        │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  LinkSupervisor (link loss → safe state) · Watchdog          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use modbus_io::adapters::local::LocalPinBackend;
use modbus_io::adapters::register_bank::RegisterBank;
use modbus_io::adapters::time::MonotonicClock;
use modbus_io::app::device_map::build_device_map;
use modbus_io::app::ports::{LeaseStatus, LinkPort};
use modbus_io::config::ControllerConfig;
use modbus_io::drivers::watchdog::Watchdog;
use modbus_io::pins;
use modbus_io::safety::LinkSupervisor;

// ── Link stand-in ─────────────────────────────────────────────
//
// The register banks are served in-process; until a network stack is
// bound the link reports up with a stable lease.

struct LocalLink;

impl LinkPort for LocalLink {
    fn is_link_up(&mut self) -> bool {
        true
    }

    fn maintain(&mut self) -> LeaseStatus {
        LeaseStatus::Unchanged
    }

    fn reacquire(&mut self) -> bool {
        true
    }
}

fn load_config() -> Result<ControllerConfig> {
    let Some(path) = std::env::args().nth(1) else {
        info!("No config file given, using defaults");
        return Ok(ControllerConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    info!("Config loaded from {}", path);
    Ok(config)
}

fn init_logger() -> Result<()> {
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    Ok(())
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Bootstrap ──────────────────────────────────────────
    init_logger()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  modbus-io v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config()?;
    info!(
        "{}: port {}, fallback {:?}",
        config.hostname, config.modbus_port, config.fallback_ip
    );

    // ── 3. Device map ─────────────────────────────────────────
    let mut orch = build_device_map(&config, LocalPinBackend::new(), MonotonicClock::new())
        .context("building device map")?;
    let mut bank = RegisterBank::new();
    orch.start(&mut bank).context("starting register banks")?;

    let mut link = LocalLink;
    let mut supervisor = LinkSupervisor::new(
        config.link_check_interval_ms,
        pins::STATUS_GREEN_PIN,
        pins::STATUS_RED_PIN,
    );
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    info!("System ready. Entering sync loop.");

    // ── 4. Sync loop ──────────────────────────────────────────
    let cycle = std::time::Duration::from_millis(u64::from(config.cycle_interval_ms));
    let mut was_safe = false;

    loop {
        watchdog.feed();
        orch.update(&mut bank);
        supervisor.poll(&mut link, &mut orch, &mut bank);

        if orch.in_safe_state() != was_safe {
            was_safe = orch.in_safe_state();
            if was_safe {
                warn!("Outputs held in safe state");
            } else {
                info!("Outputs released");
            }
        }

        std::thread::sleep(cycle);
    }
}
