//! Fuzz target: `Orchestrator::update`
//!
//! Interprets arbitrary bytes as a script of client register writes, time
//! steps and link events against the default device map, and asserts that
//! the cycle never panics and that no relay stays on past its on-time.
//!
//! cargo fuzz run fuzz_sync_cycle

#![no_main]

use libfuzzer_sys::fuzz_target;
use modbus_io::adapters::backend::SimBackend;
use modbus_io::adapters::register_bank::RegisterBank;
use modbus_io::adapters::time::ManualClock;
use modbus_io::app::device_map::{DEVICE_COUNT, build_device_map};
use modbus_io::app::ports::{Clock, RegisterTransport};
use modbus_io::config::ControllerConfig;
use modbus_io::pins::RELAY_PINS;

fuzz_target!(|data: &[u8]| {
    let clock = ManualClock::new();
    let config = ControllerConfig {
        relay_max_on_ms: 2_000,
        heartbeat_timeout_ms: 5_000,
        ..ControllerConfig::default()
    };
    let Ok(mut orch) = build_device_map(&config, SimBackend::new(), clock.clone()) else {
        return;
    };
    let mut bank = RegisterBank::new();
    if orch.start(&mut bank).is_err() {
        return;
    }

    let mut on_since = [None::<u64>; RELAY_PINS.len()];

    for op in data.chunks_exact(3) {
        let base = u16::from(op[1]) % DEVICE_COUNT;
        match op[0] % 5 {
            0 => bank.write_bit(base, op[2] & 1 != 0),
            1 => bank.write_word(40_000 + base, u16::from(op[2] % 8)),
            2 => clock.advance(u64::from(op[2]) * 50),
            3 => orch.enter_safe_state(),
            _ => orch.exit_safe_state(),
        }
        let limits: Vec<u64> = (0..RELAY_PINS.len())
            .map(|i| u64::from(orch.items()[i].device().word()) * 1000)
            .collect();

        let was_safe = orch.in_safe_state();
        orch.update(&mut bank);

        // Switching on again (a client write or a restore) re-arms the timer.
        let rearmed = |i: usize| {
            op[0] % 5 >= 3 || orch.in_safe_state() != was_safe || (op[0] % 5 == 0 && usize::from(base) == i)
        };
        let now = clock.now_ms();
        for (i, &pin) in RELAY_PINS.iter().enumerate() {
            let on = orch.backend().level(pin);
            if on && rearmed(i) {
                on_since[i] = Some(now);
                continue;
            }
            match (on, on_since[i]) {
                (true, None) => on_since[i] = Some(now),
                (false, _) => on_since[i] = None,
                (true, Some(start)) => assert!(
                    now - start <= limits[i],
                    "relay {} on for {} ms, limit {} ms",
                    i,
                    now - start,
                    limits[i]
                ),
            }
        }
    }
});
