//! Sync cycle: register traffic, client writes and timed relays through
//! the orchestrator.

use modbus_io::app::ports::RegisterTransport;
use modbus_io::devices::INVALID_VALUE;
use modbus_io::devices::input::{AnalogInput, DigitalInput};
use modbus_io::devices::relay::Relay;
use modbus_io::error::Error;
use modbus_io::sync::orchestrator::MAX_ITEMS;

use crate::mock_hw::{CountingTransport, RegisterWrite, TestOrchestrator, orchestrator};

const RELAY_PIN: u8 = 1;
const INPUT_PIN: u8 = 5;
const ANALOG_PIN: u8 = 9;

/// stable relay @0, timed relay @1, digital input @2, analog input @3.
fn mixed() -> (TestOrchestrator, CountingTransport, modbus_io::adapters::time::ManualClock) {
    let (mut orch, clock) = orchestrator();
    orch.add(Box::new(Relay::stable(RELAY_PIN))).unwrap();
    orch.add(Box::new(Relay::timed(2, 1_000))).unwrap();
    orch.add(Box::new(DigitalInput::new(INPUT_PIN))).unwrap();
    orch.add(Box::new(AnalogInput::new(ANALOG_PIN))).unwrap();
    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();
    (orch, io, clock)
}

#[test]
fn first_cycle_exports_only_non_zero_values() {
    let (mut orch, mut io, _clock) = mixed();
    orch.update(&mut io);

    assert_eq!(
        io.writes,
        vec![
            RegisterWrite::Word { addr: 40_000, value: INVALID_VALUE },
            RegisterWrite::Word { addr: 40_001, value: 1 },
        ]
    );
}

#[test]
fn steady_state_produces_no_register_writes() {
    let (mut orch, mut io, clock) = mixed();
    orch.update(&mut io);
    io.clear();

    for _ in 0..20 {
        clock.advance(10);
        orch.update(&mut io);
    }
    assert!(io.writes.is_empty(), "unexpected writes: {:?}", io.writes);
}

#[test]
fn input_change_is_pushed_exactly_once() {
    let (mut orch, mut io, _clock) = mixed();
    orch.update(&mut io);
    io.clear();

    orch.backend_mut().set_level(INPUT_PIN, true);
    orch.backend_mut().set_analog(ANALOG_PIN, 2048);
    orch.update(&mut io);
    orch.update(&mut io);

    assert_eq!(io.writes_to(10_002), 1);
    assert_eq!(io.writes_to(30_003), 1);
    assert!(io.read_bit(10_002));
    assert_eq!(io.read_word(30_003), 2048);
}

#[test]
fn client_coil_write_switches_relay_without_echo() {
    let (mut orch, mut io, _clock) = mixed();
    orch.update(&mut io);
    io.clear();

    io.client().write_bit(0, true);
    orch.update(&mut io);

    assert!(orch.backend().level(RELAY_PIN));
    assert_eq!(io.writes_to(0), 0);
}

#[test]
fn timed_relay_turns_itself_off_and_reports_it() {
    let (mut orch, mut io, clock) = mixed();
    orch.update(&mut io);

    io.client().write_bit(1, true);
    orch.update(&mut io);
    assert!(orch.backend().level(2));

    clock.advance(1_000);
    orch.update(&mut io);
    assert!(orch.backend().level(2), "exactly max on-time is still allowed");

    clock.advance(1);
    orch.update(&mut io);
    assert!(!orch.backend().level(2));
    assert!(!io.read_bit(1));
}

#[test]
fn client_can_change_on_time_through_holding_register() {
    let (mut orch, mut io, clock) = mixed();
    orch.update(&mut io);

    io.client().write_word(40_001, 3);
    io.client().write_bit(1, true);
    orch.update(&mut io);

    clock.advance(2_500);
    orch.update(&mut io);
    assert!(orch.backend().level(2));

    clock.advance(501);
    orch.update(&mut io);
    assert!(!orch.backend().level(2));
    assert_eq!(orch.items()[1].device().word(), 3);
}

#[test]
fn restart_reexports_every_value() {
    let (mut orch, mut io, _clock) = mixed();
    orch.backend_mut().set_level(INPUT_PIN, true);
    io.client().write_bit(0, true);
    orch.update(&mut io);
    io.clear();

    orch.restart_transport(&mut io);
    assert_eq!(io.configures, 2);
    assert!(!io.read_bit(0));

    orch.update(&mut io);
    assert!(io.read_bit(0));
    assert!(io.read_bit(10_002));
    assert_eq!(io.read_word(40_000), INVALID_VALUE);
    assert_eq!(io.read_word(40_001), 1);
    // The relay was not toggled by the zeroed coil.
    assert!(orch.backend().level(RELAY_PIN));
}

#[test]
fn device_map_is_fixed_after_start() {
    let (mut orch, _io, _clock) = mixed();
    assert!(matches!(
        orch.add(Box::new(Relay::stable(7))),
        Err(Error::Config(_))
    ));
    assert_eq!(orch.len(), 4);
}

#[test]
fn capacity_is_bounded() {
    let (mut orch, _clock) = orchestrator();
    for pin in 0..MAX_ITEMS {
        orch.add(Box::new(DigitalInput::new(pin as u8))).unwrap();
    }
    assert_eq!(
        orch.add(Box::new(DigitalInput::new(0))).unwrap_err(),
        Error::CapacityExceeded(MAX_ITEMS)
    );
}
