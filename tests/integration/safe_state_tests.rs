//! Safe state: heartbeat escalation and per-device policies.

use std::cell::Cell;
use std::rc::Rc;

use modbus_io::app::ports::RegisterTransport;
use modbus_io::devices::SafeAction;
use modbus_io::devices::heartbeat::Heartbeat;
use modbus_io::devices::relay::Relay;
use modbus_io::devices::variable::Variable;

use crate::mock_hw::{CountingTransport, orchestrator};

const TIMEOUT_MS: u64 = 5_000;

#[test]
fn heartbeat_loss_and_recovery_cycle_the_outputs() {
    let (mut orch, clock) = orchestrator();
    orch.add(Box::new(
        Relay::stable(1).with_safe_state(SafeAction::SwitchOff, SafeAction::Restore),
    ))
    .unwrap();
    orch.add(Box::new(
        Relay::stable(2).with_safe_state(SafeAction::SwitchOn, SafeAction::SwitchOff),
    ))
    .unwrap();
    let mut hb = Heartbeat::new(TIMEOUT_MS);
    hb.attach(orch.safe_state_signal());
    orch.add(Box::new(hb)).unwrap();

    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();
    io.client().write_bit(0, true);
    orch.update(&mut io);
    assert!(orch.backend().level(1));

    clock.advance(TIMEOUT_MS);
    orch.update(&mut io);
    assert!(orch.in_safe_state());
    assert!(!orch.backend().level(1));
    assert!(orch.backend().level(2));

    // The client sees the forced states on the next cycle.
    orch.update(&mut io);
    assert!(!io.read_bit(0));
    assert!(io.read_bit(1));

    // The client is back: it bumps the heartbeat register.
    clock.advance(100);
    io.client().write_word(40_002, 1);
    orch.update(&mut io);
    orch.update(&mut io);
    assert!(!orch.in_safe_state());
    assert!(orch.backend().level(1), "relay 1 restored");
    assert!(!orch.backend().level(2), "relay 2 switched off on leave");
}

#[test]
fn unchanged_heartbeat_value_does_not_refresh() {
    let (mut orch, clock) = orchestrator();
    let mut hb = Heartbeat::new(TIMEOUT_MS);
    hb.attach(orch.safe_state_signal());
    orch.add(Box::new(hb)).unwrap();
    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();

    io.client().write_word(40_000, 7);
    orch.update(&mut io);

    clock.advance(TIMEOUT_MS - 1);
    // Same value again: not a refresh.
    io.client().write_word(40_000, 7);
    orch.update(&mut io);
    assert!(!orch.in_safe_state());

    clock.advance(1);
    orch.update(&mut io);
    assert!(orch.in_safe_state());
}

#[test]
fn repeated_entry_keeps_the_first_saved_state() {
    let (mut orch, _clock) = orchestrator();
    orch.add(Box::new(
        Relay::stable(1).with_safe_state(SafeAction::SwitchOff, SafeAction::Restore),
    ))
    .unwrap();
    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();
    io.client().write_bit(0, true);
    orch.update(&mut io);

    orch.enter_safe_state();
    let writes = orch.backend().writes().len();
    orch.enter_safe_state();
    assert_eq!(orch.backend().writes().len(), writes);

    orch.exit_safe_state();
    assert!(orch.backend().level(1));
    orch.exit_safe_state();
    assert!(orch.backend().level(1));
}

#[test]
fn ignore_policy_leaves_relay_alone() {
    let (mut orch, _clock) = orchestrator();
    orch.add(Box::new(Relay::stable(1))).unwrap();
    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();
    io.client().write_bit(0, true);
    orch.update(&mut io);

    orch.enter_safe_state();
    assert!(orch.backend().level(1));
    orch.exit_safe_state();
    assert!(orch.backend().level(1));
}

#[test]
fn client_writes_in_safe_state_still_reach_devices() {
    let (mut orch, _clock) = orchestrator();
    orch.add(Box::new(
        Relay::stable(1).with_safe_state(SafeAction::SwitchOff, SafeAction::Restore),
    ))
    .unwrap();
    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();
    orch.enter_safe_state();

    io.client().write_bit(0, true);
    orch.update(&mut io);
    assert!(orch.backend().level(1));
}

#[test]
fn restore_discards_client_writes_made_in_safe_state() {
    let (mut orch, _clock) = orchestrator();
    orch.add(Box::new(
        Relay::stable(1).with_safe_state(SafeAction::SwitchOff, SafeAction::Restore),
    ))
    .unwrap();
    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();
    io.client().write_bit(0, true);
    orch.update(&mut io);

    orch.enter_safe_state();
    for v in [false, true, false] {
        io.client().write_bit(0, v);
        orch.update(&mut io);
        assert_eq!(orch.backend().level(1), v);
    }

    orch.exit_safe_state();
    assert!(orch.backend().level(1), "pre-safe-state value wins");
    orch.update(&mut io);
    assert!(io.read_bit(0));
    assert!(orch.backend().level(1));
}

#[test]
fn variable_round_trips_through_holding_register() {
    let (mut orch, _clock) = orchestrator();
    let setpoint = Rc::new(Cell::new(21i32));
    let get = Rc::clone(&setpoint);
    let set = Rc::clone(&setpoint);
    orch.add(Box::new(Variable::read_write(move || get.get(), move |v| set.set(v))))
        .unwrap();
    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();

    orch.update(&mut io);
    assert_eq!(io.read_word(40_000), 21);

    io.client().write_word(40_000, 25);
    orch.update(&mut io);
    assert_eq!(setpoint.get(), 25);

    setpoint.set(30);
    orch.update(&mut io);
    assert_eq!(io.read_word(40_000), 30);
}
