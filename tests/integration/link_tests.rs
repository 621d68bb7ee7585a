//! Link supervision on top of the default device map.

use modbus_io::adapters::backend::SimBackend;
use modbus_io::adapters::time::ManualClock;
use modbus_io::app::device_map::{HEARTBEAT_BASE, build_device_map};
use modbus_io::app::ports::{LeaseStatus, RegisterTransport};
use modbus_io::config::ControllerConfig;
use modbus_io::pins;
use modbus_io::safety::{LinkHealth, LinkSupervisor};

use crate::mock_hw::{CountingTransport, ScriptedLink, TestOrchestrator};

fn controller() -> (TestOrchestrator, CountingTransport, ManualClock, LinkSupervisor) {
    let clock = ManualClock::new();
    let config = ControllerConfig::default();
    let mut orch = build_device_map(&config, SimBackend::new(), clock.clone()).unwrap();
    let mut io = CountingTransport::new();
    orch.start(&mut io).unwrap();
    let sup = LinkSupervisor::new(
        config.link_check_interval_ms,
        pins::STATUS_GREEN_PIN,
        pins::STATUS_RED_PIN,
    );
    (orch, io, clock, sup)
}

fn cycle(
    orch: &mut TestOrchestrator,
    io: &mut CountingTransport,
    sup: &mut LinkSupervisor,
    link: &mut ScriptedLink,
) -> Option<LinkHealth> {
    orch.update(io);
    sup.poll(link, orch, io)
}

#[test]
fn cable_pull_switches_relays_off_until_link_returns() {
    let (mut orch, mut io, clock, mut sup) = controller();
    let mut link = ScriptedLink::default();
    let relay = pins::RELAY_PINS[0];

    io.client().write_bit(0, true);
    assert_eq!(cycle(&mut orch, &mut io, &mut sup, &mut link), Some(LinkHealth::Up));
    assert!(orch.backend().level(relay));
    assert!(orch.backend().level(pins::STATUS_GREEN_PIN));

    link.up = false;
    clock.advance(500);
    assert_eq!(cycle(&mut orch, &mut io, &mut sup, &mut link), Some(LinkHealth::Down));
    assert!(!orch.backend().level(relay));
    assert!(!orch.backend().level(pins::STATUS_GREEN_PIN));

    // Keep the heartbeat fresh while the link is down.
    io.client().write_word(40_000 + HEARTBEAT_BASE, 1);
    link.up = true;
    link.lease = LeaseStatus::Renewed;
    clock.advance(500);
    assert_eq!(cycle(&mut orch, &mut io, &mut sup, &mut link), Some(LinkHealth::Up));
    assert!(!orch.in_safe_state());
    assert!(orch.backend().level(relay));
}

#[test]
fn rebind_failure_after_outage_restarts_the_banks() {
    let (mut orch, mut io, clock, mut sup) = controller();
    let mut link = ScriptedLink::default();
    cycle(&mut orch, &mut io, &mut sup, &mut link);

    link.up = false;
    clock.advance(500);
    cycle(&mut orch, &mut io, &mut sup, &mut link);

    link.up = true;
    link.lease = LeaseStatus::RebindFailed;
    clock.advance(500);
    cycle(&mut orch, &mut io, &mut sup, &mut link);

    assert_eq!(io.configures, 2);
    assert!(!orch.in_safe_state());

    // Everything is re-exported on the next cycle.
    orch.update(&mut io);
    assert_eq!(io.read_word(40_000), 300);
}

#[test]
fn red_led_blinks_while_the_link_is_down() {
    let (mut orch, mut io, clock, mut sup) = controller();
    let mut link = ScriptedLink {
        up: false,
        ..ScriptedLink::default()
    };

    let mut red = Vec::new();
    for _ in 0..4 {
        cycle(&mut orch, &mut io, &mut sup, &mut link);
        red.push(orch.backend().level(pins::STATUS_RED_PIN));
        clock.advance(500);
    }
    assert_eq!(red, vec![true, false, true, false]);
    assert!(orch.in_safe_state());
}
