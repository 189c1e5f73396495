// Signal bus delivery order and re-entrancy.

use folio_core::bus::{Signal, SignalBus};
use folio_core::eggs::EggId;
use std::cell::RefCell;
use std::rc::Rc;

fn recorder(bus: &mut SignalBus, tag: &'static str, log: &Rc<RefCell<Vec<String>>>) {
    let log = log.clone();
    bus.subscribe(move |s| log.borrow_mut().push(format!("{}:{}", tag, s.name())));
}

#[test]
fn publish_only_queues() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut bus = SignalBus::new();
    recorder(&mut bus, "a", &log);
    bus.publish(Signal::ZoneEntered("web".into()));
    assert!(log.borrow().is_empty());
    assert_eq!(bus.pending(), 1);
    assert_eq!(bus.flush(), 1);
    assert_eq!(bus.pending(), 0);
    assert_eq!(log.borrow().as_slice(), ["a:zone-entered"]);
}

#[test]
fn delivery_keeps_publish_and_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut bus = SignalBus::new();
    recorder(&mut bus, "a", &log);
    recorder(&mut bus, "b", &log);
    bus.publish(Signal::ConsoleCommand("robot.wave".into()));
    bus.publish(Signal::EasterEggTriggered {
        id: EggId::KonamiCode,
    });
    bus.flush();
    assert_eq!(
        log.borrow().as_slice(),
        [
            "a:console-command",
            "b:console-command",
            "a:easter-egg-triggered",
            "b:easter-egg-triggered",
        ]
    );
}

#[test]
fn unsubscribed_listeners_stop_hearing() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut bus = SignalBus::new();
    recorder(&mut bus, "a", &log);
    let quiet = {
        let log = log.clone();
        bus.subscribe(move |s| log.borrow_mut().push(format!("q:{}", s.name())))
    };
    assert_eq!(bus.listener_count(), 2);
    assert!(bus.unsubscribe(quiet));
    assert!(!bus.unsubscribe(quiet));
    bus.publish(Signal::ZoneEntered("about".into()));
    bus.flush();
    assert_eq!(log.borrow().as_slice(), ["a:zone-entered"]);
}

#[test]
fn listeners_may_touch_shared_state_while_publisher_is_borrowed() {
    // a service publishes while mutably borrowed; the listener later
    // borrows that same service without panicking
    let counter = Rc::new(RefCell::new(0u32));
    let mut bus = SignalBus::new();
    let c = counter.clone();
    bus.subscribe(move |_| *c.borrow_mut() += 1);
    {
        let mut guard = counter.borrow_mut();
        *guard += 10;
        bus.publish(Signal::ZoneEntered("web".into()));
    }
    bus.flush();
    assert_eq!(*counter.borrow(), 11);
}

#[test]
fn flushing_an_empty_queue_is_a_no_op() {
    let mut bus = SignalBus::new();
    assert_eq!(bus.flush(), 0);
}
