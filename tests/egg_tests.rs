// Host-side tests for the easter-egg engine and the effects it drives.

use chrono::{NaiveDate, NaiveDateTime};
use folio_core::agent::Gesture;
use folio_core::bus::{Signal, SignalBus};
use folio_core::effects::{egg_message, ActiveEffects, BANNER_TITLE};
use folio_core::eggs::{
    is_night, EasterEggEngine, EggConfig, EggId, EggStatus, TriggerKind, KONAMI_SEQUENCE,
};
use folio_core::zones::ZONE_IDS;
use std::time::Duration;

fn at(hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 17)
        .and_then(|d| d.and_hms_opt(hour, min, 0))
        .unwrap()
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn engine() -> EasterEggEngine {
    EasterEggEngine::with_default_eggs(at(12, 0))
}

fn drain(bus: &mut SignalBus) -> Vec<Signal> {
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = bus.subscribe(move |s| sink.borrow_mut().push(s.clone()));
    bus.flush();
    bus.unsubscribe(id);
    let out = seen.borrow().clone();
    out
}

fn type_konami(e: &mut EasterEggEngine, now: Duration, bus: &mut SignalBus) -> Option<EggId> {
    let mut last = None;
    for key in KONAMI_SEQUENCE {
        last = e.record_key(key, now, bus);
    }
    last
}

#[test]
fn konami_fires_once_then_cools_down() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    assert_eq!(type_konami(&mut e, ms(0), &mut bus), Some(EggId::KonamiCode));
    assert_eq!(
        drain(&mut bus),
        vec![Signal::EasterEggTriggered {
            id: EggId::KonamiCode
        }]
    );
    assert_eq!(e.status(EggId::KonamiCode, ms(1_000)), Some(EggStatus::CoolingDown));
    assert_eq!(type_konami(&mut e, ms(1_000), &mut bus), None);
    assert_eq!(type_konami(&mut e, ms(6_000), &mut bus), Some(EggId::KonamiCode));
    assert_eq!(e.fired_count(EggId::KonamiCode), 2);
}

#[test]
fn konami_tolerates_leading_noise_but_not_gaps() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    e.record_key("KeyQ", ms(0), &mut bus);
    assert_eq!(type_konami(&mut e, ms(0), &mut bus), Some(EggId::KonamiCode));

    let mut e = engine();
    for key in &KONAMI_SEQUENCE[..9] {
        e.record_key(key, ms(0), &mut bus);
    }
    e.record_key("KeyC", ms(0), &mut bus);
    assert_eq!(e.record_key("KeyA", ms(0), &mut bus), None);
}

#[test]
fn key_buffer_is_bounded() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    for i in 0..30 {
        e.record_key(&format!("Digit{}", i % 10), ms(0), &mut bus);
    }
    let keys = &e.context().key_sequence;
    assert_eq!(keys.len(), 20);
    assert_eq!(keys.back().map(String::as_str), Some("Digit9"));
}

#[test]
fn every_fiftieth_click_fires() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    let fired: Vec<_> = (1..=100u64)
        .filter_map(|i| e.record_click(ms(i * 100), &mut bus).map(|id| (i, id)))
        .collect();
    assert_eq!(
        fired,
        vec![(50, EggId::ClickCounter), (100, EggId::ClickCounter)]
    );
}

#[test]
fn click_cooldown_swallows_rapid_milestones() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    for _ in 0..49 {
        e.record_click(ms(0), &mut bus);
    }
    assert_eq!(e.record_click(ms(0), &mut bus), Some(EggId::ClickCounter));
    for _ in 0..49 {
        e.record_click(ms(500), &mut bus);
    }
    assert_eq!(e.record_click(ms(500), &mut bus), None);
    assert_eq!(e.context().click_count, 100);
}

#[test]
fn console_egg_matches_gesture_commands() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    assert_eq!(e.record_console_command("robot.stats", ms(0), &mut bus), None);
    assert_eq!(
        e.record_console_command("Robot.Dance()", ms(0), &mut bus),
        Some(EggId::ConsoleCommand)
    );
    assert_eq!(e.record_console_command("robot.wave", ms(2_000), &mut bus), None);
    assert_eq!(
        e.record_console_command("robot.wave", ms(5_000), &mut bus),
        Some(EggId::ConsoleCommand)
    );
}

#[test]
fn night_window_is_midnight_to_four() {
    assert!(is_night(at(0, 0)));
    assert!(is_night(at(3, 59)));
    assert!(!is_night(at(4, 0)));
    assert!(!is_night(at(23, 59)));
}

#[test]
fn night_egg_is_one_shot() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    assert_eq!(e.refresh_clock(at(12, 0), ms(0), &mut bus), None);
    assert_eq!(e.refresh_clock(at(1, 30), ms(0), &mut bus), Some(EggId::TimeBased));
    assert_eq!(e.refresh_clock(at(1, 31), ms(60_000), &mut bus), None);
    assert_eq!(e.status(EggId::TimeBased, ms(999_999)), Some(EggStatus::Spent));
}

#[test]
fn idle_cursor_fires_after_ten_seconds() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    let mut fired_at = None;
    for tick in 1..=150u64 {
        if e.idle_tick(ms(tick * 100), &mut bus).is_some() {
            fired_at = Some(tick);
            break;
        }
    }
    // strictly more than 10s of idle time
    assert_eq!(fired_at, Some(101));
    e.pointer_moved();
    assert_eq!(e.context().cursor_idle, Duration::ZERO);
}

#[test]
fn secret_zone_needs_every_zone() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    let (last, rest) = ZONE_IDS.split_last().unwrap();
    for zone in rest {
        assert_eq!(e.record_zone_visit(zone, ms(0), &mut bus), None);
        e.record_zone_visit(zone, ms(0), &mut bus);
    }
    assert_eq!(e.record_zone_visit(last, ms(0), &mut bus), Some(EggId::SecretZone));
    assert_eq!(e.record_zone_visit(last, ms(0), &mut bus), None);
}

#[test]
fn evaluation_is_scoped_to_the_mutation() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    for _ in 0..49 {
        e.record_click(ms(0), &mut bus);
    }
    // a key press does not look at the click counter
    e.record_key("KeyA", ms(0), &mut bus);
    assert!(e.triggered().next().is_none());
    assert_eq!(bus.pending(), 0);
}

#[test]
fn clicks_at_night_leave_the_clock_egg_armed() {
    let mut e = EasterEggEngine::with_default_eggs(at(1, 30));
    let mut bus = SignalBus::new();
    let fired: Vec<_> = (0..50)
        .filter_map(|_| e.record_click(ms(0), &mut bus))
        .collect();
    assert_eq!(fired, vec![EggId::ClickCounter]);
    assert_eq!(e.status(EggId::TimeBased, ms(0)), Some(EggStatus::Armed));
    assert_eq!(e.refresh_clock(at(1, 30), ms(0), &mut bus), Some(EggId::TimeBased));
}

#[test]
fn force_trigger_respects_gating() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    assert!(!e.force_trigger("rainbow", ms(0), &mut bus));
    assert!(e.force_trigger("secret-zone", ms(0), &mut bus));
    assert!(!e.force_trigger("secret-zone", ms(10_000), &mut bus));
    assert!(e.force_trigger("konami-code", ms(0), &mut bus));
    assert!(!e.force_trigger("konami-code", ms(100), &mut bus));
    assert_eq!(bus.pending(), 2);
}

#[test]
fn custom_eggs_run_their_own_effect() {
    let mut e = EasterEggEngine::new(at(12, 0));
    e.register(
        EggConfig::new(EggId::ClickCounter, TriggerKind::Click, |ctx| {
            ctx.click_count == 3
        })
        .effect(|_, ctx, bus| bus.publish(Signal::ConsoleCommand(format!("clicks={}", ctx.click_count)))),
    );
    let mut bus = SignalBus::new();
    for _ in 0..3 {
        e.record_click(ms(0), &mut bus);
    }
    assert_eq!(drain(&mut bus), vec![Signal::ConsoleCommand("clicks=3".into())]);
}

#[test]
fn first_registered_egg_wins() {
    let mut e = EasterEggEngine::new(at(12, 0));
    e.register(EggConfig::new(EggId::KonamiCode, TriggerKind::Click, |_| true).one_shot());
    e.register(EggConfig::new(EggId::ClickCounter, TriggerKind::Click, |_| true));
    let mut bus = SignalBus::new();
    assert_eq!(e.record_click(ms(0), &mut bus), Some(EggId::KonamiCode));
    assert_eq!(e.record_click(ms(0), &mut bus), Some(EggId::ClickCounter));
}

#[test]
fn snapshot_serializes_for_the_console() {
    let mut e = engine();
    let mut bus = SignalBus::new();
    e.record_click(ms(0), &mut bus);
    e.record_zone_visit("medical", ms(0), &mut bus);
    let json = serde_json::to_value(e.snapshot(ms(0))).unwrap();
    assert_eq!(json["clickCount"], 1);
    assert_eq!(json["zonesVisited"][0], "medical");
    assert_eq!(json["statuses"].as_array().map(Vec::len), Some(6));
}

#[test]
fn effects_follow_each_egg() {
    let mut fx = ActiveEffects::new();
    let konami = fx.apply(EggId::KonamiCode, ms(0));
    assert_eq!(konami.cue, Some("achievement"));
    assert_eq!(konami.gesture, Some(Gesture::Dance));
    assert!(fx.celebrating(ms(3_999)));
    assert!(!fx.celebrating(ms(4_000)));
    assert!(fx.celebration_elapsed(ms(1_500)).is_some_and(|s| (s - 1.5).abs() < 1e-3));

    assert_eq!(fx.apply(EggId::CursorHide, ms(0)).gesture, Some(Gesture::LookAround));

    fx.apply(EggId::ClickCounter, ms(0));
    assert_eq!(fx.speed_multiplier(ms(29_999)), 2.0);
    assert_eq!(fx.speed_multiplier(ms(30_000)), 1.0);

    fx.apply(EggId::ConsoleCommand, ms(0));
    assert!(fx.developer_mode());
}

#[test]
fn night_mode_ends_with_the_window() {
    let mut fx = ActiveEffects::new();
    fx.apply(EggId::TimeBased, ms(0));
    assert!(fx.night_mode());
    fx.clock_changed(at(3, 0));
    assert!(fx.night_mode());
    fx.clock_changed(at(4, 1));
    assert!(!fx.night_mode());
}

#[test]
fn banner_shows_the_latest_egg_for_five_seconds() {
    let mut fx = ActiveEffects::new();
    fx.apply(EggId::SecretZone, ms(1_000));
    let banner = fx.banner(ms(5_999)).cloned();
    assert_eq!(banner.map(|b| b.message), Some(egg_message(EggId::SecretZone)));
    assert!(fx.banner(ms(6_000)).is_none());
    assert_eq!(BANNER_TITLE, "SECRET UNLOCKED!");
}
