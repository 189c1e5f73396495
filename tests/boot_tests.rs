// Boot overlay timeline.

use folio_core::boot::{BootPhase, BootSequence, BOOT_MESSAGES};
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn progress_climbs_two_percent_per_tick() {
    let boot = BootSequence::new(ms(1_000));
    assert_eq!(boot.progress(ms(0)), 0);
    assert_eq!(boot.progress(ms(1_049)), 0);
    assert_eq!(boot.progress(ms(1_050)), 2);
    assert_eq!(boot.progress(ms(2_000)), 40);
    assert_eq!(boot.progress(ms(3_500)), 100);
    assert_eq!(boot.progress(ms(60_000)), 100);
    assert_eq!(boot.full_at(), ms(3_500));
}

#[test]
fn completes_one_second_after_full() {
    let boot = BootSequence::new(ms(0));
    assert!(!boot.is_complete(ms(3_499)));
    assert!(boot.is_complete(ms(3_500)));
}

#[test]
fn phases_follow_progress() {
    assert_eq!(BootPhase::from_progress(0), BootPhase::Wireframe);
    assert_eq!(BootPhase::from_progress(30), BootPhase::Materializing);
    assert_eq!(BootPhase::from_progress(89), BootPhase::Solid);
    assert_eq!(BootPhase::from_progress(100), BootPhase::Powered);
    assert!(BootPhase::Wireframe.opacity() < BootPhase::Powered.opacity());
}

#[test]
fn messages_advance_and_stick_on_the_last() {
    let boot = BootSequence::new(ms(0));
    assert_eq!(boot.frame(ms(0)).message, BOOT_MESSAGES[0]);
    assert_eq!(boot.frame(ms(1_200)).message_index, 2);
    let late = boot.frame(ms(10_000));
    assert_eq!(late.message, "> SYSTEM BOOT: COMPLETE");
    assert!(late.complete);
    assert_eq!(late.phase, BootPhase::Powered);
}
