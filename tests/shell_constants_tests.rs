// Sanity checks on the browser shell's constants.

#[allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use folio_core::constants::{CLOCK_REFRESH_MS, CURSOR_IDLE_TICK_MS};

#[test]
fn timers_match_the_core_cadence() {
    assert_eq!(IDLE_TIMER_MS as u64, CURSOR_IDLE_TICK_MS);
    assert_eq!(CLOCK_TIMER_MS as u64, CLOCK_REFRESH_MS);
}

#[test]
fn camera_rig_is_sane() {
    assert!(CAMERA_OFFSET.y > 0.0 && CAMERA_OFFSET.z > 0.0);
    assert!(CAMERA_FOLLOW_BLEND > 0.0 && CAMERA_FOLLOW_BLEND <= 1.0);
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < CAMERA_ZFAR);
    assert!(CAMERA_FOV_DEG > 0.0 && CAMERA_FOV_DEG < 180.0);
    assert_eq!(LISTENER_UP, [0.0, 1.0, 0.0]);
}

#[test]
fn dom_ids_are_distinct() {
    let ids = [
        CANVAS_ID,
        BOOT_OVERLAY_ID,
        BOOT_PROGRESS_ID,
        BOOT_MESSAGE_ID,
        BANNER_ID,
        HUD_ID,
        HELP_OVERLAY_ID,
    ];
    let unique: std::collections::BTreeSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    assert_ne!(NIGHT_CLASS, DEVELOPER_CLASS);
}

#[test]
fn instance_buffers_start_with_room() {
    assert!(INITIAL_INSTANCE_CAPACITY.is_power_of_two());
}
