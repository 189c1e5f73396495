//! Boot overlay timeline. Everything is a pure function of the time elapsed
//! since the overlay appeared.

use crate::constants::{BOOT_COMPLETE_HOLD_MS, BOOT_MESSAGE_MS, BOOT_PROGRESS_STEP, BOOT_TICK_MS};
use serde::Serialize;
use std::time::Duration;

pub const BOOT_MESSAGES: [&str; 6] = [
    "> INITIALIZING ROBOT OS...",
    "> LOADING AI MODULES...",
    "> CALIBRATING SENSORS...",
    "> COMPUTER VISION: ONLINE",
    "> NAVIGATION: READY",
    "> SYSTEM BOOT: COMPLETE",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BootPhase {
    Wireframe,
    Materializing,
    Solid,
    Powered,
}

impl BootPhase {
    pub fn from_progress(progress: u32) -> Self {
        match progress {
            0..=29 => BootPhase::Wireframe,
            30..=59 => BootPhase::Materializing,
            60..=89 => BootPhase::Solid,
            _ => BootPhase::Powered,
        }
    }

    /// How opaque the droid is drawn during this phase.
    pub fn opacity(self) -> f32 {
        match self {
            BootPhase::Wireframe => 0.3,
            BootPhase::Materializing => 0.6,
            BootPhase::Solid => 0.9,
            BootPhase::Powered => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BootFrame {
    pub progress: u32,
    pub phase: BootPhase,
    pub message: &'static str,
    pub message_index: usize,
    pub complete: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct BootSequence {
    started: Duration,
}

impl BootSequence {
    pub fn new(started: Duration) -> Self {
        Self { started }
    }

    fn elapsed_ms(&self, now: Duration) -> u64 {
        now.saturating_sub(self.started).as_millis() as u64
    }

    pub fn progress(&self, now: Duration) -> u32 {
        let ticks = self.elapsed_ms(now) / BOOT_TICK_MS;
        (ticks.saturating_mul(BOOT_PROGRESS_STEP as u64)).min(100) as u32
    }

    /// When progress first reads 100.
    pub fn full_at(&self) -> Duration {
        let ticks = 100u64.div_ceil(BOOT_PROGRESS_STEP as u64);
        self.started + Duration::from_millis(ticks * BOOT_TICK_MS)
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        now >= self.full_at() + Duration::from_millis(BOOT_COMPLETE_HOLD_MS)
    }

    pub fn message_index(&self, now: Duration) -> usize {
        ((self.elapsed_ms(now) / BOOT_MESSAGE_MS) as usize).min(BOOT_MESSAGES.len() - 1)
    }

    pub fn frame(&self, now: Duration) -> BootFrame {
        let progress = self.progress(now);
        let message_index = self.message_index(now);
        BootFrame {
            progress,
            phase: BootPhase::from_progress(progress),
            message: BOOT_MESSAGES[message_index],
            message_index,
            complete: self.is_complete(now),
        }
    }
}
