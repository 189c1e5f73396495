//! Presentation-side reactions to triggered easter eggs.

use crate::agent::Gesture;
use crate::constants::{CELEBRATION_MS, NOTIFICATION_MS, TURBO_DURATION_MS, TURBO_SPEED_MULTIPLIER};
use crate::eggs::{is_night, EggId};
use chrono::NaiveDateTime;
use std::time::Duration;

pub const BANNER_TITLE: &str = "SECRET UNLOCKED!";

pub fn egg_message(id: EggId) -> &'static str {
    match id {
        EggId::KonamiCode => "You're a true gamer! Robot dance activated!",
        EggId::ClickCounter => "Turbo mode unlocked! Everything moves faster now!",
        EggId::ConsoleCommand => "Developer mode activated! Robot responds to commands.",
        EggId::TimeBased => "Night mode activated! The robot is getting sleepy...",
        EggId::CursorHide => "Robot detected your absence! Looking around...",
        EggId::SecretZone => "Secret zone discovered!",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Banner {
    pub id: EggId,
    pub message: &'static str,
    pub until: Duration,
}

/// What the shell has to do right now in response to one trigger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectCommands {
    pub cue: Option<&'static str>,
    pub gesture: Option<Gesture>,
}

#[derive(Debug, Default)]
pub struct ActiveEffects {
    celebration_until: Option<Duration>,
    turbo_until: Option<Duration>,
    banner: Option<Banner>,
    night_mode: bool,
    developer_mode: bool,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, id: EggId, now: Duration) -> EffectCommands {
        let mut out = EffectCommands {
            cue: Some("achievement"),
            gesture: None,
        };
        match id {
            EggId::KonamiCode => {
                self.celebration_until = Some(now + Duration::from_millis(CELEBRATION_MS));
                out.gesture = Some(Gesture::Dance);
            }
            EggId::ClickCounter => {
                self.turbo_until = Some(now + Duration::from_millis(TURBO_DURATION_MS));
            }
            EggId::ConsoleCommand => self.developer_mode = true,
            EggId::TimeBased => self.night_mode = true,
            EggId::CursorHide => out.gesture = Some(Gesture::LookAround),
            EggId::SecretZone => {}
        }
        self.banner = Some(Banner {
            id,
            message: egg_message(id),
            until: now + Duration::from_millis(NOTIFICATION_MS),
        });
        out
    }

    /// Night mode only lasts while the clock stays inside the window.
    pub fn clock_changed(&mut self, wall_time: NaiveDateTime) {
        if self.night_mode && !is_night(wall_time) {
            log::info!("[eggs] night mode off");
            self.night_mode = false;
        }
    }

    pub fn banner(&self, now: Duration) -> Option<&Banner> {
        self.banner.as_ref().filter(|b| now < b.until)
    }

    pub fn celebrating(&self, now: Duration) -> bool {
        self.celebration_until.is_some_and(|t| now < t)
    }

    /// Seconds into the running celebration.
    pub fn celebration_elapsed(&self, now: Duration) -> Option<f32> {
        let until = self.celebration_until.filter(|t| now < *t)?;
        let started = until.saturating_sub(Duration::from_millis(CELEBRATION_MS));
        Some(now.saturating_sub(started).as_secs_f32())
    }

    pub fn turbo_active(&self, now: Duration) -> bool {
        self.turbo_until.is_some_and(|t| now < t)
    }

    pub fn speed_multiplier(&self, now: Duration) -> f32 {
        if self.turbo_active(now) {
            TURBO_SPEED_MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn night_mode(&self) -> bool {
        self.night_mode
    }

    pub fn developer_mode(&self) -> bool {
        self.developer_mode
    }
}
