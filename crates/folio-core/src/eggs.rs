//! Easter-egg trigger engine.
//!
//! The engine keeps one [`ObservationContext`] and a registry of eggs. Every
//! `record_*` call mutates the context and then evaluates the eggs whose
//! trigger kind matches that mutation, in registration order. The first egg
//! whose predicate holds (and that is not spent or cooling down) fires; at most
//! one egg fires per mutation.

use crate::bus::{Signal, SignalBus};
use crate::constants::{
    CLICK_COOLDOWN_MS, CLICK_MILESTONE, CONSOLE_COOLDOWN_MS, CURSOR_HIDE_COOLDOWN_MS,
    CURSOR_IDLE_THRESHOLD_MS, CURSOR_IDLE_TICK_MS, KEY_SEQUENCE_MAX, KONAMI_COOLDOWN_MS,
    NIGHT_END_HOUR, NIGHT_START_HOUR,
};
use crate::zones::ZONE_IDS;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::time::Duration;

pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "KeyB",
    "KeyA",
];

/// Console commands that wake the developer egg.
pub const EGG_CONSOLE_COMMANDS: [&str; 2] = ["robot.dance", "robot.wave"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EggId {
    KonamiCode,
    ClickCounter,
    ConsoleCommand,
    TimeBased,
    CursorHide,
    SecretZone,
}

impl EggId {
    pub const ALL: [EggId; 6] = [
        EggId::KonamiCode,
        EggId::ClickCounter,
        EggId::ConsoleCommand,
        EggId::TimeBased,
        EggId::CursorHide,
        EggId::SecretZone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EggId::KonamiCode => "konami-code",
            EggId::ClickCounter => "click-counter",
            EggId::ConsoleCommand => "console-command",
            EggId::TimeBased => "time-based",
            EggId::CursorHide => "cursor-hide",
            EggId::SecretZone => "secret-zone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

/// Which context mutation an egg listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    KeySequence,
    Click,
    Console,
    Time,
    Idle,
    Zone,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObservationContext {
    pub click_count: u64,
    pub key_sequence: VecDeque<String>,
    pub cursor_idle: Duration,
    pub wall_time: NaiveDateTime,
    pub console_commands: Vec<String>,
    pub zones_visited: BTreeSet<String>,
}

impl ObservationContext {
    pub fn new(wall_time: NaiveDateTime) -> Self {
        Self {
            click_count: 0,
            key_sequence: VecDeque::with_capacity(KEY_SEQUENCE_MAX),
            cursor_idle: Duration::ZERO,
            wall_time,
            console_commands: Vec::new(),
            zones_visited: BTreeSet::new(),
        }
    }

    /// True when the newest keys spell out `sequence`.
    pub fn keys_end_with(&self, sequence: &[&str]) -> bool {
        let n = sequence.len();
        if self.key_sequence.len() < n {
            return false;
        }
        self.key_sequence
            .iter()
            .skip(self.key_sequence.len() - n)
            .zip(sequence)
            .all(|(a, b)| a == b)
    }

    pub fn latest_command(&self) -> Option<&str> {
        self.console_commands.last().map(String::as_str)
    }
}

pub type Predicate = Box<dyn Fn(&ObservationContext) -> bool>;
pub type Effect = Box<dyn Fn(EggId, &ObservationContext, &mut SignalBus)>;

pub struct EggConfig {
    id: EggId,
    trigger: TriggerKind,
    predicate: Predicate,
    effect: Option<Effect>,
    cooldown: Option<Duration>,
    one_shot: bool,
}

impl EggConfig {
    pub fn new(
        id: EggId,
        trigger: TriggerKind,
        predicate: impl Fn(&ObservationContext) -> bool + 'static,
    ) -> Self {
        Self {
            id,
            trigger,
            predicate: Box::new(predicate),
            effect: None,
            cooldown: None,
            one_shot: false,
        }
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    /// Replaces the default effect, which publishes `EasterEggTriggered`.
    pub fn effect(
        mut self,
        effect: impl Fn(EggId, &ObservationContext, &mut SignalBus) + 'static,
    ) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }

    pub fn id(&self) -> EggId {
        self.id
    }

    pub fn trigger(&self) -> TriggerKind {
        self.trigger
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EggStatus {
    Armed,
    CoolingDown,
    Spent,
}

struct EggEntry {
    config: EggConfig,
    last_fired: Option<Duration>,
    fired_count: u32,
}

impl EggEntry {
    fn status(&self, now: Duration) -> EggStatus {
        match self.last_fired {
            None => EggStatus::Armed,
            Some(_) if self.config.one_shot => EggStatus::Spent,
            Some(at) => match self.config.cooldown {
                Some(cd) if now.saturating_sub(at) < cd => EggStatus::CoolingDown,
                _ => EggStatus::Armed,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EggSnapshot {
    pub click_count: u64,
    pub key_sequence: Vec<String>,
    pub cursor_idle_ms: u64,
    pub zones_visited: Vec<String>,
    pub triggered: Vec<EggId>,
    pub statuses: Vec<(EggId, EggStatus)>,
}

pub struct EasterEggEngine {
    eggs: Vec<EggEntry>,
    ctx: ObservationContext,
    triggered: BTreeSet<EggId>,
}

impl EasterEggEngine {
    /// An engine with no eggs registered.
    pub fn new(wall_time: NaiveDateTime) -> Self {
        Self {
            eggs: Vec::new(),
            ctx: ObservationContext::new(wall_time),
            triggered: BTreeSet::new(),
        }
    }

    /// The site's registry, in priority order.
    pub fn with_default_eggs(wall_time: NaiveDateTime) -> Self {
        let mut engine = Self::new(wall_time);
        for egg in default_eggs() {
            engine.register(egg);
        }
        engine
    }

    pub fn register(&mut self, config: EggConfig) {
        log::debug!("[eggs] registered {}", config.id.as_str());
        self.eggs.push(EggEntry {
            config,
            last_fired: None,
            fired_count: 0,
        });
    }

    pub fn context(&self) -> &ObservationContext {
        &self.ctx
    }

    pub fn status(&self, id: EggId, now: Duration) -> Option<EggStatus> {
        self.eggs
            .iter()
            .find(|e| e.config.id == id)
            .map(|e| e.status(now))
    }

    pub fn fired_count(&self, id: EggId) -> u32 {
        self.eggs
            .iter()
            .find(|e| e.config.id == id)
            .map_or(0, |e| e.fired_count)
    }

    pub fn triggered(&self) -> impl Iterator<Item = EggId> + '_ {
        self.triggered.iter().copied()
    }

    pub fn record_click(&mut self, now: Duration, bus: &mut SignalBus) -> Option<EggId> {
        self.ctx.click_count += 1;
        self.evaluate(TriggerKind::Click, now, bus)
    }

    pub fn record_key(&mut self, code: &str, now: Duration, bus: &mut SignalBus) -> Option<EggId> {
        if self.ctx.key_sequence.len() == KEY_SEQUENCE_MAX {
            self.ctx.key_sequence.pop_front();
        }
        self.ctx.key_sequence.push_back(code.to_string());
        self.evaluate(TriggerKind::KeySequence, now, bus)
    }

    /// Any pointer movement clears the idle counter. Nothing is evaluated.
    pub fn pointer_moved(&mut self) {
        self.ctx.cursor_idle = Duration::ZERO;
    }

    /// Called on the fixed idle interval.
    pub fn idle_tick(&mut self, now: Duration, bus: &mut SignalBus) -> Option<EggId> {
        self.ctx.cursor_idle += Duration::from_millis(CURSOR_IDLE_TICK_MS);
        self.evaluate(TriggerKind::Idle, now, bus)
    }

    pub fn refresh_clock(
        &mut self,
        wall_time: NaiveDateTime,
        now: Duration,
        bus: &mut SignalBus,
    ) -> Option<EggId> {
        self.ctx.wall_time = wall_time;
        self.evaluate(TriggerKind::Time, now, bus)
    }

    pub fn record_console_command(
        &mut self,
        command: &str,
        now: Duration,
        bus: &mut SignalBus,
    ) -> Option<EggId> {
        self.ctx.console_commands.push(command.to_string());
        self.evaluate(TriggerKind::Console, now, bus)
    }

    pub fn record_zone_visit(
        &mut self,
        zone: &str,
        now: Duration,
        bus: &mut SignalBus,
    ) -> Option<EggId> {
        self.ctx.zones_visited.insert(zone.to_string());
        self.evaluate(TriggerKind::Zone, now, bus)
    }

    /// Manual trigger by id string, still subject to one-shot and cooldown
    /// gating. Unknown ids are logged and ignored.
    pub fn force_trigger(&mut self, id: &str, now: Duration, bus: &mut SignalBus) -> bool {
        let Some(egg) = EggId::parse(id) else {
            log::warn!("[eggs] unknown easter egg `{}`", id);
            return false;
        };
        let Some(index) = self.eggs.iter().position(|e| e.config.id == egg) else {
            log::warn!("[eggs] easter egg `{}` is not registered", id);
            return false;
        };
        if self.eggs[index].status(now) != EggStatus::Armed {
            return false;
        }
        self.fire(index, now, bus);
        true
    }

    pub fn snapshot(&self, now: Duration) -> EggSnapshot {
        EggSnapshot {
            click_count: self.ctx.click_count,
            key_sequence: self.ctx.key_sequence.iter().cloned().collect(),
            cursor_idle_ms: self.ctx.cursor_idle.as_millis() as u64,
            zones_visited: self.ctx.zones_visited.iter().cloned().collect(),
            triggered: self.triggered.iter().copied().collect(),
            statuses: self
                .eggs
                .iter()
                .map(|e| (e.config.id, e.status(now)))
                .collect(),
        }
    }

    fn evaluate(&mut self, kind: TriggerKind, now: Duration, bus: &mut SignalBus) -> Option<EggId> {
        let index = self.eggs.iter().position(|e| {
            e.config.trigger == kind
                && e.status(now) == EggStatus::Armed
                && (e.config.predicate)(&self.ctx)
        })?;
        Some(self.fire(index, now, bus))
    }

    fn fire(&mut self, index: usize, now: Duration, bus: &mut SignalBus) -> EggId {
        let entry = &mut self.eggs[index];
        entry.last_fired = Some(now);
        entry.fired_count += 1;
        let id = entry.config.id;
        log::info!("[eggs] triggered {}", id.as_str());
        match &entry.config.effect {
            Some(effect) => effect(id, &self.ctx, bus),
            None => bus.publish(Signal::EasterEggTriggered { id }),
        }
        self.triggered.insert(id);
        id
    }
}

pub fn is_night(wall_time: NaiveDateTime) -> bool {
    (NIGHT_START_HOUR..NIGHT_END_HOUR).contains(&wall_time.hour())
}

fn default_eggs() -> Vec<EggConfig> {
    vec![
        EggConfig::new(EggId::KonamiCode, TriggerKind::KeySequence, |ctx| {
            ctx.keys_end_with(&KONAMI_SEQUENCE)
        })
        .cooldown(Duration::from_millis(KONAMI_COOLDOWN_MS)),
        EggConfig::new(EggId::ClickCounter, TriggerKind::Click, |ctx| {
            ctx.click_count >= CLICK_MILESTONE && ctx.click_count % CLICK_MILESTONE == 0
        })
        .cooldown(Duration::from_millis(CLICK_COOLDOWN_MS)),
        EggConfig::new(EggId::ConsoleCommand, TriggerKind::Console, |ctx| {
            ctx.latest_command().is_some_and(|cmd| {
                let cmd = cmd.to_lowercase();
                EGG_CONSOLE_COMMANDS.iter().any(|c| cmd.contains(c))
            })
        })
        .cooldown(Duration::from_millis(CONSOLE_COOLDOWN_MS)),
        EggConfig::new(EggId::TimeBased, TriggerKind::Time, |ctx| {
            is_night(ctx.wall_time)
        })
        .one_shot(),
        EggConfig::new(EggId::CursorHide, TriggerKind::Idle, |ctx| {
            ctx.cursor_idle > Duration::from_millis(CURSOR_IDLE_THRESHOLD_MS)
        })
        .cooldown(Duration::from_millis(CURSOR_HIDE_COOLDOWN_MS)),
        EggConfig::new(EggId::SecretZone, TriggerKind::Zone, |ctx| {
            ZONE_IDS.iter().all(|z| ctx.zones_visited.contains(*z))
        })
        .one_shot(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_keys(keys: &[&str]) -> ObservationContext {
        let mut ctx = ObservationContext::new(NaiveDateTime::default());
        ctx.key_sequence = keys.iter().map(|k| k.to_string()).collect();
        ctx
    }

    #[test]
    fn keys_end_with_ignores_older_prefix() {
        let mut keys = vec!["KeyX", "KeyY"];
        keys.extend(KONAMI_SEQUENCE);
        assert!(ctx_with_keys(&keys).keys_end_with(&KONAMI_SEQUENCE));
    }

    #[test]
    fn keys_end_with_needs_full_length() {
        assert!(!ctx_with_keys(&KONAMI_SEQUENCE[1..]).keys_end_with(&KONAMI_SEQUENCE));
    }

    #[test]
    fn egg_ids_round_trip_through_strings() {
        for id in EggId::ALL {
            assert_eq!(EggId::parse(id.as_str()), Some(id));
        }
        assert_eq!(EggId::parse("nope"), None);
    }
}
