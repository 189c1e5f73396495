//! The droid's memory of the visitor, persisted across sessions.
//!
//! Stored as one JSON document under [`PERSONALITY_KEY`]. Every mutation
//! rewrites the whole document; unreadable data resets to defaults.

use crate::constants::PERSONALITY_KEY;
use crate::error::{FolioError, Result};
use crate::zones::ZONE_IDS;
use chrono::{DateTime, Utc};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-browser string store (`localStorage` in the shell).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FnvHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalityState {
    pub exploration_count: u64,
    pub zones_visited: BTreeSet<String>,
    pub time_spent: BTreeMap<String, u64>,
    pub interactions: u64,
    pub last_interaction: Option<DateTime<Utc>>,
}

impl PersonalityState {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(FolioError::from)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trait {
    Curious,
    Explorer,
    Social,
    Experienced,
    Friendly,
}

impl Trait {
    pub fn as_str(self) -> &'static str {
        match self {
            Trait::Curious => "curious",
            Trait::Explorer => "explorer",
            Trait::Social => "social",
            Trait::Experienced => "experienced",
            Trait::Friendly => "friendly",
        }
    }
}

pub struct Personality<S: KeyValueStore> {
    store: S,
    state: PersonalityState,
}

impl<S: KeyValueStore> Personality<S> {
    pub fn load(store: S) -> Self {
        let state = match store.get(PERSONALITY_KEY) {
            Ok(Some(json)) => PersonalityState::from_json(&json).unwrap_or_else(|e| {
                log::error!("[store] failed to load robot personality: {}", e);
                PersonalityState::default()
            }),
            Ok(None) => PersonalityState::default(),
            Err(e) => {
                log::warn!("[store] {}", e);
                PersonalityState::default()
            }
        };
        Self { store, state }
    }

    pub fn state(&self) -> &PersonalityState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn visit_zone(&mut self, zone: &str) {
        self.state.exploration_count += 1;
        self.state.zones_visited.insert(zone.to_string());
        *self.state.time_spent.entry(zone.to_string()).or_insert(0) += 1;
        self.save();
    }

    pub fn record_interaction(&mut self, now: DateTime<Utc>) {
        self.state.interactions += 1;
        self.state.last_interaction = Some(now);
        self.save();
    }

    /// Zone with the most recorded time; ties go to the first key.
    pub fn favorite_zone(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (zone, &time) in &self.state.time_spent {
            if best.map_or(true, |(_, max)| time > max) {
                best = Some((zone, time));
            }
        }
        best.map(|(zone, _)| zone)
    }

    pub fn trait_label(&self) -> Trait {
        let s = &self.state;
        if s.exploration_count == 0 {
            Trait::Curious
        } else if s.zones_visited.len() >= 4 {
            Trait::Explorer
        } else if s.interactions > 20 {
            Trait::Social
        } else if s.exploration_count > 10 {
            Trait::Experienced
        } else {
            Trait::Friendly
        }
    }

    pub fn suggestion(&self) -> Option<String> {
        if self.state.zones_visited.is_empty() {
            return Some(
                "Start by exploring the Medical Tech zone to see life-saving innovations!".into(),
            );
        }
        if let Some(zone) = ZONE_IDS
            .iter()
            .find(|z| !self.state.zones_visited.contains(**z))
        {
            return Some(format!(
                "You haven't visited the {} zone yet. Want to explore it?",
                zone
            ));
        }
        self.favorite_zone()
            .map(|fav| format!("You seem interested in {}. Want to dive deeper?", fav))
    }

    fn save(&mut self) {
        let result = self
            .state
            .to_json()
            .and_then(|json| self.store.set(PERSONALITY_KEY, &json));
        if let Err(e) = result {
            log::warn!("[store] could not persist personality: {}", e);
        }
    }
}
