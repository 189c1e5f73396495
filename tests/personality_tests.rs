// Visitor memory: persistence, traits and suggestions.

use chrono::{TimeZone, Utc};
use folio_core::constants::PERSONALITY_KEY;
use folio_core::error::{FolioError, Result};
use folio_core::personality::{
    KeyValueStore, MemoryStore, Personality, PersonalityState, Trait,
};

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(FolioError::Storage("private browsing".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(FolioError::Storage("quota exceeded".into()))
    }
}

#[test]
fn fresh_visitor_is_curious() {
    let p = Personality::load(MemoryStore::new());
    assert_eq!(p.state(), &PersonalityState::default());
    assert_eq!(p.trait_label(), Trait::Curious);
    assert_eq!(p.favorite_zone(), None);
    assert!(p
        .suggestion()
        .is_some_and(|s| s.starts_with("Start by exploring the Medical Tech zone")));
}

#[test]
fn visits_persist_under_one_key() {
    let mut p = Personality::load(MemoryStore::new());
    p.visit_zone("web");
    p.visit_zone("web");
    p.visit_zone("about");
    let stored = p.store().raw(PERSONALITY_KEY).map(str::to_string);
    let reloaded = Personality::load(p.into_store());
    assert_eq!(reloaded.state().exploration_count, 3);
    assert_eq!(reloaded.state().time_spent.get("web"), Some(&2));
    assert_eq!(reloaded.favorite_zone(), Some("web"));

    let json: serde_json::Value = serde_json::from_str(&stored.unwrap()).unwrap();
    assert_eq!(json["explorationCount"], 3);
    assert!(json["zonesVisited"].is_array());
}

#[test]
fn malformed_json_resets_to_defaults() {
    let store = MemoryStore::with_entry(PERSONALITY_KEY, "{not json");
    let p = Personality::load(store);
    assert_eq!(p.state(), &PersonalityState::default());
}

#[test]
fn missing_fields_take_defaults() {
    let store = MemoryStore::with_entry(PERSONALITY_KEY, r#"{"interactions":7}"#);
    let p = Personality::load(store);
    assert_eq!(p.state().interactions, 7);
    assert_eq!(p.state().exploration_count, 0);
}

#[test]
fn storage_failures_are_swallowed() {
    let mut p = Personality::load(BrokenStore);
    p.visit_zone("medical");
    assert_eq!(p.state().exploration_count, 1);
}

#[test]
fn interactions_stamp_the_time() {
    let mut p = Personality::load(MemoryStore::new());
    let t = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
    p.record_interaction(t);
    assert_eq!(p.state().interactions, 1);
    assert_eq!(p.state().last_interaction, Some(t));
}

#[test]
fn trait_precedence() {
    let mut p = Personality::load(MemoryStore::new());
    p.visit_zone("web");
    assert_eq!(p.trait_label(), Trait::Friendly);

    for _ in 0..21 {
        p.record_interaction(Utc::now());
    }
    assert_eq!(p.trait_label(), Trait::Social);

    for zone in ["medical", "vr-ai", "robotics"] {
        p.visit_zone(zone);
    }
    assert_eq!(p.trait_label(), Trait::Explorer);
    assert_eq!(Trait::Explorer.as_str(), "explorer");

    let mut veteran = Personality::load(MemoryStore::new());
    for _ in 0..11 {
        veteran.visit_zone("about");
    }
    assert_eq!(veteran.trait_label(), Trait::Experienced);
}

#[test]
fn suggestions_point_at_unvisited_zones_then_the_favourite() {
    let mut p = Personality::load(MemoryStore::new());
    p.visit_zone("medical");
    assert_eq!(
        p.suggestion().as_deref(),
        Some("You haven't visited the vr-ai zone yet. Want to explore it?")
    );
    for zone in ["vr-ai", "robotics", "web", "about", "robotics"] {
        p.visit_zone(zone);
    }
    assert_eq!(
        p.suggestion().as_deref(),
        Some("You seem interested in robotics. Want to dive deeper?")
    );
}

#[test]
fn favourite_ties_go_to_the_first_key() {
    let mut p = Personality::load(MemoryStore::new());
    p.visit_zone("web");
    p.visit_zone("about");
    assert_eq!(p.favorite_zone(), Some("about"));
}
