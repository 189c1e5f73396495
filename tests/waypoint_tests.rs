// Host-side tests for waypoint hand-out and lookup.

use folio_core::waypoints::{distance, exploration_waypoints, Waypoint, WaypointKind, WaypointSystem};

fn abc() -> WaypointSystem {
    WaypointSystem::new(vec![
        Waypoint::at("a", 0.0, 0.0),
        Waypoint::at("b", 4.0, 0.0),
        Waypoint::at("c", 0.0, 3.0),
    ])
}

fn next_id(system: &mut WaypointSystem) -> Option<String> {
    system.next_waypoint().map(|w| w.id.clone())
}

#[test]
fn hands_out_round_robin_skipping_visited() {
    let mut s = abc();
    assert_eq!(next_id(&mut s).as_deref(), Some("a"));
    assert_eq!(next_id(&mut s).as_deref(), Some("b"));
    s.mark_visited("a");
    assert_eq!(next_id(&mut s).as_deref(), Some("c"));
    assert_eq!(next_id(&mut s).as_deref(), Some("b"));
}

#[test]
fn restarts_once_everything_is_visited() {
    let mut s = abc();
    for id in ["a", "b", "c"] {
        s.mark_visited(id);
    }
    assert_eq!(next_id(&mut s).as_deref(), Some("a"));
    assert!(!s.is_visited("a"));
    assert!(!s.is_visited("c"));
    assert_eq!(next_id(&mut s).as_deref(), Some("b"));
}

#[test]
fn empty_system_yields_nothing() {
    let mut s = WaypointSystem::new(Vec::new());
    assert!(s.next_waypoint().is_none());
    assert!(s.find_nearest(1.0, 1.0).is_none());
    assert!(s.tour().next().is_none());
}

#[test]
fn nearest_uses_the_floor_plane_and_first_wins_ties() {
    let mut s = abc();
    assert_eq!(s.find_nearest(3.5, 0.2).map(|w| w.id.as_str()), Some("b"));
    // equidistant from a and b
    assert_eq!(s.find_nearest(2.0, 0.0).map(|w| w.id.as_str()), Some("a"));
    let mut high = Waypoint::at("high", 0.0, 3.0);
    high.position.y = 50.0;
    s.clear();
    s.add_waypoint(high);
    assert_eq!(s.find_nearest(0.0, 3.0).map(|w| w.id.as_str()), Some("high"));
}

#[test]
fn planar_distance_ignores_height() {
    let a = Waypoint::at("a", 0.0, 0.0);
    let mut b = Waypoint::at("b", 3.0, 4.0);
    b.position.y = 10.0;
    assert!((distance(&a, &b) - 5.0).abs() < 1e-6);
}

#[test]
fn tour_marks_as_it_goes_and_cycles() {
    let mut s = abc();
    let ids: Vec<String> = s.tour().take(4).map(|w| w.id).collect();
    assert_eq!(ids, vec!["a", "b", "c", "a"]);
    assert!(s.is_visited("a"));
}

#[test]
fn lookup_and_builders() {
    let mut s = abc();
    s.add_waypoint(
        Waypoint::at("lab", 1.0, 1.0)
            .with_label("Robotics lab")
            .with_kind(WaypointKind::Zone),
    );
    let lab = s.waypoint_by_id("lab").expect("lab registered");
    assert_eq!(lab.label.as_deref(), Some("Robotics lab"));
    assert_eq!(lab.kind, Some(WaypointKind::Zone));
    assert!(s.waypoint_by_id("nope").is_none());
    assert_eq!(s.len(), 4);
    s.clear();
    assert!(s.is_empty());
}

#[test]
fn default_network_covers_the_floor() {
    let net = exploration_waypoints();
    assert_eq!(net.len(), 21);
    assert!(net.iter().all(|w| w.position.x.abs() <= 10.0 && w.position.z.abs() <= 10.0));
    let s = WaypointSystem::or_exploration(Vec::new());
    assert_eq!(s.len(), 21);
    assert!(s.waypoint_by_id("center").is_some());
    let custom = WaypointSystem::or_exploration(vec![Waypoint::at("x", 1.0, 1.0)]);
    assert_eq!(custom.len(), 1);
}
