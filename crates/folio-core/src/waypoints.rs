//! Waypoint registry with round-robin "next unvisited" hand-out.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointKind {
    Content,
    Exploration,
    Zone,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub position: Vec3,
    pub label: Option<String>,
    pub kind: Option<WaypointKind>,
}

impl Waypoint {
    /// A waypoint on the floor plane.
    pub fn at(id: impl Into<String>, x: f32, z: f32) -> Self {
        Self {
            id: id.into(),
            position: Vec3::new(x, 0.0, z),
            label: None,
            kind: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: WaypointKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Planar (x/z) distance between two waypoints.
pub fn distance(a: &Waypoint, b: &Waypoint) -> f32 {
    planar_distance(a.position, b.position)
}

#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

#[derive(Clone, Debug, Default)]
pub struct WaypointSystem {
    waypoints: Vec<Waypoint>,
    cursor: usize,
    visited: HashSet<String>,
}

impl WaypointSystem {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            cursor: 0,
            visited: HashSet::new(),
        }
    }

    /// Falls back to the lab's exploration network when `waypoints` is empty.
    pub fn or_exploration(waypoints: Vec<Waypoint>) -> Self {
        if waypoints.is_empty() {
            Self::new(exploration_waypoints())
        } else {
            Self::new(waypoints)
        }
    }

    pub fn add_waypoint(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Next waypoint in insertion order that has not been marked visited.
    /// Once everything is visited the set is cleared and the cycle restarts
    /// at the first waypoint.
    pub fn next_waypoint(&mut self) -> Option<&Waypoint> {
        let n = self.waypoints.len();
        if n == 0 {
            return None;
        }
        for _ in 0..n {
            let index = self.cursor % n;
            self.cursor = (self.cursor + 1) % n;
            if !self.visited.contains(&self.waypoints[index].id) {
                return Some(&self.waypoints[index]);
            }
        }
        self.visited.clear();
        self.cursor = 1 % n;
        Some(&self.waypoints[0])
    }

    pub fn mark_visited(&mut self, id: &str) {
        self.visited.insert(id.to_string());
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.contains(id)
    }

    pub fn waypoint_by_id(&self, id: &str) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id == id)
    }

    pub fn all_waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.visited.clear();
        self.cursor = 0;
    }

    /// Closest waypoint on the floor plane; the earliest one wins ties.
    pub fn find_nearest(&self, x: f32, z: f32) -> Option<&Waypoint> {
        let probe = Vec3::new(x, 0.0, z);
        let mut best: Option<(&Waypoint, f32)> = None;
        for w in &self.waypoints {
            let d = planar_distance(w.position, probe);
            if best.map_or(true, |(_, min)| d < min) {
                best = Some((w, d));
            }
        }
        best.map(|(w, _)| w)
    }

    /// Endless walk that marks each waypoint visited as it is handed out.
    pub fn tour(&mut self) -> Tour<'_> {
        Tour { system: self }
    }
}

pub struct Tour<'a> {
    system: &'a mut WaypointSystem,
}

impl Iterator for Tour<'_> {
    type Item = Waypoint;

    fn next(&mut self) -> Option<Waypoint> {
        let waypoint = self.system.next_waypoint()?.clone();
        self.system.mark_visited(&waypoint.id);
        Some(waypoint)
    }
}

const EXPLORATION: [(&str, f32, f32); 21] = [
    // corners
    ("corner-tl", -10.0, -10.0),
    ("corner-tr", 10.0, -10.0),
    ("corner-br", 10.0, 10.0),
    ("corner-bl", -10.0, 10.0),
    // inner edges
    ("edge-tl", -8.0, -8.0),
    ("edge-tr", 8.0, -8.0),
    ("edge-br", 8.0, 8.0),
    ("edge-bl", -8.0, 8.0),
    // centre ring
    ("center", 0.0, 0.0),
    ("center-tl", -5.0, -5.0),
    ("center-tr", 5.0, -5.0),
    ("center-br", 5.0, 5.0),
    ("center-bl", -5.0, 5.0),
    // cross
    ("mid-left", -3.0, 0.0),
    ("mid-right", 3.0, 0.0),
    ("mid-top", 0.0, -3.0),
    ("mid-bottom", 0.0, 3.0),
    // scattered
    ("explore-1", -7.0, 2.0),
    ("explore-2", 7.0, -2.0),
    ("explore-3", -2.0, -7.0),
    ("explore-4", 2.0, 7.0),
];

/// The floor network the droid roams when the page supplies no waypoints.
pub fn exploration_waypoints() -> Vec<Waypoint> {
    EXPLORATION
        .iter()
        .map(|(id, x, z)| Waypoint::at(*id, *x, *z).with_kind(WaypointKind::Exploration))
        .collect()
}
