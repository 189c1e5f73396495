//! The droid's autonomous movement loop.
//!
//! [`Agent::update`] advances the simulation by one frame and returns a fresh
//! [`AgentFrame`]: everything the renderer needs, recomputed from state every
//! tick. The renderer never mutates the agent.

use crate::constants::{
    ARRIVAL_TOLERANCE, BOB_AMPLITUDE, BOB_FREQUENCY, DEFAULT_LINEAR_SPEED,
    DOME_IDLE_SPIN_RAD_PER_SEC, EXPLORE_DELAY_MS, EYE_FLASH_FREQUENCY, EYE_FLASH_THRESHOLD,
    GESTURE_MS, LOOK_AROUND_MS, MAX_FRAME_DT_SEC, MOVE_HEADING_TOLERANCE_RAD, SCANNER_SPIN_RAD_PER_SEC,
    SCAN_DWELL_MS, TILT_AMPLITUDE, TILT_DECAY_PER_FRAME, TRAIL_CAPACITY, TRAIL_LIFT,
    TRAIL_MIN_STEP, TURN_RATE_RAD_PER_SEC, TURN_THRESHOLD_RAD, WHEEL_SPIN_PER_UNIT,
};
use crate::waypoints::{planar_distance, Waypoint};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::f32::consts::{PI, TAU};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    /// Exploring with nothing to explore.
    Idle,
    Exploring,
    Moving,
    Scanning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gesture {
    Dance,
    Wave,
    LookAround,
}

impl Gesture {
    pub fn duration(self) -> Duration {
        match self {
            Gesture::Dance | Gesture::Wave => Duration::from_millis(GESTURE_MS),
            Gesture::LookAround => Duration::from_millis(LOOK_AROUND_MS),
        }
    }

    /// `robot.dance` / `robot.wave` console commands.
    pub fn from_command(command: &str) -> Option<Self> {
        match command.trim().to_lowercase().as_str() {
            "robot.dance" => Some(Gesture::Dance),
            "robot.wave" => Some(Gesture::Wave),
            _ => None,
        }
    }

    /// Inverse of [`Gesture::from_command`]; look-around has no command.
    pub fn command(self) -> Option<&'static str> {
        match self {
            Gesture::Dance => Some("robot.dance"),
            Gesture::Wave => Some("robot.wave"),
            Gesture::LookAround => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AgentTuning {
    pub linear_speed: f32,
    pub turn_rate: f32,
    pub arrival_tolerance: f32,
    pub turn_threshold: f32,
    pub move_heading_tolerance: f32,
    pub explore_delay: Duration,
    pub scan_dwell: Duration,
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            linear_speed: DEFAULT_LINEAR_SPEED,
            turn_rate: TURN_RATE_RAD_PER_SEC,
            arrival_tolerance: ARRIVAL_TOLERANCE,
            turn_threshold: TURN_THRESHOLD_RAD,
            move_heading_tolerance: MOVE_HEADING_TOLERANCE_RAD,
            explore_delay: Duration::from_millis(EXPLORE_DELAY_MS),
            scan_dwell: Duration::from_millis(SCAN_DWELL_MS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AgentEvent {
    StartedMoving { target: Vec3 },
    Arrived { target: Vec3 },
    ScanComplete,
}

pub type AgentEvents = SmallVec<[AgentEvent; 2]>;

const IDLE_INDICATOR: [f32; 3] = [0.0, 0.85, 1.0];
const MOVING_INDICATOR: [f32; 3] = [0.063, 0.725, 0.506];
const SCANNING_INDICATOR: [f32; 3] = [0.961, 0.620, 0.043];

/// Per-tick render snapshot of the droid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFrame {
    pub position: Vec3,
    pub heading: f32,
    pub mode: AgentMode,
    pub target: Option<Vec3>,
    pub wheel_angle: f32,
    pub scanner_angle: f32,
    pub dome_yaw: f32,
    pub body_tilt: f32,
    pub bob_offset: f32,
    pub eye_intensity: f32,
    pub scanner_intensity: f32,
    pub indicator_color: [f32; 3],
    pub scan_beam_visible: bool,
    pub scan_beam_angle: f32,
    pub gesture: Option<Gesture>,
    pub gesture_yaw: f32,
    pub gesture_bounce: f32,
    pub speed_multiplier: f32,
}

/// Bounded ring of past positions; the oldest sample is overwritten.
#[derive(Clone, Debug)]
pub struct Trail {
    samples: VecDeque<Vec3>,
    capacity: usize,
    min_step: f32,
    last: Option<Vec3>,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(TRAIL_CAPACITY, TRAIL_MIN_STEP)
    }
}

impl Trail {
    pub fn new(capacity: usize, min_step: f32) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            min_step,
            last: None,
        }
    }

    /// Records `position` if it is far enough from the last sample.
    pub fn sample(&mut self, position: Vec3) -> bool {
        if let Some(last) = self.last {
            if position.distance(last) <= self.min_step {
                return false;
            }
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(position + Vec3::Y * TRAIL_LIFT);
        self.last = Some(position);
        true
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = Vec3> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.last = None;
    }
}

/// Wrap an angle into (-PI, PI].
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w == -PI {
        PI
    } else {
        w
    }
}

/// Heading convention: 0 faces +z, positive yaw turns toward +x.
#[inline]
pub fn bearing(from: Vec3, to: Vec3) -> f32 {
    (to.x - from.x).atan2(to.z - from.z)
}

pub struct Agent {
    tuning: AgentTuning,
    rng: StdRng,
    clock: Duration,
    mode: AgentMode,
    mode_since: Duration,
    position: Vec3,
    heading: f32,
    target: Option<Vec3>,
    last_target: Option<Vec3>,
    turning: bool,
    wheel_angle: f32,
    scanner_angle: f32,
    dome_yaw: f32,
    body_tilt: f32,
    bob_offset: f32,
    gesture: Option<(Gesture, Duration)>,
    speed_multiplier: f32,
    trail: Trail,
}

impl Agent {
    pub fn new(tuning: AgentTuning, seed: u64) -> Self {
        Self {
            tuning,
            rng: StdRng::seed_from_u64(seed),
            clock: Duration::ZERO,
            mode: AgentMode::Exploring,
            mode_since: Duration::ZERO,
            position: Vec3::ZERO,
            heading: 0.0,
            target: None,
            last_target: None,
            turning: false,
            wheel_angle: 0.0,
            scanner_angle: 0.0,
            dome_yaw: 0.0,
            body_tilt: 0.0,
            bob_offset: 0.0,
            gesture: None,
            speed_multiplier: 1.0,
            trail: Trail::default(),
        }
    }

    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    /// Simulation time of the last mode change.
    pub fn mode_since(&self) -> Duration {
        self.mode_since
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Where the agent last arrived, kept after the scan ends.
    pub fn last_target(&self) -> Option<Vec3> {
        self.last_target
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn gesture(&self) -> Option<Gesture> {
        self.gesture.map(|(g, _)| g)
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.max(0.0);
    }

    /// Gestures overlay the body animation; navigation carries on.
    pub fn start_gesture(&mut self, gesture: Gesture) {
        log::info!("[agent] gesture {:?}", gesture);
        self.gesture = Some((gesture, self.clock));
    }

    /// Advance one frame. `dt` is in seconds and is clamped so a hidden tab
    /// does not teleport the droid.
    pub fn update(&mut self, dt: f32, waypoints: &[Waypoint]) -> (AgentFrame, AgentEvents) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.clock += Duration::from_secs_f32(dt);
        let mut events = AgentEvents::new();

        match self.mode {
            AgentMode::Idle | AgentMode::Exploring => self.explore(waypoints, &mut events),
            AgentMode::Moving => self.steer(dt, &mut events),
            AgentMode::Scanning => {
                self.scanner_angle = wrap_angle(self.scanner_angle + SCANNER_SPIN_RAD_PER_SEC * dt);
                if self.clock - self.mode_since >= self.tuning.scan_dwell {
                    self.target = None;
                    self.set_mode(AgentMode::Exploring);
                    events.push(AgentEvent::ScanComplete);
                }
            }
        }

        self.trail.sample(self.position);
        self.animate(dt);
        (self.frame(), events)
    }

    /// Snapshot of the current state without advancing time.
    pub fn frame(&self) -> AgentFrame {
        let t = self.clock.as_secs_f32();
        let idle = matches!(self.mode, AgentMode::Idle | AgentMode::Exploring);
        let scanning = self.mode == AgentMode::Scanning;

        let eye_intensity = if idle && (t * EYE_FLASH_FREQUENCY).sin() > EYE_FLASH_THRESHOLD {
            2.0
        } else {
            1.0
        };
        let indicator_color = match self.mode {
            AgentMode::Moving => MOVING_INDICATOR,
            AgentMode::Scanning => SCANNING_INDICATOR,
            AgentMode::Idle | AgentMode::Exploring => IDLE_INDICATOR,
        };

        let (gesture, gesture_yaw, gesture_bounce, dome_wiggle) = match self.gesture {
            Some((g, start)) => {
                let e = (self.clock - start).as_secs_f32();
                match g {
                    Gesture::Dance => (
                        Some(g),
                        (e * 8.0).sin() * 0.6,
                        (e * 10.0).sin().abs() * 0.15,
                        (e * 6.0).sin() * 0.3,
                    ),
                    Gesture::Wave => (Some(g), 0.0, 0.0, (e * 12.0).sin() * 0.4),
                    Gesture::LookAround => (Some(g), 0.0, 0.0, (e * 2.0).sin() * 1.2),
                }
            }
            None => (None, 0.0, 0.0, 0.0),
        };

        AgentFrame {
            position: self.position,
            heading: self.heading,
            mode: self.mode,
            target: self.target,
            wheel_angle: self.wheel_angle,
            scanner_angle: self.scanner_angle,
            dome_yaw: self.dome_yaw + dome_wiggle,
            body_tilt: self.body_tilt,
            bob_offset: self.bob_offset,
            eye_intensity,
            scanner_intensity: if scanning { 2.0 } else { 0.5 },
            indicator_color,
            scan_beam_visible: scanning,
            scan_beam_angle: self.scanner_angle,
            gesture,
            gesture_yaw,
            gesture_bounce,
            speed_multiplier: self.speed_multiplier,
        }
    }

    fn set_mode(&mut self, mode: AgentMode) {
        if self.mode != mode {
            log::debug!("[agent] {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
            self.mode_since = self.clock;
        }
    }

    fn explore(&mut self, waypoints: &[Waypoint], events: &mut AgentEvents) {
        if waypoints.is_empty() {
            self.set_mode(AgentMode::Idle);
            return;
        }
        if self.mode == AgentMode::Idle {
            self.set_mode(AgentMode::Exploring);
            return;
        }
        if self.clock - self.mode_since < self.tuning.explore_delay {
            return;
        }
        let pick = &waypoints[self.rng.gen_range(0..waypoints.len())];
        let target = Vec3::new(pick.position.x, 0.0, pick.position.z);
        self.target = Some(target);
        self.set_mode(AgentMode::Moving);
        events.push(AgentEvent::StartedMoving { target });
    }

    fn steer(&mut self, dt: f32, events: &mut AgentEvents) {
        let Some(target) = self.target else {
            self.set_mode(AgentMode::Exploring);
            return;
        };
        let distance = planar_distance(self.position, target);
        if distance <= self.tuning.arrival_tolerance {
            self.turning = false;
            self.last_target = Some(target);
            self.set_mode(AgentMode::Scanning);
            events.push(AgentEvent::Arrived { target });
            return;
        }

        let error = wrap_angle(bearing(self.position, target) - self.heading);
        self.turning = error.abs() > self.tuning.turn_threshold;
        let max_turn = self.tuning.turn_rate * dt;
        self.heading = wrap_angle(self.heading + error.clamp(-max_turn, max_turn));

        let error = wrap_angle(bearing(self.position, target) - self.heading);
        if error.abs() < self.tuning.move_heading_tolerance {
            let step = (self.tuning.linear_speed * self.speed_multiplier * dt).min(distance);
            self.position.x += self.heading.sin() * step;
            self.position.z += self.heading.cos() * step;
            self.wheel_angle = wrap_angle(self.wheel_angle + step * WHEEL_SPIN_PER_UNIT);
        }
    }

    fn animate(&mut self, dt: f32) {
        let t = self.clock.as_secs_f32();
        match self.mode {
            AgentMode::Idle | AgentMode::Exploring => {
                self.bob_offset = (t * BOB_FREQUENCY).sin() * BOB_AMPLITUDE;
                self.dome_yaw = wrap_angle(self.dome_yaw + DOME_IDLE_SPIN_RAD_PER_SEC * dt);
            }
            AgentMode::Scanning => {
                self.bob_offset *= decay(dt);
                self.dome_yaw = (t * 2.0).sin() * 0.1;
            }
            AgentMode::Moving => self.bob_offset *= decay(dt),
        }

        if self.turning {
            self.body_tilt = (t * 5.0).sin() * TILT_AMPLITUDE;
        } else {
            self.body_tilt *= decay(dt);
        }

        if let Some((g, start)) = self.gesture {
            if self.clock - start >= g.duration() {
                self.gesture = None;
            }
        }
    }
}

/// Per-frame easing factor scaled to the actual frame length.
#[inline]
fn decay(dt: f32) -> f32 {
    TILT_DECAY_PER_FRAME.powf(dt * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_stays_in_half_open_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn bearing_zero_faces_positive_z() {
        assert!(bearing(Vec3::ZERO, Vec3::Z).abs() < 1e-6);
        assert!((bearing(Vec3::ZERO, Vec3::X) - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn decay_matches_per_frame_factor_at_60fps() {
        assert!((decay(1.0 / 60.0) - TILT_DECAY_PER_FRAME).abs() < 1e-5);
    }
}
