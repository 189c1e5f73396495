//! Scene composition: turns one tick of simulation state into flat, GPU-ready
//! instance batches plus lighting. Nothing here touches the GPU.

use crate::agent::{AgentFrame, Trail};
use crate::boot::BootPhase;
use crate::lod::LodManager;
use crate::mesh::MeshKind;
use crate::waypoints::Waypoint;
use crate::zones::{rgb, ZoneVisual};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_2;

/// Right-handed perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ease the look-at point toward `focus`, keeping the eye at a fixed offset.
    pub fn follow(&mut self, focus: Vec3, offset: Vec3, blend: f32) {
        self.target = self.target.lerp(focus, blend.clamp(0.0, 1.0));
        self.eye = self.target + offset;
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: emissive strength; yzw unused.
    pub emissive: [f32; 4],
}

impl InstanceRaw {
    fn new(model: Mat4, color: Vec3, alpha: f32, emissive: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.extend(alpha).to_array(),
            emissive: [emissive, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    /// rgb premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Direction the key light travels, w unused.
    pub key_dir: [f32; 4],
    pub key_color: [f32; 4],
    /// rgb fog colour, w density.
    pub fog: [f32; 4],
}

/// Per-frame inputs that are not simulation state.
#[derive(Clone, Copy, Debug, Default)]
pub struct SceneEnv {
    pub time: f32,
    pub night_mode: bool,
    /// Seconds since a celebration started, if one is running.
    pub celebration: Option<f32>,
    /// Boot phase while the boot overlay is up; `None` once powered.
    pub boot: Option<BootPhase>,
}

#[derive(Clone, Debug, Default)]
pub struct SceneFrame {
    pub batches: BTreeMap<MeshKind, Vec<InstanceRaw>>,
    pub lighting: LightingUniform,
    pub clear_color: [f64; 4],
}

impl SceneFrame {
    fn push(&mut self, mesh: MeshKind, instance: InstanceRaw) {
        self.batches.entry(mesh).or_default().push(instance);
    }

    pub fn instance_count(&self) -> usize {
        self.batches.values().map(Vec::len).sum()
    }

    pub fn count(&self, mesh: MeshKind) -> usize {
        self.batches.get(&mesh).map_or(0, Vec::len)
    }
}

const ROBOT_SCALE: f32 = 1.2;
const BODY_WHITE: Vec3 = Vec3::ONE;
const WHEEL_BLACK: Vec3 = Vec3::new(0.1, 0.1, 0.1);
const ACCENT_CYAN: u32 = 0x00D9FF;
const SCANNER_PURPLE: u32 = 0xA855F7;
const CONFETTI: [u32; 5] = [0x00D9FF, 0xA855F7, 0x22D3EE, 0x10B981, 0xF59E0B];
const CONFETTI_PIECES: usize = 50;
const GRID_HALF: i32 = 10;
const FLOOR_Y: f32 = -0.25;

/// `fract(sin(seed) * 10000)`, the lab's deterministic scatter.
#[inline]
pub fn pseudo_random(seed: f32) -> f32 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}

/// Ambient dust, laid out deterministically and bobbing with time.
pub fn particle_positions(count: usize, time: f32) -> impl Iterator<Item = Vec3> {
    (0..count).map(move |k| {
        let seed = (k * 3 + 1) as f32;
        let x = (pseudo_random(seed) - 0.5) * 20.0;
        let y = pseudo_random(seed + 100.0) * 10.0;
        let z = (pseudo_random(seed + 200.0) - 0.5) * 20.0;
        let y = (y + (time + k as f32).sin() * 0.2).rem_euclid(10.0);
        Vec3::new(x, y, z)
    })
}

pub fn compose_scene(
    agent: &AgentFrame,
    zone: &ZoneVisual,
    trail: &Trail,
    waypoints: &[Waypoint],
    lod: &LodManager,
    env: &SceneEnv,
) -> SceneFrame {
    let mut scene = SceneFrame::default();
    let accent = zone.accent();
    let fog = rgb(zone.fog_color);

    let dim = if env.night_mode { 0.5 } else { 1.0 };
    scene.lighting = LightingUniform {
        ambient: (accent * zone.ambient_intensity * dim + Vec3::splat(0.15 * dim))
            .extend(1.0)
            .to_array(),
        key_dir: Vec3::new(-0.4, -1.0, -0.3).normalize().extend(0.0).to_array(),
        key_color: Vec3::splat(0.9 * dim).extend(1.0).to_array(),
        fog: fog.extend(0.03).to_array(),
    };
    scene.clear_color = [fog.x as f64, fog.y as f64, fog.z as f64, 1.0];

    let robot_alpha = env.boot.map_or(1.0, BootPhase::opacity);
    push_robot(&mut scene, agent, robot_alpha);
    push_floor(&mut scene, accent);

    for w in waypoints {
        let is_target = agent
            .target
            .is_some_and(|t| (t.x - w.position.x).abs() < 1e-3 && (t.z - w.position.z).abs() < 1e-3);
        let model = Mat4::from_scale_rotation_translation(
            Vec3::new(0.15, 0.02, 0.15),
            Quat::IDENTITY,
            Vec3::new(w.position.x, FLOOR_Y + 0.01, w.position.z),
        );
        let glow = if is_target { 1.5 } else { 0.4 };
        scene.push(MeshKind::Cylinder, InstanceRaw::new(model, accent, 0.8, glow));
    }

    let n = trail.len().max(1) as f32;
    for (i, p) in trail.points().enumerate() {
        let age = (i + 1) as f32 / n;
        let model = Mat4::from_scale_rotation_translation(Vec3::splat(0.05), Quat::IDENTITY, p);
        scene.push(MeshKind::Cube, InstanceRaw::new(model, accent, 0.6 * age, 1.0));
    }

    for prop in zone.props() {
        scene.push(
            prop.mesh,
            InstanceRaw::new(prop.transform, prop.color, prop.opacity, prop.emissive),
        );
    }

    let particle_color = rgb(zone.particle_color);
    let count = lod.particle_count_limit() as usize;
    for p in particle_positions(count, env.time) {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.03),
            Quat::IDENTITY,
            p + Vec3::Y * FLOOR_Y,
        );
        scene.push(MeshKind::Cube, InstanceRaw::new(model, particle_color, 0.6, 0.6));
    }

    if let Some(t) = env.celebration {
        push_confetti(&mut scene, t);
    }

    scene
}

fn push_robot(scene: &mut SceneFrame, a: &AgentFrame, alpha: f32) {
    let root = Mat4::from_scale_rotation_translation(
        Vec3::splat(ROBOT_SCALE),
        Quat::from_rotation_y(a.heading + a.gesture_yaw),
        a.position + Vec3::Y * (a.bob_offset + a.gesture_bounce),
    );
    let accent = rgb(ACCENT_CYAN);
    let purple = rgb(SCANNER_PURPLE);
    let part = |t: Vec3, r: Quat, s: Vec3| root * Mat4::from_scale_rotation_translation(s, r, t);

    // body
    scene.push(
        MeshKind::Cylinder,
        InstanceRaw::new(
            part(
                Vec3::new(0.0, 0.3, 0.0),
                Quat::from_rotation_z(a.body_tilt),
                Vec3::new(0.4, 0.6, 0.4),
            ),
            BODY_WHITE,
            alpha,
            0.3,
        ),
    );
    // dome
    scene.push(
        MeshKind::Sphere,
        InstanceRaw::new(
            part(
                Vec3::new(0.0, 0.65, 0.0),
                Quat::from_rotation_y(a.dome_yaw),
                Vec3::splat(0.35),
            ),
            BODY_WHITE,
            alpha,
            0.2,
        ),
    );
    // eye
    scene.push(
        MeshKind::Cylinder,
        InstanceRaw::new(
            part(
                Vec3::new(0.0, 0.7, 0.32),
                Quat::from_rotation_x(FRAC_PI_2),
                Vec3::new(0.08, 0.05, 0.08),
            ),
            accent,
            alpha,
            a.eye_intensity * 1.5,
        ),
    );
    // scanner
    scene.push(
        MeshKind::Cube,
        InstanceRaw::new(
            part(
                Vec3::new(0.0, 0.6, 0.35),
                Quat::from_rotation_y(a.scanner_angle),
                Vec3::new(0.1, 0.05, 0.15),
            ),
            purple,
            alpha,
            a.scanner_intensity,
        ),
    );
    // wheels spin about their own axle (x after the quarter turn)
    for side in [-1.0_f32, 1.0] {
        scene.push(
            MeshKind::Cylinder,
            InstanceRaw::new(
                part(
                    Vec3::new(0.35 * side, 0.0, 0.0),
                    Quat::from_rotation_x(a.wheel_angle) * Quat::from_rotation_z(FRAC_PI_2),
                    Vec3::new(0.2, 0.15, 0.2),
                ),
                WHEEL_BLACK,
                alpha,
                0.0,
            ),
        );
    }
    // status light
    scene.push(
        MeshKind::Sphere,
        InstanceRaw::new(
            part(Vec3::new(0.0, 0.2, 0.41), Quat::IDENTITY, Vec3::splat(0.05)),
            Vec3::from_array(a.indicator_color),
            alpha,
            1.5,
        ),
    );
    if a.scan_beam_visible {
        let beam = Quat::from_rotation_y(a.scan_beam_angle) * Quat::from_rotation_x(FRAC_PI_2);
        let offset = beam * Vec3::new(0.0, 0.75, 0.0);
        scene.push(
            MeshKind::Cylinder,
            InstanceRaw::new(
                part(
                    Vec3::new(0.0, 0.6, 0.35) + offset,
                    beam,
                    Vec3::new(0.03, 1.5, 0.03),
                ),
                purple,
                0.5 * alpha,
                2.0,
            ),
        );
    }
}

fn push_floor(scene: &mut SceneFrame, accent: Vec3) {
    let span = (GRID_HALF * 2) as f32;
    for i in -GRID_HALF..=GRID_HALF {
        let o = i as f32;
        for (t, s) in [
            (Vec3::new(o, FLOOR_Y, 0.0), Vec3::new(0.01, 0.005, span)),
            (Vec3::new(0.0, FLOOR_Y, o), Vec3::new(span, 0.005, 0.01)),
        ] {
            let model = Mat4::from_scale_rotation_translation(s, Quat::IDENTITY, t);
            scene.push(MeshKind::Cube, InstanceRaw::new(model, accent, 0.35, 0.5));
        }
    }
}

fn push_confetti(scene: &mut SceneFrame, t: f32) {
    for k in 0..CONFETTI_PIECES {
        let seed = k as f32 + 0.5;
        let x = (pseudo_random(seed) - 0.5) * 16.0;
        let z = (pseudo_random(seed + 50.0) - 0.5) * 16.0;
        let fall = 2.0 + pseudo_random(seed + 90.0) * 2.0;
        let y = 8.0 - t * fall;
        if y < FLOOR_Y {
            continue;
        }
        let color = rgb(CONFETTI[k % CONFETTI.len()]);
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.1),
            Quat::from_rotation_z(t * 4.0 + seed),
            Vec3::new(x, y, z),
        );
        scene.push(MeshKind::Cube, InstanceRaw::new(model, color, 1.0, 1.0));
    }
}
