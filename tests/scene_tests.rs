// Scene composition and procedural meshes.

use folio_core::agent::{Agent, AgentFrame, AgentTuning, Trail};
use folio_core::boot::BootPhase;
use folio_core::lod::{DeviceTier, LodManager};
use folio_core::mesh::MeshKind;
use folio_core::scene::{
    compose_scene, particle_positions, Camera, LightingUniform, SceneEnv, SceneFrame,
};
use folio_core::waypoints::Waypoint;
use folio_core::zones::{rgb, zone_visual, HUB};
use glam::Vec3;

fn robot() -> AgentFrame {
    Agent::new(AgentTuning::default(), 1).frame()
}

fn compose(zone: &str, waypoints: &[Waypoint], tier: DeviceTier, env: SceneEnv) -> SceneFrame {
    compose_scene(
        &robot(),
        zone_visual(zone),
        &Trail::new(100, 0.15),
        waypoints,
        &LodManager::with_tier(tier),
        &env,
    )
}

#[test]
fn particle_budget_follows_the_tier() {
    let high = compose(HUB, &[], DeviceTier::High, SceneEnv::default());
    let mobile = compose(HUB, &[], DeviceTier::Mobile, SceneEnv::default());
    assert_eq!(
        high.count(MeshKind::Cube) - mobile.count(MeshKind::Cube),
        2000 - 200
    );
    assert_eq!(high.count(MeshKind::Sphere), mobile.count(MeshKind::Sphere));
}

#[test]
fn each_waypoint_gets_a_marker() {
    let none = compose(HUB, &[], DeviceTier::Mobile, SceneEnv::default());
    let three = compose(
        HUB,
        &[
            Waypoint::at("a", 1.0, 1.0),
            Waypoint::at("b", -2.0, 0.0),
            Waypoint::at("c", 0.0, 4.0),
        ],
        DeviceTier::Mobile,
        SceneEnv::default(),
    );
    assert_eq!(three.count(MeshKind::Cylinder), none.count(MeshKind::Cylinder) + 3);
}

#[test]
fn zone_props_are_drawn() {
    let hub = compose(HUB, &[], DeviceTier::Mobile, SceneEnv::default());
    let vr = compose("vr-ai", &[], DeviceTier::Mobile, SceneEnv::default());
    let robotics = compose("robotics", &[], DeviceTier::Mobile, SceneEnv::default());
    assert_eq!(vr.count(MeshKind::Sphere), hub.count(MeshKind::Sphere) + 10);
    assert_eq!(robotics.count(MeshKind::Torus), 1);
    assert_eq!(hub.count(MeshKind::Torus), 0);
}

#[test]
fn confetti_falls_out_of_view() {
    let calm = compose(HUB, &[], DeviceTier::Mobile, SceneEnv::default());
    let start = compose(
        HUB,
        &[],
        DeviceTier::Mobile,
        SceneEnv {
            celebration: Some(0.0),
            ..SceneEnv::default()
        },
    );
    let late = compose(
        HUB,
        &[],
        DeviceTier::Mobile,
        SceneEnv {
            celebration: Some(10.0),
            ..SceneEnv::default()
        },
    );
    assert_eq!(start.count(MeshKind::Cube), calm.count(MeshKind::Cube) + 50);
    assert_eq!(late.count(MeshKind::Cube), calm.count(MeshKind::Cube));
}

#[test]
fn night_mode_dims_the_lights() {
    let day = compose("web", &[], DeviceTier::Mobile, SceneEnv::default());
    let night = compose(
        "web",
        &[],
        DeviceTier::Mobile,
        SceneEnv {
            night_mode: true,
            ..SceneEnv::default()
        },
    );
    assert!(night.lighting.ambient[0] < day.lighting.ambient[0] + 1e-6);
    assert!(night.lighting.key_color[0] < day.lighting.key_color[0]);
}

#[test]
fn clear_color_is_the_zone_fog() {
    let scene = compose("about", &[], DeviceTier::Mobile, SceneEnv::default());
    let fog = rgb(zone_visual("about").fog_color);
    assert_eq!(
        scene.clear_color,
        [fog.x as f64, fog.y as f64, fog.z as f64, 1.0]
    );
}

#[test]
fn particles_stay_inside_the_lab() {
    for p in particle_positions(500, 12.5) {
        assert!(p.x.abs() <= 10.0 && p.z.abs() <= 10.0);
        assert!((0.0..=10.0).contains(&p.y));
    }
    let a: Vec<_> = particle_positions(20, 3.0).collect();
    let b: Vec<_> = particle_positions(20, 3.0).collect();
    assert_eq!(a, b);
}

#[test]
fn camera_follow_keeps_the_offset() {
    let mut cam = Camera {
        eye: Vec3::new(0.0, 6.0, 9.0),
        target: Vec3::ZERO,
        up: Vec3::Y,
        aspect: 16.0 / 9.0,
        fovy_radians: 50f32.to_radians(),
        znear: 0.1,
        zfar: 100.0,
    };
    let offset = Vec3::new(0.0, 6.0, 9.0);
    cam.follow(Vec3::new(2.0, 0.0, 0.0), offset, 0.5);
    assert_eq!(cam.target, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(cam.eye, cam.target + offset);
    cam.follow(Vec3::new(2.0, 0.0, 0.0), offset, 7.0);
    assert_eq!(cam.target, Vec3::new(2.0, 0.0, 0.0));
    assert!(cam.view_proj().is_finite());
}

#[test]
fn every_mesh_builds_at_every_tier() {
    for tier in [DeviceTier::High, DeviceTier::Mobile] {
        for kind in MeshKind::ALL {
            let mesh = kind.build(tier.mesh_segments());
            assert!(mesh.triangle_count() > 0, "{kind:?} at {tier:?}");
            assert_eq!(mesh.indices.len() % 3, 0);
        }
    }
}

#[test]
fn empty_frame_is_default() {
    let frame = SceneFrame::default();
    assert_eq!(frame.instance_count(), 0);
    assert_eq!(frame.lighting, LightingUniform::default());
}

fn robot_body_alpha(boot: Option<BootPhase>) -> f32 {
    let env = SceneEnv {
        boot,
        ..SceneEnv::default()
    };
    let frame = compose(HUB, &[], DeviceTier::Mobile, env);
    frame
        .batches
        .get(&MeshKind::Cylinder)
        .and_then(|b| b.first())
        .map(|i| i.color[3])
        .unwrap_or_default()
}

#[test]
fn robot_fades_in_with_the_boot_phase() {
    assert_eq!(robot_body_alpha(Some(BootPhase::Wireframe)), 0.3);
    assert_eq!(robot_body_alpha(Some(BootPhase::Materializing)), 0.6);
    assert_eq!(robot_body_alpha(Some(BootPhase::Solid)), 0.9);
    assert_eq!(robot_body_alpha(Some(BootPhase::Powered)), 1.0);
    assert_eq!(robot_body_alpha(None), 1.0);
}
