//! Zone id → lab look-up. Unknown ids get the hub.

use crate::mesh::MeshKind;
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::FRAC_PI_4;

pub const HUB: &str = "hub";

/// Content zones, in navigation order (keys 1–5).
pub const ZONE_IDS: [&str; 5] = ["medical", "vr-ai", "robotics", "web", "about"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneVisual {
    pub id: &'static str,
    pub label: &'static str,
    pub grid_color: u32,
    pub fog_color: u32,
    pub particle_color: u32,
    pub ambient_intensity: f32,
}

const ZONES: [ZoneVisual; 6] = [
    ZoneVisual {
        id: HUB,
        label: "Hub",
        grid_color: 0x00D9FF,
        fog_color: 0x05060A,
        particle_color: 0x8BE9FD,
        ambient_intensity: 0.3,
    },
    ZoneVisual {
        id: "medical",
        label: "Medical",
        grid_color: 0xF43F5E,
        fog_color: 0x1A0A0F,
        particle_color: 0xF472B6,
        ambient_intensity: 0.4,
    },
    ZoneVisual {
        id: "vr-ai",
        label: "VR & AI",
        grid_color: 0xA855F7,
        fog_color: 0x0F0A1A,
        particle_color: 0xC084FC,
        ambient_intensity: 0.5,
    },
    ZoneVisual {
        id: "robotics",
        label: "Robotics",
        grid_color: 0x22D3EE,
        fog_color: 0x0A151A,
        particle_color: 0x67E8F9,
        ambient_intensity: 0.35,
    },
    ZoneVisual {
        id: "web",
        label: "Web",
        grid_color: 0x10B981,
        fog_color: 0x0A1A0F,
        particle_color: 0x6EE7B7,
        ambient_intensity: 0.3,
    },
    ZoneVisual {
        id: "about",
        label: "About",
        grid_color: 0xF97316,
        fog_color: 0x1A0F0A,
        particle_color: 0xFB923C,
        ambient_intensity: 0.3,
    },
];

pub fn zone_visual(id: &str) -> &'static ZoneVisual {
    ZONES.iter().find(|z| z.id == id).unwrap_or(&ZONES[0])
}

pub fn is_known_zone(id: &str) -> bool {
    ZONES.iter().any(|z| z.id == id)
}

/// 0xRRGGBB to linear-ish 0..1 components.
pub fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    )
}

/// A decorative mesh placed by a zone.
#[derive(Clone, Debug, PartialEq)]
pub struct Prop {
    pub name: &'static str,
    pub mesh: MeshKind,
    pub transform: Mat4,
    pub color: Vec3,
    pub emissive: f32,
    pub opacity: f32,
}

impl ZoneVisual {
    pub fn accent(&self) -> Vec3 {
        rgb(self.grid_color)
    }

    pub fn props(&self) -> Vec<Prop> {
        let accent = self.accent();
        match self.id {
            "medical" => vec![Prop {
                name: "hologram",
                mesh: MeshKind::Cube,
                transform: Mat4::from_scale_rotation_translation(
                    Vec3::new(0.5, 1.0, 0.5),
                    Quat::from_rotation_y(FRAC_PI_4),
                    Vec3::new(-3.0, 0.0, -3.0),
                ),
                color: accent,
                emissive: 0.5,
                opacity: 0.3,
            }],
            "vr-ai" => (0..10)
                .map(|i| {
                    let i = i as f32;
                    Prop {
                        name: "neural-node",
                        mesh: MeshKind::Sphere,
                        transform: Mat4::from_scale_rotation_translation(
                            Vec3::splat(0.1),
                            Quat::IDENTITY,
                            Vec3::new(i.sin() * 3.0, i.cos() * 2.0, -2.0),
                        ),
                        color: accent,
                        emissive: 0.8,
                        opacity: 1.0,
                    }
                })
                .collect(),
            "robotics" => vec![Prop {
                name: "robotic-part",
                mesh: MeshKind::Torus,
                transform: Mat4::from_scale_rotation_translation(
                    Vec3::splat(0.3),
                    Quat::from_rotation_z(FRAC_PI_4),
                    Vec3::new(3.0, 0.0, -3.0),
                ),
                color: accent,
                emissive: 0.0,
                opacity: 1.0,
            }],
            _ => Vec::new(),
        }
    }
}
