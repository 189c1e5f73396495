use crate::device::DeviceCapabilities;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    High,
    Medium,
    Low,
    Mobile,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodConfig {
    pub distance: f32,
    pub poly_count: u32,
    pub texture_resolution: u32,
    pub particle_count: u32,
}

const HIGH: LodConfig = LodConfig {
    distance: 50.0,
    poly_count: 50_000,
    texture_resolution: 2048,
    particle_count: 2000,
};
const MEDIUM: LodConfig = LodConfig {
    distance: 30.0,
    poly_count: 20_000,
    texture_resolution: 1024,
    particle_count: 1000,
};
const LOW: LodConfig = LodConfig {
    distance: 20.0,
    poly_count: 5_000,
    texture_resolution: 512,
    particle_count: 500,
};
const MOBILE: LodConfig = LodConfig {
    distance: 15.0,
    poly_count: 2_000,
    texture_resolution: 256,
    particle_count: 200,
};

impl DeviceTier {
    pub fn config(self) -> LodConfig {
        match self {
            DeviceTier::High => HIGH,
            DeviceTier::Medium => MEDIUM,
            DeviceTier::Low => LOW,
            DeviceTier::Mobile => MOBILE,
        }
    }

    /// Radial segments for procedural cylinders, spheres and tori.
    pub fn mesh_segments(self) -> u32 {
        match self {
            DeviceTier::High => 32,
            DeviceTier::Medium => 24,
            DeviceTier::Low => 16,
            DeviceTier::Mobile => 10,
        }
    }
}

/// Coarse GPU bucket from the unmasked renderer string.
pub fn gpu_tier(renderer: Option<&str>, has_graphics: bool) -> DeviceTier {
    if !has_graphics {
        return DeviceTier::Low;
    }
    match renderer {
        None => DeviceTier::Medium,
        Some(r) if r.contains("NVIDIA") || r.contains("AMD") || r.contains("RTX") => {
            DeviceTier::High
        }
        Some(r) if r.contains("Intel HD") || r.contains("Mali") => DeviceTier::Low,
        Some(_) => DeviceTier::Medium,
    }
}

pub struct LodManager {
    tier: DeviceTier,
    config: LodConfig,
}

impl Default for LodManager {
    fn default() -> Self {
        Self::with_tier(DeviceTier::Medium)
    }
}

impl LodManager {
    pub fn with_tier(tier: DeviceTier) -> Self {
        Self {
            tier,
            config: tier.config(),
        }
    }

    pub fn from_capabilities(caps: &DeviceCapabilities) -> Self {
        let tier = if caps.is_mobile() || caps.low_end {
            DeviceTier::Mobile
        } else {
            gpu_tier(caps.gpu_renderer.as_deref(), caps.supports_graphics)
        };
        log::info!("[lod] tier={:?}", tier);
        Self::with_tier(tier)
    }

    pub fn tier(&self) -> DeviceTier {
        self.tier
    }

    pub fn config(&self) -> LodConfig {
        self.config
    }

    pub fn should_use_lod(&self, distance: f32) -> bool {
        distance > self.config.distance
    }

    pub fn poly_count_limit(&self) -> u32 {
        self.config.poly_count
    }

    pub fn particle_count_limit(&self) -> u32 {
        self.config.particle_count
    }
}
