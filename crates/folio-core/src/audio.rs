//! Sound table and the category-aware mixer.
//!
//! The mixer owns volume state and a small pool of playback handles per sound.
//! Actual playback goes through a [`PlaybackBackend`], which is WebAudio in the
//! browser and a recording fake in tests.

use crate::constants::{DEFAULT_FALLOFF_DISTANCE, SOUND_POOL_SIZE};
use crate::error::Result;
use fnv::FnvHashMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCategory {
    Ambient,
    Ui,
    Robot,
    Transition,
    Music,
    Effect,
}

impl SoundCategory {
    pub const ALL: [SoundCategory; 6] = [
        SoundCategory::Ambient,
        SoundCategory::Ui,
        SoundCategory::Robot,
        SoundCategory::Transition,
        SoundCategory::Music,
        SoundCategory::Effect,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundDescriptor {
    pub id: &'static str,
    pub category: SoundCategory,
    pub volume: f32,
    pub looped: bool,
    pub spatial: bool,
}

const fn sound(id: &'static str, category: SoundCategory, volume: f32) -> SoundDescriptor {
    SoundDescriptor {
        id,
        category,
        volume,
        looped: false,
        spatial: false,
    }
}

const fn looped(mut s: SoundDescriptor) -> SoundDescriptor {
    s.looped = true;
    s
}

const fn spatial(mut s: SoundDescriptor) -> SoundDescriptor {
    s.spatial = true;
    s
}

use SoundCategory::*;

pub const SOUNDS: &[SoundDescriptor] = &[
    looped(sound("mechanical-hum", Ambient, 0.3)),
    looped(sound("lab-ambience", Ambient, 0.2)),
    sound("click", Ui, 0.5),
    sound("hover", Ui, 0.3),
    sound("select", Ui, 0.6),
    sound("error", Ui, 0.7),
    spatial(sound("robot-move", Robot, 0.4)),
    sound("robot-scan", Robot, 0.5),
    sound("robot-boot", Robot, 0.6),
    spatial(sound("servo-motor", Robot, 0.3)),
    sound("zone-enter", Transition, 0.7),
    sound("zone-exit", Transition, 0.5),
    sound("portal-whoosh", Transition, 0.8),
    looped(sound("background-theme", Music, 0.2)),
    sound("achievement", Effect, 0.8),
    sound("notification", Effect, 0.6),
];

pub fn find_sound(id: &str) -> Option<&'static SoundDescriptor> {
    SOUNDS.iter().find(|s| s.id == id)
}

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// base × category × master, clamped to [0, 1].
#[inline]
pub fn effective_volume(base: f32, category: f32, master: f32) -> f32 {
    clamp01(base * category * master)
}

/// Per-call tweaks on top of the static descriptor.
#[derive(Clone, Debug, Default)]
pub struct PlayOverrides {
    pub volume: Option<f32>,
    pub category: Option<SoundCategory>,
    pub looped: Option<bool>,
    pub position: Option<Vec3>,
    pub falloff_distance: Option<f32>,
}

impl PlayOverrides {
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }
}

/// Platform playback seam. Handles are created once per pool slot and reused.
pub trait PlaybackBackend {
    type Handle;

    fn create_handle(&mut self, sound: &SoundDescriptor) -> Self::Handle;
    fn is_busy(&self, handle: &Self::Handle) -> bool;
    fn set_volume(&mut self, handle: &mut Self::Handle, volume: f32);
    /// Start playback. Rejections (e.g. autoplay policy) come back as errors
    /// and are swallowed by the mixer.
    fn start(&mut self, handle: &mut Self::Handle, sound: &SoundDescriptor, looped: bool)
        -> Result<()>;
    fn pause(&mut self, handle: &mut Self::Handle);
    fn rewind(&mut self, handle: &mut Self::Handle);
    /// Returns `false` when the platform has no positional audio.
    fn set_position(&mut self, handle: &mut Self::Handle, position: Vec3, falloff: f32) -> bool;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixerSettings {
    pub master_volume: f32,
    pub category_volumes: Vec<(SoundCategory, f32)>,
    pub muted: bool,
    pub spatial_enabled: bool,
}

struct Slot<H> {
    handle: H,
    base_volume: f32,
    category: SoundCategory,
}

pub struct AudioMixer<B: PlaybackBackend> {
    backend: B,
    master: f32,
    categories: FnvHashMap<SoundCategory, f32>,
    muted: bool,
    spatial_enabled: bool,
    pools: FnvHashMap<&'static str, SmallVec<[Slot<B::Handle>; SOUND_POOL_SIZE]>>,
}

impl<B: PlaybackBackend> AudioMixer<B> {
    pub fn new(mut backend: B) -> Self {
        let mut pools = FnvHashMap::default();
        for desc in SOUNDS {
            let pool: SmallVec<[Slot<B::Handle>; SOUND_POOL_SIZE]> = (0..SOUND_POOL_SIZE)
                .map(|_| Slot {
                    handle: backend.create_handle(desc),
                    base_volume: desc.volume,
                    category: desc.category,
                })
                .collect();
            pools.insert(desc.id, pool);
        }
        let categories = SoundCategory::ALL.iter().map(|c| (*c, 1.0)).collect();
        Self {
            backend,
            master: 1.0,
            categories,
            muted: false,
            spatial_enabled: true,
            pools,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn master_volume(&self) -> f32 {
        self.master
    }

    pub fn category_volume(&self, category: SoundCategory) -> f32 {
        self.categories.get(&category).copied().unwrap_or(1.0)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_spatial_enabled(&mut self, enabled: bool) {
        self.spatial_enabled = enabled;
    }

    pub fn settings(&self) -> MixerSettings {
        MixerSettings {
            master_volume: self.master,
            category_volumes: SoundCategory::ALL
                .iter()
                .map(|c| (*c, self.category_volume(*c)))
                .collect(),
            muted: self.muted,
            spatial_enabled: self.spatial_enabled,
        }
    }

    pub fn effective_volume_of(&self, id: &str) -> Option<f32> {
        find_sound(id).map(|d| {
            effective_volume(d.volume, self.category_volume(d.category), self.master)
        })
    }

    /// Start a sound on a free pool handle, or on the first handle if every
    /// handle is busy. Unknown ids and muted state are no-ops. Returns the
    /// pool slot that was started.
    pub fn play(&mut self, id: &str, overrides: PlayOverrides) -> Option<usize> {
        let Some(desc) = find_sound(id) else {
            log::warn!("[audio] sound `{}` not found", id);
            return None;
        };
        if self.muted {
            return None;
        }
        let category = overrides.category.unwrap_or(desc.category);
        let base = overrides.volume.map(clamp01).unwrap_or(desc.volume);
        let looped = overrides.looped.unwrap_or(desc.looped);
        let volume = effective_volume(base, self.category_volume(category), self.master);
        let spatial_enabled = self.spatial_enabled;

        let pool = self.pools.get_mut(desc.id)?;
        let index = pool
            .iter()
            .position(|slot| !self.backend.is_busy(&slot.handle))
            .unwrap_or(0);
        let slot = &mut pool[index];
        slot.base_volume = base;
        slot.category = category;
        self.backend.set_volume(&mut slot.handle, volume);

        if desc.spatial && spatial_enabled {
            if let Some(position) = overrides.position {
                let falloff = overrides
                    .falloff_distance
                    .unwrap_or(DEFAULT_FALLOFF_DISTANCE);
                if !self.backend.set_position(&mut slot.handle, position, falloff) {
                    log::debug!("[audio] no positional audio; `{}` plays flat", id);
                }
            }
        }

        if let Err(e) = self.backend.start(&mut slot.handle, desc, looped) {
            log::debug!("[audio] could not play `{}`: {}", id, e);
        }
        Some(index)
    }

    /// Pause and rewind every handle of a sound.
    pub fn stop(&mut self, id: &str) {
        let Some(pool) = self.pools.get_mut(id) else {
            log::warn!("[audio] stop: sound `{}` not found", id);
            return;
        };
        for slot in pool.iter_mut() {
            self.backend.pause(&mut slot.handle);
            self.backend.rewind(&mut slot.handle);
        }
    }

    pub fn pause(&mut self, id: &str) {
        let Some(pool) = self.pools.get_mut(id) else {
            log::warn!("[audio] pause: sound `{}` not found", id);
            return;
        };
        for slot in pool.iter_mut() {
            self.backend.pause(&mut slot.handle);
        }
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master = clamp01(volume);
        self.rescale_playing();
    }

    pub fn set_category_volume(&mut self, category: SoundCategory, volume: f32) {
        self.categories.insert(category, clamp01(volume));
        self.rescale_playing();
    }

    /// Muting pauses everything that is playing; unmuting resumes nothing.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            for pool in self.pools.values_mut() {
                for slot in pool.iter_mut() {
                    if self.backend.is_busy(&slot.handle) {
                        self.backend.pause(&mut slot.handle);
                    }
                }
            }
        }
        log::info!("[audio] muted={}", self.muted);
        self.muted
    }

    pub fn update_spatial_position(&mut self, id: &str, position: Vec3) {
        let Some(desc) = find_sound(id) else {
            log::warn!("[audio] sound `{}` not found", id);
            return;
        };
        if !desc.spatial || !self.spatial_enabled {
            return;
        }
        if let Some(pool) = self.pools.get_mut(desc.id) {
            for slot in pool.iter_mut() {
                if self.backend.is_busy(&slot.handle) {
                    self.backend
                        .set_position(&mut slot.handle, position, DEFAULT_FALLOFF_DISTANCE);
                }
            }
        }
    }

    fn rescale_playing(&mut self) {
        let master = self.master;
        for pool in self.pools.values_mut() {
            for slot in pool.iter_mut() {
                if self.backend.is_busy(&slot.handle) {
                    let cat = self.categories.get(&slot.category).copied().unwrap_or(1.0);
                    let v = effective_volume(slot.base_volume, cat, master);
                    self.backend.set_volume(&mut slot.handle, v);
                }
            }
        }
    }
}
