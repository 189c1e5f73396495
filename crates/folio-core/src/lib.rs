//! Platform-free core of the droid folio: device classification, the audio
//! mixer, the easter-egg engine, waypoint navigation, the droid's movement
//! loop and scene composition. The browser shell drives all of it with
//! explicit timestamps.

pub mod agent;
pub mod audio;
pub mod boot;
pub mod bus;
pub mod console;
pub mod constants;
pub mod device;
pub mod effects;
pub mod eggs;
pub mod error;
pub mod lod;
pub mod mesh;
pub mod nav;
pub mod personality;
pub mod scene;
pub mod waypoints;
pub mod zones;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use agent::{Agent, AgentEvent, AgentFrame, AgentMode, AgentTuning, Gesture, Trail};
pub use audio::{AudioMixer, PlayOverrides, PlaybackBackend, SoundCategory, SoundDescriptor};
pub use boot::{BootFrame, BootPhase, BootSequence};
pub use bus::{Signal, SignalBus, SubscriptionId};
pub use device::{DeviceCapabilities, DeviceClass, DeviceDetector, DeviceProbe, InputMethod};
pub use effects::ActiveEffects;
pub use eggs::{EasterEggEngine, EggConfig, EggId, EggStatus, ObservationContext, TriggerKind};
pub use error::{FolioError, Result};
pub use lod::{DeviceTier, LodConfig, LodManager};
pub use mesh::{Mesh, MeshKind, Vertex};
pub use nav::{NavAction, NavOutcome, ZoneNavigator};
pub use personality::{KeyValueStore, MemoryStore, Personality, PersonalityState, Trait};
pub use scene::{compose_scene, Camera, InstanceRaw, LightingUniform, SceneEnv, SceneFrame};
pub use waypoints::{Waypoint, WaypointKind, WaypointSystem};
pub use zones::{zone_visual, ZoneVisual};
