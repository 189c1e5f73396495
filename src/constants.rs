// Browser-shell constants: camera rig, DOM element ids and timer periods.
//
// Simulation tuning lives in `folio_core::constants`; everything here only
// concerns how the shell presents that simulation.
use glam::Vec3;

// Camera rig (world units)
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 6.0, 9.0); // eye position relative to the droid
pub const CAMERA_FOLLOW_BLEND: f32 = 0.05; // look-at easing per frame
pub const CAMERA_FOV_DEG: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Rendering
pub const INITIAL_INSTANCE_CAPACITY: usize = 256; // per mesh batch, grows by doubling

// DOM ids
pub const CANVAS_ID: &str = "app-canvas";
pub const BOOT_OVERLAY_ID: &str = "boot-overlay";
pub const BOOT_PROGRESS_ID: &str = "boot-progress";
pub const BOOT_MESSAGE_ID: &str = "boot-message";
pub const BANNER_ID: &str = "egg-banner";
pub const HUD_ID: &str = "hud";
pub const HELP_OVERLAY_ID: &str = "help-overlay";

// Root classes toggled by effects
pub const NIGHT_CLASS: &str = "night-mode";
pub const DEVELOPER_CLASS: &str = "developer-mode";

// Timers (ms)
pub const IDLE_TIMER_MS: i32 = 100; // cursor idle poll
pub const CLOCK_TIMER_MS: i32 = 60_000; // wall clock refresh

// Spatial audio listener sits at the camera
pub const LISTENER_UP: [f64; 3] = [0.0, 1.0, 0.0];
