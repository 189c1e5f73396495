//! Timing and tuning constants shared by the core services.
//!
//! Durations are in milliseconds unless the name says otherwise; distances are
//! in world units of the lab floor (the grid spans -10..10 on x and z).

// Device detection
pub const MOBILE_MAX_WIDTH: u32 = 768; // widths below this are mobile
pub const TABLET_MAX_WIDTH: u32 = 1024; // widths below this (and >= mobile) are tablets
pub const LOW_END_MAX_CORES: u32 = 4; // logical CPUs at or below this are low-end
pub const LOW_END_MAX_MEMORY_GB: f32 = 4.0; // device memory at or below this is low-end
pub const RESIZE_DEBOUNCE_MS: u64 = 250;

// Audio
pub const SOUND_POOL_SIZE: usize = 3; // playback handles per sound id
pub const DEFAULT_FALLOFF_DISTANCE: f32 = 10.0; // spatial max distance

// Easter eggs
pub const KEY_SEQUENCE_MAX: usize = 20; // rolling key buffer length
pub const CLICK_MILESTONE: u64 = 50; // every Nth click fires the click egg
pub const CURSOR_IDLE_TICK_MS: u64 = 100; // idle poll interval
pub const CURSOR_IDLE_THRESHOLD_MS: u64 = 10_000;
pub const CLOCK_REFRESH_MS: u64 = 60_000;
pub const NIGHT_START_HOUR: u32 = 0; // inclusive
pub const NIGHT_END_HOUR: u32 = 4; // exclusive
pub const KONAMI_COOLDOWN_MS: u64 = 5_000;
pub const CLICK_COOLDOWN_MS: u64 = 1_000;
pub const CONSOLE_COOLDOWN_MS: u64 = 5_000;
pub const CURSOR_HIDE_COOLDOWN_MS: u64 = 30_000;

// Easter egg effects
pub const TURBO_DURATION_MS: u64 = 30_000;
pub const TURBO_SPEED_MULTIPLIER: f32 = 2.0;
pub const NOTIFICATION_MS: u64 = 5_000;
pub const CELEBRATION_MS: u64 = 4_000;
pub const LOOK_AROUND_MS: u64 = 3_000;

// Agent navigation
pub const EXPLORE_DELAY_MS: u64 = 500; // pause before drawing the next target
pub const SCAN_DWELL_MS: u64 = 3_000;
pub const ARRIVAL_TOLERANCE: f32 = 0.15;
pub const TURN_THRESHOLD_RAD: f32 = 0.1; // keep turning while the bearing error exceeds this
pub const MOVE_HEADING_TOLERANCE_RAD: f32 = 0.5; // only translate below this bearing error
pub const TURN_RATE_RAD_PER_SEC: f32 = 4.0;
pub const DEFAULT_LINEAR_SPEED: f32 = 1.8; // units per second
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp for tab-switch hitches

// Agent cosmetics
pub const WHEEL_SPIN_PER_UNIT: f32 = 1.0 / 0.2; // radians per unit travelled (wheel radius 0.2)
pub const SCANNER_SPIN_RAD_PER_SEC: f32 = 2.0;
pub const DOME_IDLE_SPIN_RAD_PER_SEC: f32 = 0.2;
pub const BOB_AMPLITUDE: f32 = 0.05;
pub const BOB_FREQUENCY: f32 = 0.5; // rad/s
pub const EYE_FLASH_FREQUENCY: f32 = 3.0;
pub const EYE_FLASH_THRESHOLD: f32 = 0.8;
pub const TILT_AMPLITUDE: f32 = 0.05;
pub const TILT_DECAY_PER_FRAME: f32 = 0.9; // at 60 fps
pub const GESTURE_MS: u64 = 2_500;

// Trail
pub const TRAIL_CAPACITY: usize = 100;
pub const TRAIL_MIN_STEP: f32 = 0.15;
pub const TRAIL_LIFT: f32 = 0.1;

// Boot sequence
pub const BOOT_TICK_MS: u64 = 50;
pub const BOOT_PROGRESS_STEP: u32 = 2;
pub const BOOT_MESSAGE_MS: u64 = 600;
pub const BOOT_COMPLETE_HOLD_MS: u64 = 1_000;

// Persistence
pub const PERSONALITY_KEY: &str = "robotPersonality";
