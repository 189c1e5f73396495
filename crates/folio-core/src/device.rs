//! Device classification from a raw capability probe.
//!
//! The shell gathers a [`DeviceProbe`] from the browser; everything here is a
//! pure function of that probe plus the debounce bookkeeping for resizes.

use crate::bus::{Signal, SignalBus};
use crate::constants::{
    LOW_END_MAX_CORES, LOW_END_MAX_MEMORY_GB, MOBILE_MAX_WIDTH, RESIZE_DEBOUNCE_MS,
    TABLET_MAX_WIDTH,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Desktop,
    Tablet,
    Mobile,
}

impl DeviceClass {
    /// Mobile below 768px, tablet below 1024px, desktop otherwise.
    pub fn from_width(width: u32) -> Self {
        if width < MOBILE_MAX_WIDTH {
            DeviceClass::Mobile
        } else if width < TABLET_MAX_WIDTH {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    Mouse,
    Touch,
    Keyboard,
}

/// Raw readings taken from the platform. `None` means the API was missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceProbe {
    pub width: u32,
    pub height: u32,
    pub touch: bool,
    pub hardware_concurrency: Option<u32>,
    pub device_memory_gb: Option<f32>,
    pub graphics_context: bool,
    pub gpu_renderer: Option<String>,
    pub audio_context: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapabilities {
    pub class: DeviceClass,
    pub input_method: InputMethod,
    pub supports_graphics: bool,
    pub supports_3d: bool,
    pub supports_spatial_audio: bool,
    pub low_end: bool,
    pub screen_width: u32,
    pub screen_height: u32,
    #[serde(skip)]
    pub gpu_renderer: Option<String>,
}

impl DeviceCapabilities {
    pub fn classify(probe: &DeviceProbe) -> Self {
        let class = DeviceClass::from_width(probe.width);
        let input_method = if probe.touch {
            InputMethod::Touch
        } else {
            InputMethod::Mouse
        };
        // A missing core count is treated as low-end; deviceMemory is only
        // exposed by some engines so its absence says nothing.
        let few_cores = probe
            .hardware_concurrency
            .map_or(true, |cores| cores <= LOW_END_MAX_CORES);
        let little_memory = probe
            .device_memory_gb
            .map_or(false, |gb| gb <= LOW_END_MAX_MEMORY_GB);
        let narrow = probe.width < MOBILE_MAX_WIDTH;
        Self {
            class,
            input_method,
            supports_graphics: probe.graphics_context,
            supports_3d: probe.graphics_context && !narrow,
            supports_spatial_audio: probe.audio_context,
            low_end: few_cores || little_memory || narrow,
            screen_width: probe.width,
            screen_height: probe.height,
            gpu_renderer: probe.gpu_renderer.clone(),
        }
    }

    /// Used when no probe could be taken at all.
    pub fn conservative() -> Self {
        Self {
            class: DeviceClass::Desktop,
            input_method: InputMethod::Mouse,
            supports_graphics: false,
            supports_3d: false,
            supports_spatial_audio: false,
            low_end: true,
            screen_width: 0,
            screen_height: 0,
            gpu_renderer: None,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.class == DeviceClass::Mobile
    }

    pub fn is_tablet(&self) -> bool {
        self.class == DeviceClass::Tablet
    }

    pub fn is_desktop(&self) -> bool {
        self.class == DeviceClass::Desktop
    }

    pub fn should_use_2d_fallback(&self) -> bool {
        !self.supports_3d || self.low_end
    }
}

pub struct DeviceDetector {
    current: DeviceCapabilities,
    refresh_due: Option<Duration>,
    recomputations: u32,
}

impl DeviceDetector {
    /// Classifies once at construction and announces the result.
    pub fn new(probe: Option<DeviceProbe>, bus: &mut SignalBus) -> Self {
        let mut detector = Self {
            current: DeviceCapabilities::conservative(),
            refresh_due: None,
            recomputations: 0,
        };
        detector.refresh(probe, bus);
        detector
    }

    pub fn capabilities(&self) -> DeviceCapabilities {
        self.current.clone()
    }

    pub fn recomputations(&self) -> u32 {
        self.recomputations
    }

    /// Resize hook: (re)starts the quiet period.
    pub fn request_refresh(&mut self, now: Duration) {
        self.refresh_due = Some(now + Duration::from_millis(RESIZE_DEBOUNCE_MS));
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh_due.is_some()
    }

    /// Recomputes if a requested refresh has gone quiet long enough.
    /// The probe is only taken when a recomputation actually happens.
    pub fn poll(
        &mut self,
        now: Duration,
        probe: impl FnOnce() -> Option<DeviceProbe>,
        bus: &mut SignalBus,
    ) -> bool {
        match self.refresh_due {
            Some(due) if now >= due => {
                self.refresh_due = None;
                self.refresh(probe(), bus);
                true
            }
            _ => false,
        }
    }

    pub fn refresh(&mut self, probe: Option<DeviceProbe>, bus: &mut SignalBus) {
        self.current = match probe {
            Some(p) => DeviceCapabilities::classify(&p),
            None => {
                log::warn!("[device] no capability probe available; using conservative defaults");
                DeviceCapabilities::conservative()
            }
        };
        self.recomputations += 1;
        log::info!(
            "[device] class={:?} low_end={} 3d={} width={}",
            self.current.class,
            self.current.low_end,
            self.current.supports_3d,
            self.current.screen_width
        );
        bus.publish(Signal::DeviceCapabilitiesChanged(self.current.clone()));
    }
}
