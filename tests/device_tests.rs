// Device classification, resize debounce and LOD tiers.

use folio_core::bus::{Signal, SignalBus};
use folio_core::device::{DeviceCapabilities, DeviceClass, DeviceDetector, DeviceProbe, InputMethod};
use folio_core::lod::{gpu_tier, DeviceTier, LodManager};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn desktop_probe(width: u32) -> DeviceProbe {
    DeviceProbe {
        width,
        height: 900,
        touch: false,
        hardware_concurrency: Some(8),
        device_memory_gb: Some(16.0),
        graphics_context: true,
        gpu_renderer: Some("ANGLE (NVIDIA GeForce RTX 3070)".into()),
        audio_context: true,
    }
}

#[test]
fn width_boundaries() {
    let cases = [
        (500, DeviceClass::Mobile),
        (767, DeviceClass::Mobile),
        (768, DeviceClass::Tablet),
        (900, DeviceClass::Tablet),
        (1023, DeviceClass::Tablet),
        (1024, DeviceClass::Desktop),
        (1400, DeviceClass::Desktop),
    ];
    for (w, class) in cases {
        assert_eq!(DeviceClass::from_width(w), class, "width {}", w);
    }
}

#[test]
fn capable_desktop() {
    let caps = DeviceCapabilities::classify(&desktop_probe(1400));
    assert!(caps.is_desktop());
    assert_eq!(caps.input_method, InputMethod::Mouse);
    assert!(caps.supports_3d);
    assert!(caps.supports_spatial_audio);
    assert!(!caps.low_end);
    assert!(!caps.should_use_2d_fallback());
}

#[test]
fn low_end_signals() {
    let few_cores = DeviceProbe {
        hardware_concurrency: Some(4),
        ..desktop_probe(1400)
    };
    assert!(DeviceCapabilities::classify(&few_cores).low_end);

    let unknown_cores = DeviceProbe {
        hardware_concurrency: None,
        ..desktop_probe(1400)
    };
    assert!(DeviceCapabilities::classify(&unknown_cores).low_end);

    let no_memory_api = DeviceProbe {
        device_memory_gb: None,
        ..desktop_probe(1400)
    };
    assert!(!DeviceCapabilities::classify(&no_memory_api).low_end);

    let small_memory = DeviceProbe {
        device_memory_gb: Some(2.0),
        ..desktop_probe(1400)
    };
    assert!(DeviceCapabilities::classify(&small_memory).low_end);
}

#[test]
fn narrow_screens_lose_3d() {
    let phone = DeviceProbe {
        touch: true,
        ..desktop_probe(390)
    };
    let caps = DeviceCapabilities::classify(&phone);
    assert!(caps.is_mobile());
    assert_eq!(caps.input_method, InputMethod::Touch);
    assert!(caps.supports_graphics);
    assert!(!caps.supports_3d);
    assert!(caps.should_use_2d_fallback());
}

#[test]
fn missing_probe_is_conservative() {
    let mut bus = SignalBus::new();
    let detector = DeviceDetector::new(None, &mut bus);
    let caps = detector.capabilities();
    assert_eq!(caps, DeviceCapabilities::conservative());
    assert!(caps.low_end);
    assert!(!caps.supports_graphics);
    assert_eq!(bus.pending(), 1);
}

#[test]
fn resize_is_debounced() {
    let mut bus = SignalBus::new();
    let mut detector = DeviceDetector::new(Some(desktop_probe(1400)), &mut bus);
    bus.flush();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    bus.subscribe(move |s| sink.borrow_mut().push(s.clone()));

    let ms = Duration::from_millis;
    detector.request_refresh(ms(0));
    detector.request_refresh(ms(200));
    let mut probes = 0;
    let mut probe = || {
        probes += 1;
        Some(desktop_probe(800))
    };
    assert!(!detector.poll(ms(400), &mut probe, &mut bus));
    assert!(detector.refresh_pending());
    assert!(detector.poll(ms(450), &mut probe, &mut bus));
    assert!(!detector.poll(ms(900), &mut probe, &mut bus));
    assert_eq!(probes, 1);
    assert_eq!(detector.recomputations(), 2);
    assert!(detector.capabilities().is_tablet());
    bus.flush();
    assert!(matches!(
        seen.borrow().as_slice(),
        [Signal::DeviceCapabilitiesChanged(c)] if c.screen_width == 800
    ));
}

#[test]
fn capabilities_serialize_without_renderer() {
    let caps = DeviceCapabilities::classify(&desktop_probe(1400));
    let json = serde_json::to_value(&caps).unwrap();
    assert_eq!(json["class"], "desktop");
    assert_eq!(json["supports3d"], true);
    assert!(json.get("gpuRenderer").is_none());
}

#[test]
fn lod_tiers_from_capabilities() {
    let high = DeviceCapabilities::classify(&desktop_probe(1400));
    assert_eq!(LodManager::from_capabilities(&high).tier(), DeviceTier::High);

    let phone = DeviceCapabilities::classify(&desktop_probe(390));
    assert_eq!(LodManager::from_capabilities(&phone).tier(), DeviceTier::Mobile);

    let intel = DeviceCapabilities::classify(&DeviceProbe {
        gpu_renderer: Some("Intel HD Graphics 620".into()),
        ..desktop_probe(1400)
    });
    assert_eq!(LodManager::from_capabilities(&intel).tier(), DeviceTier::Low);
}

#[test]
fn gpu_tier_buckets() {
    assert_eq!(gpu_tier(None, false), DeviceTier::Low);
    assert_eq!(gpu_tier(None, true), DeviceTier::Medium);
    assert_eq!(gpu_tier(Some("AMD Radeon"), true), DeviceTier::High);
    assert_eq!(gpu_tier(Some("Mali-G78"), true), DeviceTier::Low);
    assert_eq!(gpu_tier(Some("Apple M2"), true), DeviceTier::Medium);
}

#[test]
fn lod_thresholds() {
    let lod = LodManager::default();
    assert_eq!(lod.tier(), DeviceTier::Medium);
    assert!(!lod.should_use_lod(30.0));
    assert!(lod.should_use_lod(30.1));
    assert_eq!(lod.poly_count_limit(), 20_000);
    assert_eq!(LodManager::with_tier(DeviceTier::Mobile).particle_count_limit(), 200);
    assert!(DeviceTier::High.mesh_segments() > DeviceTier::Mobile.mesh_segments());
}
