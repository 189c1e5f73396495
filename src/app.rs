//! Composition root: every service is built once here and shared with the
//! DOM handlers and the frame loop as `Rc<RefCell<_>>`.
//!
//! Borrow rule: bus listeners never touch the bus or the egg engine. Handlers
//! feed the egg engine first, drop every borrow, then call [`Services::flush`].

use crate::audio::WebAudioBackend;
use crate::constants::{DEVELOPER_CLASS, NIGHT_CLASS};
use crate::storage::LocalStorage;
use crate::{dom, overlay};
use folio_core::agent::{Agent, AgentTuning};
use folio_core::audio::{AudioMixer, PlayOverrides};
use folio_core::boot::BootSequence;
use folio_core::bus::{Signal, SignalBus};
use folio_core::console::{self, Command};
use folio_core::device::DeviceDetector;
use folio_core::effects::ActiveEffects;
use folio_core::eggs::EasterEggEngine;
use folio_core::lod::LodManager;
use folio_core::nav::{NavOutcome, ZoneNavigator};
use folio_core::personality::Personality;
use folio_core::waypoints::WaypointSystem;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use web_sys as web;

/// Monotonic time since the page started.
#[derive(Clone, Copy)]
pub struct Clock {
    started: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

pub fn local_wall_time() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub type Mixer = AudioMixer<WebAudioBackend>;

#[derive(Clone)]
pub struct Services {
    pub clock: Clock,
    pub document: web::Document,
    pub bus: Rc<RefCell<SignalBus>>,
    pub device: Rc<RefCell<DeviceDetector>>,
    pub lod: Rc<RefCell<LodManager>>,
    pub mixer: Rc<RefCell<Mixer>>,
    pub eggs: Rc<RefCell<EasterEggEngine>>,
    pub effects: Rc<RefCell<ActiveEffects>>,
    pub waypoints: Rc<RefCell<WaypointSystem>>,
    pub agent: Rc<RefCell<Agent>>,
    pub personality: Rc<RefCell<Personality<LocalStorage>>>,
    pub nav: Rc<RefCell<ZoneNavigator>>,
    pub boot: BootSequence,
}

impl Services {
    /// `audio_ctx` is `None` when the browser has no usable WebAudio; the
    /// mixer then runs silently with spatial audio off.
    pub fn build(
        document: web::Document,
        audio_ctx: Option<web::AudioContext>,
        seed: u64,
    ) -> Self {
        let clock = Clock::new();
        let mut bus = SignalBus::new();
        let device = DeviceDetector::new(crate::device::probe(), &mut bus);
        let caps = device.capabilities();
        let lod = LodManager::from_capabilities(&caps);
        let mut mixer = AudioMixer::new(WebAudioBackend::new(audio_ctx));
        mixer.set_spatial_enabled(caps.supports_spatial_audio && mixer.backend().has_output());
        let services = Self {
            clock,
            document,
            bus: Rc::new(RefCell::new(bus)),
            device: Rc::new(RefCell::new(device)),
            lod: Rc::new(RefCell::new(lod)),
            mixer: Rc::new(RefCell::new(mixer)),
            eggs: Rc::new(RefCell::new(EasterEggEngine::with_default_eggs(
                local_wall_time(),
            ))),
            effects: Rc::new(RefCell::new(ActiveEffects::new())),
            waypoints: Rc::new(RefCell::new(WaypointSystem::or_exploration(Vec::new()))),
            agent: Rc::new(RefCell::new(Agent::new(AgentTuning::default(), seed))),
            personality: Rc::new(RefCell::new(Personality::load(LocalStorage))),
            nav: Rc::new(RefCell::new(ZoneNavigator::new())),
            boot: BootSequence::new(clock.now()),
        };
        services.subscribe_listeners();
        services
    }

    fn subscribe_listeners(&self) {
        let me = self.clone();
        self.bus.borrow_mut().subscribe(move |signal| match signal {
            Signal::DeviceCapabilitiesChanged(caps) => {
                *me.lod.borrow_mut() = LodManager::from_capabilities(caps);
                let mut mixer = me.mixer.borrow_mut();
                let spatial = caps.supports_spatial_audio && mixer.backend().has_output();
                mixer.set_spatial_enabled(spatial);
            }
            Signal::EasterEggTriggered { id } => {
                let now = me.clock.now();
                let commands = me.effects.borrow_mut().apply(*id, now);
                if let Some(cue) = commands.cue {
                    me.mixer.borrow_mut().play(cue, PlayOverrides::default());
                }
                if let Some(gesture) = commands.gesture {
                    me.agent.borrow_mut().start_gesture(gesture);
                }
                me.sync_root_classes();
            }
            Signal::ZoneEntered(zone) => {
                me.personality.borrow_mut().visit_zone(zone);
                me.mixer
                    .borrow_mut()
                    .play("zone-enter", PlayOverrides::default());
            }
            Signal::ConsoleCommand(cmd) => log::debug!("[console] {}", cmd),
        });
    }

    /// Delivers everything queued so far. Call with no service borrowed.
    pub fn flush(&self) {
        self.bus.borrow_mut().flush();
    }

    pub fn sync_root_classes(&self) {
        let effects = self.effects.borrow();
        dom::set_root_class(&self.document, NIGHT_CLASS, effects.night_mode());
        dom::set_root_class(&self.document, DEVELOPER_CLASS, effects.developer_mode());
    }

    /// Routes one navigation outcome to the services it concerns.
    pub fn apply_nav(&self, outcome: NavOutcome) {
        match outcome {
            NavOutcome::Help(visible) => overlay::show_help(&self.document, visible),
            NavOutcome::Selected(_) => {
                self.mixer.borrow_mut().play("hover", PlayOverrides::default());
            }
            NavOutcome::Entered(zone) => {
                let now = self.clock.now();
                {
                    let mut bus = self.bus.borrow_mut();
                    self.eggs.borrow_mut().record_zone_visit(zone, now, &mut bus);
                    bus.publish(Signal::ZoneEntered(zone.to_string()));
                }
            }
            NavOutcome::Hub => {
                self.mixer
                    .borrow_mut()
                    .play("zone-exit", PlayOverrides::default());
            }
        }
    }

    /// `window.robot.*` and anything else typed as a console command.
    pub fn run_console(&self, input: &str) -> Option<String> {
        let Some(command) = console::parse_command(input) else {
            log::warn!("[console] unknown command {}", input);
            return None;
        };
        match command {
            Command::Gesture(gesture) => {
                let now = self.clock.now();
                if let Some(name) = gesture.command() {
                    let mut bus = self.bus.borrow_mut();
                    self.eggs
                        .borrow_mut()
                        .record_console_command(name, now, &mut bus);
                    bus.publish(Signal::ConsoleCommand(name.to_string()));
                }
                self.agent.borrow_mut().start_gesture(gesture);
                self.flush();
                None
            }
            Command::Stats => {
                let stats = self.stats_json();
                log::info!("[console] stats {}", stats);
                Some(stats)
            }
            Command::Help => {
                let text = console::help_text();
                log::info!("[console] {}", text);
                Some(text)
            }
        }
    }

    fn stats_json(&self) -> String {
        let now = self.clock.now();
        let eggs = self.eggs.borrow().snapshot(now);
        let personality = self.personality.borrow();
        let payload = serde_json::json!({
            "eggs": eggs,
            "personality": personality.state(),
            "trait": personality.trait_label().as_str(),
            "favoriteZone": personality.favorite_zone(),
            "suggestion": personality.suggestion(),
        });
        payload.to_string()
    }
}
