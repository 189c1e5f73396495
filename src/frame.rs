use crate::app::Services;
use crate::constants::{
    CAMERA_FOLLOW_BLEND, CAMERA_FOV_DEG, CAMERA_OFFSET, CAMERA_ZFAR, CAMERA_ZNEAR,
};
use crate::{overlay, render};
use folio_core::agent::{AgentEvent, AgentMode};
use folio_core::audio::PlayOverrides;
use folio_core::boot::BootPhase;
use folio_core::lod::DeviceTier;
use folio_core::scene::{compose_scene, Camera, SceneEnv};
use folio_core::zones::zone_visual;
use glam::Vec3;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub services: Services,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub camera: Camera,
    pub last_instant: Instant,
    pub boot_done: bool,
    pub boot_phase: Option<BootPhase>,
    pub robot_move_started: bool,
    /// (selected, active zone, mode) last written to the HUD.
    pub hud_state: Option<(usize, &'static str, &'static str)>,
    pub banner_shown: bool,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        services: Services,
        canvas: web::HtmlCanvasElement,
        gpu: Option<render::GpuState<'a>>,
    ) -> Self {
        let aspect = canvas.width().max(1) as f32 / canvas.height().max(1) as f32;
        Self {
            services,
            canvas,
            gpu,
            camera: Camera {
                eye: CAMERA_OFFSET,
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect,
                fovy_radians: CAMERA_FOV_DEG.to_radians(),
                znear: CAMERA_ZNEAR,
                zfar: CAMERA_ZFAR,
            },
            last_instant: Instant::now(),
            boot_done: false,
            boot_phase: None,
            robot_move_started: false,
            hud_state: None,
            banner_shown: false,
        }
    }

    pub fn frame(&mut self) {
        let now_i = Instant::now();
        let dt_sec = (now_i - self.last_instant).as_secs_f32();
        self.last_instant = now_i;
        let s = self.services.clone();
        let now = s.clock.now();

        {
            let mut bus = s.bus.borrow_mut();
            s.device
                .borrow_mut()
                .poll(now, crate::device::probe, &mut bus);
        }
        // capability changes must reach the LOD manager before composing
        s.flush();

        self.update_boot(now);

        let multiplier = s.effects.borrow().speed_multiplier(now);
        let (agent_frame, events) = {
            let waypoints = s.waypoints.borrow();
            let mut agent = s.agent.borrow_mut();
            agent.set_speed_multiplier(multiplier);
            agent.update(dt_sec, waypoints.all_waypoints())
        };
        self.play_agent_cues(&events, agent_frame.position);

        self.camera
            .follow(agent_frame.position, CAMERA_OFFSET, CAMERA_FOLLOW_BLEND);
        s.mixer
            .borrow()
            .backend()
            .update_listener(self.camera.eye, self.camera.target);

        let active_zone = s.nav.borrow().active_zone();
        let scene = {
            let agent = s.agent.borrow();
            let waypoints = s.waypoints.borrow();
            let lod = s.lod.borrow();
            let effects = s.effects.borrow();
            let env = SceneEnv {
                time: now.as_secs_f32(),
                night_mode: effects.night_mode(),
                celebration: effects.celebration_elapsed(now),
                boot: self.boot_phase,
            };
            compose_scene(
                &agent_frame,
                zone_visual(active_zone),
                agent.trail(),
                waypoints.all_waypoints(),
                &lod,
                &env,
            )
        };

        let tier = s.lod.borrow().tier();
        if let Some(gpu) = self.gpu.as_mut() {
            let (w, h) = (self.canvas.width(), self.canvas.height());
            gpu.resize_if_needed(w, h);
            gpu.set_mesh_tier(tier);
            let (w, h) = gpu.size();
            self.camera.aspect = w.max(1) as f32 / h.max(1) as f32;
            match gpu.render(&scene, &self.camera) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::debug!("[render] surface lost; reconfiguring next frame");
                }
                Err(e) => log::error!("[render] {:?}", e),
            }
        }

        s.flush();
        self.update_overlays(now, agent_frame.mode);
    }

    fn update_boot(&mut self, now: Duration) {
        if self.boot_done {
            return;
        }
        let boot = self.services.boot.frame(now);
        if overlay::update_boot(&self.services.document, &boot) {
            log::info!("[boot] complete");
            self.boot_done = true;
            self.boot_phase = None;
        } else {
            self.boot_phase = Some(boot.phase);
        }
    }

    fn play_agent_cues(&mut self, events: &[AgentEvent], position: Vec3) {
        let mut mixer = self.services.mixer.borrow_mut();
        for event in events {
            match event {
                AgentEvent::StartedMoving { .. } => {
                    mixer.play("robot-move", PlayOverrides::at(position));
                    self.robot_move_started = true;
                }
                AgentEvent::Arrived { .. } => {
                    mixer.stop("robot-move");
                    mixer.play("robot-scan", PlayOverrides::at(position));
                    self.robot_move_started = false;
                }
                AgentEvent::ScanComplete => {}
            }
        }
        if self.robot_move_started {
            mixer.update_spatial_position("robot-move", position);
        }
    }

    fn update_overlays(&mut self, now: Duration, mode: AgentMode) {
        let doc = &self.services.document;
        {
            let effects = self.services.effects.borrow();
            let banner = effects.banner(now);
            if banner.is_some() || self.banner_shown {
                overlay::show_banner(doc, banner);
                self.banner_shown = banner.is_some();
            }
        }
        let nav = self.services.nav.borrow();
        let mode_label = match mode {
            AgentMode::Idle => "IDLE",
            AgentMode::Exploring => "EXPLORING",
            AgentMode::Moving => "MOVING",
            AgentMode::Scanning => "SCANNING",
        };
        let state = (nav.selected(), nav.active_zone(), mode_label);
        if self.hud_state != Some(state) {
            overlay::update_hud(doc, state.0, state.1, state.2);
            self.hud_state = Some(state);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    tier: DeviceTier,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, tier).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
