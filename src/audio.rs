//! WebAudio playback backend. Every cue is synthesised from oscillators, so
//! there are no sample assets to fetch.

use crate::constants::LISTENER_UP;
use folio_core::audio::{PlaybackBackend, SoundDescriptor};
use folio_core::error::{FolioError, Result};
use glam::Vec3;
use smallvec::SmallVec;
use web_sys as web;

#[derive(Clone, Copy, Debug)]
enum Wave {
    Sine,
    Square,
    Saw,
    Triangle,
}

impl Wave {
    fn oscillator_type(self) -> web::OscillatorType {
        match self {
            Wave::Sine => web::OscillatorType::Sine,
            Wave::Square => web::OscillatorType::Square,
            Wave::Saw => web::OscillatorType::Sawtooth,
            Wave::Triangle => web::OscillatorType::Triangle,
        }
    }
}

/// One enveloped oscillator sweep inside a cue.
#[derive(Clone, Copy, Debug)]
struct Tone {
    wave: Wave,
    from_hz: f32,
    to_hz: f32,
    delay: f64,  // s after the cue starts
    length: f64, // s
    peak: f32,
}

const fn tone(wave: Wave, from_hz: f32, to_hz: f32, delay: f64, length: f64, peak: f32) -> Tone {
    Tone {
        wave,
        from_hz,
        to_hz,
        delay,
        length,
        peak,
    }
}

use self::Wave::*;

fn one_shot(id: &str) -> &'static [Tone] {
    match id {
        "click" => &[tone(Square, 1200.0, 900.0, 0.0, 0.04, 0.4)],
        "hover" => &[tone(Sine, 880.0, 990.0, 0.0, 0.06, 0.25)],
        "select" => &[
            tone(Triangle, 660.0, 660.0, 0.0, 0.08, 0.5),
            tone(Triangle, 990.0, 990.0, 0.07, 0.1, 0.5),
        ],
        "error" => &[
            tone(Square, 220.0, 180.0, 0.0, 0.15, 0.4),
            tone(Square, 180.0, 140.0, 0.16, 0.2, 0.4),
        ],
        "robot-move" => &[tone(Saw, 90.0, 140.0, 0.0, 0.35, 0.3)],
        "robot-scan" => &[tone(Sine, 400.0, 1600.0, 0.0, 0.6, 0.35)],
        "robot-boot" => &[
            tone(Saw, 80.0, 320.0, 0.0, 0.8, 0.35),
            tone(Sine, 523.0, 523.0, 0.8, 0.15, 0.4),
            tone(Sine, 784.0, 784.0, 0.95, 0.25, 0.4),
        ],
        "servo-motor" => &[tone(Saw, 300.0, 450.0, 0.0, 0.25, 0.2)],
        "zone-enter" => &[
            tone(Triangle, 440.0, 880.0, 0.0, 0.3, 0.5),
            tone(Sine, 1320.0, 1320.0, 0.25, 0.2, 0.3),
        ],
        "zone-exit" => &[tone(Triangle, 880.0, 440.0, 0.0, 0.3, 0.45)],
        "portal-whoosh" => &[tone(Saw, 120.0, 2400.0, 0.0, 0.7, 0.3)],
        "achievement" => &[
            tone(Square, 523.0, 523.0, 0.0, 0.12, 0.35),
            tone(Square, 659.0, 659.0, 0.12, 0.12, 0.35),
            tone(Square, 784.0, 784.0, 0.24, 0.12, 0.35),
            tone(Square, 1047.0, 1047.0, 0.36, 0.3, 0.35),
        ],
        "notification" => &[
            tone(Sine, 988.0, 988.0, 0.0, 0.1, 0.4),
            tone(Sine, 1319.0, 1319.0, 0.1, 0.18, 0.4),
        ],
        _ => &[],
    }
}

/// Sustained oscillator for looping sounds.
fn drone(id: &str) -> Option<(Wave, f32)> {
    match id {
        "mechanical-hum" => Some((Saw, 55.0)),
        "lab-ambience" => Some((Sine, 110.0)),
        "background-theme" => Some((Triangle, 220.0)),
        _ => None,
    }
}

fn cue_length(tones: &[Tone]) -> f64 {
    tones
        .iter()
        .map(|t| t.delay + t.length)
        .fold(0.0, f64::max)
}

pub struct WebHandle {
    id: &'static str,
    gain: Option<web::GainNode>,
    panner: Option<web::PannerNode>,
    drone: Option<web::OscillatorNode>,
    /// Oscillators scheduled for the current one-shot cue.
    voices: SmallVec<[web::OscillatorNode; 4]>,
    busy_until: f64,
}

impl WebHandle {
    fn silence(&mut self) {
        for osc in self.drone.take().into_iter().chain(self.voices.drain(..)) {
            _ = osc.stop();
            osc.disconnect().ok();
        }
        self.busy_until = 0.0;
    }
}

/// With no context every handle is inert and every start is rejected.
pub struct WebAudioBackend {
    ctx: Option<web::AudioContext>,
    master: Option<web::GainNode>,
}

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> Option<web::GainNode> {
    match web::GainNode::new(ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Some(g)
        }
        Err(e) => {
            log::error!("[audio] {} GainNode error: {:?}", label, e);
            None
        }
    }
}

fn create_panner(ctx: &web::AudioContext, label: &str) -> Option<web::PannerNode> {
    match web::PannerNode::new(ctx) {
        Ok(p) => {
            p.set_panning_model(web::PanningModelType::Hrtf);
            p.set_distance_model(web::DistanceModelType::Inverse);
            p.set_ref_distance(1.0);
            p.set_rolloff_factor(1.0);
            Some(p)
        }
        Err(e) => {
            log::error!("[audio] {} PannerNode error: {:?}", label, e);
            None
        }
    }
}

fn js_err(e: wasm_bindgen::JsValue) -> FolioError {
    FolioError::PlaybackRejected(format!("{:?}", e))
}

impl WebAudioBackend {
    pub fn new(ctx: Option<web::AudioContext>) -> Self {
        let master = ctx.as_ref().and_then(|c| {
            let m = create_gain(c, 1.0, "master")?;
            _ = m.connect_with_audio_node(&c.destination());
            Some(m)
        });
        Self { ctx, master }
    }

    pub fn has_output(&self) -> bool {
        self.master.is_some()
    }

    /// Browsers keep the context suspended until a user gesture.
    pub fn resume_if_suspended(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web::AudioContextState::Suspended {
                log::debug!("[audio] resuming suspended context");
                _ = ctx.resume();
            }
        }
    }

    pub fn update_listener(&self, eye: Vec3, target: Vec3) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let listener = ctx.listener();
        let fwd = (target - eye).normalize_or_zero();
        listener.set_position(eye.x as f64, eye.y as f64, eye.z as f64);
        let [ux, uy, uz] = LISTENER_UP;
        _ = listener.set_orientation(fwd.x as f64, fwd.y as f64, fwd.z as f64, ux, uy, uz);
    }
}

fn schedule_tone(
    ctx: &web::AudioContext,
    out: &web::GainNode,
    t: &Tone,
    t0: f64,
) -> Result<web::OscillatorNode> {
    let osc = web::OscillatorNode::new(ctx).map_err(js_err)?;
    osc.set_type(t.wave.oscillator_type());
    let env = web::GainNode::new(ctx).map_err(js_err)?;
    let start = t0 + t.delay;
    let end = start + t.length;
    _ = osc.frequency().set_value_at_time(t.from_hz, start);
    if (t.to_hz - t.from_hz).abs() > f32::EPSILON {
        _ = osc.frequency().linear_ramp_to_value_at_time(t.to_hz, end);
    }
    _ = env.gain().set_value_at_time(0.0, start);
    _ = env.gain().linear_ramp_to_value_at_time(t.peak, start + 0.01);
    _ = env.gain().linear_ramp_to_value_at_time(0.0, end);
    _ = osc.connect_with_audio_node(&env);
    _ = env.connect_with_audio_node(out);
    osc.start_with_when(start).map_err(js_err)?;
    osc.stop_with_when(end + 0.02).map_err(js_err)?;
    Ok(osc)
}

fn start_drone(
    ctx: &web::AudioContext,
    out: &web::GainNode,
    wave: Wave,
    hz: f32,
) -> Result<web::OscillatorNode> {
    let osc = web::OscillatorNode::new(ctx).map_err(js_err)?;
    osc.set_type(wave.oscillator_type());
    osc.frequency().set_value(hz);
    _ = osc.connect_with_audio_node(out);
    osc.start().map_err(js_err)?;
    Ok(osc)
}

impl PlaybackBackend for WebAudioBackend {
    type Handle = WebHandle;

    fn create_handle(&mut self, sound: &SoundDescriptor) -> WebHandle {
        let mut handle = WebHandle {
            id: sound.id,
            gain: None,
            panner: None,
            drone: None,
            voices: SmallVec::new(),
            busy_until: 0.0,
        };
        let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
            return handle;
        };
        handle.gain = create_gain(ctx, sound.volume, sound.id);
        if sound.spatial {
            handle.panner = create_panner(ctx, sound.id);
        }
        if let Some(g) = &handle.gain {
            match &handle.panner {
                Some(p) => {
                    _ = g.connect_with_audio_node(p);
                    _ = p.connect_with_audio_node(master);
                }
                None => {
                    _ = g.connect_with_audio_node(master);
                }
            }
        }
        handle
    }

    fn is_busy(&self, handle: &WebHandle) -> bool {
        handle.drone.is_some()
            || self
                .ctx
                .as_ref()
                .is_some_and(|ctx| ctx.current_time() < handle.busy_until)
    }

    fn set_volume(&mut self, handle: &mut WebHandle, volume: f32) {
        if let Some(g) = &handle.gain {
            g.gain().set_value(volume);
        }
    }

    fn start(&mut self, handle: &mut WebHandle, sound: &SoundDescriptor, looped: bool) -> Result<()> {
        let Some(ctx) = self.ctx.clone() else {
            return Err(FolioError::PlaybackRejected("no audio context".into()));
        };
        if ctx.state() == web::AudioContextState::Suspended {
            self.resume_if_suspended();
            return Err(FolioError::PlaybackRejected(
                "audio context suspended until a user gesture".into(),
            ));
        }
        let out = handle
            .gain
            .clone()
            .ok_or_else(|| FolioError::PlaybackRejected(format!("no output for {}", sound.id)))?;
        if looped {
            if handle.drone.is_some() {
                return Ok(());
            }
            let (wave, hz) = drone(handle.id).unwrap_or((Sine, 220.0));
            handle.drone = Some(start_drone(&ctx, &out, wave, hz)?);
            return Ok(());
        }
        // a reused handle cuts off whatever it was still playing
        handle.silence();
        let now = ctx.current_time();
        let tones = one_shot(handle.id);
        for t in tones {
            let osc = schedule_tone(&ctx, &out, t, now)?;
            handle.voices.push(osc);
        }
        handle.busy_until = now + cue_length(tones);
        Ok(())
    }

    fn pause(&mut self, handle: &mut WebHandle) {
        handle.silence();
    }

    fn rewind(&mut self, handle: &mut WebHandle) {
        // Synthesised cues restart from the top on every start.
        handle.busy_until = 0.0;
    }

    fn set_position(&mut self, handle: &mut WebHandle, position: Vec3, falloff: f32) -> bool {
        match &handle.panner {
            Some(p) => {
                p.position_x().set_value(position.x);
                p.position_y().set_value(position.y);
                p.position_z().set_value(position.z);
                p.set_max_distance(falloff as f64);
                true
            }
            None => false,
        }
    }
}
