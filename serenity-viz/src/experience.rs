// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Experience controller.
//!
//! State machine `Idle → Loading → Playing ⇄ Paused`, returning to `Idle` on
//! teardown. Selecting a mood always discards the previous field and scene
//! before generating new ones. Pausing affects audio only; the animation
//! loop keeps running for visual continuity.

use std::fmt;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serenity_core::{ExperienceConfig, Mood, MoodRecord, SerenityError, SessionSettings};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::animation::{lock_scene, ActiveScene, AnimationClock, AnimationHandle, AnimationLoop, FrameUpdate};
use crate::audio::{AudioOutput, AudioTrack};
use crate::field::ParticleField;
use crate::motion::MotionLaw;
use crate::profile::{profile_for, MoodVisualProfile};
use crate::scene::{CameraPose, LightingUpdate, SceneComposer, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    Idle,
    Loading,
    Playing,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Loading => write!(f, "Loading"),
            Self::Playing => write!(f, "Playing"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// Initial scene data handed to the renderer after a mood is selected.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneBootstrap {
    /// Only frames carrying this generation belong to the scene.
    pub generation: u64,
    pub mood: MoodRecord,
    pub profile: MoodVisualProfile,
    pub law: MotionLaw,
    /// Body of the scene construction function (see `RenderableScene::build_js`).
    pub script: String,
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub sizes: Vec<f32>,
    pub camera: CameraPose,
    pub viewport: Viewport,
    /// Composition failed and a static scene was substituted.
    pub fallback: bool,
}

pub struct ExperienceController<A: AudioOutput> {
    audio: A,
    config: ExperienceConfig,
    composer: SceneComposer,
    settings: SessionSettings,
    state: PlaybackState,
    record: Option<MoodRecord>,
    active: Option<Arc<Mutex<ActiveScene>>>,
    handle: Option<AnimationHandle>,
    sink: Option<mpsc::Sender<FrameUpdate>>,
    /// Survives mood switches; reset only by [`teardown`](Self::teardown).
    clock: AnimationClock,
    generation: u64,
    fallback: bool,
    rng: StdRng,
}

impl<A: AudioOutput> ExperienceController<A> {
    pub fn new(audio: A, config: ExperienceConfig) -> Self {
        Self::with_rng(audio, config, StdRng::from_entropy())
    }

    /// Controller whose generated fields are reproducible.
    pub fn seeded(audio: A, config: ExperienceConfig, seed: u64) -> Self {
        Self::with_rng(audio, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(audio: A, config: ExperienceConfig, rng: StdRng) -> Self {
        Self {
            audio,
            composer: SceneComposer::new(&config),
            settings: config.defaults,
            config,
            state: PlaybackState::Idle,
            record: None,
            active: None,
            handle: None,
            sink: None,
            clock: AnimationClock::new(),
            generation: 0,
            fallback: false,
            rng,
        }
    }

    // ─── Accessors ──────────────────────────────────

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn mood(&self) -> Option<Mood> {
        self.record.as_ref().and_then(|r| r.mood())
    }

    pub fn record(&self) -> Option<&MoodRecord> {
        self.record.as_ref()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Shared handle to the current field and scene, if any.
    pub fn active_scene(&self) -> Option<Arc<Mutex<ActiveScene>>> {
        self.active.clone()
    }

    /// GPU resources currently held by scenes of this controller.
    pub fn live_resources(&self) -> usize {
        self.composer.ledger().live()
    }

    /// Generation of the current scene; bumped by every mood selection.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Experience time in seconds, continuous across mood switches.
    pub fn clock(&self) -> f64 {
        match self.active.as_ref().map(|a| lock_scene(a)) {
            Some(Ok(scene)) => scene.clock.seconds(),
            _ => self.clock.seconds(),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_running())
    }

    /// Frames produced by the animation loop go to `sink`.
    pub fn attach_sink(&mut self, sink: mpsc::Sender<FrameUpdate>) {
        self.sink = Some(sink);
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Paused) {
            self.start_loop();
        }
    }

    // ─── Transitions ────────────────────────────────

    /// Tear down the current experience and start loading `mood`.
    pub fn select_mood(&mut self, mood: Mood) -> Result<SceneBootstrap, SerenityError> {
        self.teardown_scene();

        let profile = profile_for(mood);
        let record = MoodRecord::builtin(mood);
        let brightness = self.settings.brightness_factor();
        let mut field = ParticleField::generate_with_rng(&profile, brightness, &mut self.rng);

        let (scene, fallback) = match self.composer.compose(&field, &profile, brightness) {
            Ok(scene) => (scene, false),
            Err(e) => {
                error!("scene for {mood} failed, using static fallback: {e}");
                (self.composer.fallback(&profile, brightness), true)
            }
        };

        self.generation += 1;
        let bootstrap = SceneBootstrap {
            generation: self.generation,
            mood: record.clone(),
            profile,
            law: field.law(),
            script: scene.build_js(),
            positions: if fallback { Vec::new() } else { field.take_positions().unwrap_or_default() },
            colors: if fallback { Vec::new() } else { field.take_colors().unwrap_or_default() },
            sizes: if fallback { Vec::new() } else { field.take_sizes().unwrap_or_default() },
            camera: scene.camera_pose(self.clock.seconds()),
            viewport: scene.viewport,
            fallback,
        };

        let active = ActiveScene::new(field, scene, self.settings.speed_multiplier())
            .with_clock(self.clock)
            .with_generation(self.generation);
        self.active = Some(Arc::new(Mutex::new(active)));
        self.fallback = fallback;
        self.record = Some(record);
        self.state = PlaybackState::Loading;
        info!("experience {mood}: loading");

        let sound = bootstrap.mood.sound_path.clone();
        if let Err(e) = self.audio.load(AudioTrack::Background, &sound, true) {
            self.on_audio_failed(AudioTrack::Background, &e.to_string());
        }
        Ok(bootstrap)
    }

    /// Case-insensitive variant of [`select_mood`](Self::select_mood).
    ///
    /// An unknown name leaves the current experience untouched.
    pub fn select_mood_by_name(&mut self, name: &str) -> Result<SceneBootstrap, SerenityError> {
        let mood = Mood::parse(name).map_err(|e| {
            warn!("rejected mood selection: {e}");
            e
        })?;
        self.select_mood(mood)
    }

    /// The renderer finished loading `track`.
    pub fn on_audio_loaded(&mut self, track: AudioTrack) -> PlaybackState {
        if self.state != PlaybackState::Loading || track != AudioTrack::Background {
            debug!("ignoring {track} load in state {}", self.state);
            return self.state;
        }

        self.state = PlaybackState::Playing;
        if let Err(e) = self.audio.set_volume(self.settings.volume_gain()) {
            warn!("could not set volume: {e}");
        }
        if let Err(e) = self.audio.play(AudioTrack::Background) {
            return self.on_audio_failed(AudioTrack::Background, &e.to_string());
        }
        self.start_loop();
        if self.settings.voice_enabled {
            if let Err(e) = self.play_voice_prompt() {
                warn!("voice prompt failed: {e}");
            }
        }
        info!("experience {}: playing", self.mood_name());
        self.state
    }

    /// Audio failed to load or play. Background failure leaves the
    /// experience `Paused` with visuals running; voice failure is only logged.
    pub fn on_audio_failed(&mut self, track: AudioTrack, reason: &str) -> PlaybackState {
        let err = SerenityError::audio(track.to_string(), reason);
        warn!("experience {}: {err}", self.mood_name());
        if track == AudioTrack::Background
            && matches!(self.state, PlaybackState::Loading | PlaybackState::Playing)
        {
            self.state = PlaybackState::Paused;
            self.start_loop();
        }
        self.state
    }

    /// Playing ⇄ Paused. No effect in other states.
    pub fn toggle_play(&mut self) -> PlaybackState {
        match self.state {
            PlaybackState::Playing => {
                if let Err(e) = self.audio.pause(AudioTrack::Background) {
                    warn!("pause failed: {e}");
                }
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => match self.audio.play(AudioTrack::Background) {
                Ok(()) => self.state = PlaybackState::Playing,
                Err(e) => warn!("resume failed: {e}"),
            },
            PlaybackState::Idle | PlaybackState::Loading => {}
        }
        self.state
    }

    /// Tear everything down and return to `Idle`.
    pub fn teardown(&mut self) {
        self.teardown_scene();
        self.clock = AnimationClock::new();
        self.record = None;
        self.state = PlaybackState::Idle;
    }

    // ─── Settings ───────────────────────────────────

    pub fn set_volume(&mut self, value: i64) -> u8 {
        self.settings.set_volume(value);
        if let Err(e) = self.audio.set_volume(self.settings.volume_gain()) {
            warn!("could not set volume: {e}");
        }
        self.settings.volume
    }

    /// Takes effect on the next frame.
    pub fn set_animation_speed(&mut self, value: i64) -> u8 {
        self.settings.set_animation_speed(value);
        let speed = self.settings.speed_multiplier();
        self.with_active(|scene| scene.set_speed(speed));
        self.settings.animation_speed
    }

    /// Recolors the field on the next frame. Returns the new light
    /// intensities when a scene is active.
    pub fn set_brightness(&mut self, value: i64) -> Option<LightingUpdate> {
        self.settings.set_brightness(value);
        let brightness = self.settings.brightness_factor();
        self.with_active(|scene| scene.set_brightness(brightness))
    }

    pub fn set_voice_enabled(&mut self, enabled: bool) {
        self.settings.voice_enabled = enabled;
    }

    /// Update camera aspect and viewport; particles are untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Viewport {
        self.composer.set_viewport(width, height);
        self.with_active(|scene| scene.scene.resize(width, height))
            .unwrap_or(Viewport { width: width.max(1), height: height.max(1) })
    }

    /// Speak the current mood's voice prompt. Returns `false` with no mood.
    pub fn play_voice_prompt(&mut self) -> Result<bool, SerenityError> {
        let Some(text) = self.record.as_ref().map(|r| r.voice_prompt.clone()) else {
            return Ok(false);
        };
        self.audio.speak(&text)?;
        Ok(true)
    }

    /// Mood to persist as the user's favorite.
    pub fn favorite(&self) -> Option<Mood> {
        self.mood()
    }

    /// Step the active scene manually (when no animation loop is running).
    pub fn advance_frame(&mut self, dt: f64) -> Option<FrameUpdate> {
        self.with_active(|scene| scene.advance(dt)).flatten()
    }

    // ─── Internals ──────────────────────────────────

    fn mood_name(&self) -> &str {
        self.record.as_ref().map_or("-", |r| r.name.as_str())
    }

    fn with_active<T>(&self, f: impl FnOnce(&mut ActiveScene) -> T) -> Option<T> {
        let active = self.active.as_ref()?;
        match lock_scene(active) {
            Ok(mut scene) => Some(f(&mut scene)),
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }

    fn start_loop(&mut self) {
        if self.is_animating() || self.fallback {
            return;
        }
        let (Some(active), Some(sink)) = (self.active.as_ref(), self.sink.as_ref()) else {
            return;
        };
        if tokio::runtime::Handle::try_current().is_err() {
            debug!("no runtime, frames must be driven manually");
            return;
        }
        self.handle = Some(AnimationLoop::start(
            Arc::clone(active),
            self.config.frame_hz,
            sink.clone(),
        ));
    }

    fn teardown_scene(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.cancel();
        }
        if let Some(active) = self.active.take() {
            let released = self.dispose_scene(&active);
            debug!("experience {}: released {released} resources", self.mood_name());
        }
        if self.state != PlaybackState::Idle {
            if let Err(e) = self.audio.stop(AudioTrack::Background) {
                warn!("could not stop audio: {e}");
            }
        }
        self.fallback = false;
        self.state = PlaybackState::Idle;
    }

    /// Dispose `active`, keeping its clock for the next scene.
    fn dispose_scene(&mut self, active: &Mutex<ActiveScene>) -> usize {
        match lock_scene(active) {
            Ok(mut scene) => {
                self.clock = scene.clock;
                scene.dispose()
            }
            Err(e) => {
                error!("{e}");
                0
            }
        }
    }
}

impl<A: AudioOutput> Drop for ExperienceController<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}
