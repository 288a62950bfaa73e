// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Animation clock, active scene and the frame scheduling loop.
//!
//! [`AnimationLoop::start`] returns an [`AnimationHandle`] that owns the
//! spawned tick task. Dropping the handle or calling
//! [`stop`](AnimationHandle::stop) cancels it, and an [`ActiveScene`] that
//! has been disposed ignores any step that still reaches it, so no frame
//! mutates a torn-down buffer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use serenity_core::SerenityError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::field::ParticleField;
use crate::motion::step;
use crate::scene::{CameraPose, LightingUpdate, RenderableScene};

/// Monotonic elapsed-time accumulator in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    elapsed: f64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds; negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        self.elapsed
    }

    pub fn seconds(&self) -> f64 {
        self.elapsed
    }
}

/// Everything the browser needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameUpdate {
    /// Scene this frame belongs to; see [`ActiveScene::generation`].
    pub generation: u64,
    pub clock: f64,
    /// `clock * speed`, the time the motion laws were evaluated at.
    pub motion_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<f32>>,
    pub camera: CameraPose,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lighting: Option<LightingUpdate>,
}

/// The field and scene of the current experience, exclusively owned by one
/// controller and shared with its animation task.
#[derive(Debug)]
pub struct ActiveScene {
    pub field: ParticleField,
    pub scene: RenderableScene,
    pub clock: AnimationClock,
    generation: u64,
    speed: f32,
    pending_lighting: Option<LightingUpdate>,
    frames: u64,
    disposed: bool,
}

impl ActiveScene {
    pub fn new(field: ParticleField, scene: RenderableScene, speed: f32) -> Self {
        Self {
            field,
            scene,
            clock: AnimationClock::new(),
            generation: 0,
            speed,
            pending_lighting: None,
            frames: 0,
            disposed: false,
        }
    }

    /// Continue from an existing clock instead of starting at zero.
    pub fn with_clock(mut self, clock: AnimationClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Tags every frame of this scene so frames of a replaced scene can be
    /// recognized after a mood switch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Takes effect on the next frame.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Recolor the field and rescale the lights; also sent with the next frame.
    pub fn set_brightness(&mut self, brightness: f32) -> LightingUpdate {
        self.field.set_brightness(brightness);
        let update = self.scene.set_brightness(brightness);
        self.pending_lighting = Some(update.clone());
        update
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Advance the clock by `dt`, run the motion law and collect the
    /// changed buffers. Returns `None` once disposed.
    pub fn advance(&mut self, dt: f64) -> Option<FrameUpdate> {
        if self.disposed {
            return None;
        }
        let clock = self.clock.advance(dt);
        step(&mut self.field, clock, self.speed);
        self.frames += 1;
        Some(FrameUpdate {
            generation: self.generation,
            clock,
            motion_time: clock * self.speed as f64,
            positions: self.field.take_positions(),
            sizes: self.field.take_sizes(),
            colors: self.field.take_colors(),
            camera: self.scene.camera_pose(clock),
            lighting: self.pending_lighting.take(),
        })
    }

    /// Release scene resources and refuse further steps.
    pub fn dispose(&mut self) -> usize {
        self.disposed = true;
        self.scene.dispose()
    }
}

/// Lock the shared scene, mapping poisoning to a scene error.
pub fn lock_scene(scene: &Mutex<ActiveScene>) -> Result<MutexGuard<'_, ActiveScene>, SerenityError> {
    scene
        .lock()
        .map_err(|e| SerenityError::SceneInit(format!("scene lock poisoned: {e}")))
}

/// Owned handle to a running animation task.
///
/// Every start is paired with exactly one cancellation: explicit via
/// [`stop`](Self::stop), or implicit on drop.
#[derive(Debug)]
pub struct AnimationHandle {
    task: Option<JoinHandle<()>>,
}

impl AnimationHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the task and wait until it has fully stopped.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    /// Cancel without waiting.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Fixed-rate frame scheduler.
pub struct AnimationLoop;

impl AnimationLoop {
    /// Step `scene` `frame_hz` times per second and push each frame into
    /// `sink`. Must be called inside a tokio runtime.
    ///
    /// Frames are dropped when the sink is full. The task ends when the
    /// scene is disposed, the sink is closed, or the handle is cancelled.
    pub fn start(
        scene: Arc<Mutex<ActiveScene>>,
        frame_hz: u32,
        sink: mpsc::Sender<FrameUpdate>,
    ) -> AnimationHandle {
        let period = Duration::from_secs_f64(1.0 / frame_hz.max(1) as f64);
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last = Instant::now();

            loop {
                ticker.tick().await;
                let now = Instant::now();
                let dt = now.duration_since(last).as_secs_f64();
                last = now;

                let update = match lock_scene(&scene) {
                    Ok(mut active) => active.advance(dt),
                    Err(e) => {
                        warn!("animation loop stopping: {e}");
                        break;
                    }
                };
                let Some(update) = update else {
                    debug!("animation loop stopping: scene disposed");
                    break;
                };
                match sink.try_send(update) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        debug!("frame dropped: sink full");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
        });
        AnimationHandle { task: Some(task) }
    }
}
