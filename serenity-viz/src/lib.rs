// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

pub mod color;
pub mod profile;
pub mod field;
pub mod motion;
pub mod scene;
pub mod template;
pub mod animation;
pub mod audio;
pub mod experience;

pub use animation::{ActiveScene, AnimationClock, AnimationHandle, AnimationLoop, FrameUpdate};
pub use audio::{AudioCommand, AudioOutput, AudioTrack, ChannelAudio, RecordingAudio};
pub use experience::{ExperienceController, PlaybackState, SceneBootstrap};
pub use field::ParticleField;
pub use motion::{step, MotionLaw};
pub use profile::{profile_for, profile_for_name, Archetype, MoodVisualProfile};
pub use scene::{CameraPose, LightingUpdate, RenderableScene, ResourceLedger, SceneComposer, Viewport};
pub use template::{experience_page, index_page, invalid_mood_page};
