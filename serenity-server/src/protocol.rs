// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Client-server protocol for experience sessions.
//!
//! All messages are JSON-serialized over WebSocket, tagged by `type`.

use serde::{Deserialize, Serialize};
use serenity_core::Mood;
use serenity_viz::{
    AudioCommand, AudioTrack, FrameUpdate, LightingUpdate, PlaybackState, SceneBootstrap, Viewport,
};

// ─── Client → Server ────────────────────────────────

/// Messages sent from the experience page to the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMsg {
    /// Client signals it is ready to receive messages.
    Ready,
    /// Mood name, case-insensitive.
    SelectMood { mood: String },
    TogglePlay,
    SetVolume { value: i64 },
    SetAnimationSpeed { value: i64 },
    SetBrightness { value: i64 },
    Resize { width: u32, height: u32 },
    /// Result of an `Audio` load command.
    AudioLoaded { track: AudioTrack },
    AudioFailed { track: AudioTrack, reason: String },
    PlayVoicePrompt,
    SaveFavorite,
}

// ─── Server → Client ────────────────────────────────

/// Messages sent from the server to the experience page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMsg {
    /// New scene after a mood selection; replaces any previous one.
    SceneInit(SceneBootstrap),
    /// Changed buffers and camera for one animation step.
    Frame(FrameUpdate),
    /// Light intensities after a brightness change.
    Lighting(LightingUpdate),
    Viewport(Viewport),
    /// Command for the page's audio elements or speech synthesis.
    Audio(AudioCommand),
    State {
        state: PlaybackState,
        mood: Option<Mood>,
    },
    /// Mood to persist in device storage.
    Favorite { mood: Mood },
    Error { message: String },
}
