// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Error taxonomy shared by the scene engine, the server and the chat client.

use thiserror::Error;

/// A mood name outside the closed set.
///
/// Never recovered by substituting a default mood: callers surface it as a
/// "mood not found" view or an HTTP 404.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mood '{name}'")]
pub struct UnknownMoodError {
    pub name: String,
}

impl UnknownMoodError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerenityError {
    #[error(transparent)]
    UnknownMood(#[from] UnknownMoodError),

    /// Background sound or voice prompt failed to load or play.
    #[error("audio failed for {track}: {reason}")]
    AudioLoad { track: String, reason: String },

    /// Chat request rejected before inference ran.
    #[error("invalid chat input: {0}")]
    InferenceInput(String),

    /// Remote chat call failed; callers fall back to local inference.
    #[error("network error: {0}")]
    Network(String),

    /// No render surface or an unrecoverable scene setup failure.
    #[error("scene initialization failed: {0}")]
    SceneInit(String),
}

impl SerenityError {
    pub fn audio(track: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AudioLoad {
            track: track.into(),
            reason: reason.into(),
        }
    }

    /// Whether the chat layer should answer from the local rule table instead.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
