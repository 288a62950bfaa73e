// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Audio output seam.
//!
//! Playback happens in the browser; the controller only issues commands.
//! Each experience owns its own [`AudioOutput`] instance, so there is no
//! process-wide audio state to reset between views.

use std::fmt;

use serde::{Deserialize, Serialize};
use serenity_core::SerenityError;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioTrack {
    /// Looping ambient sound of the mood.
    Background,
    /// Spoken voice prompt.
    Voice,
}

impl fmt::Display for AudioTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background => write!(f, "background"),
            Self::Voice => write!(f, "voice"),
        }
    }
}

/// Command sent to the audio output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum AudioCommand {
    Load { track: AudioTrack, url: String, looping: bool },
    Play { track: AudioTrack },
    Pause { track: AudioTrack },
    Stop { track: AudioTrack },
    SetVolume { gain: f32 },
    Speak { text: String },
}

/// External audio capability.
pub trait AudioOutput: Send {
    fn send(&mut self, command: AudioCommand) -> Result<(), SerenityError>;

    fn load(&mut self, track: AudioTrack, url: &str, looping: bool) -> Result<(), SerenityError> {
        self.send(AudioCommand::Load { track, url: url.to_string(), looping })
    }

    fn play(&mut self, track: AudioTrack) -> Result<(), SerenityError> {
        self.send(AudioCommand::Play { track })
    }

    fn pause(&mut self, track: AudioTrack) -> Result<(), SerenityError> {
        self.send(AudioCommand::Pause { track })
    }

    fn stop(&mut self, track: AudioTrack) -> Result<(), SerenityError> {
        self.send(AudioCommand::Stop { track })
    }

    fn set_volume(&mut self, gain: f32) -> Result<(), SerenityError> {
        self.send(AudioCommand::SetVolume { gain: gain.clamp(0.0, 1.0) })
    }

    fn speak(&mut self, text: &str) -> Result<(), SerenityError> {
        self.send(AudioCommand::Speak { text: text.to_string() })
    }
}

/// Forwards commands over a channel, e.g. to a WebSocket session.
#[derive(Debug, Clone)]
pub struct ChannelAudio {
    tx: mpsc::UnboundedSender<AudioCommand>,
}

impl ChannelAudio {
    pub fn new(tx: mpsc::UnboundedSender<AudioCommand>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AudioCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

fn track_of(command: &AudioCommand) -> String {
    match command {
        AudioCommand::Load { track, .. }
        | AudioCommand::Play { track }
        | AudioCommand::Pause { track }
        | AudioCommand::Stop { track } => track.to_string(),
        AudioCommand::SetVolume { .. } => "volume".into(),
        AudioCommand::Speak { .. } => AudioTrack::Voice.to_string(),
    }
}

impl AudioOutput for ChannelAudio {
    fn send(&mut self, command: AudioCommand) -> Result<(), SerenityError> {
        let track = track_of(&command);
        self.tx
            .send(command)
            .map_err(|_| SerenityError::audio(track, "audio output disconnected"))
    }
}

/// Records commands in memory; optionally rejects loads of one track.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub commands: Vec<AudioCommand>,
    pub fail_loads: Option<AudioTrack>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(track: AudioTrack) -> Self {
        Self { commands: Vec::new(), fail_loads: Some(track) }
    }

    pub fn count(&self, pred: impl Fn(&AudioCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn last(&self) -> Option<&AudioCommand> {
        self.commands.last()
    }
}

impl AudioOutput for RecordingAudio {
    fn send(&mut self, command: AudioCommand) -> Result<(), SerenityError> {
        if let AudioCommand::Load { track, url, .. } = &command {
            if self.fail_loads == Some(*track) {
                return Err(SerenityError::audio(track.to_string(), format!("cannot load {url}")));
            }
        }
        self.commands.push(command);
        Ok(())
    }
}
