// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Per-connection experience session.
//!
//! Each WebSocket owns one [`ExperienceController`]. Its animation frames and
//! audio commands are forwarded to the socket; client messages drive the
//! controller. Failures are reported to this client as `Error` messages and
//! never affect other sessions.

use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use serenity_viz::{AudioOutput, ChannelAudio, ExperienceController, FrameUpdate};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::protocol::{ClientMsg, ServerMsg};
use crate::routes::AppState;

/// Frames buffered per connection before new ones are dropped.
const FRAME_BUFFER: usize = 8;

/// Controller plus the message translation for one connection.
pub struct ExperienceSession<A: AudioOutput> {
    controller: ExperienceController<A>,
}

impl<A: AudioOutput> ExperienceSession<A> {
    pub fn new(controller: ExperienceController<A>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &ExperienceController<A> {
        &self.controller
    }

    fn state_msg(&self) -> ServerMsg {
        ServerMsg::State {
            state: self.controller.state(),
            mood: self.controller.mood(),
        }
    }

    /// Whether `frame` belongs to the scene the client was last sent.
    /// Frames queued by a replaced scene are dropped.
    pub fn is_current(&self, frame: &FrameUpdate) -> bool {
        frame.generation == self.controller.generation()
    }

    fn no_mood() -> ServerMsg {
        ServerMsg::Error { message: "No mood selected".to_string() }
    }

    /// Apply one client message, returning the direct replies.
    pub fn handle(&mut self, msg: ClientMsg) -> Vec<ServerMsg> {
        match msg {
            ClientMsg::Ready => vec![self.state_msg()],
            ClientMsg::SelectMood { mood } => match self.controller.select_mood_by_name(&mood) {
                Ok(bootstrap) => vec![ServerMsg::SceneInit(bootstrap), self.state_msg()],
                Err(e) => vec![ServerMsg::Error { message: e.to_string() }],
            },
            ClientMsg::TogglePlay => {
                self.controller.toggle_play();
                vec![self.state_msg()]
            }
            ClientMsg::SetVolume { value } => {
                self.controller.set_volume(value);
                Vec::new()
            }
            ClientMsg::SetAnimationSpeed { value } => {
                self.controller.set_animation_speed(value);
                Vec::new()
            }
            ClientMsg::SetBrightness { value } => self
                .controller
                .set_brightness(value)
                .map(ServerMsg::Lighting)
                .into_iter()
                .collect(),
            ClientMsg::Resize { width, height } => {
                vec![ServerMsg::Viewport(self.controller.resize(width, height))]
            }
            ClientMsg::AudioLoaded { track } => {
                self.controller.on_audio_loaded(track);
                vec![self.state_msg()]
            }
            ClientMsg::AudioFailed { track, reason } => {
                self.controller.on_audio_failed(track, &reason);
                vec![self.state_msg()]
            }
            ClientMsg::PlayVoicePrompt => match self.controller.play_voice_prompt() {
                Ok(true) => Vec::new(),
                Ok(false) => vec![Self::no_mood()],
                Err(e) => vec![ServerMsg::Error { message: e.to_string() }],
            },
            ClientMsg::SaveFavorite => match self.controller.favorite() {
                Some(mood) => {
                    info!("favorite mood saved: {mood}");
                    vec![ServerMsg::Favorite { mood }]
                }
                None => vec![Self::no_mood()],
            },
        }
    }

    /// Stop animation and audio.
    pub fn close(&mut self) {
        self.controller.teardown();
    }
}

async fn send(sender: &mut SplitSink<WebSocket, Message>, msg: &ServerMsg) -> bool {
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!("could not encode message: {e}");
            true
        }
    }
}

/// Drive one WebSocket connection until the client leaves.
pub async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Wait for Ready message from client
    loop {
        match receiver.next().await {
            Some(Ok(Message::Text(text))) => {
                if let Ok(ClientMsg::Ready) = serde_json::from_str(&text) {
                    break;
                }
            }
            Some(Ok(Message::Close(_))) | None => return,
            _ => continue,
        }
    }
    info!("experience session connected");

    let (audio, mut audio_rx) = ChannelAudio::channel();
    let (frame_tx, mut frame_rx) = mpsc::channel::<FrameUpdate>(FRAME_BUFFER);
    let controller = match state.seed {
        Some(seed) => ExperienceController::seeded(audio, state.experience.clone(), seed),
        None => ExperienceController::new(audio, state.experience.clone()),
    };
    let mut session = ExperienceSession::new(controller);
    session.controller.attach_sink(frame_tx);

    let ready = session.handle(ClientMsg::Ready);
    let mut open = true;
    for msg in &ready {
        open &= send(&mut sender, msg).await;
    }

    while open {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let replies = match serde_json::from_str::<ClientMsg>(&text) {
                        Ok(msg) => session.handle(msg),
                        Err(e) => {
                            debug!("rejected client message: {e}");
                            vec![ServerMsg::Error { message: format!("Invalid message: {e}") }]
                        }
                    };
                    for reply in &replies {
                        if !send(&mut sender, reply).await {
                            open = false;
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => open = false,
                Some(Err(e)) => {
                    debug!("socket error: {e}");
                    open = false;
                }
                Some(Ok(_)) => {}
            },
            Some(frame) = frame_rx.recv() => {
                if session.is_current(&frame) {
                    open = send(&mut sender, &ServerMsg::Frame(frame)).await;
                } else {
                    debug!("dropped frame of replaced scene {}", frame.generation);
                }
            }
            Some(command) = audio_rx.recv() => {
                open = send(&mut sender, &ServerMsg::Audio(command)).await;
            }
        }
    }

    session.close();
    info!("experience session closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity_core::{ExperienceConfig, Mood};
    use serenity_viz::{AudioCommand, AudioTrack, PlaybackState, RecordingAudio};

    fn session() -> ExperienceSession<RecordingAudio> {
        ExperienceSession::new(ExperienceController::seeded(
            RecordingAudio::new(),
            ExperienceConfig::default(),
            4,
        ))
    }

    #[test]
    fn test_select_mood_sends_scene_and_state() {
        let mut s = session();
        let replies = s.handle(ClientMsg::SelectMood { mood: "happy".into() });
        assert!(matches!(replies[0], ServerMsg::SceneInit(_)));
        assert!(matches!(
            replies[1],
            ServerMsg::State { state: PlaybackState::Loading, mood: Some(Mood::Happy) }
        ));
        assert!(matches!(s.controller().audio().last(), Some(AudioCommand::Load { .. })));
    }

    #[test]
    fn test_unknown_mood_is_error() {
        let mut s = session();
        let replies = s.handle(ClientMsg::SelectMood { mood: "Grumpy".into() });
        match &replies[..] {
            [ServerMsg::Error { message }] => assert!(message.contains("Grumpy")),
            other => panic!("unexpected replies: {other:?}"),
        }
    }

    #[test]
    fn test_audio_flow() {
        let mut s = session();
        s.handle(ClientMsg::SelectMood { mood: "Tired".into() });
        let replies = s.handle(ClientMsg::AudioLoaded { track: AudioTrack::Background });
        assert!(matches!(replies[0], ServerMsg::State { state: PlaybackState::Playing, .. }));
        let replies = s.handle(ClientMsg::TogglePlay);
        assert!(matches!(replies[0], ServerMsg::State { state: PlaybackState::Paused, .. }));
    }

    #[test]
    fn test_failed_audio_pauses() {
        let mut s = session();
        s.handle(ClientMsg::SelectMood { mood: "Chill".into() });
        let replies = s.handle(ClientMsg::AudioFailed {
            track: AudioTrack::Background,
            reason: "blocked".into(),
        });
        assert!(matches!(replies[0], ServerMsg::State { state: PlaybackState::Paused, .. }));
    }

    #[test]
    fn test_brightness_replies_with_lighting() {
        let mut s = session();
        assert!(s.handle(ClientMsg::SetBrightness { value: 80 }).is_empty());
        s.handle(ClientMsg::SelectMood { mood: "Calm".into() });
        let replies = s.handle(ClientMsg::SetBrightness { value: 80 });
        assert!(matches!(&replies[..], [ServerMsg::Lighting(l)] if (l.brightness - 0.8).abs() < 1e-6));
    }

    #[test]
    fn test_favorite_and_voice_need_mood() {
        let mut s = session();
        assert!(matches!(s.handle(ClientMsg::SaveFavorite)[0], ServerMsg::Error { .. }));
        assert!(matches!(s.handle(ClientMsg::PlayVoicePrompt)[0], ServerMsg::Error { .. }));
        s.handle(ClientMsg::SelectMood { mood: "playful".into() });
        assert!(matches!(
            &s.handle(ClientMsg::SaveFavorite)[..],
            [ServerMsg::Favorite { mood: Mood::Playful }]
        ));
        assert!(s.handle(ClientMsg::PlayVoicePrompt).is_empty());
    }

    #[test]
    fn test_resize_replies_viewport() {
        let mut s = session();
        let replies = s.handle(ClientMsg::Resize { width: 0, height: 300 });
        assert!(matches!(&replies[..], [ServerMsg::Viewport(v)] if v.width == 1 && v.height == 300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_frames_of_replaced_scene_are_dropped() {
        let mut s = session();
        let (tx, mut rx) = mpsc::channel(FRAME_BUFFER);
        s.controller.attach_sink(tx);
        s.handle(ClientMsg::SelectMood { mood: "Calm".into() });
        s.handle(ClientMsg::AudioLoaded { track: AudioTrack::Background });
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        let replies = s.handle(ClientMsg::SelectMood { mood: "Tired".into() });
        let ServerMsg::SceneInit(boot) = &replies[0] else {
            panic!("expected SceneInit, got {:?}", replies[0]);
        };
        s.handle(ClientMsg::AudioLoaded { track: AudioTrack::Background });

        let mut stale = 0;
        let mut forwarded = Vec::new();
        for _ in 0..2 {
            while let Ok(frame) = rx.try_recv() {
                if s.is_current(&frame) {
                    forwarded.push(frame);
                } else {
                    stale += 1;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        }
        assert_eq!(stale, FRAME_BUFFER);
        assert!(!forwarded.is_empty());
        for frame in &forwarded {
            assert_eq!(frame.generation, boot.generation);
            if let Some(positions) = &frame.positions {
                assert_eq!(positions.len(), boot.positions.len());
            }
        }
    }

    #[test]
    fn test_close_returns_to_idle() {
        let mut s = session();
        s.handle(ClientMsg::SelectMood { mood: "Focused".into() });
        s.close();
        assert_eq!(s.controller().state(), PlaybackState::Idle);
        assert_eq!(s.controller().live_resources(), 0);
    }
}
