// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Chat request/response types and the client-side assistant.
//!
//! [`ChatAssistant`] sends the message to a [`ChatBackend`] (normally the
//! server's `POST /api/ai/chat`). When the backend reports a network failure
//! it answers locally with the same [`infer`] the server uses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::MoodRecord;
use crate::error::SerenityError;
use crate::inference::{infer, join_moods};
use crate::mood::Mood;

/// Body of `POST /api/ai/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u32>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            session_id: Some(session_id.into()),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: u32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Reject requests with a missing or blank message or session id.
    ///
    /// Returns the (message, session id) pair on success.
    pub fn validate(&self) -> Result<(&str, &str), SerenityError> {
        let message = self
            .message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| SerenityError::InferenceInput("Invalid message".into()))?;
        let session = self
            .session_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SerenityError::InferenceInput("Invalid session ID".into()))?;
        Ok((message, session))
    }
}

/// Response of `POST /api/ai/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    pub suggested_moods: Vec<MoodRecord>,
}

impl ChatReply {
    /// Reply text used by the server for inferred moods.
    pub fn suggestion_text(moods: &[Mood]) -> String {
        format!(
            "Based on what you've shared, I think you might benefit from our {} experience.",
            join_moods(moods)
        )
    }

    /// Offline reply built entirely from local data.
    pub fn offline(text: &str) -> Self {
        let moods = infer(text);
        Self {
            message: format!(
                "I'm sorry, I'm having trouble connecting right now. Based on what you've shared, you might enjoy our {} experience.",
                join_moods(&moods)
            ),
            suggested_moods: moods.into_iter().map(MoodRecord::builtin).collect(),
        }
    }

    pub fn moods(&self) -> Vec<Mood> {
        self.suggested_moods.iter().filter_map(|r| r.mood()).collect()
    }
}

/// Transport for chat requests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a validated request. Transport failures must map to
    /// [`SerenityError::Network`].
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, SerenityError>;
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Remote,
    LocalFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub reply: ChatReply,
    pub source: ReplySource,
}

/// Client-side chat assistant with offline fallback.
pub struct ChatAssistant<B: ChatBackend> {
    backend: B,
}

impl<B: ChatBackend> ChatAssistant<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Ask the backend, answering locally if it cannot be reached.
    ///
    /// Input errors are returned before any request is made; non-network
    /// backend errors propagate unchanged.
    pub async fn ask(&self, request: &ChatRequest) -> Result<ChatOutcome, SerenityError> {
        let (message, _) = request.validate()?;

        match self.backend.send(request).await {
            Ok(reply) => Ok(ChatOutcome {
                reply,
                source: ReplySource::Remote,
            }),
            Err(e) if e.is_network() => {
                warn!("chat backend unreachable ({e}), answering from local rules");
                Ok(ChatOutcome {
                    reply: ChatReply::offline(message),
                    source: ReplySource::LocalFallback,
                })
            }
            Err(e) => Err(e),
        }
    }
}
