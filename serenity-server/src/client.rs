// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! HTTP transport for the chat assistant.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serenity_core::chat::{ChatBackend, ChatReply, ChatRequest};
use serenity_core::SerenityError;
use tracing::debug;

/// Calls `POST {base_url}/api/ai/chat`.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SerenityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SerenityError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/ai/chat", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, SerenityError> {
        let url = self.endpoint();
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SerenityError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body["message"].as_str().unwrap_or("rejected").to_string();
            return Err(SerenityError::InferenceInput(message));
        }
        if !status.is_success() {
            return Err(SerenityError::Network(format!("{url} returned {status}")));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| SerenityError::Network(format!("malformed reply: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity_core::chat::{ChatAssistant, ReplySource};
    use serenity_core::Mood;

    #[test]
    fn test_endpoint_trims_slash() {
        let backend = HttpChatBackend::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:5000/api/ai/chat");
    }

    #[tokio::test]
    async fn test_unreachable_server_falls_back() {
        let backend = HttpChatBackend::new("http://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        let assistant = ChatAssistant::new(backend);
        let outcome = assistant
            .ask(&ChatRequest::new("so much pressure at work", "s1"))
            .await
            .unwrap();
        assert_eq!(outcome.source, ReplySource::LocalFallback);
        assert_eq!(outcome.reply.moods(), vec![Mood::Stressed]);
        assert!(outcome.reply.message.starts_with("I'm sorry"));
    }
}
