// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! HTTP error mapping. Every error body is `{"message": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serenity_core::SerenityError;
use thiserror::Error;
use tracing::error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(reason) = &self {
            error!("request failed: {reason}");
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<SerenityError> for ApiError {
    fn from(e: SerenityError) -> Self {
        match e {
            SerenityError::UnknownMood(_) => Self::NotFound("Mood not found".to_string()),
            SerenityError::InferenceInput(reason) => Self::BadRequest(reason),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateUsername(_) => Self::Conflict("Username already exists".to_string()),
            StoreError::Poisoned(reason) => Self::Internal(reason),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity_core::UnknownMoodError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(SerenityError::from(UnknownMoodError::new("x"))).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(SerenityError::InferenceInput("Invalid message".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(StoreError::DuplicateUsername("a".into())).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(SerenityError::Network("down".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_is_bare_reason() {
        let err = ApiError::from(SerenityError::InferenceInput("Invalid session ID".into()));
        assert_eq!(err.to_string(), "Invalid session ID");
    }
}
