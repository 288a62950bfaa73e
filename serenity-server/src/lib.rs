// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! SerenitySphere server
//!
//! Axum-based HTTP + WebSocket server that:
//! 1. Serves the mood catalog, users, preferences and the chat endpoint
//! 2. Renders the landing page and one experience page per mood
//! 3. Runs an experience controller per WebSocket connection and streams
//!    scene frames and audio commands to the browser

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod routes;
pub mod session;
pub mod storage;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{router, AppState};
pub use storage::MemStorage;
