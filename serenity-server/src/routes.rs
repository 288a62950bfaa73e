// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! HTTP routes.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;
use serenity_core::chat::{ChatReply, ChatRequest};
use serenity_core::config::{ANIMATION_SPEED_RANGE, BRIGHTNESS_RANGE, VOLUME_RANGE};
use serenity_core::inference::{rule_table, RuleTable};
use serenity_core::{infer, AgeGroup, AgeGroupInfo, ExperienceConfig, Mood, MoodRecord, SessionSettings};
use serenity_viz::{experience_page, index_page, invalid_mood_page, profile_for};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::session::handle_socket;
use crate::storage::{Conversation, MemStorage, NewConversation, NewUser, Preferences, User};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<MemStorage>,
    pub experience: ExperienceConfig,
    pub seed: Option<u64>,
}

impl AppState {
    pub fn new(experience: ExperienceConfig, seed: Option<u64>) -> Self {
        Self {
            storage: Arc::new(MemStorage::new()),
            experience,
            seed,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/experience/{mood}", get(serve_experience))
        .route("/ws/experience", get(ws_handler))
        .route("/api/moods", get(list_moods))
        .route("/api/moods/{name}", get(get_mood))
        .route("/api/age-groups", get(list_age_groups))
        .route("/api/users", post(create_user))
        .route("/api/users/{id}/preferred-mood", put(update_preferred_mood))
        .route("/api/users/{id}/preferences", get(get_user_preferences))
        .route("/api/preferences/{id}", put(update_preferences))
        .route("/api/ai/chat", post(chat))
        .route("/api/ai/conversations/{session_id}", get(list_conversations))
        .route("/api/ai/rules", get(get_rules))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ─── Pages ──────────────────────────────────────────

async fn serve_index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    Ok(Html(index_page(&state.storage.all_moods()?)))
}

async fn serve_experience(State(state): State<AppState>, Path(segment): Path<String>) -> Response {
    let mood = match Mood::parse(&segment) {
        Ok(mood) => mood,
        Err(e) => {
            warn!("experience page: {e}");
            return (StatusCode::NOT_FOUND, Html(invalid_mood_page(&segment))).into_response();
        }
    };
    let record = match state.storage.mood_by_name(mood.name()) {
        Ok(Some(record)) => record,
        Ok(None) => MoodRecord::builtin(mood),
        Err(e) => return ApiError::from(e).into_response(),
    };
    Html(experience_page(&record, &profile_for(mood), &state.experience)).into_response()
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

// ─── Catalog ────────────────────────────────────────

async fn list_moods(State(state): State<AppState>) -> Result<Json<Vec<MoodRecord>>, ApiError> {
    Ok(Json(state.storage.all_moods()?))
}

async fn get_mood(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<MoodRecord>, ApiError> {
    state
        .storage
        .mood_by_name(&name)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Mood not found".to_string()))
}

async fn list_age_groups() -> Json<Vec<AgeGroupInfo>> {
    Json(AgeGroupInfo::all_builtin())
}

// ─── Users and preferences ──────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserBody {
    username: String,
    password: String,
    age_group: String,
    #[serde(default)]
    preferred_mood: Option<String>,
}

#[derive(serde::Serialize)]
struct CreatedUser {
    user: User,
    preferences: Preferences,
}

async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUser>), ApiError> {
    let invalid = || ApiError::BadRequest("Invalid user data".to_string());
    let Json(body) = body.map_err(|_| invalid())?;
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(invalid());
    }
    let age_group = AgeGroup::parse(&body.age_group).ok_or_else(invalid)?;
    let preferred_mood = match body.preferred_mood.as_deref() {
        Some(name) => Some(Mood::parse(name).map_err(|_| invalid())?),
        None => None,
    };

    let user = state.storage.create_user(NewUser {
        username: body.username,
        password: body.password,
        age_group,
        preferred_mood,
    })?;
    let preferences = state.storage.create_preferences(user.id, SessionSettings::default())?;
    info!("created user {} ({})", user.id, user.age_group);
    Ok((StatusCode::CREATED, Json(CreatedUser { user, preferences })))
}

#[derive(Debug, Deserialize)]
struct PreferredMoodBody {
    mood: Option<String>,
}

async fn update_preferred_mood(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    body: Result<Json<PreferredMoodBody>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let invalid = || ApiError::BadRequest("Invalid mood".to_string());
    let Json(body) = body.map_err(|_| invalid())?;
    let mood = body
        .mood
        .as_deref()
        .and_then(|m| Mood::parse(m).ok())
        .ok_or_else(invalid)?;
    state
        .storage
        .update_preferred_mood(id, mood)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

async fn get_user_preferences(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Preferences>, ApiError> {
    state
        .storage
        .preferences_for_user(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Preferences not found".to_string()))
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreferencesBody {
    volume: Option<i64>,
    animation_speed: Option<i64>,
    brightness: Option<i64>,
    voice_enabled: Option<bool>,
}

fn in_range(value: Option<i64>, range: (u8, u8)) -> bool {
    value.map_or(true, |v| (range.0 as i64..=range.1 as i64).contains(&v))
}

impl PreferencesBody {
    fn is_valid(&self) -> bool {
        in_range(self.volume, VOLUME_RANGE)
            && in_range(self.animation_speed, ANIMATION_SPEED_RANGE)
            && in_range(self.brightness, BRIGHTNESS_RANGE)
    }

    fn apply(&self, settings: &mut SessionSettings) {
        if let Some(v) = self.volume {
            settings.set_volume(v);
        }
        if let Some(v) = self.animation_speed {
            settings.set_animation_speed(v);
        }
        if let Some(v) = self.brightness {
            settings.set_brightness(v);
        }
        if let Some(v) = self.voice_enabled {
            settings.voice_enabled = v;
        }
    }
}

async fn update_preferences(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    body: Result<Json<PreferencesBody>, JsonRejection>,
) -> Result<Json<Preferences>, ApiError> {
    let invalid = || ApiError::BadRequest("Invalid preferences data".to_string());
    let Json(body) = body.map_err(|_| invalid())?;
    if !body.is_valid() {
        return Err(invalid());
    }
    state
        .storage
        .update_preferences(id, |settings| body.apply(settings))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Preferences not found".to_string()))
}

// ─── Chat ───────────────────────────────────────────

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = body.map_err(|_| ApiError::BadRequest("Invalid message".to_string()))?;
    let (message, session_id) = request.validate()?;

    let moods = infer(message);
    let mut suggested_moods = Vec::with_capacity(moods.len());
    for mood in &moods {
        if let Some(record) = state.storage.mood_by_name(mood.name())? {
            suggested_moods.push(record);
        }
    }
    let reply = ChatReply {
        message: ChatReply::suggestion_text(&moods),
        suggested_moods,
    };

    state.storage.create_conversation(NewConversation {
        user_id: request.user_id,
        session_id: session_id.to_string(),
        user_message: message.to_string(),
        ai_response: serde_json::to_string(&reply)?,
        suggested_mood: moods.first().copied(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })?;
    info!("chat session {session_id}: suggested {:?}", moods);
    Ok(Json(reply))
}

async fn list_conversations(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Conversation>>, ApiError> {
    Ok(Json(state.storage.conversations_for_session(&session_id)?))
}

async fn get_rules() -> Json<RuleTable> {
    Json(rule_table())
}
