// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! In-memory record store.
//!
//! Each table hands out ids from 1 upward. Nothing is persisted across
//! restarts.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serenity_core::{AgeGroup, Mood, MoodRecord, SessionSettings};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("{0}")]
    Poisoned(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub age_group: AgeGroup,
    pub preferred_mood: Option<Mood>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub age_group: AgeGroup,
    pub preferred_mood: Option<Mood>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub id: u32,
    pub user_id: u32,
    #[serde(flatten)]
    pub settings: SessionSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u32,
    pub user_id: Option<u32>,
    pub session_id: String,
    pub user_message: String,
    /// JSON text of the reply that was sent.
    pub ai_response: String,
    pub suggested_mood: Option<Mood>,
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: Option<u32>,
    pub session_id: String,
    pub user_message: String,
    pub ai_response: String,
    pub suggested_mood: Option<Mood>,
    pub timestamp: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<u32, User>,
    preferences: BTreeMap<u32, Preferences>,
    moods: Vec<MoodRecord>,
    conversations: Vec<Conversation>,
    next_user: u32,
    next_preferences: u32,
    next_conversation: u32,
}

fn next_id(counter: &mut u32) -> u32 {
    *counter += 1;
    *counter
}

pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStorage {
    /// Store seeded with the built-in mood catalog.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                moods: MoodRecord::all_builtin(),
                ..Tables::default()
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|e| StoreError::Poisoned(format!("Lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|e| StoreError::Poisoned(format!("Lock poisoned: {}", e)))
    }

    // ─── Moods ──────────────────────────────────────

    pub fn all_moods(&self) -> Result<Vec<MoodRecord>, StoreError> {
        Ok(self.read()?.moods.clone())
    }

    /// Case-insensitive lookup.
    pub fn mood_by_name(&self, name: &str) -> Result<Option<MoodRecord>, StoreError> {
        let name = name.trim();
        Ok(self
            .read()?
            .moods
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    // ─── Users ──────────────────────────────────────

    pub fn user(&self, id: u32) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.values().find(|u| u.username == username).cloned())
    }

    pub fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::DuplicateUsername(new.username));
        }
        let id = next_id(&mut tables.next_user);
        let user = User {
            id,
            username: new.username,
            password: new.password,
            age_group: new.age_group,
            preferred_mood: new.preferred_mood,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    pub fn update_preferred_mood(&self, id: u32, mood: Mood) -> Result<Option<User>, StoreError> {
        let mut tables = self.write()?;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.preferred_mood = Some(mood);
            user.clone()
        }))
    }

    // ─── Preferences ────────────────────────────────

    pub fn create_preferences(&self, user_id: u32, settings: SessionSettings) -> Result<Preferences, StoreError> {
        let mut tables = self.write()?;
        let id = next_id(&mut tables.next_preferences);
        let prefs = Preferences { id, user_id, settings };
        tables.preferences.insert(id, prefs.clone());
        Ok(prefs)
    }

    pub fn preferences_for_user(&self, user_id: u32) -> Result<Option<Preferences>, StoreError> {
        Ok(self
            .read()?
            .preferences
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    /// Apply `update` to the preferences with id `id`.
    pub fn update_preferences(
        &self,
        id: u32,
        update: impl FnOnce(&mut SessionSettings),
    ) -> Result<Option<Preferences>, StoreError> {
        let mut tables = self.write()?;
        Ok(tables.preferences.get_mut(&id).map(|prefs| {
            update(&mut prefs.settings);
            prefs.clone()
        }))
    }

    // ─── Conversations ──────────────────────────────

    pub fn create_conversation(&self, new: NewConversation) -> Result<Conversation, StoreError> {
        let mut tables = self.write()?;
        let id = next_id(&mut tables.next_conversation);
        let conversation = Conversation {
            id,
            user_id: new.user_id,
            session_id: new.session_id,
            user_message: new.user_message,
            ai_response: new.ai_response,
            suggested_mood: new.suggested_mood,
            timestamp: new.timestamp,
        };
        tables.conversations.push(conversation.clone());
        Ok(conversation)
    }

    /// Conversations of a session in insertion order.
    pub fn conversations_for_session(&self, session_id: &str) -> Result<Vec<Conversation>, StoreError> {
        Ok(self
            .read()?
            .conversations
            .iter()
            .filter(|c| c.session_id == session_id)
            .cloned()
            .collect())
    }
}
