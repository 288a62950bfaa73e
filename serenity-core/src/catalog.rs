// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Built-in mood and age-group records.
//!
//! These seed the server store and double as the offline data the chat
//! fallback resolves suggestions against, so both paths always agree.

use serde::{Deserialize, Serialize};

use crate::mood::{AgeGroup, Mood};

/// Public mood record as served by `GET /api/moods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRecord {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub visual_path: String,
    pub sound_path: String,
    pub voice_prompt: String,
    pub icon: String,
}

impl MoodRecord {
    /// The built-in record for a mood.
    pub fn builtin(mood: Mood) -> Self {
        let (description, voice_prompt, icon) = match mood {
            Mood::Tired => (
                "Gentle relaxation to help you unwind and rest.",
                "Allow your body to relax.",
                "moon",
            ),
            Mood::Chill => (
                "Let your worries drift away with soothing sensations.",
                "Let your worries drift away.",
                "cloud",
            ),
            Mood::Happy => (
                "Embrace the feeling of joy and positive energy.",
                "Embrace the feeling of joy.",
                "smile",
            ),
            Mood::Anxious => (
                "Find your inner stillness with calming rhythms.",
                "Find your inner stillness.",
                "water",
            ),
            Mood::Focused => (
                "Center your thoughts and enhance concentration.",
                "Center your thoughts.",
                "bullseye",
            ),
            Mood::Stressed => (
                "Immerse in nature's peace to release tension.",
                "Imagine the peace of nature surrounding you.",
                "wind",
            ),
            Mood::Playful => (
                "Let your imagination soar with light-hearted joy.",
                "Let your imagination soar.",
                "feather",
            ),
            Mood::Calm => (
                "Breathe in peace, breathe out tension.",
                "Breathe in peace, breathe out tension.",
                "star",
            ),
        };

        Self {
            id: mood.id(),
            name: mood.name().to_string(),
            description: description.to_string(),
            visual_path: format!("/assets/moods/{}_visual.mp4", mood.slug()),
            sound_path: format!("/assets/moods/{}_sound.mp3", mood.slug()),
            voice_prompt: voice_prompt.to_string(),
            icon: icon.to_string(),
        }
    }

    /// All built-in records in catalog order.
    pub fn all_builtin() -> Vec<Self> {
        Mood::ALL.iter().map(|m| Self::builtin(*m)).collect()
    }

    /// The mood this record describes, if its name is in the closed set.
    pub fn mood(&self) -> Option<Mood> {
        Mood::parse(&self.name).ok()
    }
}

/// Landing-page description of an age group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroupInfo {
    pub name: String,
    pub title: String,
    pub icon: String,
    pub description: String,
}

impl AgeGroupInfo {
    pub fn builtin(group: AgeGroup) -> Self {
        let (icon, description) = match group {
            AgeGroup::Child => ("child", "Playful and gentle experiences designed for young minds."),
            AgeGroup::Kid => ("user", "Engaging content that nurtures focus and creativity."),
            AgeGroup::Adult => ("user-tie", "Balanced relaxation for everyday stress relief."),
            AgeGroup::Mature => ("user-friends", "Serene experiences focused on wellness and reflection."),
        };
        Self {
            name: group.name().to_string(),
            title: group.name().to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
        }
    }

    pub fn all_builtin() -> Vec<Self> {
        AgeGroup::ALL.iter().map(|g| Self::builtin(*g)).collect()
    }
}
