// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! The closed mood and age-group sets.
//!
//! Every experience, profile and inference rule is keyed by [`Mood`]. Parsing
//! is case-insensitive so route segments like `/experience/calm` resolve, but
//! anything outside the set is an [`UnknownMoodError`], never a fallback mood.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownMoodError;

/// Discrete mood labels a user can pick or the inference engine can suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mood {
    /// Low energy, wants rest
    Tired,
    /// Relaxed, drifting
    Chill,
    /// Joyful, blooming
    Happy,
    /// Restless, worried
    Anxious,
    /// Wants clarity and concentration
    Focused,
    /// Under pressure, needs nature
    Stressed,
    /// Light-hearted, bouncy
    Playful,
    /// Peaceful, starry
    Calm,
}

impl Mood {
    /// All moods in catalog order.
    pub const ALL: [Mood; 8] = [
        Self::Tired,
        Self::Chill,
        Self::Happy,
        Self::Anxious,
        Self::Focused,
        Self::Stressed,
        Self::Playful,
        Self::Calm,
    ];

    /// Display name, as stored in the catalog.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tired => "Tired",
            Self::Chill => "Chill",
            Self::Happy => "Happy",
            Self::Anxious => "Anxious",
            Self::Focused => "Focused",
            Self::Stressed => "Stressed",
            Self::Playful => "Playful",
            Self::Calm => "Calm",
        }
    }

    /// Lowercase route segment, e.g. `/experience/calm`.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Tired => "tired",
            Self::Chill => "chill",
            Self::Happy => "happy",
            Self::Anxious => "anxious",
            Self::Focused => "focused",
            Self::Stressed => "stressed",
            Self::Playful => "playful",
            Self::Calm => "calm",
        }
    }

    /// 1-based catalog id.
    pub fn id(self) -> u32 {
        Self::ALL.iter().position(|m| *m == self).map_or(0, |i| i as u32 + 1)
    }

    /// Case-insensitive lookup.
    pub fn parse(name: &str) -> Result<Self, UnknownMoodError> {
        let trimmed = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownMoodError::new(name))
    }

    /// Whether this mood is about winding down rather than lifting energy.
    pub fn is_soothing(self) -> bool {
        matches!(self, Self::Tired | Self::Chill | Self::Anxious | Self::Stressed | Self::Calm)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mood {
    type Err = UnknownMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Age groups offered on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Child,
    Kid,
    Adult,
    Mature,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [Self::Child, Self::Kid, Self::Adult, Self::Mature];

    pub fn name(self) -> &'static str {
        match self {
            Self::Child => "Child",
            Self::Kid => "Kid",
            Self::Adult => "Adult",
            Self::Mature => "Mature",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
