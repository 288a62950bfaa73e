// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Mood visual profiles.
//!
//! Static table from [`Mood`] to the parameters of its particle scene. The
//! lookup is total over the closed mood set; string lookups go through
//! [`Mood::parse`] and fail with [`UnknownMoodError`].

use serde::{Deserialize, Serialize};
use serenity_core::{Mood, UnknownMoodError};

use crate::color::{from_hex, Rgb};

/// Geometric and motion template of a mood scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Sphere,
    Cloud,
    Flower,
    Wave,
    Crystal,
    Forest,
    Balloon,
    Starfield,
}

impl Archetype {
    pub const ALL: [Archetype; 8] = [
        Self::Sphere,
        Self::Cloud,
        Self::Flower,
        Self::Wave,
        Self::Crystal,
        Self::Forest,
        Self::Balloon,
        Self::Starfield,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Cloud => "cloud",
            Self::Flower => "flower",
            Self::Wave => "wave",
            Self::Crystal => "crystal",
            Self::Forest => "forest",
            Self::Balloon => "balloon",
            Self::Starfield => "starfield",
        }
    }

    /// Radius that bounds the generated distribution, used to normalize
    /// distance-from-origin into [0, 1].
    pub fn extent(self) -> f32 {
        match self {
            Self::Sphere => 2.8,
            Self::Cloud => 8.0,
            Self::Flower => 4.6,
            Self::Wave => 11.4,
            Self::Crystal => 5.4,
            Self::Forest => 9.0,
            Self::Balloon => 8.0,
            Self::Starfield => 15.0,
        }
    }
}

/// Visual parameters of one mood. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodVisualProfile {
    pub mood: Mood,
    pub geometry_archetype: Archetype,
    pub particle_count: usize,
    pub base_color: Rgb,
    pub secondary_color: Rgb,
    pub accent_color: Rgb,
    pub background_intensity: f32,
    pub particle_size: f32,
    pub particle_opacity: f32,
    pub use_advanced_shading: bool,
}

impl MoodVisualProfile {
    pub fn palette(&self) -> [Rgb; 3] {
        [self.base_color, self.secondary_color, self.accent_color]
    }
}

#[allow(clippy::too_many_arguments)]
fn profile(
    mood: Mood,
    archetype: Archetype,
    count: usize,
    colors: [u32; 3],
    background: f32,
    size: f32,
    opacity: f32,
    advanced: bool,
) -> MoodVisualProfile {
    MoodVisualProfile {
        mood,
        geometry_archetype: archetype,
        particle_count: count,
        base_color: from_hex(colors[0]),
        secondary_color: from_hex(colors[1]),
        accent_color: from_hex(colors[2]),
        background_intensity: background,
        particle_size: size,
        particle_opacity: opacity,
        use_advanced_shading: advanced,
    }
}

/// Profile for a mood.
pub fn profile_for(mood: Mood) -> MoodVisualProfile {
    use Archetype::*;
    match mood {
        Mood::Tired => profile(mood, Sphere, 1200, [0xDAD0C2, 0xB2A89E, 0x8E9AAF], 0.1, 0.08, 0.7, false),
        Mood::Chill => profile(mood, Cloud, 1500, [0xD2C4B0, 0xA99D8A, 0xC9D6DF], 0.2, 0.12, 0.6, false),
        Mood::Happy => profile(mood, Flower, 2000, [0xF0E7D8, 0xDDA15E, 0xE9C46A], 0.3, 0.09, 0.85, true),
        Mood::Anxious => profile(mood, Wave, 2500, [0xE8E0D5, 0xB2A89E, 0x7FA7C9], 0.15, 0.07, 0.75, true),
        Mood::Focused => profile(mood, Crystal, 1000, [0xE1D6C7, 0xA99D8A, 0x9DB4C0], 0.25, 0.1, 0.9, true),
        Mood::Stressed => profile(mood, Forest, 2200, [0xE8E0D5, 0x6B9080, 0xA4C3B2], 0.2, 0.08, 0.8, false),
        Mood::Playful => profile(mood, Balloon, 1600, [0xF0E7D8, 0xDDA15E, 0xE76F51], 0.35, 0.11, 0.85, false),
        Mood::Calm => profile(mood, Starfield, 3000, [0xD2C4B0, 0x5F5648, 0xA8DADC], 0.15, 0.06, 0.9, true),
    }
}

/// Profile for a mood name (case-insensitive).
pub fn profile_for_name(name: &str) -> Result<MoodVisualProfile, UnknownMoodError> {
    Mood::parse(name).map(profile_for)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::in_unit_range;

    #[test]
    fn test_every_mood_has_valid_profile() {
        for mood in Mood::ALL {
            let p = profile_for(mood);
            assert_eq!(p.mood, mood);
            assert!(p.particle_count > 0);
            for c in p.palette() {
                assert!(in_unit_range(c), "{mood}: {c:?}");
            }
            assert!((0.0..=1.0).contains(&p.background_intensity));
            assert!((0.0..=1.0).contains(&p.particle_opacity));
            assert!(p.particle_size > 0.0);
        }
    }

    #[test]
    fn test_archetypes_are_distinct() {
        let seen: std::collections::HashSet<Archetype> = Mood::ALL
            .iter()
            .map(|m| profile_for(*m).geometry_archetype)
            .collect();
        assert_eq!(seen.len(), Archetype::ALL.len());
    }

    #[test]
    fn test_profile_for_name() {
        assert_eq!(
            profile_for_name("calm").unwrap().geometry_archetype,
            Archetype::Starfield
        );
        let err = profile_for_name("sleepy").unwrap_err();
        assert_eq!(err.name, "sleepy");
    }

    #[test]
    fn test_largest_field() {
        let max = Mood::ALL.iter().map(|m| profile_for(*m).particle_count).max();
        assert_eq!(max, Some(3000));
    }

    #[test]
    fn test_profile_serializes_archetype_lowercase() {
        let json = serde_json::to_value(profile_for(Mood::Stressed)).unwrap();
        assert_eq!(json["geometryArchetype"], "forest");
        assert_eq!(json["useAdvancedShading"], false);
    }
}
