// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Session settings and experience configuration.
//!
//! [`SessionSettings`] holds the user-facing sliders with their documented
//! ranges. [`ExperienceConfig`] aggregates them with the frame rate and camera
//! parameters, with presets for different hardware budgets.

use serde::{Deserialize, Serialize};

pub const VOLUME_RANGE: (u8, u8) = (0, 100);
pub const ANIMATION_SPEED_RANGE: (u8, u8) = (10, 100);
pub const BRIGHTNESS_RANGE: (u8, u8) = (20, 100);

/// Per-session user controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    /// Audio volume [0, 100]
    pub volume: u8,
    /// Animation speed [10, 100]; 100 = real time
    pub animation_speed: u8,
    /// Scene brightness [20, 100]
    pub brightness: u8,
    /// Whether the voice prompt is spoken when playback starts
    pub voice_enabled: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            volume: 70,
            animation_speed: 50,
            brightness: 60,
            voice_enabled: true,
        }
    }
}

fn clamp_to(value: i64, (lo, hi): (u8, u8)) -> u8 {
    value.clamp(lo as i64, hi as i64) as u8
}

fn in_range(value: u8, (lo, hi): (u8, u8)) -> bool {
    (lo..=hi).contains(&value)
}

impl SessionSettings {
    pub fn set_volume(&mut self, value: i64) {
        self.volume = clamp_to(value, VOLUME_RANGE);
    }

    pub fn set_animation_speed(&mut self, value: i64) {
        self.animation_speed = clamp_to(value, ANIMATION_SPEED_RANGE);
    }

    pub fn set_brightness(&mut self, value: i64) {
        self.brightness = clamp_to(value, BRIGHTNESS_RANGE);
    }

    /// Motion-law time scale in [0.1, 1.0].
    pub fn speed_multiplier(&self) -> f32 {
        self.animation_speed as f32 / 100.0
    }

    /// Color and light scale in [0.2, 1.0].
    pub fn brightness_factor(&self) -> f32 {
        self.brightness as f32 / 100.0
    }

    /// Audio gain in [0, 1].
    pub fn volume_gain(&self) -> f32 {
        self.volume as f32 / 100.0
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !in_range(self.volume, VOLUME_RANGE) {
            issues.push(format!("volume {} out of range [0, 100]", self.volume));
        }
        if !in_range(self.animation_speed, ANIMATION_SPEED_RANGE) {
            issues.push(format!(
                "animation_speed {} out of range [10, 100]",
                self.animation_speed
            ));
        }
        if !in_range(self.brightness, BRIGHTNESS_RANGE) {
            issues.push(format!("brightness {} out of range [20, 100]", self.brightness));
        }
        issues
    }
}

/// Full experience configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceConfig {
    /// Frames streamed per second by the animation loop
    pub frame_hz: u32,
    /// Settings a new session starts with
    pub defaults: SessionSettings,
    /// Camera vertical field of view in degrees
    pub camera_fov: f32,
    /// Camera distance from the origin
    pub camera_distance: f32,
    /// Lateral camera drift amplitude (world units)
    pub orbit_amplitude: f32,
    /// Angular speed of the camera drift (radians per second)
    pub orbit_rate: f32,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            frame_hz: 30,
            defaults: SessionSettings::default(),
            camera_fov: 75.0,
            camera_distance: 10.0,
            orbit_amplitude: 0.8,
            orbit_rate: 0.05,
        }
    }
}

impl ExperienceConfig {
    /// Reduced frame rate for slow links and battery-powered devices.
    pub fn low_power() -> Self {
        Self {
            frame_hz: 15,
            defaults: SessionSettings {
                animation_speed: 30,
                ..SessionSettings::default()
            },
            orbit_amplitude: 0.4,
            ..Self::default()
        }
    }

    /// Smooth 60 Hz streaming with a wider camera drift.
    pub fn cinematic() -> Self {
        Self {
            frame_hz: 60,
            orbit_amplitude: 1.5,
            orbit_rate: 0.08,
            ..Self::default()
        }
    }

    pub fn with_frame_hz(mut self, frame_hz: u32) -> Self {
        self.frame_hz = frame_hz;
        self
    }

    /// Validate the configuration, returning any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.frame_hz == 0 || self.frame_hz > 120 {
            issues.push(format!("frame_hz {} out of range [1, 120]", self.frame_hz));
        }

        if !(10.0..=120.0).contains(&self.camera_fov) {
            issues.push(format!("camera_fov {} out of range [10, 120]", self.camera_fov));
        }

        if !self.camera_distance.is_finite() || self.camera_distance <= 0.0 {
            issues.push(format!("camera_distance {} must be > 0", self.camera_distance));
        }

        if !self.orbit_amplitude.is_finite() || self.orbit_amplitude < 0.0 {
            issues.push(format!("orbit_amplitude {} must be >= 0", self.orbit_amplitude));
        }

        if !self.orbit_rate.is_finite() {
            issues.push("orbit_rate must be finite".into());
        }

        for issue in self.defaults.validate() {
            issues.push(format!("defaults.{issue}"));
        }

        issues
    }
}
