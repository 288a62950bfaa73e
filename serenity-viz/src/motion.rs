// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Per-archetype motion laws.
//!
//! Every law recomputes positions from the stored origins and the absolute
//! motion time `clock * speed`; nothing is integrated frame to frame, so long
//! sessions cannot accumulate drift. Unidirectional motion (drifting clouds,
//! falling leaves, rising balloons) wraps to the opposite boundary. Time is
//! reduced modulo the period in `f64` before it reaches `f32` trigonometry.

use std::f64::consts::TAU as TAU64;

use serde::Serialize;

use crate::field::{
    ParticleField, BALLOON_CEILING, BALLOON_FLOOR, CLOUD_HALF_SPAN, GROUND_Y, LEAF_CEILING,
    LEAF_FLOOR,
};

const CLOUD_DRIFT: f64 = 0.25;
const LEAF_FALL: f64 = 0.35;
const BALLOON_RISE: f64 = 0.3;

/// Motion law of a field, chosen once at generation from its archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "law", rename_all = "camelCase")]
pub enum MotionLaw {
    /// Sphere: slow spin with radial breathing and pulsing sizes.
    Breathe,
    /// Cloud: lateral drift with wrap-around and gentle bobbing.
    Drift,
    /// Flower: rotating golden spiral, breathing radius, blooming sizes.
    #[serde(rename_all = "camelCase")]
    Bloom { spiral_end: usize },
    /// Wave: height recomputed from original x/z and the clock.
    Swell,
    /// Crystal: rotating spokes with shimmer and pulsing sizes.
    Refract,
    /// Forest: static trunks, swaying canopies, falling leaves.
    #[serde(rename_all = "camelCase")]
    Sway { trunk_end: usize, canopy_end: usize, trees: usize },
    /// Balloon: groups rise and wrap as units.
    Rise { groups: usize },
    /// Starfield: differential arm rotation, slow shell spin, twinkling sizes.
    #[serde(rename_all = "camelCase")]
    Galaxy { arm_end: usize },
}

/// Wrap `v` into `[lo, hi)`.
pub fn wrap(v: f32, lo: f32, hi: f32) -> f32 {
    lo + (v - lo).rem_euclid(hi - lo)
}

/// `rate * t` reduced to one turn.
fn angle(rate: f64, t: f64) -> f32 {
    (rate * t).rem_euclid(TAU64) as f32
}

/// Linear travel `rate * t` reduced modulo `span`.
fn travel(rate: f64, t: f64, span: f32) -> f32 {
    (rate * t).rem_euclid(span as f64) as f32
}

fn rotate_y(p: [f32; 3], a: f32) -> [f32; 3] {
    let (s, c) = a.sin_cos();
    [p[0] * c - p[2] * s, p[1], p[0] * s + p[2] * c]
}

fn rotate_z(p: [f32; 3], a: f32) -> [f32; 3] {
    let (s, c) = a.sin_cos();
    [p[0] * c - p[1] * s, p[0] * s + p[1] * c, p[2]]
}

/// Advance `field` to `clock_seconds` at `speed_multiplier`.
///
/// Deterministic: identical inputs give identical buffers. Marks the
/// position buffer dirty, and the size buffer when the law oscillates sizes.
pub fn step(field: &mut ParticleField, clock_seconds: f64, speed_multiplier: f32) {
    let t = clock_seconds * speed_multiplier as f64;
    let ParticleField {
        law,
        origins,
        positions,
        base_sizes,
        sizes,
        phases,
        anchors,
        ..
    } = field;

    let sizes_changed = match *law {
        MotionLaw::Breathe => {
            let spin = angle(0.1, t);
            let breath = angle(0.8, t);
            let pulse = angle(2.0, t);
            for i in 0..origins.len() {
                let k = 1.0 + 0.05 * (breath + phases[i]).sin();
                let o = rotate_y(origins[i], spin);
                positions[i] = [o[0] * k, o[1] * k, o[2] * k];
                sizes[i] = base_sizes[i] * (0.8 + 0.2 * (pulse + phases[i]).sin());
            }
            true
        }
        MotionLaw::Drift => {
            let shift = travel(CLOUD_DRIFT, t, 2.0 * CLOUD_HALF_SPAN);
            let bob = angle(0.5, t);
            let sway = angle(0.3, t);
            for i in 0..origins.len() {
                let o = origins[i];
                positions[i] = [
                    wrap(o[0] + shift, -CLOUD_HALF_SPAN, CLOUD_HALF_SPAN),
                    o[1] + 0.15 * (bob + phases[i]).sin(),
                    o[2] + 0.1 * (sway + phases[i]).cos(),
                ];
            }
            false
        }
        MotionLaw::Bloom { spiral_end } => {
            let rot = angle(0.1, t);
            let breathe = 1.0 + 0.08 * angle(0.6, t).sin();
            let flutter = angle(1.2, t);
            let bloom = angle(1.5, t);
            for i in 0..origins.len() {
                let mut o = origins[i];
                if i < spiral_end {
                    o[0] *= breathe;
                    o[1] *= breathe;
                    o[2] += 0.1 * (flutter + phases[i]).sin();
                } else {
                    o[2] += 0.2 * (flutter + phases[i]).sin();
                }
                positions[i] = rotate_z(o, rot);
                sizes[i] = base_sizes[i] * (0.7 + 0.3 * (bloom + phases[i]).sin());
            }
            true
        }
        MotionLaw::Swell => {
            let a1 = angle(1.0, t);
            let a2 = angle(0.7, t);
            for i in 0..origins.len() {
                let o = origins[i];
                let y = 0.8 * (0.5 * o[0] + a1).sin() + 0.5 * (0.4 * o[2] + a2).cos();
                positions[i] = [o[0], y, o[2]];
            }
            false
        }
        MotionLaw::Refract => {
            let rot = angle(0.15, t);
            let shimmer = angle(3.0, t);
            let pulse = angle(2.5, t);
            for i in 0..origins.len() {
                let k = 1.0 + 0.02 * (shimmer + phases[i]).sin();
                let o = origins[i];
                positions[i] = rotate_y([o[0] * k, o[1] * k, o[2] * k], rot);
                sizes[i] = base_sizes[i] * (0.75 + 0.25 * (pulse + phases[i]).sin());
            }
            true
        }
        MotionLaw::Sway { trunk_end, canopy_end, trees } => {
            let sway = angle(0.8, t);
            let rustle = angle(0.6, t);
            let flutter = angle(0.5, t);
            let fall = travel(LEAF_FALL, t, LEAF_CEILING - LEAF_FLOOR);
            for i in 0..origins.len() {
                let o = origins[i];
                positions[i] = if i < trunk_end {
                    o
                } else if i < canopy_end {
                    let tree = anchors[i % trees];
                    let lean = 0.12 * (sway + tree[0]).sin() * ((o[1] - GROUND_Y) / 3.5);
                    [o[0] + lean, o[1], o[2] + 0.05 * (rustle + phases[i]).cos()]
                } else {
                    [
                        o[0] + 0.3 * (flutter + phases[i]).sin(),
                        wrap(o[1] - fall, LEAF_FLOOR, LEAF_CEILING),
                        o[2],
                    ]
                };
            }
            false
        }
        MotionLaw::Rise { groups } => {
            let span = BALLOON_CEILING - BALLOON_FLOOR;
            let sway = angle(0.6, t);
            for i in 0..origins.len() {
                let g = i % groups;
                let anchor = anchors[g];
                let rate = BALLOON_RISE + 0.05 * (g % 3) as f64;
                let y = wrap(anchor[1] + travel(rate, t, span), BALLOON_FLOOR, BALLOON_CEILING);
                let o = origins[i];
                positions[i] = [
                    o[0] + 0.2 * (sway + g as f32).sin(),
                    y + (o[1] - anchor[1]),
                    o[2],
                ];
            }
            false
        }
        MotionLaw::Galaxy { arm_end } => {
            let shell = angle(0.01, t);
            let twinkle = angle(3.0, t);
            for i in 0..origins.len() {
                let o = origins[i];
                positions[i] = if i < arm_end {
                    let r = (o[0] * o[0] + o[2] * o[2]).sqrt();
                    let omega = 0.2 / (1.0 + 0.3 * r as f64);
                    rotate_y(o, angle(omega, t))
                } else {
                    rotate_y(o, shell)
                };
                sizes[i] = base_sizes[i] * (0.6 + 0.4 * (twinkle + phases[i]).sin());
            }
            true
        }
    };

    field.positions_dirty = true;
    if sizes_changed {
        field.sizes_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::profile_for;
    use serenity_core::Mood;

    fn field(mood: Mood) -> ParticleField {
        ParticleField::generate_seeded(&profile_for(mood), 0.6, 21)
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(9.0, -8.0, 8.0), -7.0);
        assert_eq!(wrap(-9.0, -8.0, 8.0), 7.0);
        assert_eq!(wrap(0.5, -8.0, 8.0), 0.5);
    }

    #[test]
    fn test_step_deterministic() {
        for mood in Mood::ALL {
            let mut a = field(mood);
            let mut b = a.clone();
            step(&mut a, 12.5, 0.7);
            step(&mut b, 12.5, 0.7);
            assert_eq!(a.positions(), b.positions());
            assert_eq!(a.sizes(), b.sizes());
        }
    }

    #[test]
    fn test_independent_of_history() {
        for mood in Mood::ALL {
            let mut stepped = field(mood);
            for frame in 0..50 {
                step(&mut stepped, frame as f64 / 30.0, 0.5);
            }
            let mut direct = field(mood);
            step(&mut direct, 49.0 / 30.0, 0.5);
            assert_eq!(stepped.positions(), direct.positions(), "{mood}");
        }
    }

    #[test]
    fn test_wave_recomputes_height() {
        let mut f = field(Mood::Anxious);
        step(&mut f, 3.0, 1.0);
        for (p, o) in f.positions().iter().zip(f.origins()) {
            assert_eq!(p[0], o[0]);
            assert_eq!(p[2], o[2]);
            assert!(p[1].abs() <= 1.3 + 1e-5);
        }
    }

    #[test]
    fn test_leaves_stay_in_band() {
        let mut f = field(Mood::Stressed);
        let MotionLaw::Sway { canopy_end, .. } = f.law() else {
            panic!("expected sway");
        };
        for k in 0..200 {
            step(&mut f, k as f64 * 1.7, 1.0);
            for p in &f.positions()[canopy_end..] {
                assert!(p[1] >= LEAF_FLOOR && p[1] <= LEAF_CEILING);
            }
        }
        assert_eq!(f.len(), 2200);
    }

    #[test]
    fn test_balloons_wrap_as_groups() {
        let mut f = field(Mood::Playful);
        step(&mut f, 1000.0, 1.0);
        let span = BALLOON_CEILING - BALLOON_FLOOR;
        let radius = crate::field::BALLOON_RADIUS * 1.15 + 1e-4;
        for p in f.positions() {
            assert!(p[1] >= BALLOON_FLOOR - radius && p[1] <= BALLOON_FLOOR + span + radius);
        }
    }

    #[test]
    fn test_clouds_wrap() {
        let mut f = field(Mood::Chill);
        step(&mut f, 5000.0, 1.0);
        for p in f.positions() {
            assert!(p[0] >= -CLOUD_HALF_SPAN && p[0] <= CLOUD_HALF_SPAN);
        }
    }

    #[test]
    fn test_trunks_are_static() {
        let mut f = field(Mood::Stressed);
        let MotionLaw::Sway { trunk_end, .. } = f.law() else {
            panic!("expected sway");
        };
        step(&mut f, 42.0, 1.0);
        assert_eq!(&f.positions()[..trunk_end], &f.origins()[..trunk_end]);
    }

    #[test]
    fn test_twinkle_bounds_sizes() {
        let mut f = field(Mood::Calm);
        let base: Vec<f32> = f.sizes().to_vec();
        step(&mut f, 7.3, 1.0);
        for (s, b) in f.sizes().iter().zip(&base) {
            assert!(*s >= b * 0.2 - 1e-6 && *s <= b * 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_dirty_flags() {
        let mut wave = field(Mood::Anxious);
        let _ = wave.take_positions();
        let _ = wave.take_sizes();
        step(&mut wave, 1.0, 1.0);
        assert!(wave.take_positions().is_some());
        assert!(wave.take_sizes().is_none());

        let mut sphere = field(Mood::Tired);
        let _ = sphere.take_sizes();
        step(&mut sphere, 1.0, 1.0);
        assert!(sphere.take_sizes().is_some());
    }

    #[test]
    fn test_law_serializes_tagged() {
        let json = serde_json::to_value(MotionLaw::Galaxy { arm_end: 10 }).unwrap();
        assert_eq!(json["law"], "galaxy");
        assert_eq!(json["armEnd"], 10);
    }
}
