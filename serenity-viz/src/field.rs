// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Particle field generation.
//!
//! Each archetype places particles by its own distribution rule. Positions,
//! colors, sizes and phases live in flat buffers of exactly
//! `particle_count` entries, allocated once. The random generator is only
//! used here; [`crate::motion::step`] is a pure function of the stored
//! origins and phases.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::{blend3, scale, Rgb};
use crate::motion::MotionLaw;
use crate::profile::{Archetype, MoodVisualProfile};

pub const CLOUD_PUFFS: usize = 6;
pub const FLOWER_BLOOMS: usize = 5;
pub const CRYSTAL_SPOKES: usize = 6;
pub const FOREST_TREES: usize = 7;
pub const PARTICLES_PER_BALLOON: usize = 40;
pub const GALAXY_ARMS: usize = 3;

pub const SPHERE_RADIUS: f32 = 2.5;
pub const WAVE_HALF_SPAN: f32 = 8.0;
pub const CLOUD_HALF_SPAN: f32 = 8.0;
pub const LEAF_FLOOR: f32 = -4.0;
pub const LEAF_CEILING: f32 = 5.0;
pub const GROUND_Y: f32 = -3.0;
pub const BALLOON_FLOOR: f32 = -5.0;
pub const BALLOON_CEILING: f32 = 5.0;
pub const BALLOON_RADIUS: f32 = 0.35;
pub const STAR_SHELL: (f32, f32) = (12.0, 15.0);

/// 137.5 degrees in radians.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Point cloud for one active experience.
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub(crate) archetype: Archetype,
    pub(crate) law: MotionLaw,
    /// Positions at generation time; motion laws are evaluated against these.
    pub(crate) origins: Vec<[f32; 3]>,
    pub(crate) positions: Vec<[f32; 3]>,
    /// Blended palette colors before brightness scaling.
    palette: Vec<Rgb>,
    colors: Vec<Rgb>,
    pub(crate) base_sizes: Vec<f32>,
    pub(crate) sizes: Vec<f32>,
    pub(crate) phases: Vec<f32>,
    /// Group centers: cloud puffs, bloom clusters, crystal spokes, trees, balloons.
    pub(crate) anchors: Vec<[f32; 3]>,
    brightness: f32,
    pub(crate) positions_dirty: bool,
    pub(crate) sizes_dirty: bool,
    colors_dirty: bool,
}

fn unit_vector<R: Rng + ?Sized>(rng: &mut R) -> [f32; 3] {
    let theta = rng.gen::<f32>() * TAU;
    let y = rng.gen::<f32>() * 2.0 - 1.0;
    let r = (1.0 - y * y).max(0.0).sqrt();
    [r * theta.cos(), y, r * theta.sin()]
}

/// Uniform point inside a ball.
fn in_ball<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> [f32; 3] {
    let d = unit_vector(rng);
    let r = radius * rng.gen::<f32>().cbrt();
    [d[0] * r, d[1] * r, d[2] * r]
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, amplitude: f32) -> f32 {
    (rng.gen::<f32>() * 2.0 - 1.0) * amplitude
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let l = length(v).max(f32::EPSILON);
    [v[0] / l, v[1] / l, v[2] / l]
}

/// Size multiplier from normalized distance to the origin.
fn edge_falloff(archetype: Archetype, edge: f32) -> f32 {
    match archetype {
        Archetype::Sphere => 1.2 - 0.5 * edge,
        Archetype::Cloud => 1.0 - 0.3 * edge,
        Archetype::Flower => 0.7 + 0.6 * edge,
        Archetype::Wave => 1.0 - 0.4 * edge,
        Archetype::Crystal => 1.3 - 0.6 * edge,
        Archetype::Forest => 0.8 + 0.4 * edge,
        Archetype::Balloon => 1.15 - 0.3 * edge,
        Archetype::Starfield => 0.5 + 0.8 * edge,
    }
}

struct Layout {
    origins: Vec<[f32; 3]>,
    anchors: Vec<[f32; 3]>,
    law: MotionLaw,
}

fn layout_sphere<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let mut origins = Vec::with_capacity(n);
    for _ in 0..n {
        let d = unit_vector(rng);
        let r = SPHERE_RADIUS + jitter(rng, 0.3);
        origins.push([d[0] * r, d[1] * r, d[2] * r]);
    }
    Layout { origins, anchors: vec![[0.0; 3]], law: MotionLaw::Breathe }
}

fn layout_cloud<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let anchors: Vec<[f32; 3]> = (0..CLOUD_PUFFS)
        .map(|k| {
            let x = -6.0 + 12.0 * k as f32 / (CLOUD_PUFFS - 1) as f32 + jitter(rng, 0.3);
            [x, rng.gen_range(-1.5..2.5), rng.gen_range(-3.0..1.0)]
        })
        .collect();

    let mut origins = Vec::with_capacity(n);
    for i in 0..n {
        let mut offset = in_ball(rng, 1.5);
        offset[1] *= 0.6;
        origins.push(add(anchors[i % CLOUD_PUFFS], offset));
    }
    Layout { origins, anchors, law: MotionLaw::Drift }
}

fn layout_flower<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let spiral_end = n * 7 / 10;
    let anchors: Vec<[f32; 3]> = (0..FLOWER_BLOOMS)
        .map(|k| {
            let a = k as f32 * TAU / FLOWER_BLOOMS as f32;
            [2.5 * a.cos(), 2.5 * a.sin(), 0.3]
        })
        .collect();

    let mut origins = Vec::with_capacity(n);
    for i in 0..n {
        if i < spiral_end {
            let r = 4.0 * ((i as f32 + 0.5) / spiral_end as f32).sqrt();
            let a = i as f32 * GOLDEN_ANGLE;
            origins.push([r * a.cos(), r * a.sin(), jitter(rng, 0.15)]);
        } else {
            let bloom = anchors[(i - spiral_end) % FLOWER_BLOOMS];
            origins.push(add(bloom, in_ball(rng, 0.6)));
        }
    }
    Layout { origins, anchors, law: MotionLaw::Bloom { spiral_end } }
}

fn layout_wave<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let cols = ((n as f32).sqrt().ceil() as usize).max(1);
    let spacing = 2.0 * WAVE_HALF_SPAN / cols as f32;

    let mut origins = Vec::with_capacity(n);
    for i in 0..n {
        let x = -WAVE_HALF_SPAN + ((i % cols) as f32 + 0.5) * spacing;
        let z = -WAVE_HALF_SPAN + ((i / cols) as f32 + 0.5) * spacing;
        origins.push([x + jitter(rng, spacing * 0.2), 0.0, z + jitter(rng, spacing * 0.2)]);
    }
    Layout { origins, anchors: Vec::new(), law: MotionLaw::Swell }
}

fn layout_crystal<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let anchors: Vec<[f32; 3]> = (0..CRYSTAL_SPOKES)
        .map(|k| {
            let a = k as f32 * TAU / CRYSTAL_SPOKES as f32;
            let tilt = if k % 2 == 0 { 0.35 } else { -0.35 };
            normalize([a.cos(), tilt, a.sin()])
        })
        .collect();

    let mut origins = Vec::with_capacity(n);
    for i in 0..n {
        let d = anchors[i % CRYSTAL_SPOKES];
        // Orthonormal basis around the spoke axis.
        let p1 = normalize([-d[2], 0.0, d[0]]);
        let p2 = [
            d[1] * p1[2] - d[2] * p1[1],
            d[2] * p1[0] - d[0] * p1[2],
            d[0] * p1[1] - d[1] * p1[0],
        ];
        let h = rng.gen::<f32>();
        let along = 0.8 + h * 4.0;
        let radius = 0.6 * (1.0 - h) * rng.gen::<f32>().sqrt();
        let b = rng.gen::<f32>() * TAU;
        let (c, s) = (radius * b.cos(), radius * b.sin());
        origins.push([
            d[0] * along + p1[0] * c + p2[0] * s,
            d[1] * along + p1[1] * c + p2[1] * s,
            d[2] * along + p1[2] * c + p2[2] * s,
        ]);
    }
    Layout { origins, anchors, law: MotionLaw::Refract }
}

fn layout_forest<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let trunk_end = n / 5;
    let canopy_end = trunk_end + n / 2;
    let anchors: Vec<[f32; 3]> = (0..FOREST_TREES)
        .map(|k| [-6.0 + 2.0 * k as f32 + jitter(rng, 0.3), GROUND_Y, rng.gen_range(-4.0..-1.0)])
        .collect();

    let mut origins = Vec::with_capacity(n);
    for i in 0..n {
        let tree = anchors[i % FOREST_TREES];
        if i < trunk_end {
            origins.push([
                tree[0] + jitter(rng, 0.12),
                GROUND_Y + rng.gen::<f32>() * 2.6,
                tree[2] + jitter(rng, 0.12),
            ]);
        } else if i < canopy_end {
            let d = unit_vector(rng);
            let r = 1.1 + jitter(rng, 0.25);
            origins.push([tree[0] + d[0] * r, 0.3 + d[1] * r * 0.85, tree[2] + d[2] * r]);
        } else {
            origins.push([
                rng.gen_range(-8.0..8.0),
                rng.gen_range(LEAF_FLOOR..LEAF_CEILING),
                rng.gen_range(-4.0..2.0),
            ]);
        }
    }
    Layout {
        origins,
        anchors,
        law: MotionLaw::Sway { trunk_end, canopy_end, trees: FOREST_TREES },
    }
}

fn layout_balloon<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let groups = (n / PARTICLES_PER_BALLOON).max(1);
    let anchors: Vec<[f32; 3]> = (0..groups)
        .map(|_| {
            [
                rng.gen_range(-6.0..6.0),
                rng.gen_range(BALLOON_FLOOR..BALLOON_CEILING),
                rng.gen_range(-3.0..1.0),
            ]
        })
        .collect();

    let mut origins = Vec::with_capacity(n);
    for i in 0..n {
        let d = unit_vector(rng);
        let skin = [d[0] * BALLOON_RADIUS, d[1] * BALLOON_RADIUS * 1.15, d[2] * BALLOON_RADIUS];
        origins.push(add(anchors[i % groups], skin));
    }
    Layout { origins, anchors, law: MotionLaw::Rise { groups } }
}

fn layout_starfield<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Layout {
    let arm_end = n * 6 / 10;

    let mut origins = Vec::with_capacity(n);
    for i in 0..n {
        if i < arm_end {
            let arm = (i % GALAXY_ARMS) as f32;
            let r = 0.5 + 7.0 * rng.gen::<f32>();
            let a = arm * TAU / GALAXY_ARMS as f32 + r * 0.55 + jitter(rng, 0.25);
            let y = jitter(rng, 0.3) * (1.0 - r / 8.0);
            origins.push([r * a.cos(), y, r * a.sin()]);
        } else {
            let d = unit_vector(rng);
            let r = rng.gen_range(STAR_SHELL.0..STAR_SHELL.1);
            origins.push([d[0] * r, d[1] * r, d[2] * r]);
        }
    }
    Layout { origins, anchors: Vec::new(), law: MotionLaw::Galaxy { arm_end } }
}

impl ParticleField {
    /// Generate a fresh field from OS entropy.
    ///
    /// `brightness` is a factor in [0, 1] applied to the blended colors.
    pub fn generate(profile: &MoodVisualProfile, brightness: f32) -> Self {
        Self::generate_with_rng(profile, brightness, &mut StdRng::from_entropy())
    }

    /// Reproducible generation.
    pub fn generate_seeded(profile: &MoodVisualProfile, brightness: f32, seed: u64) -> Self {
        Self::generate_with_rng(profile, brightness, &mut StdRng::seed_from_u64(seed))
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        profile: &MoodVisualProfile,
        brightness: f32,
        rng: &mut R,
    ) -> Self {
        let n = profile.particle_count;
        let archetype = profile.geometry_archetype;
        let layout = match archetype {
            Archetype::Sphere => layout_sphere(n, rng),
            Archetype::Cloud => layout_cloud(n, rng),
            Archetype::Flower => layout_flower(n, rng),
            Archetype::Wave => layout_wave(n, rng),
            Archetype::Crystal => layout_crystal(n, rng),
            Archetype::Forest => layout_forest(n, rng),
            Archetype::Balloon => layout_balloon(n, rng),
            Archetype::Starfield => layout_starfield(n, rng),
        };

        let brightness = brightness.clamp(0.0, 1.0);
        let extent = archetype.extent();
        let mut palette = Vec::with_capacity(n);
        let mut colors = Vec::with_capacity(n);
        let mut base_sizes = Vec::with_capacity(n);
        let mut phases = Vec::with_capacity(n);

        for origin in &layout.origins {
            // Uniform barycentric weights: fold (u, v) back into the triangle.
            let (mut u, mut v) = (rng.gen::<f32>(), rng.gen::<f32>());
            if u + v > 1.0 {
                u = 1.0 - u;
                v = 1.0 - v;
            }
            let blended = blend3(
                profile.base_color,
                profile.secondary_color,
                profile.accent_color,
                [1.0 - u - v, u, v],
            );
            palette.push(blended);
            colors.push(scale(blended, brightness));

            let edge = (length(*origin) / extent).min(1.0);
            let random = 0.5 + rng.gen::<f32>();
            base_sizes.push(edge_falloff(archetype, edge) * random * profile.particle_size);

            phases.push(rng.gen::<f32>() * TAU);
        }

        Self {
            archetype,
            law: layout.law,
            positions: layout.origins.clone(),
            origins: layout.origins,
            palette,
            colors,
            sizes: base_sizes.clone(),
            base_sizes,
            phases,
            anchors: layout.anchors,
            brightness,
            positions_dirty: true,
            sizes_dirty: true,
            colors_dirty: true,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn law(&self) -> MotionLaw {
        self.law
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn origins(&self) -> &[[f32; 3]] {
        &self.origins
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn phases(&self) -> &[f32] {
        &self.phases
    }

    pub fn anchors(&self) -> &[[f32; 3]] {
        &self.anchors
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Rescale colors for a new brightness factor without regenerating.
    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness.clamp(0.0, 1.0);
        for (out, src) in self.colors.iter_mut().zip(&self.palette) {
            *out = scale(*src, self.brightness);
        }
        self.colors_dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.positions_dirty || self.sizes_dirty || self.colors_dirty
    }

    /// Flattened positions if they changed since the last call.
    pub fn take_positions(&mut self) -> Option<Vec<f32>> {
        if !std::mem::take(&mut self.positions_dirty) {
            return None;
        }
        Some(self.positions.iter().flatten().copied().collect())
    }

    pub fn take_sizes(&mut self) -> Option<Vec<f32>> {
        if !std::mem::take(&mut self.sizes_dirty) {
            return None;
        }
        Some(self.sizes.clone())
    }

    pub fn take_colors(&mut self) -> Option<Vec<f32>> {
        if !std::mem::take(&mut self.colors_dirty) {
            return None;
        }
        Some(self.colors.iter().flatten().copied().collect())
    }

    /// Mean color over all particles (for statistical comparisons).
    pub fn mean_color(&self) -> Rgb {
        let n = self.len().max(1) as f32;
        let mut sum = [0.0f32; 3];
        for c in &self.colors {
            sum[0] += c[0];
            sum[1] += c[1];
            sum[2] += c[2];
        }
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }

    pub fn mean_size(&self) -> f32 {
        self.sizes.iter().sum::<f32>() / self.len().max(1) as f32
    }

    pub fn mean_radius(&self) -> f32 {
        self.origins.iter().map(|o| length(*o)).sum::<f32>() / self.len().max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::in_unit_range;
    use crate::profile::profile_for;
    use serenity_core::Mood;

    #[test]
    fn test_buffer_lengths_match_count() {
        for mood in Mood::ALL {
            let profile = profile_for(mood);
            let field = ParticleField::generate_seeded(&profile, 0.6, 7);
            let n = profile.particle_count;
            assert_eq!(field.len(), n);
            assert_eq!(field.origins().len(), n);
            assert_eq!(field.colors().len(), n);
            assert_eq!(field.sizes().len(), n);
            assert_eq!(field.phases().len(), n);
        }
    }

    #[test]
    fn test_phases_in_range() {
        let field = ParticleField::generate_seeded(&profile_for(Mood::Calm), 1.0, 1);
        assert!(field.phases().iter().all(|p| (0.0..TAU).contains(p)));
    }

    #[test]
    fn test_colors_scaled_by_brightness() {
        let profile = profile_for(Mood::Happy);
        let bright = ParticleField::generate_seeded(&profile, 1.0, 3);
        let dim = ParticleField::generate_seeded(&profile, 0.5, 3);
        for (b, d) in bright.colors().iter().zip(dim.colors()) {
            assert!(in_unit_range(*b));
            for k in 0..3 {
                assert!((b[k] * 0.5 - d[k]).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_colors_inside_palette_hull() {
        let profile = profile_for(Mood::Playful);
        let field = ParticleField::generate_seeded(&profile, 1.0, 11);
        let palette = profile.palette();
        for c in field.colors() {
            for k in 0..3 {
                let lo = palette.iter().map(|p| p[k]).fold(f32::INFINITY, f32::min);
                let hi = palette.iter().map(|p| p[k]).fold(f32::NEG_INFINITY, f32::max);
                assert!(c[k] >= lo - 1e-5 && c[k] <= hi + 1e-5);
            }
        }
    }

    #[test]
    fn test_seeded_generation_reproducible() {
        let profile = profile_for(Mood::Focused);
        let a = ParticleField::generate_seeded(&profile, 0.6, 99);
        let b = ParticleField::generate_seeded(&profile, 0.6, 99);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.sizes(), b.sizes());
    }

    #[test]
    fn test_sphere_shell_radius() {
        let field = ParticleField::generate_seeded(&profile_for(Mood::Tired), 0.6, 5);
        for p in field.positions() {
            let r = length(*p);
            assert!((SPHERE_RADIUS - 0.31..=SPHERE_RADIUS + 0.31).contains(&r));
        }
    }

    #[test]
    fn test_forest_role_ranges() {
        let profile = profile_for(Mood::Stressed);
        let field = ParticleField::generate_seeded(&profile, 0.6, 2);
        match field.law() {
            MotionLaw::Sway { trunk_end, canopy_end, trees } => {
                assert_eq!(trunk_end, profile.particle_count / 5);
                assert_eq!(canopy_end, trunk_end + profile.particle_count / 2);
                assert_eq!(trees, FOREST_TREES);
                for i in 0..trunk_end {
                    let tree = field.anchors()[i % trees];
                    assert!((field.positions()[i][0] - tree[0]).abs() <= 0.12 + 1e-5);
                }
            }
            other => panic!("unexpected law {other:?}"),
        }
    }

    #[test]
    fn test_starfield_split() {
        let profile = profile_for(Mood::Calm);
        let field = ParticleField::generate_seeded(&profile, 0.6, 4);
        let MotionLaw::Galaxy { arm_end } = field.law() else {
            panic!("expected galaxy law");
        };
        assert_eq!(arm_end, 1800);
        for p in &field.positions()[arm_end..] {
            let r = length(*p);
            assert!(r >= STAR_SHELL.0 - 1e-3 && r <= STAR_SHELL.1 + 1e-3);
        }
        for p in &field.positions()[..arm_end] {
            assert!(p[1].abs() <= 0.3 + 1e-5);
        }
    }

    #[test]
    fn test_balloon_groups() {
        let field = ParticleField::generate_seeded(&profile_for(Mood::Playful), 0.6, 8);
        assert_eq!(field.anchors().len(), 1600 / PARTICLES_PER_BALLOON);
    }

    #[test]
    fn test_take_clears_dirty_flags() {
        let mut field = ParticleField::generate_seeded(&profile_for(Mood::Chill), 0.6, 1);
        assert_eq!(field.take_positions().map(|p| p.len()), Some(1500 * 3));
        assert!(field.take_positions().is_none());
        assert!(field.take_colors().is_some());
        field.set_brightness(0.2);
        assert!(field.take_colors().is_some());
        assert!(field.take_sizes().is_some());
        assert!(!field.is_dirty());
    }

    #[test]
    fn test_set_brightness_matches_regeneration() {
        let profile = profile_for(Mood::Anxious);
        let mut a = ParticleField::generate_seeded(&profile, 1.0, 6);
        let b = ParticleField::generate_seeded(&profile, 0.3, 6);
        a.set_brightness(0.3);
        for (x, y) in a.colors().iter().zip(b.colors()) {
            for k in 0..3 {
                assert!((x[k] - y[k]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_size_falloff_depends_on_edge() {
        for archetype in Archetype::ALL {
            assert_ne!(
                edge_falloff(archetype, 0.0),
                edge_falloff(archetype, 1.0),
                "{archetype:?} sizes ignore distance"
            );
        }
        assert!(edge_falloff(Archetype::Forest, 1.0) > edge_falloff(Archetype::Forest, 0.0));
        assert!(edge_falloff(Archetype::Balloon, 1.0) < edge_falloff(Archetype::Balloon, 0.0));
    }

    #[test]
    fn test_tiny_fields() {
        for mood in Mood::ALL {
            let mut profile = profile_for(mood);
            profile.particle_count = 1;
            let field = ParticleField::generate_seeded(&profile, 0.6, 0);
            assert_eq!(field.len(), 1);
            assert!(field.positions()[0].iter().all(|v| v.is_finite()));
        }
    }
}
