// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! Scene composition and Three.js emission.
//!
//! [`SceneComposer`] turns a particle field and its profile into a
//! [`RenderableScene`]: camera, lights, the point-cloud material and the
//! archetype's auxiliary meshes. The browser builds the scene from the
//! script emitted by [`RenderableScene::build_js`]; every geometry, material
//! and texture that script creates is mirrored by an entry in the scene's
//! [`ResourceRegistry`], and disposing the scene releases all of them.

use std::fmt::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serenity_core::{ExperienceConfig, SerenityError};
use tracing::debug;

use crate::color::{lighten, rgb_to_threejs_hex, scale, Rgb};
use crate::field::{ParticleField, GROUND_Y, SPHERE_RADIUS};
use crate::profile::{Archetype, MoodVisualProfile};

// ─── GPU resources ──────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpuResource {
    pub kind: ResourceKind,
    pub label: String,
}

/// Live-resource counter shared by every scene one composer creates.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger(Arc<AtomicUsize>);

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Resources owned by one scene. Released on [`dispose`](Self::dispose) or drop.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: Vec<GpuResource>,
    ledger: ResourceLedger,
}

impl ResourceRegistry {
    pub fn new(ledger: ResourceLedger) -> Self {
        Self { entries: Vec::new(), ledger }
    }

    pub fn register(&mut self, kind: ResourceKind, label: impl Into<String>) {
        self.entries.push(GpuResource { kind, label: label.into() });
        self.ledger.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GpuResource] {
        &self.entries
    }

    /// Release everything; returns how many resources were freed.
    pub fn dispose(&mut self) -> usize {
        let released = self.entries.len();
        self.entries.clear();
        self.ledger.0.fetch_sub(released, Ordering::SeqCst);
        released
    }
}

impl Drop for ResourceRegistry {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ─── Scene objects ──────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub pose: CameraPose,
    /// Base distance from the look-at point.
    pub distance: f32,
    pub orbit_amplitude: f32,
    pub orbit_rate: f32,
}

impl Camera {
    /// Slow drift around the look-at point as a function of the clock.
    pub fn pose_at(&self, clock_seconds: f64) -> CameraPose {
        let a = (self.orbit_rate as f64 * clock_seconds).rem_euclid(std::f64::consts::TAU) as f32;
        let amp = self.orbit_amplitude;
        CameraPose {
            position: [
                amp * a.sin(),
                1.0 + 0.25 * amp * (0.7 * a).sin(),
                self.distance + 0.3 * amp * a.cos(),
            ],
            look_at: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LightKind {
    Ambient,
    Directional { position: [f32; 3] },
    Point { position: [f32; 3], distance: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    #[serde(flatten)]
    pub kind: LightKind,
    pub color: Rgb,
    pub base_intensity: f32,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParticleMaterial {
    /// Generic `PointsMaterial` with a uniform size.
    Points { size: f32, opacity: f32 },
    /// Per-vertex size and soft sprite through a custom program.
    Shader { opacity: f32, size_scale: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AuxMesh {
    GlowSphere { radius: f32, color: Rgb, opacity: f32 },
    WaveGround { size: f32, segments: u32, height: f32, color: Rgb, opacity: f32 },
    Crystal { direction: [f32; 3], offset: f32, height: f32, radius: f32, color: Rgb, opacity: f32 },
    TreeTrunk { position: [f32; 3], height: f32, radius: f32, color: Rgb },
    TreeCanopy { position: [f32; 3], radius: f32, color: Rgb, opacity: f32 },
    Nebula { radius: f32, color: Rgb, opacity: f32 },
    BackdropStars { count: u32, radius: f32, size: f32, color: Rgb },
}

impl AuxMesh {
    pub fn label(&self) -> &'static str {
        match self {
            Self::GlowSphere { .. } => "glow",
            Self::WaveGround { .. } => "ground",
            Self::Crystal { .. } => "crystal",
            Self::TreeTrunk { .. } => "trunk",
            Self::TreeCanopy { .. } => "canopy",
            Self::Nebula { .. } => "nebula",
            Self::BackdropStars { .. } => "backdrop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

/// Light intensities after a brightness change, in scene light order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingUpdate {
    pub brightness: f32,
    pub intensities: Vec<f32>,
}

// ─── Renderable scene ───────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableScene {
    pub archetype: Archetype,
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub background: Rgb,
    pub fog_density: f32,
    pub material: ParticleMaterial,
    pub aux: Vec<AuxMesh>,
    pub viewport: Viewport,
    pub particle_count: usize,
    #[serde(skip)]
    resources: ResourceRegistry,
}

const VERTEX_SHADER: &str = r#"attribute float size;
varying vec3 vColor;
uniform float uScale;
void main() {
    vColor = color;
    vec4 mv = modelViewMatrix * vec4(position, 1.0);
    gl_PointSize = size * uScale / -mv.z;
    gl_Position = projectionMatrix * mv;
}"#;

const FRAGMENT_SHADER: &str = r#"uniform sampler2D uMap;
uniform float uOpacity;
varying vec3 vColor;
void main() {
    vec4 tex = texture2D(uMap, gl_PointCoord);
    gl_FragColor = vec4(vColor, uOpacity) * tex;
}"#;

impl RenderableScene {
    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    pub fn is_disposed(&self) -> bool {
        self.resources.is_empty()
    }

    /// Update camera aspect and viewport. Particle state is untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Viewport {
        let width = width.max(1);
        let height = height.max(1);
        self.viewport = Viewport { width, height };
        self.camera.aspect = width as f32 / height as f32;
        self.viewport
    }

    /// Rescale light intensities for a brightness factor in [0, 1].
    pub fn set_brightness(&mut self, brightness: f32) -> LightingUpdate {
        let brightness = brightness.clamp(0.0, 1.0);
        for light in &mut self.lights {
            light.intensity = light.base_intensity * brightness;
        }
        LightingUpdate {
            brightness,
            intensities: self.lights.iter().map(|l| l.intensity).collect(),
        }
    }

    pub fn camera_pose(&self, clock_seconds: f64) -> CameraPose {
        self.camera.pose_at(clock_seconds)
    }

    /// Release every GPU resource this scene owns. Idempotent.
    pub fn dispose(&mut self) -> usize {
        let released = self.resources.dispose();
        if released > 0 {
            debug!("disposed {} scene resources ({})", released, self.archetype.name());
        }
        released
    }

    /// Emit the body of a JavaScript function `(THREE, scene, camera,
    /// renderer, data, disposables) => handles` that builds this scene.
    ///
    /// `data` carries the flat `positions`, `colors` and `sizes` arrays.
    /// Every created geometry, material and texture is pushed onto
    /// `disposables`. The returned handles expose the point cloud, the
    /// lights and per-frame updaters taking the motion time.
    pub fn build_js(&self) -> String {
        let mut js = String::with_capacity(8192);
        let bg = rgb_to_threejs_hex(self.background);
        let pose = self.camera.pose;

        js.push_str("const handles = { points: null, lights: [], updaters: [] };\n");

        // Camera
        let _ = write!(js, r#"camera.fov = {fov}; camera.near = {near}; camera.far = {far};
camera.position.set({cx}, {cy}, {cz});
camera.lookAt({lx}, {ly}, {lz});
camera.updateProjectionMatrix();
scene.background = new THREE.Color({bg});
scene.fog = new THREE.FogExp2({bg}, {fog});
"#,
            fov = self.camera.fov, near = self.camera.near, far = self.camera.far,
            cx = pose.position[0], cy = pose.position[1], cz = pose.position[2],
            lx = pose.look_at[0], ly = pose.look_at[1], lz = pose.look_at[2],
            bg = bg, fog = self.fog_density,
        );

        // Lights
        for light in &self.lights {
            let color = rgb_to_threejs_hex(light.color);
            match &light.kind {
                LightKind::Ambient => {
                    let _ = writeln!(js, "{{ const l = new THREE.AmbientLight({}, {}); scene.add(l); handles.lights.push(l); }}",
                        color, light.intensity);
                }
                LightKind::Directional { position: p } => {
                    let _ = writeln!(js, "{{ const l = new THREE.DirectionalLight({}, {}); l.position.set({}, {}, {}); scene.add(l); handles.lights.push(l); }}",
                        color, light.intensity, p[0], p[1], p[2]);
                }
                LightKind::Point { position: p, distance } => {
                    let _ = writeln!(js, "{{ const l = new THREE.PointLight({}, {}, {}); l.position.set({}, {}, {}); scene.add(l); handles.lights.push(l); }}",
                        color, light.intensity, distance, p[0], p[1], p[2]);
                }
            }
        }

        self.build_points_js(&mut js);

        for mesh in &self.aux {
            build_aux_js(&mut js, mesh);
        }

        js.push_str("return handles;\n");
        js
    }

    fn build_points_js(&self, js: &mut String) {
        js.push_str(r#"{
    const geo = new THREE.BufferGeometry();
    geo.setAttribute('position', new THREE.BufferAttribute(new Float32Array(data.positions), 3));
    geo.setAttribute('color', new THREE.BufferAttribute(new Float32Array(data.colors), 3));
    geo.setAttribute('size', new THREE.BufferAttribute(new Float32Array(data.sizes), 1));
    disposables.push(geo);
"#);
        match &self.material {
            ParticleMaterial::Points { size, opacity } => {
                let _ = write!(js, r#"    const mat = new THREE.PointsMaterial({{
        size: {size}, vertexColors: true, transparent: true, opacity: {opacity},
        blending: THREE.AdditiveBlending, depthWrite: false, sizeAttenuation: true
    }});
    disposables.push(mat);
"#, size = size, opacity = opacity);
            }
            ParticleMaterial::Shader { opacity, size_scale } => {
                let _ = write!(js, r#"    const canvas = document.createElement('canvas');
    canvas.width = 64; canvas.height = 64;
    const ctx = canvas.getContext('2d');
    const grad = ctx.createRadialGradient(32, 32, 0, 32, 32, 32);
    grad.addColorStop(0, 'rgba(255,255,255,1)');
    grad.addColorStop(0.4, 'rgba(255,255,255,0.6)');
    grad.addColorStop(1, 'rgba(255,255,255,0)');
    ctx.fillStyle = grad;
    ctx.fillRect(0, 0, 64, 64);
    const sprite = new THREE.CanvasTexture(canvas);
    disposables.push(sprite);
    const mat = new THREE.ShaderMaterial({{
        uniforms: {{
            uMap: {{ value: sprite }},
            uOpacity: {{ value: {opacity} }},
            uScale: {{ value: {size_scale} * renderer.getPixelRatio() }}
        }},
        vertexShader: `{vs}`,
        fragmentShader: `{fs}`,
        vertexColors: true, transparent: true, depthWrite: false,
        blending: THREE.AdditiveBlending
    }});
    disposables.push(mat);
"#, opacity = opacity, size_scale = size_scale, vs = VERTEX_SHADER, fs = FRAGMENT_SHADER);
            }
        }
        js.push_str("    handles.points = new THREE.Points(geo, mat);\n    scene.add(handles.points);\n}\n");
    }
}

impl Drop for RenderableScene {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn build_aux_js(js: &mut String, mesh: &AuxMesh) {
    match mesh {
        AuxMesh::GlowSphere { radius, color, opacity } => {
            let _ = write!(js, r#"{{
    const geo = new THREE.SphereGeometry({radius}, 32, 16);
    const mat = new THREE.MeshBasicMaterial({{ color: {color}, transparent: true, opacity: {opacity}, blending: THREE.AdditiveBlending, depthWrite: false }});
    disposables.push(geo, mat);
    const m = new THREE.Mesh(geo, mat);
    m.name = 'glow';
    scene.add(m);
    handles.updaters.push((t) => m.scale.setScalar(1 + 0.05 * Math.sin(t * 0.8)));
}}
"#, radius = radius, color = rgb_to_threejs_hex(*color), opacity = opacity);
        }
        AuxMesh::WaveGround { size, segments, height, color, opacity } => {
            let _ = write!(js, r#"{{
    const geo = new THREE.PlaneGeometry({size}, {size}, {seg}, {seg});
    geo.rotateX(-Math.PI / 2);
    const mat = new THREE.MeshStandardMaterial({{ color: {color}, transparent: true, opacity: {opacity}, wireframe: true }});
    disposables.push(geo, mat);
    const m = new THREE.Mesh(geo, mat);
    m.name = 'ground';
    m.position.y = {height};
    scene.add(m);
    const pos = geo.attributes.position;
    handles.updaters.push((t) => {{
        for (let i = 0; i < pos.count; i++) {{
            const x = pos.getX(i), z = pos.getZ(i);
            pos.setY(i, 0.4 * (Math.sin(0.5 * x + t) + Math.cos(0.4 * z + 0.7 * t)));
        }}
        pos.needsUpdate = true;
    }});
}}
"#, size = size, seg = segments, height = height, color = rgb_to_threejs_hex(*color), opacity = opacity);
        }
        AuxMesh::Crystal { direction: d, offset, height, radius, color, opacity } => {
            // Three.js rotation.y turns the opposite way to the particle law.
            let _ = write!(js, r#"{{
    const geo = new THREE.ConeGeometry({radius}, {height}, 6);
    const mat = new THREE.MeshPhongMaterial({{ color: {color}, transparent: true, opacity: {opacity}, shininess: 100, flatShading: true }});
    disposables.push(geo, mat);
    const m = new THREE.Mesh(geo, mat);
    const dir = new THREE.Vector3({dx}, {dy}, {dz});
    m.quaternion.setFromUnitVectors(new THREE.Vector3(0, 1, 0), dir);
    const pivot = new THREE.Group();
    m.position.copy(dir.clone().multiplyScalar({offset}));
    pivot.add(m);
    scene.add(pivot);
    handles.updaters.push((t) => {{ pivot.rotation.y = -0.15 * t; }});
}}
"#, radius = radius, height = height, color = rgb_to_threejs_hex(*color), opacity = opacity,
                dx = d[0], dy = d[1], dz = d[2], offset = offset);
        }
        AuxMesh::TreeTrunk { position: p, height, radius, color } => {
            let _ = write!(js, r#"{{
    const geo = new THREE.CylinderGeometry({top}, {radius}, {height}, 8);
    const mat = new THREE.MeshStandardMaterial({{ color: {color} }});
    disposables.push(geo, mat);
    const m = new THREE.Mesh(geo, mat);
    m.position.set({x}, {y}, {z});
    scene.add(m);
}}
"#, top = radius * 0.7, radius = radius, height = height, color = rgb_to_threejs_hex(*color),
                x = p[0], y = p[1], z = p[2]);
        }
        AuxMesh::TreeCanopy { position: p, radius, color, opacity } => {
            let _ = write!(js, r#"{{
    const geo = new THREE.IcosahedronGeometry({radius}, 1);
    const mat = new THREE.MeshStandardMaterial({{ color: {color}, transparent: true, opacity: {opacity}, flatShading: true }});
    disposables.push(geo, mat);
    const m = new THREE.Mesh(geo, mat);
    m.position.set({x}, {y}, {z});
    scene.add(m);
    handles.updaters.push((t) => {{ m.rotation.z = 0.03 * Math.sin(0.8 * t + {x}); }});
}}
"#, radius = radius, color = rgb_to_threejs_hex(*color), opacity = opacity,
                x = p[0], y = p[1], z = p[2]);
        }
        AuxMesh::Nebula { radius, color, opacity } => {
            let _ = write!(js, r#"{{
    const geo = new THREE.SphereGeometry({radius}, 32, 32);
    const mat = new THREE.MeshBasicMaterial({{ color: {color}, side: THREE.BackSide, transparent: true, opacity: {opacity}, depthWrite: false }});
    disposables.push(geo, mat);
    const m = new THREE.Mesh(geo, mat);
    m.name = 'nebula';
    scene.add(m);
    handles.updaters.push((t) => {{ m.rotation.y = 0.005 * t; }});
}}
"#, radius = radius, color = rgb_to_threejs_hex(*color), opacity = opacity);
        }
        AuxMesh::BackdropStars { count, radius, size, color } => {
            let _ = write!(js, r#"{{
    const n = {count};
    const geo = new THREE.BufferGeometry();
    const pos = new Float32Array(n * 3);
    for (let i = 0; i < n; i++) {{
        const u = Math.random() * 2 - 1, a = Math.random() * Math.PI * 2, s = Math.sqrt(1 - u * u);
        pos[i * 3] = {radius} * s * Math.cos(a);
        pos[i * 3 + 1] = {radius} * u;
        pos[i * 3 + 2] = {radius} * s * Math.sin(a);
    }}
    geo.setAttribute('position', new THREE.BufferAttribute(pos, 3));
    const mat = new THREE.PointsMaterial({{ color: {color}, size: {size}, transparent: true, opacity: 0.8, depthWrite: false }});
    disposables.push(geo, mat);
    scene.add(new THREE.Points(geo, mat));
}}
"#, count = count, radius = radius, color = rgb_to_threejs_hex(*color), size = size);
        }
    }
}

// ─── Composer ───────────────────────────────────────

/// Builds scenes for particle fields.
#[derive(Debug, Clone)]
pub struct SceneComposer {
    fov: f32,
    distance: f32,
    orbit_amplitude: f32,
    orbit_rate: f32,
    viewport: Viewport,
    ledger: ResourceLedger,
}

impl Default for SceneComposer {
    fn default() -> Self {
        Self::new(&ExperienceConfig::default())
    }
}

impl SceneComposer {
    pub fn new(config: &ExperienceConfig) -> Self {
        Self {
            fov: config.camera_fov,
            distance: config.camera_distance,
            orbit_amplitude: config.orbit_amplitude,
            orbit_rate: config.orbit_rate,
            viewport: Viewport::default(),
            ledger: ResourceLedger::new(),
        }
    }

    /// Live resources across every scene this composer created.
    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Viewport applied to newly composed scenes.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport { width: width.max(1), height: height.max(1) };
    }

    fn camera(&self, archetype: Archetype) -> Camera {
        // Wide scenes need a little more room.
        let distance = match archetype {
            Archetype::Starfield | Archetype::Wave | Archetype::Forest => self.distance * 1.3,
            _ => self.distance,
        };
        let mut camera = Camera {
            fov: self.fov,
            aspect: self.viewport.width as f32 / self.viewport.height as f32,
            near: 0.1,
            far: 1000.0,
            pose: CameraPose { position: [0.0, 1.0, distance], look_at: [0.0; 3] },
            distance,
            orbit_amplitude: self.orbit_amplitude,
            orbit_rate: self.orbit_rate,
        };
        camera.pose = camera.pose_at(0.0);
        camera
    }

    /// Compose the renderable scene for `field`.
    ///
    /// Fails with [`SerenityError::SceneInit`] when the field was not
    /// generated from `profile`.
    pub fn compose(
        &self,
        field: &ParticleField,
        profile: &MoodVisualProfile,
        brightness: f32,
    ) -> Result<RenderableScene, SerenityError> {
        if field.archetype() != profile.geometry_archetype {
            return Err(SerenityError::SceneInit(format!(
                "field archetype {} does not match profile {}",
                field.archetype().name(),
                profile.geometry_archetype.name()
            )));
        }
        if field.len() != profile.particle_count {
            return Err(SerenityError::SceneInit(format!(
                "field has {} particles, profile expects {}",
                field.len(),
                profile.particle_count
            )));
        }

        let archetype = profile.geometry_archetype;
        let mut resources = ResourceRegistry::new(self.ledger.clone());

        let mut lights = vec![
            Light {
                kind: LightKind::Ambient,
                color: lighten(profile.base_color, 0.5),
                base_intensity: 0.5,
                intensity: 0.0,
            },
            Light {
                kind: LightKind::Directional { position: [5.0, 10.0, 7.0] },
                color: [1.0, 1.0, 1.0],
                base_intensity: 0.8,
                intensity: 0.0,
            },
        ];
        if profile.use_advanced_shading {
            lights.push(Light {
                kind: LightKind::Point { position: [0.0, 3.0, 4.0], distance: 30.0 },
                color: profile.accent_color,
                base_intensity: 0.6,
                intensity: 0.0,
            });
        }
        if archetype == Archetype::Forest {
            lights.push(Light {
                kind: LightKind::Directional { position: [-6.0, 8.0, 2.0] },
                color: lighten(profile.accent_color, 0.3),
                base_intensity: 0.4,
                intensity: 0.0,
            });
        }

        let material = if profile.use_advanced_shading {
            resources.register(ResourceKind::Texture, "points.sprite");
            ParticleMaterial::Shader { opacity: profile.particle_opacity, size_scale: 300.0 }
        } else {
            ParticleMaterial::Points { size: profile.particle_size, opacity: profile.particle_opacity }
        };
        resources.register(ResourceKind::Geometry, "points");
        resources.register(ResourceKind::Material, "points");

        let aux = aux_meshes(field, profile);
        for mesh in &aux {
            resources.register(ResourceKind::Geometry, mesh.label());
            resources.register(ResourceKind::Material, mesh.label());
        }

        let mut scene = RenderableScene {
            archetype,
            camera: self.camera(archetype),
            lights,
            background: scale(profile.secondary_color, profile.background_intensity),
            fog_density: 0.02,
            material,
            aux,
            viewport: self.viewport,
            particle_count: field.len(),
            resources,
        };
        scene.set_brightness(brightness);
        debug!(
            "composed {} scene: {} particles, {} aux meshes, {} resources",
            archetype.name(),
            scene.particle_count,
            scene.aux.len(),
            scene.resources.len()
        );
        Ok(scene)
    }

    /// Static scene without particles, used when composition fails.
    pub fn fallback(&self, profile: &MoodVisualProfile, brightness: f32) -> RenderableScene {
        let mut resources = ResourceRegistry::new(self.ledger.clone());
        resources.register(ResourceKind::Geometry, "points");
        resources.register(ResourceKind::Material, "points");
        let mut scene = RenderableScene {
            archetype: profile.geometry_archetype,
            camera: self.camera(profile.geometry_archetype),
            lights: vec![Light {
                kind: LightKind::Ambient,
                color: [1.0, 1.0, 1.0],
                base_intensity: 0.6,
                intensity: 0.0,
            }],
            background: scale(profile.secondary_color, profile.background_intensity),
            fog_density: 0.0,
            material: ParticleMaterial::Points { size: profile.particle_size, opacity: profile.particle_opacity },
            aux: Vec::new(),
            viewport: self.viewport,
            particle_count: 0,
            resources,
        };
        scene.set_brightness(brightness);
        scene
    }
}

fn aux_meshes(field: &ParticleField, profile: &MoodVisualProfile) -> Vec<AuxMesh> {
    let accent = profile.accent_color;
    let secondary = profile.secondary_color;
    match profile.geometry_archetype {
        Archetype::Sphere => vec![AuxMesh::GlowSphere {
            radius: SPHERE_RADIUS * 0.5,
            color: accent,
            opacity: 0.25,
        }],
        Archetype::Cloud => vec![AuxMesh::GlowSphere { radius: 2.0, color: accent, opacity: 0.12 }],
        Archetype::Flower => vec![AuxMesh::GlowSphere { radius: 0.6, color: secondary, opacity: 0.3 }],
        Archetype::Wave => vec![AuxMesh::WaveGround {
            size: 16.0,
            segments: 64,
            height: -2.5,
            color: accent,
            opacity: 0.35,
        }],
        Archetype::Crystal => field
            .anchors()
            .iter()
            .map(|d| AuxMesh::Crystal {
                direction: *d,
                offset: 3.0,
                height: 2.5,
                radius: 0.35,
                color: accent,
                opacity: 0.4,
            })
            .collect(),
        Archetype::Forest => field
            .anchors()
            .iter()
            .flat_map(|a| {
                [
                    AuxMesh::TreeTrunk {
                        position: [a[0], GROUND_Y + 1.3, a[2]],
                        height: 2.6,
                        radius: 0.12,
                        color: scale(secondary, 0.6),
                    },
                    AuxMesh::TreeCanopy {
                        position: [a[0], 0.3, a[2]],
                        radius: 1.1,
                        color: accent,
                        opacity: 0.35,
                    },
                ]
            })
            .collect(),
        Archetype::Balloon => Vec::new(),
        Archetype::Starfield => vec![
            AuxMesh::Nebula { radius: 40.0, color: accent, opacity: 0.15 },
            AuxMesh::BackdropStars { count: 800, radius: 60.0, size: 0.15, color: lighten(accent, 0.5) },
        ],
    }
}
