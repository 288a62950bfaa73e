// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

//! HTML page templates.
//!
//! The experience page embeds Three.js and a small WebSocket client: the
//! server sends the scene construction script, frame buffers and audio
//! commands, and the page reports audio load results and control input back.

use std::fmt::Write;

use serenity_core::config::{ANIMATION_SPEED_RANGE, BRIGHTNESS_RANGE, VOLUME_RANGE};
use serenity_core::{ExperienceConfig, MoodRecord};

use crate::color::rgb_to_hex;
use crate::profile::MoodVisualProfile;

/// Position anchor for overlay panels.
#[derive(Debug, Clone, Copy)]
pub enum PanelPosition {
    TopLeft,
    TopRight,
    BottomCenter,
    Center,
}

impl PanelPosition {
    fn css(&self) -> &'static str {
        match self {
            Self::TopLeft => "top: 16px; left: 16px;",
            Self::TopRight => "top: 16px; right: 16px;",
            Self::BottomCenter => "bottom: 16px; left: 50%; transform: translateX(-50%);",
            Self::Center => "top: 50%; left: 50%; transform: translate(-50%, -50%);",
        }
    }
}

/// An overlay panel rendered on top of the 3D scene.
#[derive(Debug, Clone)]
pub struct HudPanel {
    pub id: String,
    pub position: PanelPosition,
    pub content_html: String,
}

#[derive(Debug, Clone, Copy)]
pub enum Theme {
    /// Deep night background for experiences.
    Dusk,
    /// Warm sand background for landing and error pages.
    Sand,
}

impl Theme {
    pub fn bg_color(&self) -> &'static str {
        match self {
            Self::Dusk => "#14110f",
            Self::Sand => "#f0e7d8",
        }
    }

    pub fn text_color(&self) -> &'static str {
        match self {
            Self::Dusk => "#f0e7d8",
            Self::Sand => "#5f5648",
        }
    }

    pub fn panel_bg(&self) -> &'static str {
        match self {
            Self::Dusk => "rgba(20, 17, 15, 0.6)",
            Self::Sand => "rgba(255, 250, 242, 0.85)",
        }
    }
}

/// Builder for self-contained HTML documents.
pub struct HtmlDocument {
    title: String,
    theme: Theme,
    accent: String,
    panels: Vec<HudPanel>,
    body_html: String,
    script: String,
    extra_css: String,
    use_three: bool,
}

impl HtmlDocument {
    pub fn new(title: &str, theme: Theme) -> Self {
        Self {
            title: escape_html(title),
            theme,
            accent: "#dda15e".to_string(),
            panels: Vec::new(),
            body_html: String::new(),
            script: String::new(),
            extra_css: String::new(),
            use_three: false,
        }
    }

    pub fn set_accent(&mut self, accent: &str) {
        self.accent = accent.to_string();
    }

    pub fn add_panel(&mut self, id: &str, position: PanelPosition, content: &str) {
        self.panels.push(HudPanel {
            id: id.to_string(),
            position,
            content_html: content.to_string(),
        });
    }

    pub fn set_body(&mut self, html: &str) {
        self.body_html = html.to_string();
    }

    /// Script run after the Three.js library loads.
    pub fn set_script(&mut self, js: &str) {
        self.script = js.to_string();
        self.use_three = true;
    }

    pub fn set_extra_css(&mut self, css: &str) {
        self.extra_css = css.to_string();
    }

    pub fn render(&self) -> String {
        let mut html = String::with_capacity(16384);

        let _ = write!(html, r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
"#, title = self.title);

        if self.use_three {
            html.push_str(r#"<script src="https://cdnjs.cloudflare.com/ajax/libs/three.js/r128/three.min.js"></script>
"#);
        }

        let _ = write!(html, r#"<style>
* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{
    background: {bg};
    color: {text};
    font-family: 'Segoe UI', 'Helvetica Neue', Arial, sans-serif;
    overflow: {overflow};
}}
#canvas-container {{ position: fixed; top: 0; left: 0; width: 100%; height: 100%; }}
.hud-panel {{
    position: absolute;
    background: {panel_bg};
    border: 1px solid {accent}44;
    border-radius: 12px;
    padding: 12px 18px;
    backdrop-filter: blur(12px);
    -webkit-backdrop-filter: blur(12px);
    font-size: 14px;
    line-height: 1.5;
    z-index: 10;
}}
.hud-panel h1 {{ font-size: 22px; font-weight: 600; color: {accent}; }}
.hud-panel h3 {{
    color: {accent};
    font-size: 11px;
    text-transform: uppercase;
    letter-spacing: 1.5px;
    margin-bottom: 6px;
}}
.control-row {{ display: flex; align-items: center; gap: 10px; padding: 3px 0; }}
.control-row label {{ width: 90px; font-size: 12px; opacity: 0.8; }}
button {{
    background: {accent};
    color: {bg};
    border: none;
    border-radius: 18px;
    padding: 6px 16px;
    cursor: pointer;
    font-weight: 600;
}}
a {{ color: {accent}; }}
{extra_css}
</style>
</head>
<body>
"#,
            bg = self.theme.bg_color(),
            text = self.theme.text_color(),
            panel_bg = self.theme.panel_bg(),
            accent = self.accent,
            overflow = if self.use_three { "hidden" } else { "auto" },
            extra_css = self.extra_css,
        );

        if self.use_three {
            html.push_str("<div id=\"canvas-container\"></div>\n");
        }
        html.push_str(&self.body_html);

        for panel in &self.panels {
            let _ = write!(html, r#"<div id="{id}" class="hud-panel" style="{pos}">
{content}
</div>
"#,
                id = panel.id,
                pos = panel.position.css(),
                content = panel.content_html,
            );
        }

        if !self.script.is_empty() {
            html.push_str("<script>\n");
            html.push_str(&self.script);
            html.push_str("\n</script>\n");
        }
        html.push_str("</body>\n</html>");
        html
    }
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn slider(id: &str, label: &str, range: (u8, u8), value: u8, message: &str) -> String {
    format!(
        r#"<div class="control-row"><label for="{id}">{label}</label><input type="range" id="{id}" min="{min}" max="{max}" value="{value}" data-msg="{message}"><span id="{id}-value">{value}</span></div>"#,
        min = range.0,
        max = range.1,
    )
}

/// Full-screen experience for one mood.
pub fn experience_page(record: &MoodRecord, profile: &MoodVisualProfile, config: &ExperienceConfig) -> String {
    let mut doc = HtmlDocument::new(&format!("SerenitySphere - {}", record.name), Theme::Dusk);
    doc.set_accent(&rgb_to_hex(profile.accent_color));

    doc.add_panel(
        "mood-info",
        PanelPosition::TopLeft,
        &format!(
            "<h1>{}</h1><p>{}</p><p><a href=\"/\">All moods</a></p>",
            escape_html(&record.name),
            escape_html(&record.description),
        ),
    );
    doc.add_panel("status", PanelPosition::TopRight, "<h3>Status</h3><div id=\"status-text\">Connecting</div>");

    let defaults = config.defaults;
    let mut controls = String::from("<div class=\"control-row\"><button id=\"play\">Play</button><button id=\"voice\">Voice</button><button id=\"favorite\">Favorite</button></div>\n");
    controls.push_str(&slider("volume", "Volume", VOLUME_RANGE, defaults.volume, "SetVolume"));
    controls.push_str(&slider("speed", "Speed", ANIMATION_SPEED_RANGE, defaults.animation_speed, "SetAnimationSpeed"));
    controls.push_str(&slider("brightness", "Brightness", BRIGHTNESS_RANGE, defaults.brightness, "SetBrightness"));
    doc.add_panel("controls", PanelPosition::BottomCenter, &controls);

    doc.add_panel(
        "webgl-fallback",
        PanelPosition::Center,
        &format!(
            "<h3>3D view unavailable</h3><p>{}</p><p>Audio and voice guidance still work.</p>",
            escape_html(&record.voice_prompt),
        ),
    );
    doc.set_extra_css(&format!(
        "#webgl-fallback {{ display: none; }}\nbody.no-webgl {{ background: radial-gradient(circle, {}, {}); }}",
        rgb_to_hex(profile.base_color),
        rgb_to_hex(profile.secondary_color),
    ));

    let mood_json = serde_json::to_string(&record.name).unwrap_or_else(|_| "\"\"".to_string());
    let mut js = String::with_capacity(8192);
    let _ = write!(js, "const MOOD = {mood_json};\nconst FOV = {fov};\n", fov = config.camera_fov);
    js.push_str(CLIENT_JS);
    doc.set_script(&js);
    doc.render()
}

/// Shown for a mood segment outside the closed set.
pub fn invalid_mood_page(segment: &str) -> String {
    let mut doc = HtmlDocument::new("SerenitySphere - Invalid Mood", Theme::Sand);
    doc.add_panel(
        "invalid-mood",
        PanelPosition::Center,
        &format!(
            "<h1>Invalid Mood</h1><p>We don't have an experience called \"{}\".</p><p><a href=\"/\">Choose a mood</a></p>",
            escape_html(segment),
        ),
    );
    doc.render()
}

/// Landing page listing every mood.
pub fn index_page(records: &[MoodRecord]) -> String {
    let mut doc = HtmlDocument::new("SerenitySphere", Theme::Sand);
    let mut body = String::from("<main style=\"max-width: 720px; margin: 48px auto; padding: 0 16px;\">\n<h1>How are you feeling?</h1>\n<ul style=\"list-style: none; margin-top: 24px;\">\n");
    for record in records {
        let slug = record.name.to_lowercase();
        let _ = writeln!(
            body,
            "<li style=\"padding: 10px 0;\"><a href=\"/experience/{slug}\"><strong>{name}</strong></a> <span>{desc}</span></li>",
            slug = escape_html(&slug),
            name = escape_html(&record.name),
            desc = escape_html(&record.description),
        );
    }
    body.push_str("</ul>\n</main>\n");
    doc.set_body(&body);
    doc.render()
}

const CLIENT_JS: &str = r#"
const container = document.getElementById('canvas-container');
const statusText = document.getElementById('status-text');
const playButton = document.getElementById('play');
let renderer = null, scene = null, camera = null, handles = null, disposables = [];
let sceneGeneration = -1;

try {
    renderer = new THREE.WebGLRenderer({ antialias: true, alpha: true });
    renderer.setPixelRatio(window.devicePixelRatio);
    renderer.setSize(container.clientWidth, container.clientHeight);
    container.appendChild(renderer.domElement);
} catch (e) {
    renderer = null;
    document.body.classList.add('no-webgl');
    document.getElementById('webgl-fallback').style.display = 'block';
}

const proto = location.protocol === 'https:' ? 'wss' : 'ws';
const ws = new WebSocket(`${proto}://${location.host}/ws/experience`);
function send(msg) {
    if (ws.readyState === WebSocket.OPEN) ws.send(JSON.stringify(msg));
}

function teardown() {
    disposables.forEach((d) => d.dispose());
    disposables = [];
    if (scene) scene.clear();
    handles = null;
}

function applyScene(msg) {
    teardown();
    sceneGeneration = msg.generation;
    if (!renderer) return;
    scene = new THREE.Scene();
    camera = new THREE.PerspectiveCamera(FOV, msg.viewport.width / msg.viewport.height, 0.1, 1000);
    try {
        const build = new Function('THREE', 'scene', 'camera', 'renderer', 'data', 'disposables', msg.script);
        handles = build(THREE, scene, camera, renderer, msg, disposables);
    } catch (e) {
        statusText.textContent = 'Scene failed: ' + e.message;
        teardown();
    }
}

function setAttr(geo, name, values) {
    const attr = geo.getAttribute(name);
    if (!values || !attr || attr.array.length !== values.length) return;
    attr.array.set(values);
    attr.needsUpdate = true;
}

function applyLighting(l) {
    if (!handles) return;
    l.intensities.forEach((v, i) => { if (handles.lights[i]) handles.lights[i].intensity = v; });
}

function applyFrame(f) {
    if (f.generation !== sceneGeneration) return;
    if (!handles || !handles.points) return;
    const geo = handles.points.geometry;
    setAttr(geo, 'position', f.positions);
    setAttr(geo, 'size', f.sizes);
    setAttr(geo, 'color', f.colors);
    camera.position.set(f.camera.position[0], f.camera.position[1], f.camera.position[2]);
    camera.lookAt(f.camera.lookAt[0], f.camera.lookAt[1], f.camera.lookAt[2]);
    if (f.lighting) applyLighting(f.lighting);
    handles.updaters.forEach((u) => u(f.motionTime));
}

const background = new Audio();
function audioFailed(track, reason) {
    send({ type: 'AudioFailed', track, reason });
}

function runAudio(cmd) {
    switch (cmd.command) {
        case 'load':
            if (cmd.track !== 'background') break;
            background.oncanplaythrough = () => {
                background.oncanplaythrough = null;
                send({ type: 'AudioLoaded', track: 'background' });
            };
            background.onerror = () => audioFailed('background', 'could not load ' + cmd.url);
            background.loop = cmd.looping;
            background.src = cmd.url;
            background.load();
            break;
        case 'play':
            background.play().catch((e) => audioFailed('background', String(e)));
            break;
        case 'pause':
            background.pause();
            break;
        case 'stop':
            background.pause();
            background.currentTime = 0;
            break;
        case 'setVolume':
            background.volume = cmd.gain;
            break;
        case 'speak':
            if (!('speechSynthesis' in window)) {
                audioFailed('voice', 'speech synthesis unavailable');
                break;
            }
            window.speechSynthesis.cancel();
            const utterance = new SpeechSynthesisUtterance(cmd.text);
            utterance.rate = 0.9;
            utterance.volume = background.volume;
            utterance.onerror = (e) => audioFailed('voice', e.error || 'speech failed');
            window.speechSynthesis.speak(utterance);
            break;
    }
}

ws.onopen = () => {
    send({ type: 'Ready' });
    send({ type: 'Resize', width: window.innerWidth, height: window.innerHeight });
    send({ type: 'SelectMood', mood: MOOD });
};
ws.onclose = () => { statusText.textContent = 'Disconnected'; teardown(); };
ws.onmessage = (event) => {
    const msg = JSON.parse(event.data);
    switch (msg.type) {
        case 'SceneInit': applyScene(msg); break;
        case 'Frame': applyFrame(msg); break;
        case 'Lighting': applyLighting(msg); break;
        case 'Viewport':
            if (camera) { camera.aspect = msg.width / msg.height; camera.updateProjectionMatrix(); }
            break;
        case 'Audio': runAudio(msg); break;
        case 'State':
            statusText.textContent = msg.state + (msg.mood ? ' - ' + msg.mood : '');
            playButton.textContent = msg.state === 'Playing' ? 'Pause' : 'Play';
            break;
        case 'Favorite':
            localStorage.setItem('serenity.favoriteMood', msg.mood);
            statusText.textContent = msg.mood + ' saved as favorite';
            break;
        case 'Error': statusText.textContent = msg.message; break;
    }
};

playButton.onclick = () => send({ type: 'TogglePlay' });
document.getElementById('voice').onclick = () => send({ type: 'PlayVoicePrompt' });
document.getElementById('favorite').onclick = () => send({ type: 'SaveFavorite' });
document.querySelectorAll('input[type=range]').forEach((input) => {
    input.oninput = () => {
        document.getElementById(input.id + '-value').textContent = input.value;
        send({ type: input.dataset.msg, value: Number(input.value) });
    };
});

window.addEventListener('resize', () => {
    if (renderer) renderer.setSize(container.clientWidth, container.clientHeight);
    send({ type: 'Resize', width: window.innerWidth, height: window.innerHeight });
});
window.addEventListener('beforeunload', () => { teardown(); ws.close(); });

function render() {
    requestAnimationFrame(render);
    if (renderer && scene && camera) renderer.render(scene, camera);
}
render();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::profile_for;
    use serenity_core::Mood;

    #[test]
    fn test_basic_document_renders() {
        let doc = HtmlDocument::new("Test", Theme::Sand);
        let html = doc.render();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test</title>"));
        assert!(!html.contains("three.min.js"));
    }

    #[test]
    fn test_panels_rendered() {
        let mut doc = HtmlDocument::new("Test", Theme::Dusk);
        doc.add_panel("stats", PanelPosition::TopRight, "<h3>Stats</h3>");
        let html = doc.render();
        assert!(html.contains("id=\"stats\""));
        assert!(html.contains("<h3>Stats</h3>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"a\" & 'b'</b>"), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_experience_page() {
        let record = MoodRecord::builtin(Mood::Calm);
        let html = experience_page(&record, &profile_for(Mood::Calm), &ExperienceConfig::default());
        assert!(html.contains("three.min.js"));
        assert!(html.contains("const MOOD = \"Calm\";"));
        assert!(html.contains("/ws/experience"));
        assert!(html.contains("Breathe in peace, breathe out tension."));
        assert!(html.contains("id=\"volume\" min=\"0\" max=\"100\" value=\"70\""));
        assert!(html.contains("id=\"brightness\" min=\"20\" max=\"100\" value=\"60\""));
        assert!(html.contains("speechSynthesis"));
        assert!(html.contains("if (f.generation !== sceneGeneration) return;"));
    }

    #[test]
    fn test_invalid_mood_page_escapes_segment() {
        let html = invalid_mood_page("<script>alert(1)</script>");
        assert!(html.contains("Invalid Mood"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_index_lists_all_moods() {
        let html = index_page(&MoodRecord::all_builtin());
        for mood in Mood::ALL {
            assert!(html.contains(&format!("href=\"/experience/{}\"", mood.slug())));
        }
    }
}
