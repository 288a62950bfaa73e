//! Color helpers for mood palettes.
//!
//! Colors are `[r, g, b]` arrays in [0.0, 1.0], or hex strings for direct
//! HTML/CSS and Three.js embedding.

/// Linear RGB triple in [0, 1].
pub type Rgb = [f32; 3];

/// Unpack a `0xRRGGBB` literal.
pub fn from_hex(hex: u32) -> Rgb {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Convex combination of three colors. `weights` should sum to 1.
pub fn blend3(a: Rgb, b: Rgb, c: Rgb, weights: [f32; 3]) -> Rgb {
    let mut out = [0.0; 3];
    for k in 0..3 {
        out[k] = a[k] * weights[0] + b[k] * weights[1] + c[k] * weights[2];
    }
    out
}

/// Multiply by a brightness factor, clamped back into [0, 1].
pub fn scale(c: Rgb, factor: f32) -> Rgb {
    [
        (c[0] * factor).clamp(0.0, 1.0),
        (c[1] * factor).clamp(0.0, 1.0),
        (c[2] * factor).clamp(0.0, 1.0),
    ]
}

/// Move a color towards white by `amount` in [0, 1].
pub fn lighten(c: Rgb, amount: f32) -> Rgb {
    let t = amount.clamp(0.0, 1.0);
    [
        c[0] + (1.0 - c[0]) * t,
        c[1] + (1.0 - c[1]) * t,
        c[2] + (1.0 - c[2]) * t,
    ]
}

/// Convert to a CSS hex color string "#rrggbb".
pub fn rgb_to_hex(c: Rgb) -> String {
    let ri = (c[0].clamp(0.0, 1.0) * 255.0).round() as u8;
    let gi = (c[1].clamp(0.0, 1.0) * 255.0).round() as u8;
    let bi = (c[2].clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", ri, gi, bi)
}

/// Convert to a Three.js hex integer literal "0xrrggbb".
pub fn rgb_to_threejs_hex(c: Rgb) -> String {
    let ri = (c[0].clamp(0.0, 1.0) * 255.0).round() as u32;
    let gi = (c[1].clamp(0.0, 1.0) * 255.0).round() as u32;
    let bi = (c[2].clamp(0.0, 1.0) * 255.0).round() as u32;
    format!("0x{:02x}{:02x}{:02x}", ri, gi, bi)
}

pub fn in_unit_range(c: Rgb) -> bool {
    c.iter().all(|v| (0.0..=1.0).contains(v))
}
