//! Procedural surface maps for the celestial bodies
//!
//! Every body gets a square RGB buffer built by sampling the hash noise in
//! `noise` with a body-specific shading rule. Rules are looked up by name in
//! a registry; a generic cratered-rock rule covers names the registry does
//! not know. The buffers are built once at startup and cached in a
//! [`TextureTable`] that the renderer reads by body name.

use std::collections::HashMap;
use std::f64::consts::PI;

use anyhow::{bail, Result};

use crate::simulation::noise::{fractal_noise, scalar_noise};
use crate::simulation::params::{TEXTURE_SIZE_MAX, TEXTURE_SIZE_MIN};

/// Shading rule: maps texture coordinates (u, v) in [0, 1) to unclamped RGB
/// in the 0..255 range
pub type ShadingFn = fn(f64, f64) -> [f64; 3];

/// Name of the shared asteroid texture
pub const ASTEROID_TEXTURE: &str = "Asteroid";

const SHADERS: &[(&str, ShadingFn)] = &[
    ("Sun", shade_sun),
    ("Mercury", shade_mercury),
    ("Venus", shade_venus),
    ("Earth", shade_earth),
    ("Mars", shade_mars),
    ("Jupiter", shade_jupiter),
    ("Saturn", shade_saturn),
    ("Uranus", shade_uranus),
    ("Neptune", shade_neptune),
    (ASTEROID_TEXTURE, shade_asteroid),
];

/// Look up the registered shading rule for `name`
pub fn registered_shader(name: &str) -> Option<ShadingFn> {
    SHADERS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, shader)| *shader)
}

/// Shading rule for `name`, falling back to plain cratered rock
pub fn shader_for(name: &str) -> ShadingFn {
    registered_shader(name).unwrap_or(shade_rock)
}

/// Names with a dedicated shading rule, in registry order
pub fn registered_names() -> impl Iterator<Item = &'static str> {
    SHADERS.iter().map(|(key, _)| *key)
}

/// Build the `size * size * 3` RGB buffer for `name`
pub fn synthesize(name: &str, size: usize) -> Result<Vec<u8>> {
    if !(TEXTURE_SIZE_MIN..=TEXTURE_SIZE_MAX).contains(&size) {
        bail!(
            "texture size {size} for {name:?} is outside [{TEXTURE_SIZE_MIN}, {TEXTURE_SIZE_MAX}]"
        );
    }
    Ok(render(shader_for(name), size))
}

/// Sample `shader` over a square grid; channels are clamped to [0, 255]
pub fn render(shader: ShadingFn, size: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(size * size * 3);
    let inv = 1.0 / size as f64;

    for y in 0..size {
        for x in 0..size {
            let rgb = shader(x as f64 * inv, y as f64 * inv);
            pixels.extend(rgb.iter().map(|c| to_channel(*c)));
        }
    }
    pixels
}

fn to_channel(c: f64) -> u8 {
    if c.is_nan() {
        return 0;
    }
    c.clamp(0.0, 255.0) as u8
}

/// Texture cache keyed by body name
#[derive(Debug, Clone, Default)]
pub struct TextureTable {
    size: usize,
    textures: HashMap<String, Vec<u8>>,
}

impl TextureTable {
    /// Synthesize one texture per name; any failure aborts the whole build
    pub fn build<'a, I>(names: I, size: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut textures = HashMap::new();
        for name in names {
            if textures.contains_key(name) {
                continue;
            }
            textures.insert(name.to_string(), synthesize(name, size)?);
        }
        Ok(Self { size, textures })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.textures.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.textures.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

// =========================================================================================
// Shading helpers
// =========================================================================================

fn mix(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn scale(c: [f64; 3], k: f64) -> [f64; 3] {
    [c[0] * k, c[1] * k, c[2] * k]
}

/// Darkening factor for crater pits: 1.0 on open ground, lower inside pits
fn crater_shade(u: f64, v: f64, freq: f64, threshold: f64, seed: u32) -> f64 {
    let pit = scalar_noise(u * freq, v * freq, seed);
    if pit > threshold {
        0.55 + 0.3 * scalar_noise(u * freq * 4.0, v * freq * 4.0, seed + 1)
    } else {
        1.0
    }
}

/// Horizontal cloud bands perturbed by turbulence, returns a value in [0, 1]
fn banding(v: f64, bands: f64, turbulence: f64, warp: f64) -> f64 {
    0.5 + 0.5 * (v * PI * bands + turbulence * warp).sin()
}

// =========================================================================================
// Per-body rules
// =========================================================================================

fn shade_sun(u: f64, v: f64) -> [f64; 3] {
    let n = fractal_noise(u * 16.0, v * 16.0, 5, 0.5, 7);
    let flare = scalar_noise(u * 64.0, v * 64.0, 8);
    let base = mix([255.0, 140.0, 20.0], [255.0, 230.0, 120.0], n);
    if flare > 0.97 {
        mix(base, [255.0, 255.0, 220.0], 0.6)
    } else {
        base
    }
}

fn shade_mercury(u: f64, v: f64) -> [f64; 3] {
    let n = fractal_noise(u * 24.0, v * 24.0, 4, 0.55, 11);
    let base = mix([95.0, 90.0, 85.0], [175.0, 168.0, 160.0], n);
    scale(base, crater_shade(u, v, 40.0, 0.9, 12))
}

fn shade_venus(u: f64, v: f64) -> [f64; 3] {
    let swirl = fractal_noise(u * 8.0, v * 8.0, 5, 0.6, 21);
    let bands = banding(v, 6.0, swirl, 3.0);
    mix([200.0, 150.0, 70.0], [245.0, 215.0, 150.0], 0.5 * swirl + 0.5 * bands)
}

/// Land/ocean split at 0.45 with white polar caps
fn shade_earth(u: f64, v: f64) -> [f64; 3] {
    let n = fractal_noise(u * 12.0, v * 12.0, 6, 0.5, 42);
    if v < 0.06 || v > 0.94 {
        return mix([225.0, 235.0, 245.0], [255.0, 255.0, 255.0], n);
    }
    let surface = if n > 0.45 {
        let t = (n - 0.45) / 0.55;
        mix([40.0, 120.0, 45.0], [150.0, 120.0, 70.0], t * 1.6)
    } else {
        let t = n / 0.45;
        mix([10.0, 30.0, 110.0], [40.0, 110.0, 190.0], t)
    };
    let cloud = fractal_noise(u * 20.0, v * 20.0, 3, 0.5, 43);
    if cloud > 0.72 {
        mix(surface, [250.0, 250.0, 250.0], (cloud - 0.72) * 3.0)
    } else {
        surface
    }
}

fn shade_mars(u: f64, v: f64) -> [f64; 3] {
    let n = fractal_noise(u * 18.0, v * 18.0, 5, 0.5, 31);
    let base = mix([140.0, 50.0, 25.0], [215.0, 110.0, 60.0], n);
    if v < 0.05 || v > 0.95 {
        return mix(base, [240.0, 235.0, 230.0], 0.8);
    }
    scale(base, crater_shade(u, v, 32.0, 0.93, 32))
}

fn shade_jupiter(u: f64, v: f64) -> [f64; 3] {
    let turbulence = fractal_noise(u * 10.0, v * 10.0, 4, 0.5, 51);
    let bands = banding(v, 14.0, turbulence, 4.0);
    let mut c = mix([150.0, 95.0, 60.0], [235.0, 215.0, 180.0], bands);

    // great red spot
    let du = (u - 0.65) / 0.09;
    let dv = (v - 0.62) / 0.045;
    let d2 = du * du + dv * dv;
    if d2 < 1.0 {
        c = mix(c, [190.0, 70.0, 45.0], 1.0 - d2);
    }
    c
}

fn shade_saturn(u: f64, v: f64) -> [f64; 3] {
    let turbulence = fractal_noise(u * 8.0, v * 8.0, 3, 0.5, 61);
    let bands = banding(v, 10.0, turbulence, 2.0);
    mix([190.0, 160.0, 105.0], [240.0, 220.0, 170.0], bands)
}

fn shade_uranus(u: f64, v: f64) -> [f64; 3] {
    let n = fractal_noise(u * 6.0, v * 6.0, 3, 0.4, 71);
    let bands = banding(v, 4.0, n, 0.5);
    mix([120.0, 190.0, 200.0], [175.0, 225.0, 230.0], 0.7 * bands + 0.3 * n)
}

fn shade_neptune(u: f64, v: f64) -> [f64; 3] {
    let n = fractal_noise(u * 10.0, v * 10.0, 4, 0.5, 81);
    let bands = banding(v, 8.0, n, 2.5);
    let c = mix([25.0, 55.0, 150.0], [70.0, 120.0, 220.0], bands);
    let streak = scalar_noise(u * 4.0, v * 48.0, 82);
    if streak > 0.9 {
        mix(c, [220.0, 230.0, 255.0], 0.5)
    } else {
        c
    }
}

fn shade_asteroid(u: f64, v: f64) -> [f64; 3] {
    let n = fractal_noise(u * 20.0, v * 20.0, 4, 0.6, 91);
    let base = mix([70.0, 65.0, 60.0], [140.0, 130.0, 120.0], n);
    scale(base, crater_shade(u, v, 24.0, 0.85, 92))
}

fn shade_rock(u: f64, v: f64) -> [f64; 3] {
    let n = fractal_noise(u * 16.0, v * 16.0, 4, 0.5, 101);
    let base = mix([80.0, 80.0, 80.0], [170.0, 170.0, 170.0], n);
    scale(base, crater_shade(u, v, 30.0, 0.9, 102))
}
