//! Deterministic hash noise used by the texture synthesizer
//!
//! Both functions are pure: the same arguments always give the same bits,
//! which keeps the generated surface maps reproducible across runs.

const PRIME_X: i64 = 374_761_393;
const PRIME_Y: i64 = 668_265_263;
const PRIME_SEED: i64 = 2_147_483_647;
const PRIME_MIX: i64 = 1_274_126_177;

const MASK_31: i64 = 0x7fff_ffff;

/// Integer-hash value noise in [0, 1)
///
/// The coordinates are floored to lattice points, so the field is constant
/// over each unit cell.
pub fn scalar_noise(x: f64, y: f64, seed: u32) -> f64 {
    let ix = x.floor() as i64;
    let iy = y.floor() as i64;

    let mut n = ix
        .wrapping_mul(PRIME_X)
        .wrapping_add(iy.wrapping_mul(PRIME_Y))
        .wrapping_add((seed as i64).wrapping_mul(PRIME_SEED));
    n = (n ^ (n >> 13)).wrapping_mul(PRIME_MIX);
    n ^= n >> 16;

    // divide by 2^31 rather than the mask so 1.0 is never reached
    (n & MASK_31) as f64 / (MASK_31 as f64 + 1.0)
}

/// Multi-octave sum of [`scalar_noise`], normalized by the total amplitude
///
/// Amplitude starts at 1 and is multiplied by `persistence` each octave;
/// frequency starts at 1 and doubles. Zero octaves yield 0.
pub fn fractal_noise(x: f64, y: f64, octaves: u32, persistence: f64, seed: u32) -> f64 {
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut total = 0.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += scalar_noise(x * frequency, y * frequency, seed) * amplitude;
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= 2.0;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}
