//! Asteroid belt: a fixed population of small bodies on independent
//! circular orbits between two radii. Asteroids always orbit; the gravity
//! toggle does not affect them.

use rand::Rng;

use crate::simulation::body::normalize_degrees;
use crate::simulation::states::{NVec3, SimState};

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub orbit_radius: f64,
    pub orbit_angle: f64, // [0, 360)
    pub orbit_speed: f64, // deg/s
    pub size: f64,
    pub vertical_offset: f64,
}

impl Asteroid {
    pub fn position(&self) -> NVec3 {
        let a = self.orbit_angle.to_radians();
        NVec3::new(
            self.orbit_radius * a.cos(),
            self.vertical_offset,
            self.orbit_radius * a.sin(),
        )
    }
}

/// Generation ranges for the belt
#[derive(Debug, Clone)]
pub struct BeltShape {
    pub count: usize,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub vertical_jitter: f64,
}

impl Default for BeltShape {
    fn default() -> Self {
        Self {
            count: 200,
            inner_radius: 17.0,
            outer_radius: 19.5,
            min_speed: 15.0,
            max_speed: 22.0,
            min_size: 0.04,
            max_size: 0.12,
            vertical_jitter: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AsteroidField {
    pub asteroids: Vec<Asteroid>,
}

/// Uniform sample in [lo, hi], tolerating a collapsed range
fn sample(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

impl AsteroidField {
    pub fn generate(shape: &BeltShape, rng: &mut impl Rng) -> Self {
        let asteroids = (0..shape.count)
            .map(|_| Asteroid {
                orbit_radius: sample(rng, shape.inner_radius, shape.outer_radius),
                orbit_angle: normalize_degrees(rng.gen_range(0.0..360.0)),
                orbit_speed: sample(rng, shape.min_speed, shape.max_speed),
                size: sample(rng, shape.min_size, shape.max_size),
                vertical_offset: sample(rng, -shape.vertical_jitter, shape.vertical_jitter),
            })
            .collect();
        Self { asteroids }
    }

    pub fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty()
    }

    pub fn update(&mut self, dt: f64, state: &SimState) {
        if state.paused {
            return;
        }
        let sim_dt = dt * state.speed_multiplier;
        for a in self.asteroids.iter_mut() {
            a.orbit_angle = normalize_degrees(a.orbit_angle + a.orbit_speed * sim_dt);
        }
    }
}
