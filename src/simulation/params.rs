//! Numerical constants and runtime parameters for the simulation
//!
//! The constants are the fixed tunables of the kinematic model and the
//! input mapping; `Parameters` holds the per-run settings loaded from the
//! scenario file:
//! - RNG seed (random starting angles, asteroid population)
//! - texture resolution for the procedural surface maps
//! - fixed tick rate of the driver

/// Trail history cap per body
pub const TRAIL_CAPACITY: usize = 100;

/// Simulated seconds between two trail samples
pub const TRAIL_INTERVAL: f64 = 0.05;

pub const ZOOM_MIN: f64 = 0.3;
pub const ZOOM_MAX: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

pub const SPEED_STEP: f64 = 0.5;
pub const FAST_FORWARD_SPEED: f64 = 5.0;

/// Speed multiplier forced while the guided tour runs
pub const TOUR_SPEED: f64 = 0.5;

/// Seconds to fly the tour camera between two stops
pub const TOUR_TRANSITION_DURATION: f64 = 3.0;

/// Accepted texture edge lengths, in pixels
pub const TEXTURE_SIZE_MIN: usize = 8;
pub const TEXTURE_SIZE_MAX: usize = 4096;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub seed: Option<u64>, // deterministic seed, None = seeded from entropy
    pub texture_size: usize, // edge length of every generated texture
    pub tick_rate_hz: f64, // fixed tick rate of the driver
}

impl Parameters {
    /// Length of one fixed tick in seconds
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.tick_rate_hz.max(1.0)
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            seed: None,
            texture_size: 256,
            tick_rate_hz: 60.0,
        }
    }
}
