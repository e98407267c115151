//! Orbiting bodies: circular-orbit kinematics with a straight-line drift
//! fallback.
//!
//! A body is in one of two motion states, chosen globally by
//! `SimState::gravity_enabled`:
//!
//! - **Orbiting**: the orbit angle advances at `orbit_speed` deg/s and the
//!   position is placed on the circle of radius `orbit_radius` in the XZ
//!   plane.
//! - **Drifting**: on the first tick without gravity the tangential velocity
//!   `v = r * omega` is sampled once; the body then moves along that line.
//!   The orbit angle is frozen while drifting, so turning gravity back on
//!   snaps the body onto the circle at the angle where it left it.
//!
//! Self-rotation advances in both states. A bounded trail of past positions
//! is sampled every `TRAIL_INTERVAL` simulated seconds.

use std::collections::VecDeque;

use rand::Rng;

use crate::simulation::params::{TRAIL_CAPACITY, TRAIL_INTERVAL};
use crate::simulation::states::{NVec3, SimState};

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Planetary ring, rendered as a tilted annulus around the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub color: [f32; 4], // rgba
    pub tilt_deg: f64,
}

/// Straight-line motion state used while gravity is off
#[derive(Debug, Clone, PartialEq)]
pub struct Drift {
    pub velocity: NVec3,
    pub position: NVec3,
    pub was_orbiting: bool,
}

impl Default for Drift {
    fn default() -> Self {
        Self {
            velocity: NVec3::zeros(),
            position: NVec3::zeros(),
            was_orbiting: true,
        }
    }
}

/// Bounded history of past world positions, oldest first
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<NVec3>,
    since_last: f64, // simulated seconds since the last sample
}

impl Trail {
    /// Accumulate `sim_dt`; push `position` once a full interval has passed
    pub fn advance(&mut self, sim_dt: f64, position: NVec3) {
        self.since_last += sim_dt;
        if self.since_last < TRAIL_INTERVAL {
            return;
        }
        self.since_last = 0.0;
        self.points.push_back(position);
        while self.points.len() > TRAIL_CAPACITY {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &NVec3> {
        self.points.iter()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.since_last = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub radius: f64,
    pub orbit_radius: f64,
    pub orbit_speed: f64,    // deg/s
    pub rotation_speed: f64, // deg/s
    pub ring: Option<Ring>,
    pub orbit_angle: f64,    // [0, 360)
    pub rotation_angle: f64, // [0, 360)
    pub world_position: NVec3,
    pub drift: Drift,
    pub trail: Trail,
}

impl Body {
    /// Create a body at `orbit_angle` degrees along its orbit
    pub fn new(
        name: impl Into<String>,
        radius: f64,
        orbit_radius: f64,
        orbit_speed: f64,
        rotation_speed: f64,
        orbit_angle: f64,
    ) -> Self {
        let mut body = Self {
            name: name.into(),
            radius,
            orbit_radius,
            orbit_speed,
            rotation_speed,
            ring: None,
            orbit_angle: normalize_degrees(orbit_angle),
            rotation_angle: 0.0,
            world_position: NVec3::zeros(),
            drift: Drift::default(),
            trail: Trail::default(),
        };
        body.world_position = body.orbit_position();
        body
    }

    /// Same as [`Body::new`] with a uniformly random starting angle
    pub fn with_random_angle(
        name: impl Into<String>,
        radius: f64,
        orbit_radius: f64,
        orbit_speed: f64,
        rotation_speed: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let angle = rng.gen_range(0.0..360.0);
        Self::new(name, radius, orbit_radius, orbit_speed, rotation_speed, angle)
    }

    pub fn with_ring(mut self, ring: Ring) -> Self {
        self.ring = Some(ring);
        self
    }

    /// Point on the orbit circle for the current `orbit_angle`
    pub fn orbit_position(&self) -> NVec3 {
        let a = self.orbit_angle.to_radians();
        NVec3::new(self.orbit_radius * a.cos(), 0.0, self.orbit_radius * a.sin())
    }

    /// Instantaneous orbital velocity, tangent to the circle
    pub fn tangential_velocity(&self) -> NVec3 {
        let a = self.orbit_angle.to_radians();
        let omega = self.orbit_speed.to_radians();
        let v = self.orbit_radius * omega;
        NVec3::new(-v * a.sin(), 0.0, v * a.cos())
    }

    pub fn is_drifting(&self) -> bool {
        !self.drift.was_orbiting
    }

    /// Advance one tick of `dt` real seconds; no-op while paused
    pub fn update(&mut self, dt: f64, state: &SimState) {
        if state.paused {
            return;
        }
        let sim_dt = dt * state.speed_multiplier;

        self.rotation_angle = normalize_degrees(self.rotation_angle + self.rotation_speed * sim_dt);

        if state.gravity_enabled {
            // resume from the frozen angle, dropping the drifted position
            self.drift.was_orbiting = true;
            self.orbit_angle = normalize_degrees(self.orbit_angle + self.orbit_speed * sim_dt);
            self.world_position = self.orbit_position();
        } else {
            if self.drift.was_orbiting {
                self.drift.velocity = self.tangential_velocity();
                self.drift.position = self.world_position;
                self.drift.was_orbiting = false;
            }
            self.drift.position += self.drift.velocity * sim_dt;
            self.world_position = self.drift.position;
        }

        self.trail.advance(sim_dt, self.world_position);
    }
}
