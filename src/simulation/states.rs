//! Core state types for the simulation
//!
//! `SimState` is the clock and toggle block that every tick reads:
//! - time scale (`speed_multiplier`) and `paused`
//! - display toggles (orbits, lighting, hidden planets)
//! - `gravity_enabled`, which switches bodies between orbit and drift
//! - camera mode, zoom and the current `Selection`
//! - the set of held spacecraft movement keys
//!
//! Vectors are nalgebra `Vector3<f64>`.

use std::collections::HashSet;

use nalgebra::Vector3;

use crate::simulation::camera::CameraMode;
use crate::simulation::params::{FAST_FORWARD_SPEED, SPEED_STEP, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::simulation::spacecraft::MoveKey;

pub type NVec3 = Vector3<f64>;

/// What the user has selected; Sun and a planet are mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Sun,
    Planet(usize),
}

impl Selection {
    /// Planet selection from an index, anything outside `0..planet_count`
    /// becomes `None`
    pub fn planet(index: usize, planet_count: usize) -> Self {
        if index < planet_count {
            Selection::Planet(index)
        } else {
            Selection::None
        }
    }

    pub fn planet_index(&self) -> Option<usize> {
        match self {
            Selection::Planet(i) => Some(*i),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimState {
    pub speed_multiplier: f64, // >= 0
    pub paused: bool,
    pub show_orbits: bool,
    pub camera_mode: CameraMode,
    pub selection: Selection,
    pub lighting_enabled: bool,
    pub gravity_enabled: bool,
    pub planets_hidden: bool,
    pub zoom_level: f64, // [ZOOM_MIN, ZOOM_MAX]
    pub held_keys: HashSet<MoveKey>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            paused: false,
            show_orbits: true,
            camera_mode: CameraMode::Free,
            selection: Selection::None,
            lighting_enabled: true,
            gravity_enabled: true,
            planets_hidden: false,
            zoom_level: 1.0,
            held_keys: HashSet::new(),
        }
    }
}

impl SimState {
    /// Spacecraft mode is on exactly when the camera rides the spacecraft
    pub fn spacecraft_mode(&self) -> bool {
        self.camera_mode == CameraMode::Spacecraft
    }

    pub fn set_spacecraft_mode(&mut self, on: bool) {
        self.camera_mode = if on { CameraMode::Spacecraft } else { CameraMode::Free };
        if !on {
            self.held_keys.clear();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn increase_speed(&mut self) {
        self.speed_multiplier += SPEED_STEP;
    }

    /// Step the multiplier down, never below zero
    pub fn decrease_speed(&mut self) {
        self.speed_multiplier = (self.speed_multiplier - SPEED_STEP).max(0.0);
    }

    /// Snap to the fast-forward rate, regardless of the current multiplier
    pub fn fast_forward(&mut self) {
        self.speed_multiplier = FAST_FORWARD_SPEED;
    }

    pub fn adjust_zoom(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.zoom_level = (self.zoom_level + delta).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.adjust_zoom(-ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.adjust_zoom(ZOOM_STEP);
    }

    /// Advance the camera mode; the spacecraft mode flag follows the camera
    pub fn cycle_camera(&mut self) {
        let next = self.camera_mode.next();
        self.set_spacecraft_mode(next == CameraMode::Spacecraft);
        self.camera_mode = next;
    }

    /// Seconds of simulated time that pass in `dt` real seconds
    pub fn scaled(&self, dt: f64) -> f64 {
        if self.paused {
            0.0
        } else {
            dt * self.speed_multiplier
        }
    }
}
