//! Free-flight spacecraft steered by held keys.
//!
//! Motion is in real seconds: the simulation speed multiplier does not
//! apply. Yaw 0 faces +Z; yaw increases toward +X.

use crate::simulation::body::normalize_degrees;
use crate::simulation::camera::CameraState;
use crate::simulation::states::{NVec3, SimState};

/// Held movement inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    TurnLeft,
    TurnRight,
    Up,
    Down,
}

/// Chase camera offsets behind and above the craft
const CHASE_BACK: f64 = 5.0;
const CHASE_UP: f64 = 2.0;
const CHASE_AHEAD: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Spacecraft {
    pub position: NVec3,
    pub yaw: f64,   // degrees, [0, 360)
    pub pitch: f64, // degrees
    pub move_speed: f64, // units/s
    pub turn_speed: f64, // deg/s
}

impl Default for Spacecraft {
    fn default() -> Self {
        Self {
            position: NVec3::new(0.0, 3.0, 55.0),
            yaw: 180.0,
            pitch: 0.0,
            move_speed: 10.0,
            turn_speed: 60.0,
        }
    }
}

impl Spacecraft {
    pub fn forward(&self) -> NVec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        NVec3::new(yaw.sin() * pitch.cos(), pitch.sin(), yaw.cos() * pitch.cos())
    }

    pub fn right(&self) -> NVec3 {
        let yaw = (self.yaw + 90.0).to_radians();
        NVec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Apply every held key for `dt` real seconds. Only runs in spacecraft
    /// mode and while unpaused.
    pub fn update(&mut self, dt: f64, state: &SimState) {
        if !state.spacecraft_mode() || state.paused {
            return;
        }
        let step = self.move_speed * dt;
        let turn = self.turn_speed * dt;
        let forward = self.forward();

        for key in state.held_keys.iter() {
            match key {
                MoveKey::Forward => self.position += forward * step,
                MoveKey::Back => self.position -= forward * step,
                MoveKey::TurnLeft => self.yaw += turn,
                MoveKey::TurnRight => self.yaw -= turn,
                MoveKey::Up => self.position.y += step,
                MoveKey::Down => self.position.y -= step,
            }
        }
        self.yaw = normalize_degrees(self.yaw);
    }

    /// Chase view: behind and slightly above, looking ahead of the nose
    pub fn chase_camera(&self) -> CameraState {
        let forward = self.forward();
        let mut eye = self.position - forward * CHASE_BACK;
        eye.y += CHASE_UP;
        CameraState {
            eye,
            center: self.position + forward * CHASE_AHEAD,
            up: NVec3::y(),
        }
    }
}
