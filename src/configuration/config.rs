//! Configuration types for loading a solar system scenario from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – seed, texture resolution, tick rate
//! - [`SettingsConfig`]   – initial values of the Settings screen
//! - [`BodyConfig`]       – the Sun and each planet, in selection order
//! - [`AsteroidConfig`]   – generation ranges for the asteroid belt
//! - [`SpacecraftConfig`] – starting pose and speeds of the spacecraft
//! - [`TourStopConfig`]   – the guided tour itinerary
//! - [`ScenarioConfig`]   – top-level wrapper
//!
//! # YAML format
//! A minimal scenario:
//!
//! ```yaml
//! parameters:
//!   seed: 7                 # optional, omit for a different layout each run
//!   texture_size: 256
//!
//! sun:
//!   name: Sun
//!   radius: 3.0
//!   rotation_speed: 5.0
//!
//! planets:
//!   - name: Earth
//!     radius: 1.0
//!     orbit_radius: 12.0
//!     orbit_speed: 29.8       # deg/s
//!     rotation_speed: 150.0   # deg/s
//!
//! tour:
//!   - { name: Sun, kind: sun, duration: 6.0, distance: 8.0, narration: ["..."] }
//!   - { name: Earth, kind: planet, index: 0, duration: 6.0, distance: 5.0, narration: ["..."] }
//! ```
//!
//! Everything except `sun` has defaults. `Scenario::build_scenario` maps
//! this into the runtime types and validates it.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::simulation::camera::CameraMode;

fn default_texture_size() -> usize { 256 }
fn default_tick_rate() -> f64 { 60.0 }
fn default_true() -> bool { true }
fn default_speed() -> f64 { 1.0 }

/// Per-run numerical parameters
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    #[serde(default)]
    pub seed: Option<u64>, // fixed seed for reproducible layouts
    #[serde(default = "default_texture_size")]
    pub texture_size: usize, // texture edge length in pixels
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64, // fixed simulation tick rate
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            seed: None,
            texture_size: default_texture_size(),
            tick_rate_hz: default_tick_rate(),
        }
    }
}

/// Values the Settings screen starts with
#[derive(Deserialize, Debug, Clone)]
pub struct SettingsConfig {
    #[serde(default)]
    pub starting_camera: CameraMode,
    #[serde(default = "default_speed")]
    pub starting_speed: f64,
    #[serde(default = "default_true")]
    pub show_orbits: bool,
    #[serde(default = "default_true")]
    pub lighting: bool,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            starting_camera: CameraMode::Free,
            starting_speed: default_speed(),
            show_orbits: true,
            lighting: true,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RingConfig {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub color: [f32; 4], // rgba in [0, 1]
    #[serde(default)]
    pub tilt_deg: f64,
}

/// Reference facts shown in the HUD for a selected body
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BodyInfo {
    pub kind: String,
    pub diameter: String,
    #[serde(default)]
    pub mass: Option<String>,
    #[serde(default)]
    pub surface_temp: Option<String>,
    #[serde(default)]
    pub orbit_period: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
    #[serde(default)]
    pub facts: Vec<String>,
}

/// Initial description of one body; the Sun uses `orbit_radius: 0`
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub radius: f64,
    #[serde(default)]
    pub orbit_radius: f64,
    #[serde(default)]
    pub orbit_speed: f64, // deg/s
    #[serde(default)]
    pub rotation_speed: f64, // deg/s
    #[serde(default)]
    pub ring: Option<RingConfig>,
    #[serde(default)]
    pub info: Option<BodyInfo>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AsteroidConfig {
    pub count: usize,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub min_speed: f64, // deg/s
    pub max_speed: f64, // deg/s
    pub min_size: f64,
    pub max_size: f64,
    pub vertical_jitter: f64,
}

impl Default for AsteroidConfig {
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

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpacecraftConfig {
    pub position: [f64; 3],
    pub yaw: f64,   // degrees, 0 faces +Z
    pub pitch: f64, // degrees
    pub move_speed: f64,
    pub turn_speed: f64,
}

impl Default for SpacecraftConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 3.0, 55.0],
            yaw: 180.0,
            pitch: 0.0,
            move_speed: 10.0,
            turn_speed: 60.0,
        }
    }
}

/// What a tour stop points the camera at
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKindConfig {
    #[serde(rename = "sun")]
    Sun,
    #[serde(rename = "planet")]
    Planet,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TourStopConfig {
    pub name: String,
    pub kind: StopKindConfig,
    #[serde(default)]
    pub index: Option<usize>, // planet index, required for `kind: planet`
    pub duration: f64, // dwell seconds
    pub distance: f64, // camera distance from the target
    #[serde(default)]
    pub narration: Vec<String>,
}

/// Top-level scenario configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    pub sun: BodyConfig,
    #[serde(default)]
    pub planets: Vec<BodyConfig>,
    #[serde(default)]
    pub asteroids: AsteroidConfig,
    #[serde(default)]
    pub spacecraft: SpacecraftConfig,
    #[serde(default)]
    pub tour: Vec<TourStopConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid scenario YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open scenario {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader)
            .with_context(|| format!("invalid scenario YAML in {}", path.display()))
    }
}
