pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{SimState, Selection, NVec3};
pub use simulation::body::{Body, Ring, normalize_degrees};
pub use simulation::asteroids::{AsteroidField, Asteroid, BeltShape};
pub use simulation::spacecraft::{Spacecraft, MoveKey};
pub use simulation::camera::{CameraMode, CameraState, compute_camera};
pub use simulation::tour::{TourSequencer, TourStop, TourPhase, TourStatus, StopTarget};
pub use simulation::noise::{scalar_noise, fractal_noise};
pub use simulation::texture::{synthesize, TextureTable};
pub use simulation::input::{InputEvent, Key, ScrollDirection, MenuDirection};
pub use simulation::screen::{Screen, Settings};
pub use simulation::scenario::{Scenario, RenderSnapshot};

pub use configuration::config::{ScenarioConfig, ParametersConfig, SettingsConfig, BodyConfig, TourStopConfig};

pub use visualization::solsim_vis3d::run_3d;

pub use benchmark::benchmark::{bench_textures, bench_tick};
