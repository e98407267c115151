pub mod states;
pub mod params;
pub mod noise;
pub mod texture;
pub mod body;
pub mod asteroids;
pub mod spacecraft;
pub mod camera;
pub mod tour;
pub mod input;
pub mod screen;
pub mod scenario;
