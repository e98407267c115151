//! Build a fully-initialized solar system scenario from configuration and
//! drive it tick by tick.
//!
//! `Scenario` is the single context object for one running simulation:
//! - settings and the screen machine (menu front end)
//! - `SimState` (clock, toggles, selection, camera mode)
//! - the Sun, the planets, the asteroid belt and the spacecraft
//! - the guided tour, while one runs
//! - the texture table synthesized at build time
//!
//! It is inserted into Bevy as a `Resource`; the viewer calls
//! [`Scenario::tick`] from its fixed schedule, forwards input through
//! [`Scenario::handle`] and draws from [`Scenario::snapshot`].

use std::collections::HashMap;

use anyhow::{bail, ensure, Result};
use bevy::log::{debug, info};
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::configuration::config::{BodyConfig, BodyInfo, ScenarioConfig, StopKindConfig};
use crate::simulation::asteroids::{AsteroidField, BeltShape};
use crate::simulation::body::{Body, Ring};
use crate::simulation::camera::{compute_camera, CameraMode, CameraState};
use crate::simulation::input::{command_for, move_key_for, Command, InputEvent, Key, MenuDirection, ScrollDirection};
use crate::simulation::params::{Parameters, TOUR_SPEED};
use crate::simulation::screen::{MenuAction, MenuItem, Screen, ScreenMachine, Settings, SettingsRow};
use crate::simulation::spacecraft::Spacecraft;
use crate::simulation::states::{NVec3, Selection, SimState};
use crate::simulation::texture::{TextureTable, ASTEROID_TEXTURE};
use crate::simulation::tour::{StopTarget, TourSequencer, TourStatus, TourStop};

/// Per-body data the renderer needs
#[derive(Debug, Clone)]
pub struct BodyView {
    pub name: String,
    pub position: NVec3,
    pub rotation_angle: f64,
    pub radius: f64,
    pub orbit_radius: f64,
    pub ring: Option<Ring>,
    pub trail: Vec<NVec3>,
    pub texture_key: String,
}

impl BodyView {
    fn of(body: &Body) -> Self {
        Self {
            name: body.name.clone(),
            position: body.world_position,
            rotation_angle: body.rotation_angle,
            radius: body.radius,
            orbit_radius: body.orbit_radius,
            ring: body.ring,
            trail: body.trail.points().copied().collect(),
            texture_key: body.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidView {
    pub position: NVec3,
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacecraftPose {
    pub position: NVec3,
    pub forward: NVec3,
    pub right: NVec3,
    pub yaw: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TourView {
    pub stop_name: String,
    pub stop_number: usize, // 1-based
    pub stop_count: usize,
    pub narration: Vec<String>,
}

/// Status text for the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub camera_label: &'static str,
    pub speed_multiplier: f64,
    pub paused: bool,
    pub gravity_enabled: bool,
    pub zoom_level: f64,
    pub selected_name: Option<String>,
    pub selected_info: Option<BodyInfo>,
    pub tour: Option<TourView>,
    pub menu: Vec<(String, bool)>, // label, highlighted
}

/// Everything the renderer draws for one frame
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub screen: Screen,
    pub camera: CameraState,
    pub sun: BodyView,
    pub bodies: Vec<BodyView>,
    pub asteroids: Vec<AsteroidView>,
    pub asteroid_texture_key: &'static str,
    pub spacecraft: Option<SpacecraftPose>,
    pub show_orbits: bool,
    pub lighting_enabled: bool,
    pub planets_hidden: bool,
    pub hud: Hud,
}

#[derive(Resource)]
pub struct Scenario {
    pub parameters: Parameters,
    pub settings: Settings,
    pub state: SimState,
    pub screen: ScreenMachine,
    pub sun: Body,
    pub planets: Vec<Body>,
    pub asteroids: AsteroidField,
    pub spacecraft: Spacecraft,
    pub tour_stops: Vec<TourStop>,
    pub tour: Option<TourSequencer>,
    pub camera: CameraState,
    pub textures: TextureTable,
    info: HashMap<String, BodyInfo>,
    spacecraft_start: Spacecraft,
    quit_requested: bool,
}

fn body_from_config(bc: &BodyConfig, rng: &mut StdRng) -> Body {
    let body = Body::with_random_angle(
        bc.name.clone(),
        bc.radius,
        bc.orbit_radius,
        bc.orbit_speed,
        bc.rotation_speed,
        rng,
    );
    match &bc.ring {
        Some(rc) => body.with_ring(Ring {
            inner_radius: rc.inner_radius,
            outer_radius: rc.outer_radius,
            color: rc.color,
            tilt_deg: rc.tilt_deg,
        }),
        None => body,
    }
}

fn validate(cfg: &ScenarioConfig) -> Result<()> {
    for bc in std::iter::once(&cfg.sun).chain(cfg.planets.iter()) {
        ensure!(bc.radius > 0.0, "body {:?} needs a positive radius", bc.name);
        ensure!(bc.orbit_radius >= 0.0, "body {:?} has a negative orbit radius", bc.name);
        if let Some(ring) = &bc.ring {
            ensure!(
                ring.inner_radius < ring.outer_radius,
                "ring of {:?}: inner radius must be below outer radius",
                bc.name
            );
        }
    }

    let a = &cfg.asteroids;
    ensure!(a.inner_radius <= a.outer_radius, "asteroid belt: inner radius exceeds outer radius");
    ensure!(a.min_speed <= a.max_speed, "asteroid belt: min speed exceeds max speed");
    ensure!(a.min_size <= a.max_size, "asteroid belt: min size exceeds max size");

    ensure!(cfg.parameters.tick_rate_hz > 0.0, "tick rate must be positive");

    for stop in &cfg.tour {
        ensure!(stop.duration >= 0.0, "tour stop {:?} has a negative duration", stop.name);
        if stop.kind == StopKindConfig::Planet {
            match stop.index {
                Some(i) if i < cfg.planets.len() => {}
                Some(i) => bail!("tour stop {:?} points at planet {i}, which does not exist", stop.name),
                None => bail!("tour stop {:?} is a planet stop without an index", stop.name),
            }
        }
    }
    Ok(())
}

impl Scenario {
    /// Map the YAML-facing config onto runtime state and synthesize every
    /// texture. Fails on invalid config or texture parameters.
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        validate(&cfg)?;

        let parameters = Parameters {
            seed: cfg.parameters.seed,
            texture_size: cfg.parameters.texture_size,
            tick_rate_hz: cfg.parameters.tick_rate_hz,
        };

        let mut rng = match parameters.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Sun sits at the origin; the random angle is irrelevant there
        let sun = body_from_config(&cfg.sun, &mut rng);
        let planets: Vec<Body> = cfg.planets.iter().map(|bc| body_from_config(bc, &mut rng)).collect();

        let a = &cfg.asteroids;
        let shape = BeltShape {
            count: a.count,
            inner_radius: a.inner_radius,
            outer_radius: a.outer_radius,
            min_speed: a.min_speed,
            max_speed: a.max_speed,
            min_size: a.min_size,
            max_size: a.max_size,
            vertical_jitter: a.vertical_jitter,
        };
        let asteroids = AsteroidField::generate(&shape, &mut rng);

        let s = &cfg.spacecraft;
        let spacecraft = Spacecraft {
            position: NVec3::from(s.position),
            yaw: s.yaw,
            pitch: s.pitch,
            move_speed: s.move_speed,
            turn_speed: s.turn_speed,
        };

        let tour_stops = cfg
            .tour
            .iter()
            .map(|tc| TourStop {
                name: tc.name.clone(),
                target: match (tc.kind, tc.index) {
                    (StopKindConfig::Planet, Some(i)) => StopTarget::Planet(i),
                    _ => StopTarget::Sun,
                },
                duration: tc.duration,
                distance: tc.distance,
                narration: tc.narration.clone(),
            })
            .collect();

        let settings = Settings {
            starting_camera: cfg.settings.starting_camera,
            starting_speed: cfg.settings.starting_speed.max(0.0),
            show_orbits: cfg.settings.show_orbits,
            lighting: cfg.settings.lighting,
        };

        let info = std::iter::once(&cfg.sun)
            .chain(cfg.planets.iter())
            .filter_map(|bc| bc.info.clone().map(|i| (bc.name.clone(), i)))
            .collect();

        let names = std::iter::once(sun.name.as_str())
            .chain(planets.iter().map(|b| b.name.as_str()))
            .chain(std::iter::once(ASTEROID_TEXTURE));
        let textures = TextureTable::build(names, parameters.texture_size)?;

        info!(
            "scenario built: {} planets, {} asteroids, {} tour stops, {} textures at {}px",
            planets.len(),
            asteroids.len(),
            cfg.tour.len(),
            textures.len(),
            textures.size()
        );

        let mut scenario = Self {
            parameters,
            settings,
            state: SimState::default(),
            screen: ScreenMachine::default(),
            sun,
            planets,
            asteroids,
            spacecraft_start: spacecraft.clone(),
            spacecraft,
            tour_stops,
            tour: None,
            camera: CameraState::default(),
            textures,
            info,
            quit_requested: false,
        };
        scenario.update_camera();
        Ok(scenario)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn current_screen(&self) -> Screen {
        self.screen.current()
    }

    pub fn body_info(&self, name: &str) -> Option<&BodyInfo> {
        self.info.get(name)
    }

    /// Position the Follow camera tracks; the Sun and no selection give none
    pub fn follow_target(&self) -> Option<NVec3> {
        self.state
            .selection
            .planet_index()
            .and_then(|i| self.planets.get(i))
            .map(|b| b.world_position)
    }

    // =========================================================================================
    // Tick
    // =========================================================================================

    /// One fixed tick of `dt` real seconds. Kinematics first, then the
    /// camera reads the updated positions. Menu screens do not tick.
    pub fn tick(&mut self, dt: f64) {
        if !self.current_screen().is_running() {
            return;
        }

        self.sun.update(dt, &self.state);
        for body in self.planets.iter_mut() {
            body.update(dt, &self.state);
        }
        self.asteroids.update(dt, &self.state);
        self.spacecraft.update(dt, &self.state);

        let mut finished = false;
        if let Some(tour) = self.tour.as_mut() {
            if !self.state.paused {
                finished = tour.tick(dt, &self.planets) == TourStatus::Finished;
            }
        }
        if finished {
            info!("tour finished");
            self.goto(Screen::Home);
        }

        self.update_camera();
    }

    fn update_camera(&mut self) {
        self.camera = match &self.tour {
            Some(tour) => tour.camera(&self.planets),
            None => compute_camera(
                self.state.camera_mode,
                self.state.zoom_level,
                self.follow_target(),
                &self.spacecraft,
            ),
        };
    }

    // =========================================================================================
    // Screens
    // =========================================================================================

    /// Switch screens, running the exit hook of the old screen and the
    /// enter hook of the new one
    pub fn goto(&mut self, to: Screen) {
        let Some(transition) = self.screen.goto(to) else {
            return;
        };
        info!("screen {:?} -> {:?}", transition.from, transition.to);
        self.on_exit(transition.from);
        self.on_enter(transition.to);
    }

    fn on_exit(&mut self, screen: Screen) {
        match screen {
            Screen::Tour => {
                self.tour = None;
                self.state.held_keys.clear();
            }
            Screen::Simulation => self.state.held_keys.clear(),
            _ => {}
        }
    }

    fn on_enter(&mut self, screen: Screen) {
        match screen {
            Screen::Simulation => {
                self.reset_run();
                self.update_camera();
            }
            Screen::Tour => {
                self.reset_run();
                self.start_tour();
            }
            _ => {}
        }
    }

    /// Fresh `SimState` seeded from the settings screen
    fn reset_run(&mut self) {
        self.state = SimState {
            speed_multiplier: self.settings.starting_speed,
            show_orbits: self.settings.show_orbits,
            lighting_enabled: self.settings.lighting,
            camera_mode: self.settings.starting_camera,
            ..SimState::default()
        };
        self.spacecraft = self.spacecraft_start.clone();
        for body in std::iter::once(&mut self.sun).chain(self.planets.iter_mut()) {
            body.trail.clear();
        }
    }

    fn start_tour(&mut self) {
        self.state.paused = false;
        self.state.speed_multiplier = TOUR_SPEED;
        self.state.show_orbits = true;
        self.state.camera_mode = CameraMode::Free;

        match TourSequencer::start(self.tour_stops.clone(), &self.planets) {
            Some(tour) => {
                info!("tour started with {} stops", tour.stops().len());
                self.tour = Some(tour);
                self.update_camera();
            }
            None => {
                info!("tour has no stops, returning home");
                self.goto(Screen::Home);
            }
        }
    }

    /// Advance the tour to its next stop right away
    pub fn skip_tour_stop(&mut self) {
        let Some(tour) = self.tour.as_mut() else {
            return;
        };
        match tour.skip(&self.planets) {
            TourStatus::Running => {
                debug!("tour skipped to stop {}", tour.current_stop);
                self.update_camera();
            }
            TourStatus::Finished => {
                info!("tour skipped past its last stop");
                self.goto(Screen::Home);
            }
        }
    }

    // =========================================================================================
    // Input
    // =========================================================================================

    pub fn handle(&mut self, event: InputEvent) {
        match self.current_screen() {
            Screen::Home | Screen::Settings | Screen::Tutorial => self.handle_menu(event),
            Screen::Simulation => self.handle_simulation(event),
            Screen::Tour => self.handle_tour(event),
        }
    }

    fn handle_menu(&mut self, event: InputEvent) {
        match event {
            InputEvent::MenuNavigate(dir) => self.screen.navigate(dir),
            InputEvent::KeyDown(Key::Up) => self.screen.navigate(MenuDirection::Up),
            InputEvent::KeyDown(Key::Down) => self.screen.navigate(MenuDirection::Down),
            InputEvent::MenuSelect | InputEvent::KeyDown(Key::Enter) => {
                match self.screen.select(&mut self.settings) {
                    MenuAction::Goto(screen) => self.goto(screen),
                    MenuAction::Quit => self.quit_requested = true,
                    MenuAction::None => {}
                }
            }
            InputEvent::KeyDown(Key::Escape) => self.goto(Screen::Home),
            _ => {}
        }
    }

    fn handle_tour(&mut self, event: InputEvent) {
        let InputEvent::KeyDown(key) = event else {
            return;
        };
        match command_for(key) {
            Some(Command::SkipStop) => self.skip_tour_stop(),
            Some(Command::TogglePause) => self.state.toggle_pause(),
            Some(Command::Back) => self.goto(Screen::Home),
            _ => {}
        }
    }

    fn handle_simulation(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                if let Some(mk) = move_key_for(key) {
                    if self.state.spacecraft_mode() {
                        self.state.held_keys.insert(mk);
                    }
                    return;
                }
                if let Some(cmd) = command_for(key) {
                    self.apply(cmd);
                }
            }
            InputEvent::KeyUp(key) => {
                if let Some(mk) = move_key_for(key) {
                    self.state.held_keys.remove(&mk);
                }
            }
            InputEvent::Scroll(ScrollDirection::Up) => self.state.zoom_in(),
            InputEvent::Scroll(ScrollDirection::Down) => self.state.zoom_out(),
            InputEvent::MenuNavigate(_) | InputEvent::MenuSelect => {}
        }
        self.update_camera();
    }

    /// Run one key command against the live simulation
    pub fn apply(&mut self, cmd: Command) {
        if cmd == Command::Back {
            self.goto(Screen::Home);
            return;
        }
        let planet_count = self.planets.len();
        let state = &mut self.state;
        match cmd {
            Command::TogglePause => state.toggle_pause(),
            Command::SpeedUp => state.increase_speed(),
            Command::SpeedDown => state.decrease_speed(),
            Command::FastForward => state.fast_forward(),
            Command::CycleCamera => {
                state.cycle_camera();
                info!("camera mode: {}", state.camera_mode.label());
            }
            Command::ToggleOrbits => state.show_orbits = !state.show_orbits,
            Command::ToggleLighting => state.lighting_enabled = !state.lighting_enabled,
            Command::ToggleGravity => {
                state.gravity_enabled = !state.gravity_enabled;
                info!("gravity {}", if state.gravity_enabled { "on" } else { "off" });
            }
            Command::ToggleHidePlanets => state.planets_hidden = !state.planets_hidden,
            Command::ToggleSpacecraft => {
                let on = !state.spacecraft_mode();
                state.set_spacecraft_mode(on);
                info!("camera mode: {}", state.camera_mode.label());
            }
            Command::SelectSun => state.selection = Selection::Sun,
            Command::SelectPlanet(n) => {
                let index = (n as usize).wrapping_sub(1);
                state.selection = Selection::planet(index, planet_count);
            }
            Command::ZoomIn => state.zoom_in(),
            Command::ZoomOut => state.zoom_out(),
            Command::SkipStop | Command::Back => {}
        }
    }

    // =========================================================================================
    // Render boundary
    // =========================================================================================

    fn menu_rows(&self) -> Vec<(String, bool)> {
        match self.current_screen() {
            Screen::Home => MenuItem::ALL
                .iter()
                .enumerate()
                .map(|(i, item)| (item.label().to_string(), i == self.screen.menu_selection))
                .collect(),
            Screen::Settings => SettingsRow::ALL
                .iter()
                .enumerate()
                .map(|(i, row)| (self.settings.row_label(*row), i == self.screen.settings_selection))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let selected_name = match self.state.selection {
            Selection::None => None,
            Selection::Sun => Some(self.sun.name.clone()),
            Selection::Planet(i) => self.planets.get(i).map(|b| b.name.clone()),
        };
        let selected_info = selected_name
            .as_deref()
            .and_then(|name| self.body_info(name))
            .cloned();

        let tour = self.tour.as_ref().map(|t| TourView {
            stop_name: t.current().name.clone(),
            stop_number: t.current_stop + 1,
            stop_count: t.stops().len(),
            narration: t.narration().map(<[String]>::to_vec).unwrap_or_default(),
        });

        let spacecraft = self.state.spacecraft_mode().then(|| SpacecraftPose {
            position: self.spacecraft.position,
            forward: self.spacecraft.forward(),
            right: self.spacecraft.right(),
            yaw: self.spacecraft.yaw,
            pitch: self.spacecraft.pitch,
        });

        RenderSnapshot {
            screen: self.current_screen(),
            camera: self.camera,
            sun: BodyView::of(&self.sun),
            bodies: self.planets.iter().map(BodyView::of).collect(),
            asteroids: self
                .asteroids
                .asteroids
                .iter()
                .map(|a| AsteroidView { position: a.position(), size: a.size })
                .collect(),
            asteroid_texture_key: ASTEROID_TEXTURE,
            spacecraft,
            show_orbits: self.state.show_orbits,
            lighting_enabled: self.state.lighting_enabled,
            planets_hidden: self.state.planets_hidden,
            hud: Hud {
                camera_label: if self.tour.is_some() { "Guided Tour" } else { self.state.camera_mode.label() },
                speed_multiplier: self.state.speed_multiplier,
                paused: self.state.paused,
                gravity_enabled: self.state.gravity_enabled,
                zoom_level: self.state.zoom_level,
                selected_name,
                selected_info,
                tour,
                menu: self.menu_rows(),
            },
        }
    }
}
