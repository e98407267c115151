use solsim::simulation::asteroids::{AsteroidField, BeltShape};
use solsim::simulation::body::{normalize_degrees, Body, Ring};
use solsim::simulation::camera::{compute_camera, wide_view, CameraMode};
use solsim::simulation::input::{InputEvent, Key, MenuDirection, ScrollDirection};
use solsim::simulation::noise::{fractal_noise, scalar_noise};
use solsim::simulation::params::{TRAIL_CAPACITY, TRAIL_INTERVAL, ZOOM_MAX, ZOOM_MIN};
use solsim::simulation::scenario::Scenario;
use solsim::simulation::screen::{MenuItem, Screen};
use solsim::simulation::spacecraft::{MoveKey, Spacecraft};
use solsim::simulation::states::{NVec3, Selection, SimState};
use solsim::simulation::texture::{registered_names, registered_shader, synthesize, TextureTable};
use solsim::simulation::tour::{smoothstep, StopTarget, TourPhase, TourSequencer, TourStop, TOUR_HOME_EYE};
use solsim::ScenarioConfig;

use rand::rngs::StdRng;
use rand::SeedableRng;

const SHIPPED_SCENARIO: &str = include_str!("../scenarios/solar_system.yaml");

/// Shipped scenario with a fixed seed and tiny textures
pub fn test_config() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::from_yaml_str(SHIPPED_SCENARIO).expect("shipped scenario parses");
    cfg.parameters.seed = Some(42);
    cfg.parameters.texture_size = 8;
    cfg
}

pub fn build(cfg: ScenarioConfig) -> Scenario {
    Scenario::build_scenario(cfg).expect("scenario builds")
}

/// Scenario already on the Simulation screen
pub fn running_scenario() -> Scenario {
    let mut s = build(test_config());
    s.goto(Screen::Simulation);
    s
}

/// Body at angle 0 with the numbers used throughout the body tests
pub fn test_body() -> Body {
    Body::new("Earth", 1.0, 10.0, 29.0, 150.0, 0.0)
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn close_vec(a: &NVec3, b: &NVec3) -> bool {
    (a - b).norm() < 1e-9
}

fn key(k: Key) -> InputEvent {
    InputEvent::KeyDown(k)
}

// ==================================================================================
// Noise tests
// ==================================================================================

#[test]
fn scalar_noise_is_bit_identical_across_calls() {
    for i in 0..200 {
        let x = i as f64 * 1.37 - 50.0;
        let y = i as f64 * -0.91 + 13.0;
        let a = scalar_noise(x, y, 42);
        let b = scalar_noise(x, y, 42);
        assert_eq!(a.to_bits(), b.to_bits(), "noise differs at ({x}, {y})");
    }
}

#[test]
fn scalar_noise_stays_in_unit_interval() {
    for ix in -40..40 {
        for iy in -40..40 {
            let n = scalar_noise(ix as f64 * 0.7, iy as f64 * 1.3, 7);
            assert!((0.0..1.0).contains(&n), "noise {n} out of [0, 1)");
        }
    }
}

#[test]
fn scalar_noise_depends_on_seed() {
    let differing = (0..100)
        .filter(|i| scalar_noise(*i as f64, 3.0, 1) != scalar_noise(*i as f64, 3.0, 2))
        .count();
    assert!(differing > 90, "seeds barely change the field: {differing}/100");
}

#[test]
fn fractal_noise_in_range_for_octaves_one_to_eight() {
    for octaves in 1..=8 {
        for persistence in [0.25, 0.5, 0.75, 0.95] {
            for i in 0..300 {
                let x = i as f64 * 0.173;
                let y = i as f64 * 0.291;
                let n = fractal_noise(x, y, octaves, persistence, 99);
                assert!(
                    (0.0..1.0).contains(&n),
                    "fractal {n} out of range (octaves {octaves}, persistence {persistence})"
                );
            }
        }
    }
}

#[test]
fn fractal_noise_single_octave_equals_scalar() {
    let a = fractal_noise(3.5, 8.25, 1, 0.5, 5);
    let b = scalar_noise(3.5, 8.25, 5);
    assert_eq!(a.to_bits(), b.to_bits());
    assert_eq!(fractal_noise(1.0, 1.0, 0, 0.5, 5), 0.0);
}

// ==================================================================================
// Texture tests
// ==================================================================================

#[test]
fn texture_has_expected_length_and_is_deterministic() {
    let a = synthesize("Jupiter", 32).unwrap();
    let b = synthesize("Jupiter", 32).unwrap();
    assert_eq!(a.len(), 32 * 32 * 3);
    assert_eq!(a, b);
}

#[test]
fn texture_rejects_invalid_sizes() {
    assert!(synthesize("Earth", 0).is_err());
    assert!(synthesize("Earth", 5).is_err());
    assert!(synthesize("Earth", 100_000).is_err());
}

#[test]
fn every_registered_body_has_a_shader() {
    let names: Vec<_> = registered_names().collect();
    for expected in ["Sun", "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune", "Asteroid"] {
        assert!(names.contains(&expected), "{expected} missing from registry");
        assert!(registered_shader(expected).is_some());
    }
    assert!(registered_shader("Pluto").is_none());
    // unknown names still synthesize with the fallback rule
    assert_eq!(synthesize("Pluto", 16).unwrap().len(), 16 * 16 * 3);
}

#[test]
fn earth_texture_has_land_and_ocean() {
    let px = synthesize("Earth", 64).unwrap();
    let mut ocean = 0;
    let mut land = 0;
    for p in px.chunks_exact(3) {
        let (r, g, b) = (p[0], p[1], p[2]);
        if b > r && b > g {
            ocean += 1;
        } else if g > b && g > r {
            land += 1;
        }
    }
    assert!(ocean > 0, "no ocean pixels");
    assert!(land > 0, "no land pixels");
}

#[test]
fn different_bodies_get_different_textures() {
    let mars = synthesize("Mars", 16).unwrap();
    let neptune = synthesize("Neptune", 16).unwrap();
    assert_ne!(mars, neptune);
}

#[test]
fn texture_table_caches_by_name() {
    let table = TextureTable::build(["Sun", "Earth", "Earth", "Asteroid"], 16).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.size(), 16);
    assert_eq!(table.get("Earth").unwrap(), synthesize("Earth", 16).unwrap().as_slice());
    assert!(table.get("Mars").is_none());
}

#[test]
fn texture_table_build_fails_on_bad_size() {
    assert!(TextureTable::build(["Sun"], 1).is_err());
}

// ==================================================================================
// Body tests
// ==================================================================================

#[test]
fn body_update_advances_angles_exactly() {
    let mut body = test_body();
    let state = SimState::default();

    body.update(1.0, &state);

    assert!(close(body.orbit_angle, 29.0), "orbit angle {}", body.orbit_angle);
    assert!(close(body.rotation_angle, 150.0), "rotation angle {}", body.rotation_angle);

    let a = 29.0_f64.to_radians();
    let expected = NVec3::new(10.0 * a.cos(), 0.0, 10.0 * a.sin());
    assert!(close_vec(&body.world_position, &expected));
}

#[test]
fn body_update_scales_with_speed_multiplier() {
    let mut body = test_body();
    let state = SimState { speed_multiplier: 2.0, ..SimState::default() };
    body.update(1.0, &state);
    assert!(close(body.orbit_angle, 58.0));
    assert!(close(body.rotation_angle, 300.0));
}

#[test]
fn angles_stay_normalized() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut bodies = vec![
        test_body(),
        Body::with_random_angle("Venus", 0.9, 9.0, 35.0, -6.0, &mut rng),
        Body::with_random_angle("Uranus", 1.4, 36.0, 6.8, -200.0, &mut rng),
        Body::new("Fast", 0.5, 3.0, 7_000.0, -9_999.0, 359.9),
    ];
    let mut state = SimState::default();

    for step in 0..2_000 {
        state.speed_multiplier = (step % 11) as f64 * 0.5;
        state.gravity_enabled = step % 300 < 200;
        let dt = [0.016, 0.5, 3.7, 0.0][step % 4];
        for b in bodies.iter_mut() {
            b.update(dt, &state);
            assert!((0.0..360.0).contains(&b.orbit_angle), "{} orbit {}", b.name, b.orbit_angle);
            assert!((0.0..360.0).contains(&b.rotation_angle), "{} rotation {}", b.name, b.rotation_angle);
        }
    }
}

#[test]
fn normalize_degrees_wraps_into_range() {
    assert!(close(normalize_degrees(370.0), 10.0));
    assert!(close(normalize_degrees(-10.0), 350.0));
    assert_eq!(normalize_degrees(360.0), 0.0);
    let tiny = normalize_degrees(-1e-18);
    assert!((0.0..360.0).contains(&tiny));
}

#[test]
fn paused_updates_change_nothing() {
    let mut body = test_body();
    let running = SimState::default();
    for _ in 0..10 {
        body.update(0.1, &running);
    }

    let paused = SimState { paused: true, ..SimState::default() };
    let before = body.clone();
    for _ in 0..500 {
        body.update(0.25, &paused);
    }
    assert_eq!(body.orbit_angle.to_bits(), before.orbit_angle.to_bits());
    assert_eq!(body.rotation_angle.to_bits(), before.rotation_angle.to_bits());
    assert_eq!(body.world_position, before.world_position);
    assert_eq!(body.trail.len(), before.trail.len());
}

#[test]
fn drift_moves_in_a_straight_line_along_the_tangent() {
    let mut body = test_body();
    let no_gravity = SimState { gravity_enabled: false, ..SimState::default() };

    let start = body.world_position;
    body.update(1.0, &no_gravity);
    let p1 = body.world_position;
    body.update(1.0, &no_gravity);
    let p2 = body.world_position;

    // at angle 0 the tangent is +Z, speed r * omega
    let speed = 10.0 * 29.0_f64.to_radians();
    assert!(close_vec(&(p1 - start), &NVec3::new(0.0, 0.0, speed)), "first step {:?}", p1 - start);
    assert!(close_vec(&(p2 - p1), &(p1 - start)), "drift is not uniform");
    assert!(body.is_drifting());
    // orbit angle freezes while drifting, rotation keeps going
    assert!(close(body.orbit_angle, 0.0));
    assert!(close(body.rotation_angle, 300.0));
}

#[test]
fn drift_is_scaled_by_speed_multiplier() {
    let mut body = test_body();
    let fast = SimState { gravity_enabled: false, speed_multiplier: 3.0, ..SimState::default() };
    let start = body.world_position;
    body.update(1.0, &fast);
    let speed = 10.0 * 29.0_f64.to_radians();
    assert!(close((body.world_position - start).norm(), 3.0 * speed));
}

#[test]
fn regaining_gravity_snaps_back_to_the_orbit() {
    let mut body = test_body();
    let mut state = SimState::default();
    body.update(1.0, &state); // angle 29

    state.gravity_enabled = false;
    for _ in 0..5 {
        body.update(1.0, &state);
    }
    assert!((body.world_position - body.orbit_position()).norm() > 1.0, "body did not leave the orbit");

    state.gravity_enabled = true;
    body.update(1.0, &state);
    assert!(!body.is_drifting());
    assert!(close(body.orbit_angle, 58.0));
    assert!(close_vec(&body.world_position, &body.orbit_position()));
    assert!(close(body.world_position.norm(), 10.0));
}

#[test]
fn sun_stays_at_origin_in_both_modes() {
    let mut sun = Body::new("Sun", 3.0, 0.0, 0.0, 5.0, 123.0);
    let mut state = SimState::default();
    sun.update(1.0, &state);
    state.gravity_enabled = false;
    sun.update(1.0, &state);
    assert!(close_vec(&sun.world_position, &NVec3::zeros()));
    assert!(close(sun.rotation_angle, 10.0));
}

#[test]
fn trail_is_bounded() {
    let mut body = test_body();
    let state = SimState::default();
    for _ in 0..1_000 {
        body.update(0.1, &state);
        assert!(body.trail.len() <= TRAIL_CAPACITY);
    }
    assert_eq!(body.trail.len(), TRAIL_CAPACITY);
}

#[test]
fn trail_samples_are_spaced_by_the_interval() {
    let mut body = test_body();
    let state = SimState::default();
    let dt = 0.01;
    let mut last_push: Option<usize> = None;

    for tick in 0..400 {
        let before = body.trail.len();
        body.update(dt, &state);
        if body.trail.len() > before {
            if let Some(prev) = last_push {
                let spacing = (tick - prev) as f64 * dt;
                assert!(spacing >= TRAIL_INTERVAL - 1e-9, "samples {spacing} s apart");
            }
            last_push = Some(tick);
        }
    }
    assert!(last_push.is_some(), "trail never sampled");
}

#[test]
fn ring_is_kept_on_the_body() {
    let ring = Ring { inner_radius: 2.4, outer_radius: 4.0, color: [0.8, 0.7, 0.6, 0.7], tilt_deg: 27.0 };
    let body = Body::new("Saturn", 1.9, 30.0, 9.7, 340.0, 0.0).with_ring(ring);
    assert_eq!(body.ring, Some(ring));
}

// ==================================================================================
// Asteroid tests
// ==================================================================================

#[test]
fn asteroid_population_respects_the_band() {
    let shape = BeltShape::default();
    let mut rng = StdRng::seed_from_u64(11);
    let field = AsteroidField::generate(&shape, &mut rng);

    assert_eq!(field.len(), 200);
    for a in &field.asteroids {
        assert!(a.orbit_radius >= shape.inner_radius && a.orbit_radius <= shape.outer_radius);
        assert!(a.orbit_speed >= 15.0 && a.orbit_speed <= 22.0);
        assert!((0.0..360.0).contains(&a.orbit_angle));
        assert!(a.vertical_offset.abs() <= shape.vertical_jitter);
    }
}

#[test]
fn asteroids_orbit_even_without_gravity() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut field = AsteroidField::generate(&BeltShape { count: 20, ..BeltShape::default() }, &mut rng);
    let before = field.clone();
    let state = SimState { gravity_enabled: false, ..SimState::default() };

    field.update(2.0, &state);

    for (a, b) in field.asteroids.iter().zip(before.asteroids.iter()) {
        let expected = normalize_degrees(b.orbit_angle + b.orbit_speed * 2.0);
        assert!(close(a.orbit_angle, expected));
        assert!(close(a.position().xz().norm(), a.orbit_radius));
    }
}

#[test]
fn asteroids_freeze_while_paused() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut field = AsteroidField::generate(&BeltShape::default(), &mut rng);
    let before = field.clone();
    field.update(1.0, &SimState { paused: true, ..SimState::default() });
    assert_eq!(field.asteroids, before.asteroids);
}

// ==================================================================================
// Spacecraft tests
// ==================================================================================

fn spacecraft_state(keys: &[MoveKey]) -> SimState {
    let mut state = SimState::default();
    state.set_spacecraft_mode(true);
    state.held_keys.extend(keys.iter().copied());
    state
}

#[test]
fn forward_vector_follows_yaw() {
    let mut craft = Spacecraft { yaw: 0.0, ..Spacecraft::default() };
    assert!(close_vec(&craft.forward(), &NVec3::new(0.0, 0.0, 1.0)));
    craft.yaw = 90.0;
    assert!(close_vec(&craft.forward(), &NVec3::new(1.0, 0.0, 0.0)));
    assert!(close_vec(&craft.right(), &NVec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn spacecraft_ignores_simulation_speed() {
    let mut craft = Spacecraft { position: NVec3::zeros(), yaw: 0.0, ..Spacecraft::default() };
    let mut state = spacecraft_state(&[MoveKey::Forward]);
    state.speed_multiplier = 5.0;

    craft.update(0.5, &state);

    assert!(close_vec(&craft.position, &NVec3::new(0.0, 0.0, 5.0)), "{:?}", craft.position);
}

#[test]
fn spacecraft_only_moves_in_spacecraft_mode() {
    let mut craft = Spacecraft::default();
    let start = craft.clone();
    let mut state = SimState::default();
    state.held_keys.insert(MoveKey::Forward);
    craft.update(1.0, &state);
    assert_eq!(craft, start);

    let mut paused = spacecraft_state(&[MoveKey::Forward]);
    paused.paused = true;
    craft.update(1.0, &paused);
    assert_eq!(craft, start);
}

#[test]
fn spacecraft_turns_and_climbs() {
    let mut craft = Spacecraft { position: NVec3::zeros(), yaw: 350.0, ..Spacecraft::default() };
    craft.update(0.5, &spacecraft_state(&[MoveKey::TurnLeft, MoveKey::Up]));
    assert!(close(craft.yaw, 20.0), "yaw {}", craft.yaw);
    assert!(close(craft.position.y, 5.0));

    craft.update(1.0, &spacecraft_state(&[MoveKey::TurnRight, MoveKey::Down]));
    assert!(close(craft.yaw, 320.0), "yaw {}", craft.yaw);
    assert!(close(craft.position.y, -5.0));
}

#[test]
fn chase_camera_sits_behind_and_above() {
    let craft = Spacecraft { position: NVec3::new(1.0, 2.0, 3.0), yaw: 0.0, ..Spacecraft::default() };
    let cam = craft.chase_camera();
    assert!(close_vec(&cam.eye, &NVec3::new(1.0, 4.0, -2.0)));
    assert!(close_vec(&cam.center, &NVec3::new(1.0, 2.0, 13.0)));
    assert!(close_vec(&cam.up, &NVec3::y()));
}

// ==================================================================================
// Camera tests
// ==================================================================================

#[test]
fn top_view_looks_straight_down() {
    let cam = CameraMode::Top.view(1.0, None);
    assert!((cam.eye.y - 70.0).abs() < 1e-6);
    assert!(cam.eye.z != 0.0, "look vector would be parallel to up");
    assert!(close_vec(&cam.up, &NVec3::new(0.0, 0.0, -1.0)));
    assert!(close_vec(&cam.center, &NVec3::zeros()));
}

#[test]
fn free_and_side_views_scale_with_zoom() {
    let free = CameraMode::Free.view(2.0, None);
    assert!(close_vec(&free.eye, &NVec3::new(0.0, 40.0, 90.0)));
    let side = CameraMode::Side.view(0.5, None);
    assert!(close_vec(&side.eye, &NVec3::new(35.0, 0.0, 0.0)));
    assert!(close_vec(&side.up, &NVec3::y()));
}

#[test]
fn follow_view_tracks_target_or_falls_back() {
    let target = NVec3::new(5.0, 0.0, -3.0);
    let cam = CameraMode::Follow.view(1.0, Some(target));
    assert!(close_vec(&cam.eye, &NVec3::new(17.0, 6.0, 9.0)));
    assert!(close_vec(&cam.center, &target));

    let fallback = CameraMode::Follow.view(1.0, None);
    assert_eq!(fallback, wide_view(1.0));
}

#[test]
fn spacecraft_mode_uses_the_chase_camera() {
    let craft = Spacecraft::default();
    let cam = compute_camera(CameraMode::Spacecraft, 1.0, None, &craft);
    assert_eq!(cam, craft.chase_camera());
}

#[test]
fn camera_modes_cycle_in_fixed_order() {
    let mut state = SimState::default();
    let mut seen = vec![state.camera_mode];
    for _ in 0..5 {
        state.cycle_camera();
        seen.push(state.camera_mode);
    }
    assert_eq!(
        seen,
        vec![CameraMode::Free, CameraMode::Top, CameraMode::Side, CameraMode::Follow, CameraMode::Spacecraft, CameraMode::Free]
    );
}

// ==================================================================================
// State tests
// ==================================================================================

#[test]
fn zoom_never_leaves_its_range() {
    let mut state = SimState::default();
    for _ in 0..100 {
        state.zoom_in();
        assert!(state.zoom_level >= ZOOM_MIN && state.zoom_level <= ZOOM_MAX);
    }
    assert!(close(state.zoom_level, ZOOM_MIN));
    for _ in 0..100 {
        state.zoom_out();
    }
    assert!(close(state.zoom_level, ZOOM_MAX));

    for delta in [1e12, -1e12, f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 0.05] {
        state.adjust_zoom(delta);
        assert!(state.zoom_level >= ZOOM_MIN && state.zoom_level <= ZOOM_MAX, "zoom {}", state.zoom_level);
    }
}

#[test]
fn speed_controls() {
    let mut state = SimState::default();
    state.increase_speed();
    state.increase_speed();
    assert!(close(state.speed_multiplier, 2.0));
    state.fast_forward();
    assert!(close(state.speed_multiplier, 5.0));
    state.fast_forward();
    assert!(close(state.speed_multiplier, 5.0), "fast-forward must snap, not multiply");
    for _ in 0..20 {
        state.decrease_speed();
    }
    assert_eq!(state.speed_multiplier, 0.0);
}

#[test]
fn out_of_range_selection_is_no_selection() {
    assert_eq!(Selection::planet(3, 8), Selection::Planet(3));
    assert_eq!(Selection::planet(8, 8), Selection::None);
    assert_eq!(Selection::planet(usize::MAX, 8), Selection::None);
}

// ==================================================================================
// Tour tests
// ==================================================================================

fn two_stop_tour() -> Vec<TourStop> {
    vec![
        TourStop { name: "Sun".into(), target: StopTarget::Sun, duration: 2.0, distance: 8.0, narration: vec!["hello".into()] },
        TourStop { name: "Earth".into(), target: StopTarget::Planet(0), duration: 2.0, distance: 5.0, narration: vec![] },
    ]
}

#[test]
fn smoothstep_is_flat_at_both_ends() {
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
    assert!(close(smoothstep(0.5), 0.5));
    let h = 1e-6;
    assert!(smoothstep(h) / h < 1e-4);
    assert!((1.0 - smoothstep(1.0 - h)) / h < 1e-4);
}

#[test]
fn tour_flies_from_home_then_dwells() {
    let planets = vec![test_body()];
    let mut tour = TourSequencer::start(two_stop_tour(), &planets).unwrap();

    assert_eq!(tour.phase, TourPhase::Transitioning);
    assert!(close_vec(&tour.eye(), &NVec3::from(TOUR_HOME_EYE)));
    assert!(tour.narration().is_none());

    for _ in 0..6 {
        tour.tick(0.5, &planets);
    }
    assert_eq!(tour.phase, TourPhase::Dwelling);
    assert_eq!(tour.transition_progress, 1.0);
    assert!(close_vec(&tour.eye(), &tour.camera_end));
    assert_eq!(tour.narration().unwrap(), ["hello".to_string()]);
}

#[test]
fn tour_camera_looks_at_live_planet() {
    let mut planets = vec![test_body()];
    let mut tour = TourSequencer::start(two_stop_tour(), &planets).unwrap();
    tour.skip(&planets);
    assert_eq!(tour.current_stop, 1);

    let state = SimState::default();
    for _ in 0..10 {
        planets[0].update(0.1, &state);
        tour.tick(0.1, &planets);
        let cam = tour.camera(&planets);
        assert!(close_vec(&cam.center, &planets[0].world_position));
    }
}

#[test]
fn empty_tour_does_not_start() {
    assert!(TourSequencer::start(Vec::new(), &[]).is_none());
}

#[test]
fn tour_reaches_second_stop_after_transition_and_dwell() {
    let mut s = build(test_config());
    s.goto(Screen::Tour);
    assert_eq!(s.tour.as_ref().unwrap().stops().len(), 9);

    // 3.0 s flight + 6.0 s dwell at the Sun
    for _ in 0..17 {
        s.tick(0.5);
    }
    let tour = s.tour.as_ref().unwrap();
    assert_eq!(tour.current_stop, 0);
    assert_eq!(tour.phase, TourPhase::Dwelling);

    s.tick(0.5);
    let tour = s.tour.as_ref().unwrap();
    assert_eq!(tour.current_stop, 1);
    assert_eq!(tour.phase, TourPhase::Transitioning);
    assert_eq!(tour.transition_progress, 0.0);
}

#[test]
fn tour_start_forces_playback_state() {
    let mut s = build(test_config());
    s.settings.starting_speed = 2.0;
    s.settings.show_orbits = false;
    s.goto(Screen::Tour);

    assert!(!s.state.paused);
    assert!(close(s.state.speed_multiplier, 0.5));
    assert!(s.state.show_orbits);
}

#[test]
fn nine_skips_end_the_tour() {
    let mut s = build(test_config());
    s.goto(Screen::Tour);

    for i in 0..8 {
        s.handle(key(Key::N));
        let tour = s.tour.as_ref().expect("tour still running");
        assert_eq!(tour.current_stop, i + 1);
        assert_eq!(tour.phase, TourPhase::Transitioning);
    }
    s.handle(key(Key::N));
    assert!(s.tour.is_none());
    assert_eq!(s.current_screen(), Screen::Home);
}

#[test]
fn tour_runs_out_naturally() {
    let mut s = build(test_config());
    s.goto(Screen::Tour);
    // 9 stops: 27 s of flights plus 49 s of dwell
    for _ in 0..200 {
        s.tick(0.5);
    }
    assert!(s.tour.is_none());
    assert_eq!(s.current_screen(), Screen::Home);
}

#[test]
fn tour_without_stops_returns_home() {
    let mut cfg = test_config();
    cfg.tour.clear();
    let mut s = build(cfg);
    s.goto(Screen::Tour);
    assert_eq!(s.current_screen(), Screen::Home);
    assert!(s.tour.is_none());
}

// ==================================================================================
// Screen and input tests
// ==================================================================================

#[test]
fn home_menu_wraps_and_exit_requests_quit() {
    let mut s = build(test_config());
    assert_eq!(s.current_screen(), Screen::Home);
    assert_eq!(s.screen.selected_item(), MenuItem::StartSimulation);

    s.handle(InputEvent::MenuNavigate(MenuDirection::Up));
    assert_eq!(s.screen.selected_item(), MenuItem::Exit);
    s.handle(InputEvent::MenuNavigate(MenuDirection::Down));
    assert_eq!(s.screen.selected_item(), MenuItem::StartSimulation);

    s.handle(key(Key::Up));
    s.handle(InputEvent::MenuSelect);
    assert!(s.quit_requested());
}

#[test]
fn settings_apply_when_a_run_starts() {
    let mut s = build(test_config());
    // Home -> Settings (4th item)
    for _ in 0..3 {
        s.handle(InputEvent::MenuNavigate(MenuDirection::Down));
    }
    s.handle(InputEvent::MenuSelect);
    assert_eq!(s.current_screen(), Screen::Settings);

    s.handle(InputEvent::MenuSelect); // camera Free -> Top
    s.handle(InputEvent::MenuNavigate(MenuDirection::Down));
    s.handle(InputEvent::MenuSelect); // speed 1.0 -> 2.0
    s.handle(InputEvent::MenuNavigate(MenuDirection::Down));
    s.handle(InputEvent::MenuSelect); // orbits off
    s.handle(InputEvent::MenuNavigate(MenuDirection::Down));
    s.handle(InputEvent::MenuSelect); // lighting off
    s.handle(InputEvent::MenuNavigate(MenuDirection::Down));
    s.handle(InputEvent::MenuSelect); // back
    assert_eq!(s.current_screen(), Screen::Home);

    s.screen.menu_selection = 0;
    s.handle(InputEvent::MenuSelect);
    assert_eq!(s.current_screen(), Screen::Simulation);
    assert_eq!(s.state.camera_mode, CameraMode::Top);
    assert!(close(s.state.speed_multiplier, 2.0));
    assert!(!s.state.show_orbits);
    assert!(!s.state.lighting_enabled);
    assert!((s.camera.eye.y - 70.0).abs() < 1e-6);
}

#[test]
fn tutorial_and_escape_return_home() {
    let mut s = build(test_config());
    s.goto(Screen::Tutorial);
    s.handle(key(Key::Escape));
    assert_eq!(s.current_screen(), Screen::Home);

    let mut s = running_scenario();
    s.handle(key(Key::Escape));
    assert_eq!(s.current_screen(), Screen::Home);
}

#[test]
fn menus_do_not_tick() {
    let mut s = build(test_config());
    let before = s.planets[2].world_position;
    s.tick(1.0);
    assert_eq!(s.planets[2].world_position, before);
}

#[test]
fn simulation_keys_toggle_state() {
    let mut s = running_scenario();

    s.handle(key(Key::Space));
    assert!(s.state.paused);
    s.handle(key(Key::Space));
    assert!(!s.state.paused);

    s.handle(key(Key::Plus));
    assert!(close(s.state.speed_multiplier, 1.5));
    s.handle(key(Key::Minus));
    s.handle(key(Key::Minus));
    assert!(close(s.state.speed_multiplier, 0.5));
    s.handle(key(Key::F));
    assert!(close(s.state.speed_multiplier, 5.0));

    s.handle(key(Key::O));
    assert!(!s.state.show_orbits);
    s.handle(key(Key::L));
    assert!(!s.state.lighting_enabled);
    s.handle(key(Key::G));
    assert!(!s.state.gravity_enabled);
    s.handle(key(Key::H));
    assert!(s.state.planets_hidden);
    s.handle(key(Key::C));
    assert_eq!(s.state.camera_mode, CameraMode::Top);
}

#[test]
fn number_keys_select_bodies() {
    let mut s = running_scenario();
    s.handle(key(Key::Digit(3)));
    assert_eq!(s.state.selection, Selection::Planet(2));
    assert_eq!(s.follow_target(), Some(s.planets[2].world_position));

    s.handle(key(Key::Digit(0)));
    assert_eq!(s.state.selection, Selection::Sun);
    assert_eq!(s.follow_target(), None);

    s.handle(key(Key::Digit(9)));
    assert_eq!(s.state.selection, Selection::None);
}

#[test]
fn follow_camera_tracks_selected_planet_each_tick() {
    let mut s = running_scenario();
    s.handle(key(Key::Digit(4)));
    s.state.camera_mode = CameraMode::Follow;
    for _ in 0..30 {
        s.tick(1.0 / 60.0);
        let target = s.planets[3].world_position;
        assert!(close_vec(&s.camera.center, &target));
        assert!(close_vec(&s.camera.eye, &(target + NVec3::new(12.0, 6.0, 12.0))));
    }
}

#[test]
fn spacecraft_toggle_and_held_keys() {
    let mut s = running_scenario();

    // movement keys are ignored outside spacecraft mode
    s.handle(key(Key::W));
    assert!(s.state.held_keys.is_empty());

    s.handle(key(Key::V));
    assert!(s.state.spacecraft_mode());
    assert_eq!(s.state.camera_mode, CameraMode::Spacecraft);

    s.handle(key(Key::W));
    s.handle(key(Key::A));
    assert!(s.state.held_keys.contains(&MoveKey::Forward));
    assert!(s.state.held_keys.contains(&MoveKey::TurnLeft));
    s.handle(InputEvent::KeyUp(Key::A));
    assert!(!s.state.held_keys.contains(&MoveKey::TurnLeft));

    let start = s.spacecraft.position;
    s.tick(0.5);
    assert!((s.spacecraft.position - start).norm() > 4.9);
    assert_eq!(s.camera, s.spacecraft.chase_camera());

    s.handle(key(Key::V));
    assert!(!s.state.spacecraft_mode());
    assert_eq!(s.state.camera_mode, CameraMode::Free);
    assert!(s.state.held_keys.is_empty());
}

#[test]
fn scroll_zooms_and_clamps() {
    let mut s = running_scenario();
    s.handle(InputEvent::Scroll(ScrollDirection::Up));
    assert!(close(s.state.zoom_level, 0.9));
    for _ in 0..100 {
        s.handle(InputEvent::Scroll(ScrollDirection::Down));
    }
    assert!(close(s.state.zoom_level, ZOOM_MAX));
}

#[test]
fn unbound_events_are_ignored() {
    let mut s = running_scenario();
    let before = s.state.clone();
    s.handle(InputEvent::KeyUp(Key::F));
    s.handle(InputEvent::MenuSelect);
    s.handle(InputEvent::MenuNavigate(MenuDirection::Up));
    s.handle(key(Key::Enter));
    assert_eq!(s.current_screen(), Screen::Simulation);
    assert_eq!(s.state.speed_multiplier, before.speed_multiplier);
    assert_eq!(s.state.camera_mode, before.camera_mode);
    assert_eq!(s.state.selection, before.selection);
}

// ==================================================================================
// Scenario and config tests
// ==================================================================================

#[test]
fn shipped_scenario_parses() {
    let cfg = ScenarioConfig::from_yaml_str(SHIPPED_SCENARIO).unwrap();
    assert_eq!(cfg.planets.len(), 8);
    assert_eq!(cfg.tour.len(), 9);
    assert_eq!(cfg.sun.orbit_radius, 0.0);
    assert!(cfg.planets[5].ring.is_some(), "Saturn has rings");
    assert_eq!(cfg.asteroids.count, 200);
}

#[test]
fn minimal_scenario_uses_defaults() {
    let cfg = ScenarioConfig::from_yaml_str("sun: { name: Sun, radius: 2.0 }\nparameters: { texture_size: 8 }\n").unwrap();
    assert_eq!(cfg.parameters.tick_rate_hz, 60.0);
    assert!(cfg.settings.show_orbits);
    let s = build(cfg);
    assert!(s.planets.is_empty());
    assert_eq!(s.asteroids.len(), 200);
    // Sun + asteroid texture
    assert_eq!(s.textures.len(), 2);
}

#[test]
fn invalid_config_is_rejected() {
    let mut bad_stop = test_config();
    bad_stop.tour[1].index = Some(42);
    assert!(Scenario::build_scenario(bad_stop).is_err());

    let mut bad_ring = test_config();
    if let Some(ring) = bad_ring.planets[5].ring.as_mut() {
        ring.inner_radius = 10.0;
    }
    assert!(Scenario::build_scenario(bad_ring).is_err());

    let mut bad_texture = test_config();
    bad_texture.parameters.texture_size = 0;
    assert!(Scenario::build_scenario(bad_texture).is_err());

    assert!(ScenarioConfig::from_yaml_str("planets: []").is_err(), "sun is required");
}

#[test]
fn same_seed_same_layout() {
    let a = build(test_config());
    let b = build(test_config());
    for (pa, pb) in a.planets.iter().zip(b.planets.iter()) {
        assert_eq!(pa.orbit_angle, pb.orbit_angle);
    }
    assert_eq!(a.asteroids.asteroids, b.asteroids.asteroids);
}

#[test]
fn texture_table_covers_every_body() {
    let s = build(test_config());
    let snap = s.snapshot();
    assert!(s.textures.get(&snap.sun.texture_key).is_some());
    for body in &snap.bodies {
        assert!(s.textures.get(&body.texture_key).is_some(), "no texture for {}", body.name);
    }
    assert!(s.textures.get(snap.asteroid_texture_key).is_some());
}

#[test]
fn snapshot_reports_selection_and_spacecraft() {
    let mut s = running_scenario();
    s.handle(key(Key::Digit(3)));
    for _ in 0..10 {
        s.tick(0.1);
    }

    let snap = s.snapshot();
    assert_eq!(snap.screen, Screen::Simulation);
    assert_eq!(snap.bodies.len(), 8);
    assert_eq!(snap.asteroids.len(), 200);
    assert!(snap.spacecraft.is_none());
    assert_eq!(snap.hud.selected_name.as_deref(), Some("Earth"));
    let info = snap.hud.selected_info.expect("Earth has reference info");
    assert_eq!(info.facts.len(), 3);
    assert!(!snap.bodies[2].trail.is_empty());

    s.handle(key(Key::V));
    assert!(s.snapshot().spacecraft.is_some());
}

#[test]
fn snapshot_lists_menu_rows() {
    let s = build(test_config());
    let snap = s.snapshot();
    assert_eq!(snap.hud.menu.len(), 5);
    assert_eq!(snap.hud.menu[0], ("Start Simulation".to_string(), true));
}

#[test]
fn ticking_keeps_every_invariant() {
    let mut s = running_scenario();
    s.handle(key(Key::F));
    for step in 0..600 {
        if step == 200 || step == 400 {
            s.handle(key(Key::G));
        }
        s.tick(1.0 / 60.0);
        for b in std::iter::once(&s.sun).chain(s.planets.iter()) {
            assert!((0.0..360.0).contains(&b.orbit_angle));
            assert!((0.0..360.0).contains(&b.rotation_angle));
            assert!(b.trail.len() <= TRAIL_CAPACITY);
        }
        for a in &s.asteroids.asteroids {
            assert!((0.0..360.0).contains(&a.orbit_angle));
        }
    }
}
