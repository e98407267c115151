use std::collections::HashMap;
use std::f32::consts::TAU;

use bevy::app::AppExit;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::simulation::input::{InputEvent, Key, ScrollDirection, KEY_BINDINGS};
use crate::simulation::scenario::{RenderSnapshot, Scenario};
use crate::simulation::screen::Screen;
use crate::simulation::states::NVec3;
use crate::simulation::texture::TextureTable;

/// Which simulated body an entity draws
#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum BodyTag {
    Sun,
    Planet(usize),
}

/// Ring annulus drawn around planet `.0`
#[derive(Component)]
struct RingOf(usize);

#[derive(Component)]
struct AsteroidIndex(usize);

#[derive(Component)]
struct SpacecraftModel;

#[derive(Component)]
struct MainCamera;

#[derive(Component)]
struct SunLight;

#[derive(Component)]
struct HudText;

/// Snapshot taken once per frame, read by every drawing system
#[derive(Resource)]
struct Frame(RenderSnapshot);

const ORBIT_SEGMENTS: usize = 128;
const SUN_LIGHT_INTENSITY: f32 = 2.0e8;
const LIT_AMBIENT: f32 = 60.0;
const UNLIT_AMBIENT: f32 = 2000.0;

fn v3(v: &NVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

/// Run the viewer until the user exits from the home menu or closes the
/// window
pub fn run_3d(scenario: Scenario) {
    println!(
        "run_3d: starting Bevy 3D viewer with {} planets and {} asteroids",
        scenario.planets.len(),
        scenario.asteroids.len()
    );

    let hz = scenario.parameters.tick_rate_hz;
    let frame = Frame(scenario.snapshot());

    App::new()
        .insert_resource(scenario)
        .insert_resource(frame)
        .insert_resource(Time::<Fixed>::from_hz(hz))
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(FixedUpdate, tick_system)
        .add_systems(
            Update,
            (
                input_system,
                take_snapshot,
                sync_bodies_3d,
                sync_camera_3d,
                sync_lighting,
                draw_lines_3d,
                sync_hud,
                quit_system,
            )
                .chain(),
        )
        .run();
}

/// RGB buffers from the texture table become RGBA images
fn upload_textures(table: &TextureTable, images: &mut Assets<Image>) -> HashMap<String, Handle<Image>> {
    let size = table.size() as u32;
    table
        .iter()
        .map(|(name, rgb)| {
            let rgba: Vec<u8> = rgb
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect();
            let image = Image::new(
                Extent3d { width: size, height: size, depth_or_array_layers: 1 },
                TextureDimension::D2,
                rgba,
                TextureFormat::Rgba8UnormSrgb,
                RenderAssetUsages::RENDER_WORLD,
            );
            (name.to_string(), images.add(image))
        })
        .collect()
}

fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    scenario: Res<Scenario>,
) {
    let snap = scenario.snapshot();
    let textures = upload_textures(&scenario.textures, &mut images);
    info!("uploaded {} textures", textures.len());

    let cam = snap.camera;
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(v3(&cam.eye)).looking_at(v3(&cam.center), v3(&cam.up)),
            ..Default::default()
        },
        MainCamera,
    ));

    // The Sun is the only light source
    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                intensity: SUN_LIGHT_INTENSITY,
                range: 500.0,
                shadows_enabled: false,
                ..Default::default()
            },
            transform: Transform::from_xyz(0.0, 0.0, 0.0),
            ..Default::default()
        },
        SunLight,
    ));

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Sphere::new(snap.sun.radius as f32).mesh().uv(48, 24)),
            material: materials.add(StandardMaterial {
                base_color_texture: textures.get(&snap.sun.texture_key).cloned(),
                unlit: true,
                ..Default::default()
            }),
            ..Default::default()
        },
        BodyTag::Sun,
    ));

    for (i, body) in snap.bodies.iter().enumerate() {
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(body.radius as f32).mesh().uv(32, 18)),
                material: materials.add(StandardMaterial {
                    base_color_texture: textures.get(&body.texture_key).cloned(),
                    perceptual_roughness: 0.9,
                    ..Default::default()
                }),
                transform: Transform::from_translation(v3(&body.position)),
                ..Default::default()
            },
            BodyTag::Planet(i),
        ));

        if let Some(ring) = body.ring {
            // a torus squashed flat reads as a ring disc
            let [r, g, b, a] = ring.color;
            commands.spawn((
                PbrBundle {
                    mesh: meshes.add(Torus::new(ring.inner_radius as f32, ring.outer_radius as f32)),
                    material: materials.add(StandardMaterial {
                        base_color: Color::srgba(r, g, b, a),
                        alpha_mode: AlphaMode::Blend,
                        double_sided: true,
                        cull_mode: None,
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                RingOf(i),
            ));
        }
    }

    let rock = meshes.add(Sphere::new(1.0).mesh().uv(8, 6));
    let rock_material = materials.add(StandardMaterial {
        base_color_texture: textures.get(snap.asteroid_texture_key).cloned(),
        perceptual_roughness: 1.0,
        ..Default::default()
    });
    for (i, a) in snap.asteroids.iter().enumerate() {
        commands.spawn((
            PbrBundle {
                mesh: rock.clone(),
                material: rock_material.clone(),
                transform: Transform::from_translation(v3(&a.position)).with_scale(Vec3::splat(a.size as f32)),
                ..Default::default()
            },
            AsteroidIndex(i),
        ));
    }

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::new(0.5, 0.3, 1.4)),
            material: materials.add(StandardMaterial {
                base_color: Color::srgb(0.85, 0.85, 0.9),
                metallic: 0.6,
                ..Default::default()
            }),
            visibility: Visibility::Hidden,
            ..Default::default()
        },
        SpacecraftModel,
    ));

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 16.0,
                color: Color::WHITE,
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..Default::default()
        }),
        HudText,
    ));
}

/// Fixed-rate simulation step
fn tick_system(time: Res<Time>, mut scenario: ResMut<Scenario>) {
    scenario.tick(time.delta_seconds_f64());
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Space => Key::Space,
        KeyCode::Equal | KeyCode::NumpadAdd => Key::Plus,
        KeyCode::Minus | KeyCode::NumpadSubtract => Key::Minus,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::Digit0 => Key::Digit(0),
        KeyCode::Digit1 => Key::Digit(1),
        KeyCode::Digit2 => Key::Digit(2),
        KeyCode::Digit3 => Key::Digit(3),
        KeyCode::Digit4 => Key::Digit(4),
        KeyCode::Digit5 => Key::Digit(5),
        KeyCode::Digit6 => Key::Digit(6),
        KeyCode::Digit7 => Key::Digit(7),
        KeyCode::Digit8 => Key::Digit(8),
        KeyCode::Digit9 => Key::Digit(9),
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    };
    Some(key)
}

fn input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut wheel: EventReader<MouseWheel>,
    mut scenario: ResMut<Scenario>,
) {
    for key in keys.get_just_pressed().filter_map(|c| map_key(*c)) {
        scenario.handle(InputEvent::KeyDown(key));
    }
    for key in keys.get_just_released().filter_map(|c| map_key(*c)) {
        scenario.handle(InputEvent::KeyUp(key));
    }
    for ev in wheel.read() {
        if ev.y > 0.0 {
            scenario.handle(InputEvent::Scroll(ScrollDirection::Up));
        } else if ev.y < 0.0 {
            scenario.handle(InputEvent::Scroll(ScrollDirection::Down));
        }
    }
}

fn take_snapshot(scenario: Res<Scenario>, mut frame: ResMut<Frame>) {
    frame.0 = scenario.snapshot();
}

fn sync_bodies_3d(
    frame: Res<Frame>,
    mut bodies: Query<(&BodyTag, &mut Transform, &mut Visibility), (Without<RingOf>, Without<AsteroidIndex>, Without<SpacecraftModel>)>,
    mut rings: Query<(&RingOf, &mut Transform, &mut Visibility), (Without<BodyTag>, Without<AsteroidIndex>, Without<SpacecraftModel>)>,
    mut asteroids: Query<(&AsteroidIndex, &mut Transform), (Without<BodyTag>, Without<RingOf>, Without<SpacecraftModel>)>,
    mut craft: Query<(&mut Transform, &mut Visibility), (With<SpacecraftModel>, Without<BodyTag>, Without<RingOf>, Without<AsteroidIndex>)>,
) {
    let snap = &frame.0;
    let planet_visibility = if snap.planets_hidden { Visibility::Hidden } else { Visibility::Visible };

    for (tag, mut transform, mut visibility) in &mut bodies {
        let view = match tag {
            BodyTag::Sun => Some(&snap.sun),
            BodyTag::Planet(i) => snap.bodies.get(*i),
        };
        let Some(view) = view else { continue };
        transform.translation = v3(&view.position);
        transform.rotation = Quat::from_rotation_y((view.rotation_angle as f32).to_radians());
        if *tag != BodyTag::Sun {
            *visibility = planet_visibility;
        }
    }

    for (RingOf(i), mut transform, mut visibility) in &mut rings {
        let Some(view) = snap.bodies.get(*i) else { continue };
        let Some(ring) = view.ring else { continue };
        transform.translation = v3(&view.position);
        transform.rotation = Quat::from_rotation_x((ring.tilt_deg as f32).to_radians());
        transform.scale = Vec3::new(1.0, 0.02, 1.0);
        *visibility = planet_visibility;
    }

    for (AsteroidIndex(i), mut transform) in &mut asteroids {
        if let Some(a) = snap.asteroids.get(*i) {
            transform.translation = v3(&a.position);
        }
    }

    for (mut transform, mut visibility) in &mut craft {
        match &snap.spacecraft {
            Some(pose) => {
                let position = v3(&pose.position);
                *transform = Transform::from_translation(position)
                    .looking_at(position + v3(&pose.forward), Vec3::Y);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

fn sync_camera_3d(frame: Res<Frame>, mut query: Query<&mut Transform, With<MainCamera>>) {
    let cam = frame.0.camera;
    for mut transform in &mut query {
        *transform = Transform::from_translation(v3(&cam.eye)).looking_at(v3(&cam.center), v3(&cam.up));
    }
}

fn sync_lighting(
    frame: Res<Frame>,
    mut ambient: ResMut<AmbientLight>,
    mut lights: Query<&mut PointLight, With<SunLight>>,
) {
    let lit = frame.0.lighting_enabled;
    ambient.brightness = if lit { LIT_AMBIENT } else { UNLIT_AMBIENT };
    for mut light in &mut lights {
        light.intensity = if lit { SUN_LIGHT_INTENSITY } else { 0.0 };
    }
}

fn orbit_circle(radius: f32) -> impl Iterator<Item = Vec3> {
    (0..=ORBIT_SEGMENTS).map(move |i| {
        let a = TAU * i as f32 / ORBIT_SEGMENTS as f32;
        Vec3::new(radius * a.cos(), 0.0, radius * a.sin())
    })
}

/// Orbit circles and fading trails
fn draw_lines_3d(frame: Res<Frame>, mut gizmos: Gizmos) {
    let snap = &frame.0;
    if snap.planets_hidden {
        return;
    }
    for body in &snap.bodies {
        if snap.show_orbits && body.orbit_radius > 0.0 {
            gizmos.linestrip(orbit_circle(body.orbit_radius as f32), Color::srgba(0.4, 0.4, 0.5, 0.35));
        }
        if body.trail.len() > 1 {
            gizmos.linestrip(body.trail.iter().map(v3), Color::srgba(0.9, 0.9, 1.0, 0.5));
        }
    }
}

fn hud_text(snap: &RenderSnapshot) -> String {
    let hud = &snap.hud;
    let mut lines: Vec<String> = Vec::new();

    match snap.screen {
        Screen::Home => {
            lines.push("SOLAR SYSTEM".to_string());
            lines.push(String::new());
            for (label, highlighted) in &hud.menu {
                lines.push(format!("{} {}", if *highlighted { ">" } else { " " }, label));
            }
        }
        Screen::Settings => {
            lines.push("SETTINGS".to_string());
            lines.push(String::new());
            for (label, highlighted) in &hud.menu {
                lines.push(format!("{} {}", if *highlighted { ">" } else { " " }, label));
            }
        }
        Screen::Tutorial => {
            lines.push("CONTROLS".to_string());
            lines.push(String::new());
            for (keys, what) in KEY_BINDINGS {
                lines.push(format!("{keys:>18}  {what}"));
            }
            lines.push(String::new());
            lines.push("Enter or Esc to go back".to_string());
        }
        Screen::Simulation | Screen::Tour => {
            lines.push(format!(
                "{} | speed {:.1}x{} | zoom {:.1} | gravity {}",
                hud.camera_label,
                hud.speed_multiplier,
                if hud.paused { " (paused)" } else { "" },
                hud.zoom_level,
                if hud.gravity_enabled { "on" } else { "off" },
            ));
            if let Some(tour) = &hud.tour {
                lines.push(format!("Stop {}/{}: {}", tour.stop_number, tour.stop_count, tour.stop_name));
                lines.extend(tour.narration.iter().cloned());
                lines.push("N: next stop  Esc: leave tour".to_string());
            }
            if let Some(name) = &hud.selected_name {
                lines.push(String::new());
                lines.push(name.clone());
                if let Some(info) = &hud.selected_info {
                    lines.push(format!("{} - diameter {}", info.kind, info.diameter));
                    for extra in [&info.mass, &info.surface_temp, &info.orbit_period, &info.distance]
                        .into_iter()
                        .flatten()
                    {
                        lines.push(extra.clone());
                    }
                    lines.extend(info.facts.iter().map(|f| format!("- {f}")));
                }
            }
        }
    }
    lines.join("\n")
}

fn sync_hud(frame: Res<Frame>, mut query: Query<&mut Text, With<HudText>>) {
    let text = hud_text(&frame.0);
    for mut t in &mut query {
        if let Some(section) = t.sections.first_mut() {
            section.value.clone_from(&text);
        }
    }
}

fn quit_system(scenario: Res<Scenario>, mut exit: EventWriter<AppExit>) {
    if scenario.quit_requested() {
        exit.send(AppExit::Success);
    }
}
