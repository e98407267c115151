//! Discrete input events and the key map.
//!
//! The viewer translates its native key codes into [`Key`] and feeds
//! [`InputEvent`]s to `Scenario::handle`. Keys with no binding are ignored.

use crate::simulation::spacecraft::MoveKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Plus,
    Minus,
    F,
    C,
    O,
    L,
    G,
    H,
    V,
    N,
    W,
    S,
    A,
    D,
    Q,
    E,
    Digit(u8),
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Scroll(ScrollDirection),
    MenuNavigate(MenuDirection),
    MenuSelect,
}

/// One-shot actions triggered by a key press during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    SpeedUp,
    SpeedDown,
    FastForward,
    CycleCamera,
    ToggleOrbits,
    ToggleLighting,
    ToggleGravity,
    ToggleHidePlanets,
    ToggleSpacecraft,
    SelectSun,
    /// 1-based planet number as pressed
    SelectPlanet(u8),
    ZoomIn,
    ZoomOut,
    SkipStop,
    Back,
}

pub fn command_for(key: Key) -> Option<Command> {
    let cmd = match key {
        Key::Space => Command::TogglePause,
        Key::Plus => Command::SpeedUp,
        Key::Minus => Command::SpeedDown,
        Key::F => Command::FastForward,
        Key::C => Command::CycleCamera,
        Key::O => Command::ToggleOrbits,
        Key::L => Command::ToggleLighting,
        Key::G => Command::ToggleGravity,
        Key::H => Command::ToggleHidePlanets,
        Key::V => Command::ToggleSpacecraft,
        Key::N => Command::SkipStop,
        Key::Digit(0) => Command::SelectSun,
        Key::Digit(n) => Command::SelectPlanet(n),
        Key::Up => Command::ZoomIn,
        Key::Down => Command::ZoomOut,
        Key::Escape => Command::Back,
        _ => return None,
    };
    Some(cmd)
}

pub fn move_key_for(key: Key) -> Option<MoveKey> {
    match key {
        Key::W => Some(MoveKey::Forward),
        Key::S => Some(MoveKey::Back),
        Key::A => Some(MoveKey::TurnLeft),
        Key::D => Some(MoveKey::TurnRight),
        Key::Q => Some(MoveKey::Up),
        Key::E => Some(MoveKey::Down),
        _ => None,
    }
}

/// Key legend shown on the tutorial screen
pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("Space", "Pause / resume"),
    ("+ / -", "Speed up / slow down by 0.5x"),
    ("F", "Fast-forward (5x)"),
    ("C", "Cycle camera mode"),
    ("O", "Show / hide orbit lines"),
    ("L", "Toggle lighting"),
    ("G", "Toggle gravity (drift when off)"),
    ("H", "Hide / show planets"),
    ("1-8", "Select planet"),
    ("0", "Select the Sun"),
    ("V", "Spacecraft mode"),
    ("W / S", "Spacecraft forward / back"),
    ("A / D", "Spacecraft turn left / right"),
    ("Q / E", "Spacecraft up / down"),
    ("Scroll, Up / Down", "Zoom"),
    ("N", "Next tour stop"),
    ("Esc", "Back to menu"),
];
