//! Screen machine for the menu front end.
//!
//! Screens change only through [`ScreenMachine::goto`], which reports the
//! exited and entered screen so the owner can run its enter/exit hooks.

use crate::simulation::camera::CameraMode;
use crate::simulation::input::MenuDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Home,
    Tutorial,
    Settings,
    Simulation,
    Tour,
}

impl Screen {
    /// Screens where the solar system is live
    pub fn is_running(self) -> bool {
        matches!(self, Screen::Simulation | Screen::Tour)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    StartSimulation,
    GuidedTour,
    Tutorial,
    Settings,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::StartSimulation,
        MenuItem::GuidedTour,
        MenuItem::Tutorial,
        MenuItem::Settings,
        MenuItem::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::StartSimulation => "Start Simulation",
            MenuItem::GuidedTour => "Guided Tour",
            MenuItem::Tutorial => "Tutorial",
            MenuItem::Settings => "Settings",
            MenuItem::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    StartingCamera,
    StartingSpeed,
    ShowOrbits,
    Lighting,
    Back,
}

impl SettingsRow {
    pub const ALL: [SettingsRow; 5] = [
        SettingsRow::StartingCamera,
        SettingsRow::StartingSpeed,
        SettingsRow::ShowOrbits,
        SettingsRow::Lighting,
        SettingsRow::Back,
    ];
}

/// Speeds offered by the settings screen, cycled in order
pub const SPEED_CHOICES: [f64; 4] = [0.5, 1.0, 2.0, 5.0];

/// Initial values applied to the simulation state when a run starts
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub starting_camera: CameraMode,
    pub starting_speed: f64,
    pub show_orbits: bool,
    pub lighting: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_camera: CameraMode::Free,
            starting_speed: 1.0,
            show_orbits: true,
            lighting: true,
        }
    }
}

impl Settings {
    pub fn row_label(&self, row: SettingsRow) -> String {
        let on_off = |b: bool| if b { "On" } else { "Off" };
        match row {
            SettingsRow::StartingCamera => format!("Starting camera: {}", self.starting_camera.label()),
            SettingsRow::StartingSpeed => format!("Starting speed: {:.1}x", self.starting_speed),
            SettingsRow::ShowOrbits => format!("Show orbits: {}", on_off(self.show_orbits)),
            SettingsRow::Lighting => format!("Lighting: {}", on_off(self.lighting)),
            SettingsRow::Back => "Back".to_string(),
        }
    }

    fn next_speed(&self) -> f64 {
        let pos = SPEED_CHOICES
            .iter()
            .position(|s| (s - self.starting_speed).abs() < 1e-9);
        match pos {
            Some(i) => SPEED_CHOICES[(i + 1) % SPEED_CHOICES.len()],
            None => SPEED_CHOICES[0],
        }
    }
}

/// What a menu selection asks the owner to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Goto(Screen),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Screen,
    pub to: Screen,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenMachine {
    current: Screen,
    pub menu_selection: usize,
    pub settings_selection: usize,
}

fn step(index: usize, len: usize, dir: MenuDirection) -> usize {
    match dir {
        MenuDirection::Up => (index + len - 1) % len,
        MenuDirection::Down => (index + 1) % len,
    }
}

impl ScreenMachine {
    pub fn current(&self) -> Screen {
        self.current
    }

    /// Switch screens; `None` when already on `to`
    pub fn goto(&mut self, to: Screen) -> Option<Transition> {
        if self.current == to {
            return None;
        }
        let from = self.current;
        self.current = to;
        if to == Screen::Settings {
            self.settings_selection = 0;
        }
        Some(Transition { from, to })
    }

    /// Move the highlight on the current menu, wrapping at both ends
    pub fn navigate(&mut self, dir: MenuDirection) {
        match self.current {
            Screen::Home => {
                self.menu_selection = step(self.menu_selection, MenuItem::ALL.len(), dir);
            }
            Screen::Settings => {
                self.settings_selection =
                    step(self.settings_selection, SettingsRow::ALL.len(), dir);
            }
            _ => {}
        }
    }

    pub fn selected_item(&self) -> MenuItem {
        MenuItem::ALL[self.menu_selection % MenuItem::ALL.len()]
    }

    pub fn selected_row(&self) -> SettingsRow {
        SettingsRow::ALL[self.settings_selection % SettingsRow::ALL.len()]
    }

    /// Activate the highlighted entry; settings rows edit `settings` in place
    pub fn select(&mut self, settings: &mut Settings) -> MenuAction {
        match self.current {
            Screen::Home => match self.selected_item() {
                MenuItem::StartSimulation => MenuAction::Goto(Screen::Simulation),
                MenuItem::GuidedTour => MenuAction::Goto(Screen::Tour),
                MenuItem::Tutorial => MenuAction::Goto(Screen::Tutorial),
                MenuItem::Settings => MenuAction::Goto(Screen::Settings),
                MenuItem::Exit => MenuAction::Quit,
            },
            Screen::Settings => {
                match self.selected_row() {
                    SettingsRow::StartingCamera => {
                        settings.starting_camera = settings.starting_camera.next();
                    }
                    SettingsRow::StartingSpeed => settings.starting_speed = settings.next_speed(),
                    SettingsRow::ShowOrbits => settings.show_orbits = !settings.show_orbits,
                    SettingsRow::Lighting => settings.lighting = !settings.lighting,
                    SettingsRow::Back => return MenuAction::Goto(Screen::Home),
                }
                MenuAction::None
            }
            Screen::Tutorial => MenuAction::Goto(Screen::Home),
            Screen::Simulation | Screen::Tour => MenuAction::None,
        }
    }
}
