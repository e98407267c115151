//! Camera modes and the view each one produces.

use serde::Deserialize;

use crate::simulation::spacecraft::Spacecraft;
use crate::simulation::states::NVec3;

/// Forward offset of the top-down eye so the look vector is never parallel
/// to `up`
const TOP_EPSILON: f64 = 0.1;

/// Look-at triple handed to the view-matrix setter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub eye: NVec3,
    pub center: NVec3,
    pub up: NVec3,
}

impl Default for CameraState {
    fn default() -> Self {
        CameraMode::Free.view(1.0, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    #[default]
    Free,
    Top,
    Side,
    Follow,
    Spacecraft,
}

impl CameraMode {
    pub const ALL: [CameraMode; 5] = [
        CameraMode::Free,
        CameraMode::Top,
        CameraMode::Side,
        CameraMode::Follow,
        CameraMode::Spacecraft,
    ];

    pub fn next(self) -> Self {
        match self {
            CameraMode::Free => CameraMode::Top,
            CameraMode::Top => CameraMode::Side,
            CameraMode::Side => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Spacecraft,
            CameraMode::Spacecraft => CameraMode::Free,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Free => "Free View",
            CameraMode::Top => "Top Down",
            CameraMode::Side => "Side View",
            CameraMode::Follow => "Planet Follow",
            CameraMode::Spacecraft => "Spacecraft",
        }
    }

    /// View for every mode except `Spacecraft`, which is computed from the
    /// craft's pose (see [`compute_camera`]); here it falls back to the wide
    /// view.
    pub fn view(self, zoom: f64, target: Option<NVec3>) -> CameraState {
        match self {
            CameraMode::Free => CameraState {
                eye: NVec3::new(0.0, 20.0 * zoom, 45.0 * zoom),
                center: NVec3::zeros(),
                up: NVec3::y(),
            },
            CameraMode::Top => CameraState {
                eye: NVec3::new(0.0, 70.0 * zoom, TOP_EPSILON),
                center: NVec3::zeros(),
                up: NVec3::new(0.0, 0.0, -1.0),
            },
            CameraMode::Side => CameraState {
                eye: NVec3::new(70.0 * zoom, 0.0, 0.0),
                center: NVec3::zeros(),
                up: NVec3::y(),
            },
            CameraMode::Follow => match target {
                Some(t) => CameraState {
                    eye: t + NVec3::new(12.0 * zoom, 6.0 * zoom, 12.0 * zoom),
                    center: t,
                    up: NVec3::y(),
                },
                None => wide_view(zoom),
            },
            CameraMode::Spacecraft => wide_view(zoom),
        }
    }
}

/// Default overview used when Follow has nothing to follow
pub fn wide_view(zoom: f64) -> CameraState {
    CameraState {
        eye: NVec3::new(0.0, 30.0 * zoom, 60.0 * zoom),
        center: NVec3::zeros(),
        up: NVec3::y(),
    }
}

/// Camera for the current mode; the spacecraft mode rides the craft
pub fn compute_camera(
    mode: CameraMode,
    zoom: f64,
    target: Option<NVec3>,
    spacecraft: &Spacecraft,
) -> CameraState {
    match mode {
        CameraMode::Spacecraft => spacecraft.chase_camera(),
        other => other.view(zoom, target),
    }
}
