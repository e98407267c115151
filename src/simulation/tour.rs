//! Guided tour: a camera that flies between an ordered list of stops and
//! dwells at each one while its narration is shown.
//!
//! The sequencer alternates between two phases:
//! - `Transitioning`: the eye moves from `camera_start` to `camera_end`
//!   over `TOUR_TRANSITION_DURATION` seconds with smoothstep easing.
//! - `Dwelling`: the eye stays at the stop for the stop's `duration`.
//!
//! The look-at point is always the live position of the current stop, and
//! `camera_end` is refreshed from it every tick so the camera keeps pace
//! with a moving planet.

use crate::simulation::body::Body;
use crate::simulation::camera::CameraState;
use crate::simulation::params::TOUR_TRANSITION_DURATION;
use crate::simulation::states::NVec3;

/// Viewpoint the first flight starts from
pub const TOUR_HOME_EYE: [f64; 3] = [0.0, 40.0, 80.0];

/// Slack for accumulated float error when comparing elapsed time
const TIME_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopTarget {
    Sun,
    Planet(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TourStop {
    pub name: String,
    pub target: StopTarget,
    pub duration: f64, // dwell seconds
    pub distance: f64, // camera distance from the target
    pub narration: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourPhase {
    Transitioning,
    Dwelling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourStatus {
    Running,
    Finished,
}

/// Cubic ease t^2 (3 - 2t), flat at both ends
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: &NVec3, b: &NVec3, t: f64) -> NVec3 {
    a + (b - a) * t
}

#[derive(Debug, Clone)]
pub struct TourSequencer {
    stops: Vec<TourStop>,
    pub current_stop: usize,
    pub phase: TourPhase,
    pub stop_timer: f64,
    pub transition_progress: f64, // [0, 1]
    pub camera_start: NVec3,
    pub camera_end: NVec3,
}

impl TourSequencer {
    /// Begin at stop 0, flying in from the home viewpoint. Returns `None`
    /// when there is nothing to visit.
    pub fn start(stops: Vec<TourStop>, planets: &[Body]) -> Option<Self> {
        let first = stops.first()?;
        let camera_end = stop_eye(first, planets);
        Some(Self {
            stops,
            current_stop: 0,
            phase: TourPhase::Transitioning,
            stop_timer: 0.0,
            transition_progress: 0.0,
            camera_start: NVec3::from(TOUR_HOME_EYE),
            camera_end,
        })
    }

    pub fn stops(&self) -> &[TourStop] {
        &self.stops
    }

    pub fn current(&self) -> &TourStop {
        &self.stops[self.current_stop]
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase == TourPhase::Transitioning
    }

    /// Advance the sequencer by `dt` real seconds
    pub fn tick(&mut self, dt: f64, planets: &[Body]) -> TourStatus {
        self.camera_end = stop_eye(self.current(), planets);

        match self.phase {
            TourPhase::Transitioning => {
                self.transition_progress += dt / TOUR_TRANSITION_DURATION;
                if self.transition_progress >= 1.0 - TIME_EPSILON {
                    self.transition_progress = 1.0;
                    self.phase = TourPhase::Dwelling;
                    self.stop_timer = 0.0;
                }
                TourStatus::Running
            }
            TourPhase::Dwelling => {
                self.stop_timer += dt;
                if self.stop_timer + TIME_EPSILON >= self.current().duration {
                    self.advance(planets)
                } else {
                    TourStatus::Running
                }
            }
        }
    }

    /// Jump to the next stop now, whatever the phase
    pub fn skip(&mut self, planets: &[Body]) -> TourStatus {
        self.advance(planets)
    }

    fn advance(&mut self, planets: &[Body]) -> TourStatus {
        let next = self.current_stop + 1;
        if next >= self.stops.len() {
            return TourStatus::Finished;
        }
        self.camera_start = self.eye();
        self.current_stop = next;
        self.camera_end = stop_eye(self.current(), planets);
        self.phase = TourPhase::Transitioning;
        self.transition_progress = 0.0;
        self.stop_timer = 0.0;
        TourStatus::Running
    }

    /// Current eye position
    pub fn eye(&self) -> NVec3 {
        match self.phase {
            TourPhase::Transitioning => lerp(
                &self.camera_start,
                &self.camera_end,
                smoothstep(self.transition_progress),
            ),
            TourPhase::Dwelling => self.camera_end,
        }
    }

    pub fn camera(&self, planets: &[Body]) -> CameraState {
        CameraState {
            eye: self.eye(),
            center: stop_anchor(self.current(), planets),
            up: NVec3::y(),
        }
    }

    /// Narration for the stop being dwelt at, if any
    pub fn narration(&self) -> Option<&[String]> {
        match self.phase {
            TourPhase::Dwelling => Some(&self.current().narration),
            TourPhase::Transitioning => None,
        }
    }
}

/// World position the camera looks at for `stop`
pub fn stop_anchor(stop: &TourStop, planets: &[Body]) -> NVec3 {
    match stop.target {
        StopTarget::Sun => NVec3::zeros(),
        StopTarget::Planet(i) => planets
            .get(i)
            .map(|b| b.world_position)
            .unwrap_or_else(NVec3::zeros),
    }
}

/// Eye position for `stop`: on the sunward side of the target, raised a
/// little so the lit face is in view
pub fn stop_eye(stop: &TourStop, planets: &[Body]) -> NVec3 {
    let anchor = stop_anchor(stop, planets);
    let d = stop.distance;
    let lift = NVec3::new(0.0, 0.5 * d, 0.0);

    let r = anchor.norm();
    if r < 1e-9 {
        return anchor + lift + NVec3::new(0.0, 0.0, d);
    }
    let outward = anchor / r;
    anchor - outward * (0.85 * d) + lift
}
