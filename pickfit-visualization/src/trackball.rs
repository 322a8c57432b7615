//! Drift-free trackball camera
//!
//! A gesture starts from a snapshot of the pose (`previous`) and every pointer
//! motion recomputes `current` from that snapshot and the total displacement
//! since the gesture began. Nothing accumulates between motion events, so
//! returning the pointer to where it started restores the starting pose exactly.

use crate::camera::CameraPose;
use nalgebra::{Rotation3, Unit, Vector2, Vector3};
use pickfit_core::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// What a pointer drag currently does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Behavior {
    #[default]
    Idle,
    Rotating,
    Panning,
    Zooming,
    Rolling,
}

/// Gains applied to pointer and keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackballSpeeds {
    /// Zoom step per wheel notch
    pub zoom: f32,
    /// Perspective pan gain
    pub pan: f32,
    /// Rotation gain, also used for roll
    pub rotate: f32,
    /// Fly speed, as a fraction of the home viewing distance per second
    pub translate: f32,
}

impl Default for TrackballSpeeds {
    fn default() -> Self {
        Self {
            zoom: 0.05,
            pan: 0.1,
            rotate: 0.75,
            translate: 0.5,
        }
    }
}

/// Fly directions in camera space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Currently held fly keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Movement {
    pub fn set(&mut self, direction: Direction, held: bool) {
        let flag = match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        };
        *flag = held;
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right || self.up || self.down
    }

    /// Unit-free movement in camera space: x right, y up, z forward
    fn axes(&self) -> Vector3f {
        let signed = |pos: bool, neg: bool| pos as i8 as f32 - neg as i8 as f32;
        Vector3::new(
            signed(self.right, self.left),
            signed(self.up, self.down),
            signed(self.forward, self.backward),
        )
    }
}

/// Map a window position to normalized trackball coordinates.
///
/// `x` and `y` are fractions of the window size with the origin at the top-left.
/// The result lies in `[-1, 1]` on both axes with y pointing up.
pub fn normalize_screen(x: f32, y: f32) -> Vector2<f32> {
    Vector2::new((2.0 * x - 1.0).clamp(-1.0, 1.0), (1.0 - 2.0 * y).clamp(-1.0, 1.0))
}

/// Trackball camera with a home pose, a gesture snapshot and the live pose
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    home: CameraPose,
    previous: CameraPose,
    current: CameraPose,
    behavior: Behavior,
    start: Vector2<f32>,
    speeds: TrackballSpeeds,
    movement: Movement,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraPose::default(), TrackballSpeeds::default())
    }
}

impl OrbitCamera {
    pub fn new(home: CameraPose, speeds: TrackballSpeeds) -> Self {
        Self {
            home,
            previous: home,
            current: home,
            behavior: Behavior::Idle,
            start: Vector2::zeros(),
            speeds,
            movement: Movement::default(),
        }
    }

    pub fn home(&self) -> &CameraPose {
        &self.home
    }

    pub fn previous(&self) -> &CameraPose {
        &self.previous
    }

    pub fn current(&self) -> &CameraPose {
        &self.current
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn speeds(&self) -> &TrackballSpeeds {
        &self.speeds
    }

    pub fn movement(&self) -> &Movement {
        &self.movement
    }

    /// Start a gesture at window position `(x, y)`
    pub fn begin(&mut self, x: f32, y: f32, behavior: Behavior) {
        self.previous = self.current;
        self.start = normalize_screen(x, y);
        self.behavior = behavior;
        debug!(?behavior, x, y, "camera gesture started");
    }

    /// Update the live pose for the pointer at `(x, y)`. No-op while idle.
    pub fn motion(&mut self, x: f32, y: f32) {
        if self.behavior == Behavior::Idle {
            return;
        }

        let delta = normalize_screen(x, y) - self.start;
        if delta.norm() < f32::EPSILON {
            self.current = self.previous;
            return;
        }

        self.current = match self.behavior {
            Behavior::Idle => self.previous,
            Behavior::Rotating => self.rotated(&delta),
            Behavior::Panning => self.panned(&delta),
            Behavior::Zooming => self.zoomed(&delta),
            Behavior::Rolling => self.rolled(&delta),
        };
    }

    /// Finish the gesture; the live pose is kept
    pub fn end(&mut self) {
        if self.behavior != Behavior::Idle {
            debug!(behavior = ?self.behavior, "camera gesture ended");
        }
        self.behavior = Behavior::Idle;
    }

    /// Return to the home pose, dropping any gesture in progress
    pub fn reset(&mut self) {
        self.previous = self.home;
        self.current = self.home;
        self.behavior = Behavior::Idle;
    }

    /// Replace the home pose and jump to it
    pub fn set_home(&mut self, home: CameraPose) {
        self.home = home;
        self.reset();
    }

    /// Make the sphere `(center, radius)` the new home view.
    ///
    /// Returns `false` and leaves the camera alone when the radius is not a
    /// positive finite number.
    pub fn frame(&mut self, center: Point3f, radius: f32) -> bool {
        match self.home.framing(center, radius) {
            Some(home) => {
                debug!(?center, radius, "framing camera");
                self.set_home(home);
                true
            }
            None => false,
        }
    }

    /// Zoom by wheel notches; positive zooms in.
    ///
    /// The gesture snapshot is scaled too, so a wheel turn during a drag is not
    /// undone by the next motion event.
    pub fn wheel(&mut self, notches: f32) {
        let factor = (1.0 + self.speeds.zoom).powf(notches);
        self.current.zoom_factor *= factor;
        self.previous.zoom_factor *= factor;
    }

    /// Hold or release a fly key
    pub fn set_movement(&mut self, direction: Direction, held: bool) {
        self.movement.set(direction, held);
    }

    /// Fly along the held directions for `elapsed` time. Only moves while idle.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.behavior != Behavior::Idle || !self.movement.any() {
            return;
        }

        let axes = self.movement.axes();
        let step = self.home.distance() * self.speeds.translate * elapsed.as_secs_f32();
        let (right, up, back) = self.current.basis();
        let offset = (right * axes.x + up * axes.y - back * axes.z) * step;

        self.current.eye += offset;
        self.current.at += offset;
        self.previous = self.current;
    }

    pub fn view_matrix(&self) -> nalgebra::Matrix4<f32> {
        self.current.view_matrix()
    }

    pub fn projection_matrix(&self) -> nalgebra::Matrix4<f32> {
        self.current.projection_matrix()
    }

    fn rotated(&self, delta: &Vector2<f32>) -> CameraPose {
        let prev = &self.previous;
        let d = delta * self.speeds.rotate;
        let z = (1.0 - d.norm_squared()).max(0.0).sqrt();
        let axis_view = Vector3f::z().cross(&Vector3::new(d.x, d.y, z));

        let (right, up, back) = prev.basis();
        let axis = right * axis_view.x + up * axis_view.y + back * axis_view.z;
        let axis = match Unit::try_new(axis, f32::EPSILON) {
            Some(axis) => axis,
            None => return *prev,
        };
        let angle = axis_view.norm().min(0.999).asin();
        let rotation = Rotation3::from_axis_angle(&axis, -angle);

        CameraPose {
            eye: prev.at + rotation * (prev.eye - prev.at),
            up: rotation * prev.up,
            ..*prev
        }
    }

    fn panned(&self, delta: &Vector2<f32>) -> CameraPose {
        let prev = &self.previous;
        let scale = if prev.is_perspective() {
            Vector2::repeat(prev.distance() / prev.zoom_factor * self.speeds.pan)
        } else {
            Vector2::new(prev.width, prev.height) * (0.5 / prev.zoom_factor)
        };
        let d = delta.component_mul(&scale);

        let (right, up, _) = prev.basis();
        let offset = right * d.x + up * d.y;
        CameraPose {
            eye: prev.eye - offset,
            at: prev.at - offset,
            ..*prev
        }
    }

    fn zoomed(&self, delta: &Vector2<f32>) -> CameraPose {
        let prev = &self.previous;
        CameraPose {
            zoom_factor: prev.zoom_factor * 2f32.powf(delta.x),
            ..*prev
        }
    }

    fn rolled(&self, delta: &Vector2<f32>) -> CameraPose {
        let prev = &self.previous;
        let angle = (delta.y * self.speeds.rotate * 100.0).to_radians();
        let (_, up, back) = prev.basis();
        let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(back), angle);
        CameraPose {
            up: rotation * up,
            ..*prev
        }
    }
}
