//! The interactive fit session
//!
//! One [`FitSession::step`] is one iteration of the viewer loop: apply the
//! queued input, wait for the next depth frame, run any pick gestures against
//! that frame, advance the fly camera and hand back what should be drawn.

use crate::camera::CameraPose;
use crate::controls::{InputEvent, KeyAction, PointerButton};
use crate::trackball::{OrbitCamera, TrackballSpeeds};
use nalgebra::Matrix4;
use pickfit_algorithms::{
    canonicalize_raw, estimate_tube_extent, pick, FitHeuristics, PickHit, Remap,
    DEFAULT_TORUS_TO_CYLINDER_RATIO,
};
use pickfit_core::{
    CanonicalFit, Error, FeatureType, InlierMask, PointCloudFrame, PointCloudSource, Primitive, Ray, Result,
    SurfaceFitOracle, Unproject,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What the primary pointer button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Primary presses pick a seed point and fit
    #[default]
    Pick,
    /// Primary drags orbit the camera
    Navigate,
}

impl InteractionMode {
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Pick => InteractionMode::Navigate,
            InteractionMode::Navigate => InteractionMode::Pick,
        }
    }
}

/// Session settings, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub heuristics: FitHeuristics,
    pub torus_to_cylinder_ratio: f32,
    pub trackball: TrackballSpeeds,
    /// Feature type requested until the user picks another one
    pub feature: FeatureType,
    pub mode: InteractionMode,
    /// Move the camera home to each new fit
    pub frame_on_fit: bool,
    pub home: CameraPose,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heuristics: FitHeuristics::default(),
            torus_to_cylinder_ratio: DEFAULT_TORUS_TO_CYLINDER_RATIO,
            trackball: TrackballSpeeds::default(),
            feature: FeatureType::default(),
            mode: InteractionMode::default(),
            frame_on_fit: true,
            home: CameraPose::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.torus_to_cylinder_ratio > 0.0) {
            return Err(Error::InvalidData(format!(
                "torus to cylinder ratio must be positive, got {}",
                self.torus_to_cylinder_ratio
            )));
        }
        self.home.validate()
    }
}

/// The most recent successful fit
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub fit: CanonicalFit,
    /// Feature type that was requested
    pub requested: FeatureType,
    /// Reinterpretation applied to the raw result, if any
    pub remap: Option<Remap>,
    pub hit: PickHit,
    /// Mask over the frame the fit was computed on
    pub inliers: InlierMask,
    /// The inlier points themselves, so they outlive that frame
    pub inlier_points: PointCloudFrame,
}

impl FitOutcome {
    /// Measurement line for display
    pub fn measurement(&self) -> String {
        self.fit.primitive.to_string()
    }
}

/// Everything needed to draw one iteration
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub view_matrix: Matrix4<f32>,
    pub projection_matrix: Matrix4<f32>,
    pub frame: &'a PointCloudFrame,
    pub outcome: Option<&'a FitOutcome>,
}

/// Picking, fitting and viewing state for one oracle
pub struct FitSession<O> {
    oracle: O,
    config: SessionConfig,
    camera: OrbitCamera,
    feature: FeatureType,
    mode: InteractionMode,
    frame: PointCloudFrame,
    outcome: Option<FitOutcome>,
    fitting_disabled: bool,
}

impl<O: SurfaceFitOracle> FitSession<O> {
    pub fn new(oracle: O, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            oracle,
            camera: OrbitCamera::new(config.home, config.trackball),
            feature: config.feature,
            mode: config.mode,
            frame: PointCloudFrame::default(),
            outcome: None,
            fitting_disabled: false,
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn feature(&self) -> FeatureType {
        self.feature
    }

    pub fn set_feature(&mut self, feature: FeatureType) {
        if feature != self.feature {
            info!(%feature, "feature type selected");
        }
        self.feature = feature;
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn frame(&self) -> &PointCloudFrame {
        &self.frame
    }

    /// Replace the current frame without polling a source
    pub fn set_frame(&mut self, frame: PointCloudFrame) {
        self.frame = frame;
    }

    pub fn outcome(&self) -> Option<&FitOutcome> {
        self.outcome.as_ref()
    }

    pub fn fitting_disabled(&self) -> bool {
        self.fitting_disabled
    }

    /// Run one loop iteration.
    ///
    /// Only device errors are returned; pick and fit failures are logged and
    /// leave the previous fit in place.
    pub fn step<S, U>(
        &mut self,
        source: &mut S,
        unproject: &U,
        events: &[InputEvent],
        elapsed: Duration,
    ) -> Result<FrameView<'_>>
    where
        S: PointCloudSource + ?Sized,
        U: Unproject + ?Sized,
    {
        let picks: Vec<(f32, f32)> = events.iter().filter_map(|event| self.handle_event(event)).collect();

        self.frame = source.next_frame()?;
        debug!(points = self.frame.len(), "frame acquired");

        for (x, y) in picks {
            let result = unproject
                .unproject(x, y)
                .and_then(|ray| self.pick_and_fit(&ray).map(|_| ()));
            if let Err(err) = result {
                if err.is_recoverable() {
                    debug!(%err, x, y, "pick produced no fit");
                } else {
                    warn!(%err, x, y, "pick failed");
                }
            }
        }

        self.camera.advance(elapsed);
        Ok(self.view())
    }

    /// What to draw right now
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            view_matrix: self.camera.view_matrix(),
            projection_matrix: self.camera.projection_matrix(),
            frame: &self.frame,
            outcome: self.outcome.as_ref(),
        }
    }

    /// Apply one input event; returns the position of a pick gesture, if any
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<(f32, f32)> {
        match *event {
            InputEvent::PointerPressed { x, y, button } => {
                if button == PointerButton::Primary && self.mode == InteractionMode::Pick {
                    return Some((x, y));
                }
                self.camera.begin(x, y, button.behavior());
            }
            InputEvent::PointerReleased { .. } => self.camera.end(),
            InputEvent::PointerMoved { x, y } => self.camera.motion(x, y),
            InputEvent::Wheel { notches } => self.camera.wheel(notches),
            InputEvent::Key { action, pressed } => match action {
                KeyAction::Move(direction) => self.camera.set_movement(direction, pressed),
                _ if !pressed => {}
                KeyAction::SelectFeature(feature) => self.set_feature(feature),
                KeyAction::ResetCamera => self.camera.reset(),
                KeyAction::ToggleMode => {
                    self.camera.end();
                    self.mode = self.mode.toggled();
                    info!(mode = ?self.mode, "interaction mode changed");
                }
            },
        }
        None
    }

    /// Pick the point nearest `ray` in the current frame and fit around it.
    ///
    /// On success the new fit replaces the previous one as a whole. On failure
    /// the previous fit is kept. Fatal oracle failures disable fitting for the
    /// rest of the session.
    pub fn pick_and_fit(&mut self, ray: &Ray) -> Result<&FitOutcome> {
        if self.fitting_disabled {
            return Err(Error::FittingDisabled);
        }

        let hit = pick(ray, &self.frame)?;
        let request = self.config.heuristics.request(self.feature, &hit);
        debug!(?request, distance = hit.distance, "fitting around picked point");

        let raw = match self.oracle.fit(self.frame.points(), &request) {
            Ok(raw) => raw,
            Err(err) => {
                if err.is_recoverable() {
                    warn!(%err, feature = %self.feature, "fit failed");
                } else {
                    error!(%err, "fitting oracle failed fatally, fitting disabled");
                    self.fitting_disabled = true;
                }
                return Err(err.into());
            }
        };

        let (mut fit, remap) = canonicalize_raw(&raw, self.config.torus_to_cylinder_ratio);
        let inliers = InlierMask::for_frame(self.oracle.inlier_mask(), &self.frame)?;
        let inlier_points = inliers.select(&self.frame);

        if let Primitive::Torus(torus) = fit.primitive {
            fit.primitive = Primitive::Torus(estimate_tube_extent(&torus, inlier_points.iter()));
        }
        if let Some(remap) = remap {
            debug!(?remap, "oracle result reinterpreted");
        }
        if self.config.frame_on_fit {
            let (center, radius) = fit.primitive.bounding_sphere();
            self.camera.frame(center, radius);
        }

        info!(rms = fit.rms, inliers = inliers.inlier_count(), "{}", fit.primitive);

        let outcome = FitOutcome {
            fit,
            requested: self.feature,
            remap,
            hit,
            inliers,
            inlier_points,
        };
        Ok(self.outcome.insert(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trackball::{Behavior, Direction};
    use pickfit_core::{FitError, FitRequest, Point3f, RawFit};

    struct NeverFits;

    impl SurfaceFitOracle for NeverFits {
        fn fit(&mut self, _: &[Point3f], _: &FitRequest) -> std::result::Result<RawFit, FitError> {
            Err(FitError::NotFound)
        }

        fn inlier_mask(&self) -> Vec<bool> {
            Vec::new()
        }
    }

    fn session() -> FitSession<NeverFits> {
        FitSession::new(NeverFits, SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SessionConfig {
            torus_to_cylinder_ratio: 0.0,
            ..SessionConfig::default()
        };
        assert!(matches!(FitSession::new(NeverFits, config), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_primary_press_picks_in_pick_mode() {
        let mut session = session();
        let press = InputEvent::PointerPressed {
            x: 0.4,
            y: 0.6,
            button: PointerButton::Primary,
        };
        assert_eq!(session.handle_event(&press), Some((0.4, 0.6)));
        assert_eq!(session.camera().behavior(), Behavior::Idle);

        session.handle_event(&InputEvent::Key {
            action: KeyAction::ToggleMode,
            pressed: true,
        });
        assert_eq!(session.mode(), InteractionMode::Navigate);
        assert_eq!(session.handle_event(&press), None);
        assert_eq!(session.camera().behavior(), Behavior::Rotating);
    }

    #[test]
    fn test_other_buttons_drive_camera_in_pick_mode() {
        let mut session = session();
        let press = InputEvent::PointerPressed {
            x: 0.5,
            y: 0.5,
            button: PointerButton::Secondary,
        };
        assert_eq!(session.handle_event(&press), None);
        assert_eq!(session.camera().behavior(), Behavior::Zooming);
        session.handle_event(&InputEvent::PointerMoved { x: 0.75, y: 0.5 });
        assert!(session.camera().current().zoom_factor > 1.0);
        session.handle_event(&InputEvent::PointerReleased {
            x: 0.75,
            y: 0.5,
            button: PointerButton::Secondary,
        });
        assert_eq!(session.camera().behavior(), Behavior::Idle);
    }

    #[test]
    fn test_key_releases_only_matter_for_movement() {
        let mut session = session();
        session.handle_event(&InputEvent::Key {
            action: KeyAction::SelectFeature(FeatureType::Cone),
            pressed: false,
        });
        assert_eq!(session.feature(), FeatureType::Plane);
        session.handle_event(&InputEvent::Key {
            action: KeyAction::SelectFeature(FeatureType::Cone),
            pressed: true,
        });
        assert_eq!(session.feature(), FeatureType::Cone);

        session.handle_event(&InputEvent::Key {
            action: KeyAction::Move(Direction::Up),
            pressed: true,
        });
        assert!(session.camera().movement().up);
        session.handle_event(&InputEvent::Key {
            action: KeyAction::Move(Direction::Up),
            pressed: false,
        });
        assert!(!session.camera().movement().any());
    }

    #[test]
    fn test_pick_on_empty_frame_is_recoverable() {
        let mut session = session();
        let ray = Ray::new(Point3f::origin(), pickfit_core::Vector3f::z()).unwrap();
        let err = session.pick_and_fit(&ray).unwrap_err();
        assert!(matches!(err, Error::Pick(_)));
        assert!(err.is_recoverable());
        assert!(session.outcome().is_none());
    }
}
