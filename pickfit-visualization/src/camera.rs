//! Camera poses for viewing point clouds and fitted shapes

use nalgebra::{Matrix4, Vector3};
use pickfit_core::{any_orthogonal, Error, Point3f, Result, Vector3f};
use serde::{Deserialize, Serialize};

/// A complete camera pose.
///
/// `fovy` of zero selects an orthographic projection whose frustum is
/// `width` x `height` at zoom 1. A positive `fovy` (radians) selects a
/// perspective projection. Larger `zoom_factor` means zoomed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    pub eye: Point3f,
    pub at: Point3f,
    pub up: Vector3f,
    pub width: f32,
    pub height: f32,
    pub fovy: f32,
    pub zoom_factor: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Point3f::new(0.0, 0.0, -1.0),
            at: Point3f::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            width: 1.0,
            height: 1.0,
            fovy: 0.0,
            zoom_factor: 1.0,
            near: 0.001,
            far: 20.0,
        }
    }
}

impl CameraPose {
    /// Check that the pose can produce finite view and projection matrices
    pub fn validate(&self) -> Result<()> {
        if nalgebra::distance(&self.eye, &self.at) < f32::EPSILON {
            return Err(Error::InvalidData("camera eye and target coincide".to_string()));
        }
        if self.up.norm() < f32::EPSILON {
            return Err(Error::InvalidData("camera up vector is zero".to_string()));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidData(format!(
                "viewport must be positive, got {} x {}",
                self.width, self.height
            )));
        }
        if !(self.zoom_factor > 0.0) {
            return Err(Error::InvalidData(format!("zoom factor must be positive, got {}", self.zoom_factor)));
        }
        if !(self.far > self.near) {
            return Err(Error::InvalidData(format!(
                "far plane {} must lie beyond near plane {}",
                self.far, self.near
            )));
        }
        Ok(())
    }

    pub fn is_perspective(&self) -> bool {
        self.fovy > f32::EPSILON
    }

    /// Distance from the eye to the target
    pub fn distance(&self) -> f32 {
        nalgebra::distance(&self.eye, &self.at)
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Orthonormal camera frame `(right, up, back)`.
    ///
    /// `back` points from the target to the eye. `up` is the pose's up vector
    /// made perpendicular to `back`.
    pub fn basis(&self) -> (Vector3f, Vector3f, Vector3f) {
        let back = (self.eye - self.at)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3f::z);
        let right = self
            .up
            .cross(&back)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| any_orthogonal(&back));
        (right, back.cross(&right), back)
    }

    /// Eye position with the zoom applied.
    ///
    /// Orthographic zoom scales the frustum, so the eye stays put. Perspective
    /// zoom dollies the eye toward the target.
    pub fn effective_eye(&self) -> Point3f {
        if self.is_perspective() && self.zoom_factor > 0.0 {
            self.at + (self.eye - self.at) / self.zoom_factor
        } else {
            self.eye
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.effective_eye(), &self.at, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        if self.is_perspective() {
            Matrix4::new_perspective(self.aspect_ratio(), self.fovy, self.near, self.far)
        } else {
            let half_width = 0.5 * self.width / self.zoom_factor;
            let half_height = 0.5 * self.height / self.zoom_factor;
            Matrix4::new_orthographic(
                -half_width,
                half_width,
                -half_height,
                half_height,
                self.near,
                self.far,
            )
        }
    }

    /// Pose looking at a sphere of `radius` around `center`.
    ///
    /// The eye sits in front of the sphere along -z with y pointing down, the
    /// depth camera convention. Returns `None` for a non-positive radius.
    pub fn framing(&self, center: Point3f, radius: f32) -> Option<CameraPose> {
        if !(radius > f32::EPSILON && radius.is_finite()) {
            return None;
        }
        Some(CameraPose {
            eye: center - Vector3::new(0.0, 0.0, radius * 1.1),
            at: center,
            up: Vector3::new(0.0, -1.0, 0.0),
            near: radius * 0.1,
            far: radius * 2.2,
            zoom_factor: self.height / (radius * 3.0),
            ..*self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn front_view() -> CameraPose {
        CameraPose {
            eye: Point3::new(0.0, 0.0, 5.0),
            width: 2.0,
            height: 2.0,
            ..CameraPose::default()
        }
    }

    #[test]
    fn test_default_pose_is_valid() {
        assert!(CameraPose::default().validate().is_ok());
        assert!(!CameraPose::default().is_perspective());
    }

    #[test]
    fn test_validate_rejects_degenerate_poses() {
        let base = front_view();
        let cases = [
            CameraPose { eye: base.at, ..base },
            CameraPose { up: Vector3f::zeros(), ..base },
            CameraPose { width: 0.0, ..base },
            CameraPose { zoom_factor: 0.0, ..base },
            CameraPose { near: 5.0, far: 1.0, ..base },
        ];
        for pose in cases {
            assert!(matches!(pose.validate(), Err(Error::InvalidData(_))), "{:?}", pose);
        }
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let pose = CameraPose {
            eye: Point3::new(1.0, 2.0, 3.0),
            up: Vector3::new(0.2, 1.0, 0.1),
            ..CameraPose::default()
        };
        let (right, up, back) = pose.basis();
        assert_relative_eq!(right.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(up.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(right.dot(&up), 0.0, epsilon = 1e-6);
        assert_relative_eq!(up.dot(&back), 0.0, epsilon = 1e-6);
        assert_relative_eq!(right.cross(&up), back, epsilon = 1e-6);
    }

    #[test]
    fn test_view_matrix_looks_down_negative_z() {
        let pose = front_view();
        let target = pose.view_matrix().transform_point(&pose.at);
        assert_relative_eq!(target, Point3::new(0.0, 0.0, -5.0), epsilon = 1e-6);
    }

    #[test]
    fn test_perspective_zoom_moves_eye_closer() {
        let pose = CameraPose {
            fovy: std::f32::consts::FRAC_PI_4,
            zoom_factor: 2.0,
            ..front_view()
        };
        assert_relative_eq!(pose.effective_eye(), Point3::new(0.0, 0.0, 2.5));
        let target = pose.view_matrix().transform_point(&pose.at);
        assert_relative_eq!(target.z, -2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_zoom_scales_frustum() {
        let pose = CameraPose {
            zoom_factor: 2.0,
            ..front_view()
        };
        let projection = pose.projection_matrix();
        // half width is 0.5, so x scales by 1 / 0.5
        assert_relative_eq!(projection[(0, 0)], 2.0, epsilon = 1e-6);
        assert_relative_eq!(projection[(1, 1)], 2.0, epsilon = 1e-6);
        assert_eq!(projection[(3, 2)], 0.0);
        assert_eq!(pose.effective_eye(), pose.eye);
    }

    #[test]
    fn test_perspective_projection() {
        let pose = CameraPose {
            fovy: std::f32::consts::FRAC_PI_2,
            ..front_view()
        };
        let projection = pose.projection_matrix();
        assert_relative_eq!(projection[(1, 1)], 1.0, epsilon = 1e-6);
        assert_relative_eq!(projection[(3, 2)], -1.0);
    }

    #[test]
    fn test_framing() {
        let pose = CameraPose {
            height: 3.0,
            ..CameraPose::default()
        };
        let framed = pose.framing(Point3::new(1.0, 2.0, 3.0), 2.0).unwrap();
        assert_eq!(framed.at, Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(framed.eye, Point3::new(1.0, 2.0, 0.8), epsilon = 1e-6);
        assert_eq!(framed.up, Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(framed.near, 0.2);
        assert_relative_eq!(framed.far, 4.4);
        assert_relative_eq!(framed.zoom_factor, 0.5);
        assert!(framed.validate().is_ok());

        assert!(pose.framing(Point3::origin(), 0.0).is_none());
        assert!(pose.framing(Point3::origin(), f32::NAN).is_none());
    }
}
