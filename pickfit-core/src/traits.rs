//! Core traits for pickfit
//!
//! The depth device, the fitting engine and the pixel-to-ray unprojection all
//! live outside this workspace. They are modeled here as traits so the picking,
//! fitting and camera logic can be driven by scripted stand-ins.

use crate::error::{FitError, Result};
use crate::fit::{FitRequest, RawFit};
use crate::point::Point3f;
use crate::point_cloud::PointCloudFrame;
use crate::ray::Ray;

/// External surface fitting engine
pub trait SurfaceFitOracle {
    /// Fit a primitive around `points[request.seed_index]`
    fn fit(&mut self, points: &[Point3f], request: &FitRequest) -> std::result::Result<RawFit, FitError>;

    /// Inlier flags of the last successful fit, aligned with the points it was given
    fn inlier_mask(&self) -> Vec<bool>;
}

/// Producer of per-frame point clouds
pub trait PointCloudSource {
    /// Block until the next frame is available.
    ///
    /// Points with zero or invalid depth are already dropped. A failure here is a
    /// device error and is not retried.
    fn next_frame(&mut self) -> Result<PointCloudFrame>;
}

/// Conversion from a window position to a ray in point cloud coordinates
pub trait Unproject {
    /// `x` and `y` are fractions of the window size, origin at the top-left
    fn unproject(&self, x: f32, y: f32) -> Result<Ray>;
}

/// Trait for objects with a spatial extent
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

impl Drawable for PointCloudFrame {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        let mut points = self.iter();
        let first = match points.next() {
            Some(p) => *p,
            None => return (Point3f::origin(), Point3f::origin()),
        };

        points.fold((first, first), |(min, max), p| (min.inf(p), max.sup(p)))
    }
}
