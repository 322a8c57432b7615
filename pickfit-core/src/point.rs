//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// An RGB byte triple
pub type Rgb = [u8; 3];

/// Returns some unit vector perpendicular to `v`.
///
/// `v` does not need to be normalized; a zero vector yields the x axis.
pub fn any_orthogonal(v: &Vector3f) -> Vector3f {
    // cross with the axis least aligned with v
    let abs = v.abs();
    let helper = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3f::x()
    } else if abs.y <= abs.z {
        Vector3f::y()
    } else {
        Vector3f::z()
    };
    v.cross(&helper)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3f::x)
}
