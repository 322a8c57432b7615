//! Ray picking against a point cloud frame

use pickfit_core::{PickError, Point3f, PointCloudFrame, Ray};

/// The point nearest to a pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Index of the point in the frame
    pub index: usize,
    /// Euclidean distance from the ray origin to the point
    pub depth: f32,
    /// Perpendicular distance from the point to the ray's line
    pub distance: f32,
}

/// Find the point of `frame` closest to the line of `ray`.
///
/// This is a linear scan; picking runs once per click, not per frame. On equal
/// distances the lowest index wins. Points at a non-finite distance never win;
/// a frame without any finite candidate is treated as empty.
pub fn pick(ray: &Ray, frame: &PointCloudFrame) -> Result<PickHit, PickError> {
    pick_points(ray, frame.points())
}

/// Same as [`pick`] over a plain slice of points
pub fn pick_points(ray: &Ray, points: &[Point3f]) -> Result<PickHit, PickError> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, point) in points.iter().enumerate() {
        let distance = ray.distance_to_point(point);
        if !distance.is_finite() {
            continue;
        }
        // strict comparison keeps the earliest index on ties
        let closer = match best {
            Some((_, min)) => distance < min,
            None => true,
        };
        if closer {
            best = Some((idx, distance));
        }
    }

    let (index, distance) = best.ok_or(PickError::EmptyCloud)?;
    Ok(PickHit {
        index,
        depth: nalgebra::distance(&points[index], &ray.origin),
        distance,
    })
}
