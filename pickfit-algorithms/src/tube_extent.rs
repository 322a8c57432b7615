//! Angular extent of a partial torus (an elbow)
//!
//! Raw torus results only describe the full ring. The part that is actually
//! covered by data is recovered from the inlier points: each inlier is projected
//! onto the plane through the center perpendicular to the axis, and the spread
//! of those directions around their mean gives the swept angle.

use nalgebra::{Rotation3, Unit};
use pickfit_core::{Point3f, Torus, Vector3f};
use std::f32::consts::PI;

/// Refine `torus` with the tube extent covered by `inliers`.
///
/// Returns the torus unchanged when the inliers give no usable direction (no
/// inliers, all on the axis, or directions that cancel out).
pub fn estimate_tube_extent<'a, I>(torus: &Torus, inliers: I) -> Torus
where
    I: IntoIterator<Item = &'a Point3f>,
{
    let axis = torus.axis;
    let directions: Vec<Vector3f> = inliers
        .into_iter()
        .filter_map(|p| axis.cross(&(p - torus.center)).cross(&axis).try_normalize(f32::EPSILON))
        .collect();

    if directions.is_empty() {
        return *torus;
    }

    let sum = directions.iter().fold(Vector3f::zeros(), |acc, d| acc + d);
    let middle = match sum.try_normalize(f32::EPSILON) {
        Some(m) => m,
        None => return *torus,
    };

    let (min_angle, max_angle) = directions
        .iter()
        .map(|d| signed_angle(&middle, d, &axis))
        .fold((f32::MAX, f32::MIN), |(lo, hi), a| (lo.min(a), hi.max(a)));

    // the tube sweeps +/- half angle around `middle`, so re-center on the span
    let center_angle = (max_angle + min_angle) * 0.5;
    let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis), center_angle);

    Torus {
        tube_begin: rotation * middle,
        tube_half_angle: ((max_angle - min_angle) * 0.5).clamp(0.0, PI),
        ..*torus
    }
}

/// Angle from `from` to `to` measured counter-clockwise about `axis`
fn signed_angle(from: &Vector3f, to: &Vector3f, axis: &Vector3f) -> f32 {
    axis.dot(&from.cross(to)).atan2(from.dot(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    fn elbow() -> Torus {
        Torus::full_ring(Point3f::origin(), Vector3f::z(), 1.0, 0.1)
    }

    /// Points on the tube surface between two angles around the z axis
    fn arc_points(from: f32, to: f32, count: usize) -> Vec<Point3f> {
        (0..count)
            .map(|i| {
                let t = from + (to - from) * i as f32 / (count - 1) as f32;
                let lift = if i % 2 == 0 { 0.05 } else { -0.05 };
                Point3f::new(t.cos(), t.sin(), lift)
            })
            .collect()
    }

    #[test]
    fn test_quarter_elbow() {
        let points = arc_points(0.0, FRAC_PI_2, 31);
        let torus = estimate_tube_extent(&elbow(), &points);

        assert_relative_eq!(torus.tube_half_angle, FRAC_PI_4, epsilon = 1e-4);
        let mid = FRAC_PI_4.cos();
        assert_relative_eq!(torus.tube_begin, Vector3f::new(mid, mid, 0.0), epsilon = 1e-4);
        assert_relative_eq!(torus.tube_begin.dot(&torus.axis), 0.0, epsilon = 1e-6);
        // shape parameters are untouched
        assert_eq!(torus.center, Point3f::origin());
        assert_eq!(torus.mean_radius, 1.0);
        assert_eq!(torus.tube_radius, 0.1);
    }

    #[test]
    fn test_sweep_around_begin_covers_arc() {
        let points = arc_points(0.0, FRAC_PI_2, 31);
        let torus = estimate_tube_extent(&elbow(), &points);

        let axis = Unit::new_normalize(torus.axis);
        let lo = Rotation3::from_axis_angle(&axis, -torus.tube_half_angle) * torus.tube_begin;
        let hi = Rotation3::from_axis_angle(&axis, torus.tube_half_angle) * torus.tube_begin;
        assert_relative_eq!(lo, Vector3f::x(), epsilon = 1e-4);
        assert_relative_eq!(hi, Vector3f::y(), epsilon = 1e-4);
    }

    #[test]
    fn test_lopsided_samples_still_center_on_arc() {
        // dense near the start, sparse near the end
        let mut points = arc_points(0.0, 0.2, 40);
        points.extend(arc_points(0.2, FRAC_PI_2, 4));
        let torus = estimate_tube_extent(&elbow(), &points);

        let mid = FRAC_PI_4.cos();
        assert_relative_eq!(torus.tube_half_angle, FRAC_PI_4, epsilon = 1e-4);
        assert_relative_eq!(torus.tube_begin, Vector3f::new(mid, mid, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_no_inliers_keeps_full_ring() {
        let torus = estimate_tube_extent(&elbow(), std::iter::empty::<&Point3f>());
        assert_eq!(torus, elbow());
    }

    #[test]
    fn test_points_on_axis_are_ignored() {
        let points = vec![Point3f::new(0.0, 0.0, 1.0), Point3f::new(0.0, 0.0, -1.0)];
        let torus = estimate_tube_extent(&elbow(), &points);
        assert_eq!(torus, elbow());
    }

    #[test]
    fn test_signed_angle_direction() {
        let a = signed_angle(&Vector3f::x(), &Vector3f::y(), &Vector3f::z());
        assert_relative_eq!(a, FRAC_PI_2);
        let b = signed_angle(&Vector3f::x(), &Vector3f::y(), &-Vector3f::z());
        assert_relative_eq!(b, -FRAC_PI_2);
    }
}
