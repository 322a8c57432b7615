//! Integration tests for pickfit-algorithms
//!
//! These tests run a pick through the heuristics and the canonicalizer the way
//! a session does, with oracle output decoded from flat parameter blocks.

use approx::assert_relative_eq;
use pickfit_algorithms::*;
use pickfit_core::{FeatureType, FitError, Point3f, PointCloudFrame, Primitive, RawFit, Ray, Vector3f};
use rand::prelude::*;

/// Noisy samples of the front half of a sphere, as a depth camera sees it
fn create_sphere_frame(center: Point3f, radius: f32, num_points: usize, seed: u64) -> PointCloudFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let points = (0..num_points)
        .map(|_| {
            let theta = rng.gen_range(0.0..std::f32::consts::TAU);
            let phi = rng.gen_range(0.0..std::f32::consts::FRAC_PI_2);
            let noise = rng.gen_range(-0.001..0.001);
            let r = radius + noise;
            center + Vector3f::new(r * phi.sin() * theta.cos(), r * phi.sin() * theta.sin(), -r * phi.cos())
        })
        .collect();
    PointCloudFrame::new(points)
}

#[test]
fn test_pick_then_request() {
    let frame = create_sphere_frame(Point3f::new(0.0, 0.0, 1.5), 0.2, 2000, 42);
    let ray = Ray::new(Point3f::origin(), Vector3f::z()).unwrap();

    let hit = pick(&ray, &frame).unwrap();
    // the front of the sphere faces the camera
    assert!(hit.depth > 1.25 && hit.depth < 1.35, "depth {}", hit.depth);
    assert!(hit.distance < 0.05);

    let heuristics = FitHeuristics::default();
    let request = heuristics.request(FeatureType::Sphere, &hit);
    assert_eq!(request.seed_index, hit.index);
    assert_relative_eq!(request.accuracy, heuristics.accuracy(hit.depth));
    assert!(request.touch_radius > request.mean_spacing);
}

#[test]
fn test_parameter_blocks_canonicalize() {
    let ratio = DEFAULT_TORUS_TO_CYLINDER_RATIO;

    // cone reported upside down
    let block = [0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.05, 0.2];
    let raw = RawFit::from_parameter_block(FeatureType::Cone, 0.001, &block).unwrap();
    let (fit, remap) = canonicalize_raw(&raw, ratio);
    assert_eq!(remap, Some(Remap::ConeFlipped));
    match fit.primitive {
        Primitive::Cone(cone) => {
            assert!(cone.top_radius <= cone.bottom_radius);
            assert_eq!(cone.top, Point3f::new(0.0, 0.0, 1.0));
        }
        other => panic!("expected a cone, got {:?}", other),
    }

    // torus whose ring is far larger than its tube
    let block = [0.0, 0.0, 2.0, 0.0, 1.0, 0.0, 30.0, 0.1];
    let raw = RawFit::from_parameter_block(FeatureType::Torus, 0.002, &block).unwrap();
    let fit = Canonicalizer::default().canonicalize(Ok(raw)).unwrap();
    assert_eq!(fit.primitive.feature(), FeatureType::Cylinder);
    assert_eq!(fit.rms, 0.002);
}

#[test]
fn test_oracle_failures_survive_the_pipeline() {
    let canonicalizer = Canonicalizer::new(10.0);
    for err in [FitError::NotFound, FitError::LicenseInvalid] {
        assert_eq!(canonicalizer.canonicalize(Err(err)), Err(err));
    }
}

#[test]
fn test_elbow_extent_from_frame() {
    let center = Point3f::new(0.0, 0.0, 2.0);
    let mut rng = StdRng::seed_from_u64(3);
    let points: Vec<Point3f> = (0..400)
        .map(|_| {
            // half ring from -90 to +90 degrees around the y axis
            let t = rng.gen_range(-std::f32::consts::FRAC_PI_2..=std::f32::consts::FRAC_PI_2);
            let s = rng.gen_range(0.0..std::f32::consts::TAU);
            let ring = Vector3f::new(t.cos(), 0.0, t.sin());
            center + ring * (0.5 + 0.05 * s.cos()) + Vector3f::y() * 0.05 * s.sin()
        })
        .collect();
    let frame = PointCloudFrame::new(points);

    let raw = RawFit::from_parameter_block(FeatureType::Torus, 0.0, &[0.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.5, 0.05])
        .unwrap();
    let (fit, _) = canonicalize_raw(&raw, DEFAULT_TORUS_TO_CYLINDER_RATIO);
    let torus = match fit.primitive {
        Primitive::Torus(t) => estimate_tube_extent(&t, frame.iter()),
        other => panic!("expected a torus, got {:?}", other),
    };

    assert_relative_eq!(torus.tube_half_angle, std::f32::consts::FRAC_PI_2, epsilon = 0.05);
    assert_relative_eq!(torus.tube_begin.dot(&Vector3f::y()), 0.0, epsilon = 1e-5);
    // the half ring is centered on +x
    assert!(torus.tube_begin.x > 0.99, "begin {:?}", torus.tube_begin);
    assert!(torus.tube_length() < torus.mean_radius * std::f32::consts::PI * 1.1);
}
