//! Canonical geometric primitives
//!
//! Every oracle result is normalized into exactly one of these five shapes before
//! anything downstream sees it. The shapes carry their own invariants: radii are
//! non-negative, a cone's top radius never exceeds its bottom radius, and a torus
//! axis and tube direction are unit vectors.

use crate::fit::{FeatureType, RawFit, RawParams};
use crate::point::{any_orthogonal, Point3f, Vector3f};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;

/// Rectangular patch given by its four corners in order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Lower-left, lower-right, upper-right, upper-left
    pub corners: [Point3f; 4],
}

impl Plane {
    pub fn new(ll: Point3f, lr: Point3f, ur: Point3f, ul: Point3f) -> Self {
        Self {
            corners: [ll, lr, ur, ul],
        }
    }

    pub fn center(&self) -> Point3f {
        let sum = self.corners.iter().fold(Vector3f::zeros(), |acc, c| acc + c.coords);
        Point3f::from(sum * 0.25)
    }

    fn edges(&self) -> (Vector3f, Vector3f) {
        let [ll, lr, _, ul] = self.corners;
        (lr - ll, ul - ll)
    }

    /// The longer of the two edges leaving the lower-left corner
    pub fn major_edge(&self) -> Vector3f {
        let (a, b) = self.edges();
        if a.norm() > b.norm() {
            a
        } else {
            b
        }
    }

    /// The shorter of the two edges leaving the lower-left corner
    pub fn minor_edge(&self) -> Vector3f {
        let (a, b) = self.edges();
        if a.norm() < b.norm() {
            a
        } else {
            b
        }
    }

    /// Unit normal, or `None` for a degenerate quad
    pub fn normal(&self) -> Option<Vector3f> {
        let (a, b) = self.edges();
        a.cross(&b).try_normalize(f32::EPSILON)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3f,
    pub radius: f32,
}

/// Finite cylinder between two cap centers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    pub top: Point3f,
    pub bottom: Point3f,
    pub radius: f32,
}

impl Cylinder {
    /// Unit axis from bottom to top
    pub fn axis(&self) -> Option<Vector3f> {
        (self.top - self.bottom).try_normalize(f32::EPSILON)
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.top, &self.bottom)
    }

    pub fn length(&self) -> f32 {
        nalgebra::distance(&self.top, &self.bottom)
    }
}

/// Truncated cone; the axis from bottom to top points toward the apex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    pub top: Point3f,
    pub bottom: Point3f,
    pub top_radius: f32,
    pub bottom_radius: f32,
}

impl Cone {
    /// Unit axis from bottom (large end) to top (small end)
    pub fn axis(&self) -> Option<Vector3f> {
        (self.top - self.bottom).try_normalize(f32::EPSILON)
    }

    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.top, &self.bottom)
    }

    pub fn length(&self) -> f32 {
        nalgebra::distance(&self.top, &self.bottom)
    }

    /// Angle between the axis and the slanted side
    pub fn apex_angle(&self) -> f32 {
        (self.bottom_radius - self.top_radius).abs().atan2(self.length())
    }
}

/// Torus, possibly only a partial ring (an elbow)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Torus {
    pub center: Point3f,
    /// Unit axis of revolution
    pub axis: Vector3f,
    /// Distance from the center to the tube center line
    pub mean_radius: f32,
    pub tube_radius: f32,
    /// Unit direction, perpendicular to the axis, where the tube starts
    pub tube_begin: Vector3f,
    /// Half of the swept angle, in `[0, PI]`
    pub tube_half_angle: f32,
}

impl Torus {
    /// A full ring. `axis` is normalized; a zero axis falls back to +z.
    pub fn full_ring(center: Point3f, axis: Vector3f, mean_radius: f32, tube_radius: f32) -> Self {
        let axis = axis.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::z);
        Self {
            center,
            axis,
            mean_radius,
            tube_radius,
            tube_begin: any_orthogonal(&axis),
            tube_half_angle: PI,
        }
    }

    /// Length of the tube center line
    pub fn tube_length(&self) -> f32 {
        self.mean_radius * self.tube_half_angle * 2.0
    }
}

/// Exactly one canonical shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Plane(Plane),
    Sphere(Sphere),
    Cylinder(Cylinder),
    Cone(Cone),
    Torus(Torus),
}

impl Primitive {
    pub fn feature(&self) -> FeatureType {
        match self {
            Primitive::Plane(_) => FeatureType::Plane,
            Primitive::Sphere(_) => FeatureType::Sphere,
            Primitive::Cylinder(_) => FeatureType::Cylinder,
            Primitive::Cone(_) => FeatureType::Cone,
            Primitive::Torus(_) => FeatureType::Torus,
        }
    }

    /// A sphere enclosing the shape, used to frame it in the viewer
    pub fn bounding_sphere(&self) -> (Point3f, f32) {
        match self {
            Primitive::Plane(p) => {
                let center = p.center();
                (center, nalgebra::distance(&p.corners[0], &center))
            }
            Primitive::Sphere(s) => (s.center, s.radius),
            Primitive::Cylinder(c) => (c.center(), c.length().hypot(c.radius)),
            Primitive::Cone(c) => (c.center(), c.length().hypot(c.bottom_radius)),
            Primitive::Torus(t) => (t.center, t.mean_radius + t.tube_radius),
        }
    }
}

/// Measurement line in centimeters
impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const CM: f32 = 100.0;
        match self {
            Primitive::Plane(p) => write!(
                f,
                "Plane: {:.2} cm x {:.2} cm",
                p.major_edge().norm() * CM,
                p.minor_edge().norm() * CM
            ),
            Primitive::Sphere(s) => write!(f, "Sphere: r = {:.2} cm", s.radius * CM),
            Primitive::Cylinder(c) => write!(
                f,
                "Cylinder: l = {:.2} cm, r = {:.2} cm",
                c.length() * CM,
                c.radius * CM
            ),
            Primitive::Cone(c) => write!(
                f,
                "Cone: l = {:.2} cm, tr = {:.2} cm, br = {:.2} cm",
                c.length() * CM,
                c.top_radius * CM,
                c.bottom_radius * CM
            ),
            Primitive::Torus(t) => write!(
                f,
                "Torus: mr = {:.2} cm, tr = {:.2} cm, angle = {} deg",
                t.mean_radius * CM,
                t.tube_radius * CM,
                (t.tube_half_angle * 2.0).to_degrees().round() as i32
            ),
        }
    }
}

/// Express a canonical shape in raw oracle terms.
///
/// A torus loses its tube extent, which raw results do not carry.
impl From<Primitive> for RawParams {
    fn from(primitive: Primitive) -> Self {
        match primitive {
            Primitive::Plane(p) => {
                let [ll, lr, ur, ul] = p.corners;
                RawParams::Plane { ll, lr, ur, ul }
            }
            Primitive::Sphere(s) => RawParams::Sphere {
                center: s.center,
                radius: s.radius,
            },
            Primitive::Cylinder(c) => RawParams::Cylinder {
                top: c.top,
                bottom: c.bottom,
                radius: c.radius,
            },
            Primitive::Cone(c) => RawParams::Cone {
                top: c.top,
                bottom: c.bottom,
                top_radius: c.top_radius,
                bottom_radius: c.bottom_radius,
            },
            Primitive::Torus(t) => RawParams::Torus {
                center: t.center,
                axis: t.axis,
                mean_radius: t.mean_radius,
                tube_radius: t.tube_radius,
            },
        }
    }
}

/// A canonical primitive with the residual error of the fit that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFit {
    pub primitive: Primitive,
    pub rms: f32,
}

impl CanonicalFit {
    pub fn new(primitive: Primitive, rms: f32) -> Self {
        Self { primitive, rms }
    }
}

impl From<CanonicalFit> for RawFit {
    fn from(fit: CanonicalFit) -> Self {
        RawFit::new(fit.primitive.into(), fit.rms)
    }
}
