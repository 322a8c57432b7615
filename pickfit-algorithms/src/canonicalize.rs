//! Canonicalization of raw fitting oracle results
//!
//! A numerical fitting engine may legitimately report a more specific or
//! differently oriented primitive than the one requested when the data sits near
//! a geometric degeneracy: a cone whose radii agree is a cylinder, a torus with a
//! vanishing mean radius is a sphere, and a very flat torus segment is a
//! cylinder. Downstream code only ever handles the five canonical shapes, so
//! every successful result passes through [`canonicalize`].

use approx::relative_eq;
use pickfit_core::{
    CanonicalFit, Cone, Cylinder, FitError, Plane, Primitive, RawFit, RawParams, Sphere, Torus,
    Vector3f,
};
use serde::{Deserialize, Serialize};

/// Default ratio of mean radius to tube radius above which a torus is a cylinder
pub const DEFAULT_TORUS_TO_CYLINDER_RATIO: f32 = 50.0;

/// A reinterpretation applied while canonicalizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Remap {
    /// Cone with equal radii became a cylinder
    ConeToCylinder,
    /// Torus with zero mean radius became a sphere
    TorusToSphere,
    /// Torus with a huge mean radius became a cylinder
    TorusToCylinder,
    /// Cone ends were swapped so the top is the small end
    ConeFlipped,
}

/// Canonicalizer holding the torus degeneracy threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canonicalizer {
    pub torus_to_cylinder_ratio: f32,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            torus_to_cylinder_ratio: DEFAULT_TORUS_TO_CYLINDER_RATIO,
        }
    }
}

impl Canonicalizer {
    pub fn new(torus_to_cylinder_ratio: f32) -> Self {
        Self {
            torus_to_cylinder_ratio,
        }
    }

    pub fn canonicalize(&self, result: Result<RawFit, FitError>) -> Result<CanonicalFit, FitError> {
        canonicalize(result, self.torus_to_cylinder_ratio)
    }
}

/// Normalize an oracle result.
///
/// Oracle failures pass through untouched. Any successful result maps to exactly
/// one canonical shape; the residual error is carried over unchanged.
pub fn canonicalize(
    result: Result<RawFit, FitError>,
    torus_to_cylinder_ratio: f32,
) -> Result<CanonicalFit, FitError> {
    result.map(|raw| canonicalize_raw(&raw, torus_to_cylinder_ratio).0)
}

/// Normalize a successful oracle result and report which remap, if any, applied.
pub fn canonicalize_raw(raw: &RawFit, torus_to_cylinder_ratio: f32) -> (CanonicalFit, Option<Remap>) {
    let (primitive, remap) = match raw.params {
        RawParams::Plane { ll, lr, ur, ul } => (Primitive::Plane(Plane::new(ll, lr, ur, ul)), None),

        RawParams::Sphere { center, radius } => (
            Primitive::Sphere(Sphere {
                center,
                radius: radius.abs(),
            }),
            None,
        ),

        RawParams::Cylinder { top, bottom, radius } => (
            Primitive::Cylinder(Cylinder {
                top,
                bottom,
                radius: radius.abs(),
            }),
            None,
        ),

        RawParams::Cone {
            top,
            bottom,
            top_radius,
            bottom_radius,
        } => {
            let (top_radius, bottom_radius) = (top_radius.abs(), bottom_radius.abs());
            if relative_eq!(top_radius, bottom_radius) {
                (
                    Primitive::Cylinder(Cylinder {
                        top,
                        bottom,
                        radius: bottom_radius,
                    }),
                    Some(Remap::ConeToCylinder),
                )
            } else if top_radius > bottom_radius {
                (
                    Primitive::Cone(Cone {
                        top: bottom,
                        bottom: top,
                        top_radius: bottom_radius,
                        bottom_radius: top_radius,
                    }),
                    Some(Remap::ConeFlipped),
                )
            } else {
                (
                    Primitive::Cone(Cone {
                        top,
                        bottom,
                        top_radius,
                        bottom_radius,
                    }),
                    None,
                )
            }
        }

        RawParams::Torus {
            center,
            axis,
            mean_radius,
            tube_radius,
        } => {
            let tube_radius = tube_radius.abs();
            if mean_radius < f32::EPSILON {
                (
                    Primitive::Sphere(Sphere {
                        center,
                        radius: tube_radius,
                    }),
                    Some(Remap::TorusToSphere),
                )
            } else if mean_radius == f32::INFINITY
                || mean_radius > tube_radius * torus_to_cylinder_ratio
            {
                // semi-infinite: one cap at the center, the other one unit along the axis
                let axis = axis.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::z);
                (
                    Primitive::Cylinder(Cylinder {
                        top: center + axis,
                        bottom: center,
                        radius: tube_radius,
                    }),
                    Some(Remap::TorusToCylinder),
                )
            } else {
                (
                    Primitive::Torus(Torus::full_ring(center, axis, mean_radius, tube_radius)),
                    None,
                )
            }
        }
    };

    (CanonicalFit::new(primitive, raw.rms), remap)
}
