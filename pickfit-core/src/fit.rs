//! Fit requests and raw oracle results

use crate::error::{Error, Result};
use crate::point::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive type requested from (or reported by) the fitting oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeatureType {
    /// Let the oracle decide
    Any,
    #[default]
    Plane,
    Sphere,
    Cylinder,
    Cone,
    Torus,
}

impl FeatureType {
    pub const ALL: [FeatureType; 6] = [
        FeatureType::Any,
        FeatureType::Plane,
        FeatureType::Sphere,
        FeatureType::Cylinder,
        FeatureType::Cone,
        FeatureType::Torus,
    ];

    /// Keyboard digit selecting this type (`0` is "any")
    pub fn from_digit(digit: u32) -> Option<Self> {
        Self::ALL.get(digit as usize).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            FeatureType::Any => "ANY",
            FeatureType::Plane => "PLANE",
            FeatureType::Sphere => "SPHERE",
            FeatureType::Cylinder => "CYLINDER",
            FeatureType::Cone => "CONE",
            FeatureType::Torus => "TORUS",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the oracle needs for one fit, built fresh per pick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitRequest {
    pub feature: FeatureType,
    /// Index of the seed point in the frame
    pub seed_index: usize,
    /// Expected measurement error of the points
    pub accuracy: f32,
    /// Mean distance between neighboring points
    pub mean_spacing: f32,
    /// Radius of the initial neighborhood around the seed
    pub touch_radius: f32,
}

/// Type-specific parameters exactly as the oracle returned them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RawParams {
    /// Quad corners: lower-left, lower-right, upper-right, upper-left
    Plane {
        ll: Point3f,
        lr: Point3f,
        ur: Point3f,
        ul: Point3f,
    },
    Sphere {
        center: Point3f,
        radius: f32,
    },
    Cylinder {
        top: Point3f,
        bottom: Point3f,
        radius: f32,
    },
    Cone {
        top: Point3f,
        bottom: Point3f,
        top_radius: f32,
        bottom_radius: f32,
    },
    Torus {
        center: Point3f,
        axis: Vector3f,
        mean_radius: f32,
        tube_radius: f32,
    },
}

impl RawParams {
    pub fn feature(&self) -> FeatureType {
        match self {
            RawParams::Plane { .. } => FeatureType::Plane,
            RawParams::Sphere { .. } => FeatureType::Sphere,
            RawParams::Cylinder { .. } => FeatureType::Cylinder,
            RawParams::Cone { .. } => FeatureType::Cone,
            RawParams::Torus { .. } => FeatureType::Torus,
        }
    }
}

/// A successful oracle result: parameters plus the residual error
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFit {
    pub params: RawParams,
    pub rms: f32,
}

impl RawFit {
    pub fn new(params: RawParams, rms: f32) -> Self {
        Self { params, rms }
    }

    /// Decode a flat parameter block as produced by C-style fitting engines.
    ///
    /// Layouts (3 floats per point or vector):
    /// - plane: `ll, lr, ur, ul`
    /// - sphere: `center, radius`
    /// - cylinder: `bottom, top, radius`
    /// - cone: `bottom, top, bottom_radius, top_radius`
    /// - torus: `center, axis, mean_radius, tube_radius`
    pub fn from_parameter_block(feature: FeatureType, rms: f32, block: &[f32]) -> Result<Self> {
        let check = |needed: usize| {
            if block.len() < needed {
                Err(Error::InvalidData(format!(
                    "{} parameter block needs {} floats, got {}",
                    feature,
                    needed,
                    block.len()
                )))
            } else {
                Ok(())
            }
        };
        let point = |at: usize| Point3f::new(block[at], block[at + 1], block[at + 2]);
        let vector = |at: usize| Vector3f::new(block[at], block[at + 1], block[at + 2]);

        let params = match feature {
            FeatureType::Any => {
                return Err(Error::InvalidData(
                    "a parameter block needs a concrete primitive type".to_string(),
                ))
            }
            FeatureType::Plane => {
                check(12)?;
                RawParams::Plane {
                    ll: point(0),
                    lr: point(3),
                    ur: point(6),
                    ul: point(9),
                }
            }
            FeatureType::Sphere => {
                check(4)?;
                RawParams::Sphere {
                    center: point(0),
                    radius: block[3],
                }
            }
            FeatureType::Cylinder => {
                check(7)?;
                RawParams::Cylinder {
                    bottom: point(0),
                    top: point(3),
                    radius: block[6],
                }
            }
            FeatureType::Cone => {
                check(8)?;
                RawParams::Cone {
                    bottom: point(0),
                    top: point(3),
                    bottom_radius: block[6],
                    top_radius: block[7],
                }
            }
            FeatureType::Torus => {
                check(8)?;
                RawParams::Torus {
                    center: point(0),
                    axis: vector(3),
                    mean_radius: block[6],
                    tube_radius: block[7],
                }
            }
        };

        Ok(Self { params, rms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_type_from_digit() {
        assert_eq!(FeatureType::from_digit(0), Some(FeatureType::Any));
        assert_eq!(FeatureType::from_digit(4), Some(FeatureType::Cone));
        assert_eq!(FeatureType::from_digit(5), Some(FeatureType::Torus));
        assert_eq!(FeatureType::from_digit(6), None);
        assert_eq!(FeatureType::default(), FeatureType::Plane);
    }

    #[test]
    fn test_decode_cone_block() {
        let block = [0.0, -1.0, 0.0, 0.0, 1.0, 0.0, 5.0, 1.0];
        let fit = RawFit::from_parameter_block(FeatureType::Cone, 0.01, &block).unwrap();
        assert_eq!(
            fit.params,
            RawParams::Cone {
                top: Point3f::new(0.0, 1.0, 0.0),
                bottom: Point3f::new(0.0, -1.0, 0.0),
                top_radius: 1.0,
                bottom_radius: 5.0,
            }
        );
        assert_eq!(fit.rms, 0.01);
    }

    #[test]
    fn test_decode_torus_block() {
        let block = [1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.5, 0.1];
        let fit = RawFit::from_parameter_block(FeatureType::Torus, 0.0, &block).unwrap();
        match fit.params {
            RawParams::Torus { center, axis, mean_radius, tube_radius } => {
                assert_eq!(center, Point3f::new(1.0, 2.0, 3.0));
                assert_eq!(axis, Vector3f::z());
                assert_eq!(mean_radius, 0.5);
                assert_eq!(tube_radius, 0.1);
            }
            other => panic!("unexpected params {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_short_block_and_any() {
        assert!(RawFit::from_parameter_block(FeatureType::Plane, 0.0, &[0.0; 11]).is_err());
        assert!(RawFit::from_parameter_block(FeatureType::Any, 0.0, &[0.0; 12]).is_err());
    }
}
