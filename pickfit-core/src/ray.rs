//! Rays in point cloud coordinates

use crate::error::{Error, Result};
use crate::point::{Point3f, Vector3f};
use serde::{Deserialize, Serialize};

/// A half line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3f,
    direction: Vector3f,
}

impl Ray {
    /// Create a ray, normalizing `direction`
    pub fn new(origin: Point3f, direction: Vector3f) -> Result<Self> {
        let direction = direction
            .try_normalize(f32::EPSILON)
            .ok_or_else(|| Error::InvalidData("ray direction must be non-zero".to_string()))?;
        Ok(Self { origin, direction })
    }

    /// Ray starting at `origin` and passing through `target`
    pub fn through(origin: Point3f, target: Point3f) -> Result<Self> {
        Self::new(origin, target - origin)
    }

    /// Unit direction of the ray
    pub fn direction(&self) -> &Vector3f {
        &self.direction
    }

    pub fn point_at(&self, t: f32) -> Point3f {
        self.origin + self.direction * t
    }

    /// Perpendicular distance from `point` to the ray's infinite line
    pub fn distance_to_point(&self, point: &Point3f) -> f32 {
        let offset = point - self.origin;
        (offset - self.direction * offset.dot(&self.direction)).norm()
    }
}
