//! Depth-dependent fit parameters
//!
//! Depth sensors get noisier and sparser with distance, so the accuracy, point
//! spacing and seed neighborhood handed to the oracle are scaled with the depth
//! of the picked point.

use crate::picking::PickHit;
use pickfit_core::{FeatureType, FitRequest};
use serde::{Deserialize, Serialize};

/// Parameters for deriving a [`FitRequest`] from a pick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitHeuristics {
    /// Vertical field of view of the color camera, in degrees
    pub vertical_fov_deg: f32,
    /// Height of the color image, in pixels
    pub image_height_px: f32,
    /// Seed neighborhood radius, in pixels
    pub touch_radius_px: f32,
    /// Mean point spacing, in pixels
    pub spacing_px: f32,
    /// Accuracy grows linearly with depth: `slope * depth + offset`
    pub accuracy_slope: f32,
    pub accuracy_offset: f32,
    /// Lower bound on the accuracy
    pub min_accuracy: f32,
}

impl Default for FitHeuristics {
    fn default() -> Self {
        Self {
            vertical_fov_deg: 42.5,
            image_height_px: 480.0,
            touch_radius_px: 50.0,
            spacing_px: 2.7,
            accuracy_slope: 0.026119565,
            accuracy_offset: -0.00712,
            min_accuracy: 0.002,
        }
    }
}

impl FitHeuristics {
    /// Expected measurement error at `depth`
    pub fn accuracy(&self, depth: f32) -> f32 {
        (depth * self.accuracy_slope + self.accuracy_offset)
            .max(self.min_accuracy)
            .max(0.0)
    }

    /// Size of one image pixel projected to `depth`
    pub fn pixel_scale(&self, depth: f32) -> f32 {
        if self.image_height_px <= 0.0 {
            return 0.0;
        }
        let half_height = depth * (self.vertical_fov_deg.to_radians() * 0.5).tan();
        (2.0 * half_height / self.image_height_px).max(0.0)
    }

    /// Build the oracle request for a pick
    pub fn request(&self, feature: FeatureType, hit: &PickHit) -> FitRequest {
        let scale = self.pixel_scale(hit.depth);
        FitRequest {
            feature,
            seed_index: hit.index,
            accuracy: self.accuracy(hit.depth),
            mean_spacing: (scale * self.spacing_px).max(0.0),
            touch_radius: (scale * self.touch_radius_px).max(0.0),
        }
    }
}
