//! Per-frame point clouds and inlier masks

use crate::error::{Error, Result};
use crate::point::*;
use std::ops::Index;

/// The valid points of one depth frame, optionally with per-point colors.
///
/// A frame is immutable once built. Point indices are stable for the lifetime of
/// the frame and are the identity shared with the fitting oracle and with
/// [`InlierMask`]. The next device poll replaces the frame wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloudFrame {
    points: Vec<Point3f>,
    colors: Option<Vec<Rgb>>,
}

impl PointCloudFrame {
    /// Create a frame of uncolored points
    pub fn new(points: Vec<Point3f>) -> Self {
        Self { points, colors: None }
    }

    /// Create a frame with one color per point
    pub fn with_colors(points: Vec<Point3f>, colors: Vec<Rgb>) -> Result<Self> {
        if points.len() != colors.len() {
            return Err(Error::InvalidData(format!(
                "frame has {} points but {} colors",
                points.len(),
                colors.len()
            )));
        }
        Ok(Self {
            points,
            colors: Some(colors),
        })
    }

    pub fn points(&self) -> &[Point3f] {
        &self.points
    }

    pub fn colors(&self) -> Option<&[Rgb]> {
        self.colors.as_deref()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point3f> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<Point3f> {
        self.points.iter()
    }
}

impl Index<usize> for PointCloudFrame {
    type Output = Point3f;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

/// Per-point inlier classification for the frame a fit was computed on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlierMask {
    flags: Vec<bool>,
}

impl InlierMask {
    /// Wrap inlier flags, checking they line up with `frame`.
    pub fn for_frame(flags: Vec<bool>, frame: &PointCloudFrame) -> Result<Self> {
        if flags.len() != frame.len() {
            return Err(Error::InvalidData(format!(
                "inlier mask has {} entries but the frame has {} points",
                flags.len(),
                frame.len()
            )));
        }
        Ok(Self { flags })
    }

    /// Build a mask from oracle outlier flags, where nonzero marks an outlier.
    pub fn from_outlier_flags(outlier_flags: &[u8]) -> Self {
        Self {
            flags: outlier_flags.iter().map(|&f| f == 0).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn is_inlier(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    pub fn inlier_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    /// Indices of the inlier points
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, &inlier)| inlier)
            .map(|(i, _)| i)
    }

    /// Copy the inlier points (and their colors) out of `frame`.
    pub fn select(&self, frame: &PointCloudFrame) -> PointCloudFrame {
        let points = self.indices().filter_map(|i| frame.get(i).copied()).collect();
        let colors = frame
            .colors()
            .map(|colors| self.indices().filter_map(|i| colors.get(i).copied()).collect());
        PointCloudFrame { points, colors }
    }
}
