//! # pickfit Algorithms
//!
//! The computational core behind a pick gesture:
//! ray picking against a point cloud frame, canonicalization of raw oracle
//! results, torus tube extent estimation and depth-driven fit parameters.

pub mod picking;
pub mod canonicalize;
pub mod tube_extent;
pub mod heuristics;

// Re-export commonly used items
pub use picking::*;
pub use canonicalize::*;
pub use tube_extent::*;
pub use heuristics::*;
