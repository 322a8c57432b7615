//! Core data structures and traits for pickfit
//!
//! This crate provides the fundamental types shared by the picking, fitting and
//! viewing layers: points and per-frame point clouds, rays, the raw and canonical
//! forms of a fitted primitive, inlier masks, and the traits that model the
//! external collaborators (depth source, fitting oracle, unprojection).

pub mod point;
pub mod point_cloud;
pub mod ray;
pub mod fit;
pub mod primitive;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use ray::*;
pub use fit::*;
pub use primitive::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4, Unit, Rotation3};
