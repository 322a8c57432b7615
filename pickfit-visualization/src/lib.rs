//! Interactive viewing and fitting for pickfit
//!
//! This crate turns pointer and keyboard input into camera motion and pick
//! gestures:
//! - Camera poses with orthographic or perspective projection
//! - A drift-free trackball (orbit, pan, zoom, roll)
//! - Translation of winit input into session events
//! - The per-iteration fit session tying picking, fitting and viewing together

pub mod camera;
pub mod trackball;
pub mod controls;
pub mod session;

pub use camera::*;
pub use trackball::*;
pub use controls::*;
pub use session::*;
