//! Common utilities for the Hall effect simulator
//!
//! Shared window/GPU setup, the 2D camera, and small buffer helpers used by the
//! simulation front end.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;
