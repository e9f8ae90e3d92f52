//! Camera state and manual orbit control.
//!
//! [`Camera`] is the pose the navigation controller and the orbit both
//! write. [`OrbitController`] is the user-driven half; it steps aside
//! whenever navigation disables it.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Window-event-based camera input handler.
#[cfg(feature = "viewer")]
pub mod input;
/// Damped orbit controller for manual camera input.
pub mod orbit;

pub use self::core::{Camera, CameraUniform};
pub use orbit::OrbitController;
