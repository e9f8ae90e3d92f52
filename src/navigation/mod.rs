//! Camera navigation between named viewpoints.
//!
//! [`NavigationController`] is a two-state machine (`Idle` / `Transitioning`)
//! advanced once per frame. It owns every camera write made on behalf of a
//! viewpoint request and decides when the manual orbit controller may take
//! input. The camera and the manual controller are reached through the
//! [`CameraTransform`] and [`ManualControl`] traits so hosts can plug in
//! their own types.

pub mod controller;
pub mod transition;
pub mod viewpoint;

use std::fmt;

use glam::Vec3;

pub use controller::{FrameOutcome, NavigateOutcome, NavigationController, NavigationState};
pub use transition::{interpolate_eye, progress_step, Transition};
pub use viewpoint::{Viewpoint, ViewpointTable, OVERVIEW};

/// Errors from navigation requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The requested id is not in the viewpoint table.
    UnknownViewpoint {
        /// The id that was requested.
        id: String,
    },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownViewpoint { id } => write!(f, "unknown viewpoint: {id}"),
        }
    }
}

impl std::error::Error for NavigationError {}

/// Camera pose the controller drives.
pub trait CameraTransform {
    /// Current eye position.
    fn eye(&self) -> Vec3;
    /// Move the eye without changing what the camera faces.
    fn set_eye(&mut self, eye: Vec3);
    /// Orient the camera toward `target`.
    fn look_at(&mut self, target: Vec3);
}

/// Manual camera input that must stand down during transitions.
pub trait ManualControl {
    /// Accept (`true`) or ignore (`false`) user input.
    fn set_enabled(&mut self, enabled: bool);
}
