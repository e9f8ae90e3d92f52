//! Viewpoint state machine driving the camera between galleries.

use super::transition::Transition;
use super::viewpoint::{ViewpointTable, OVERVIEW};
use super::{CameraTransform, ManualControl, NavigationError};
use crate::options::NavigationOptions;
use crate::util::easing::EasingFunction;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationState {
    /// Resting at a viewpoint; manual control may be active.
    Idle {
        /// Viewpoint the camera rests at.
        target: String,
    },
    /// Gliding toward a viewpoint; manual control is disabled.
    Transitioning(Transition),
}

/// Result of [`NavigationController::navigate_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// A new transition began.
    Started,
    /// Already resting at the requested viewpoint; nothing changed.
    AlreadyThere,
    /// A transition is in flight; the request was dropped.
    Busy,
}

/// Result of one [`NavigationController::update`] step.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No transition in flight; the camera was not touched.
    Idle,
    /// The camera moved and the transition continues.
    Moving {
        /// Linear progress after this step.
        progress: f32,
    },
    /// The camera reached its destination this step.
    Arrived {
        /// Viewpoint now resting at.
        target: String,
    },
}

/// Owns camera motion between named viewpoints and arbitrates manual input.
///
/// Requests made mid-flight are ignored rather than queued, so a transition
/// always runs to completion. Manual control is enabled only while idle and
/// while the host's controls flag is set.
#[derive(Debug, Clone)]
pub struct NavigationController {
    viewpoints: ViewpointTable,
    state: NavigationState,
    easing: EasingFunction,
    frames: u32,
    controls_enabled: bool,
}

impl NavigationController {
    /// Place `camera` at the overview and hand manual control its initial
    /// enablement.
    pub fn new(
        viewpoints: ViewpointTable,
        options: &NavigationOptions,
        camera: &mut impl CameraTransform,
        manual: &mut impl ManualControl,
    ) -> Self {
        let overview = *viewpoints.overview();
        camera.set_eye(overview.eye);
        camera.look_at(overview.look_at);

        let controller = Self {
            viewpoints,
            state: NavigationState::Idle {
                target: OVERVIEW.to_owned(),
            },
            easing: options.easing,
            frames: options.transition_frames.max(1),
            controls_enabled: options.controls_enabled,
        };
        manual.set_enabled(controller.manual_enabled());
        controller
    }

    /// Convenience constructor building the viewpoint table from `options`.
    pub fn from_options(
        options: &NavigationOptions,
        camera: &mut impl CameraTransform,
        manual: &mut impl ManualControl,
    ) -> Self {
        Self::new(ViewpointTable::from_options(options), options, camera, manual)
    }

    /// Request a move to `id`.
    ///
    /// Unknown ids are rejected even mid-flight. While a transition runs the
    /// request is dropped ([`NavigateOutcome::Busy`]); asking for the
    /// viewpoint already rested at does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::UnknownViewpoint`] if `id` is not in the
    /// viewpoint table.
    pub fn navigate_to(
        &mut self,
        id: &str,
        camera: &impl CameraTransform,
        manual: &mut impl ManualControl,
    ) -> Result<NavigateOutcome, NavigationError> {
        let destination = *self.viewpoints.get(id)?;

        let from = match &self.state {
            NavigationState::Transitioning(transition) => {
                log::debug!(
                    "Ignoring request for {id:?}: already moving to {:?}",
                    transition.to()
                );
                return Ok(NavigateOutcome::Busy);
            }
            NavigationState::Idle { target } if target == id => {
                return Ok(NavigateOutcome::AlreadyThere);
            }
            NavigationState::Idle { target } => target.clone(),
        };

        log::debug!("Navigating {from:?} -> {id:?}");
        manual.set_enabled(false);
        self.state = NavigationState::Transitioning(Transition::new(
            &from,
            id,
            camera.eye(),
            destination,
            self.frames,
        ));
        Ok(NavigateOutcome::Started)
    }

    /// Advance an in-flight transition by one frame.
    ///
    /// The eye follows the eased curve while the camera faces the
    /// destination's look-at on every step. On the final step the eye is
    /// placed exactly at the destination and manual control is handed back.
    ///
    /// The glide advances whether or not the controls flag is set; the flag
    /// only decides whether manual control resumes on arrival.
    pub fn update(
        &mut self,
        camera: &mut impl CameraTransform,
        manual: &mut impl ManualControl,
    ) -> FrameOutcome {
        let NavigationState::Transitioning(transition) = &mut self.state else {
            return FrameOutcome::Idle;
        };

        let progress = transition.advance();
        camera.set_eye(transition.eye(self.easing));
        camera.look_at(transition.destination().look_at);

        if !transition.is_finished() {
            return FrameOutcome::Moving { progress };
        }

        let target = transition.to().to_owned();
        self.state = NavigationState::Idle {
            target: target.clone(),
        };
        manual.set_enabled(self.manual_enabled());
        log::info!("Arrived at {target}");
        FrameOutcome::Arrived { target }
    }

    /// Set the host's controls flag. Takes effect immediately when idle and
    /// on arrival otherwise.
    pub fn set_controls_enabled(&mut self, enabled: bool, manual: &mut impl ManualControl) {
        self.controls_enabled = enabled;
        manual.set_enabled(self.manual_enabled());
    }

    /// The host's controls flag as last set.
    #[must_use]
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Whether manual control should currently accept input.
    #[must_use]
    pub fn manual_enabled(&self) -> bool {
        self.controls_enabled && !self.is_transitioning()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Resting viewpoint when idle, destination when moving.
    #[must_use]
    pub fn current_target(&self) -> &str {
        match &self.state {
            NavigationState::Idle { target } => target,
            NavigationState::Transitioning(transition) => transition.to(),
        }
    }

    /// True while a transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, NavigationState::Transitioning(_))
    }

    /// Linear progress of the in-flight transition, if any.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        match &self.state {
            NavigationState::Idle { .. } => None,
            NavigationState::Transitioning(transition) => Some(transition.progress()),
        }
    }

    /// The viewpoint table.
    #[must_use]
    pub fn viewpoints(&self) -> &ViewpointTable {
        &self.viewpoints
    }

    /// Curve applied to transition progress.
    #[must_use]
    pub fn easing(&self) -> EasingFunction {
        self.easing
    }

    /// Steps a transition takes from start to arrival.
    #[must_use]
    pub fn transition_frames(&self) -> u32 {
        self.frames
    }
}
