//! A single in-flight camera move between two viewpoints.
//!
//! Pure bookkeeping: frame counting, easing and eye interpolation. Writing
//! the result to a camera is the controller's job.

use glam::Vec3;

use super::viewpoint::Viewpoint;
use crate::util::easing::EasingFunction;

/// Camera move from one named viewpoint toward another.
///
/// Progress advances in whole frames so the final step lands on exactly
/// 1.0 regardless of floating-point accumulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    from: String,
    to: String,
    start_eye: Vec3,
    destination: Viewpoint,
    frame: u32,
    frames: u32,
}

impl Transition {
    /// Begin a move at progress 0. `frames` is clamped to at least 1.
    #[must_use]
    pub fn new(from: &str, to: &str, start_eye: Vec3, destination: Viewpoint, frames: u32) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            start_eye,
            destination,
            frame: 0,
            frames: frames.max(1),
        }
    }

    /// Viewpoint the camera was resting at when the move began.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Viewpoint being approached.
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Eye position snapshotted when the move began.
    #[must_use]
    pub fn start_eye(&self) -> Vec3 {
        self.start_eye
    }

    /// Pose being approached.
    #[must_use]
    pub fn destination(&self) -> &Viewpoint {
        &self.destination
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.frame >= self.frames {
            return 1.0;
        }
        self.frame as f32 / self.frames as f32
    }

    /// True once progress has reached 1.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.frame >= self.frames
    }

    /// Step one frame forward and return the new progress.
    pub fn advance(&mut self) -> f32 {
        self.frame = (self.frame + 1).min(self.frames);
        self.progress()
    }

    /// Eye position for the current progress under `easing`.
    ///
    /// Exactly the destination eye once finished.
    #[must_use]
    pub fn eye(&self, easing: EasingFunction) -> Vec3 {
        if self.is_finished() {
            return self.destination.eye;
        }
        interpolate_eye(self.start_eye, self.destination.eye, easing.evaluate(self.progress()))
    }
}

/// Linear blend of two eye positions by an already-eased factor.
#[must_use]
pub fn interpolate_eye(start: Vec3, end: Vec3, eased: f32) -> Vec3 {
    start.lerp(end, eased)
}

/// Per-frame progress increment for a move lasting `frames` frames.
#[must_use]
pub fn progress_step(frames: u32) -> f32 {
    1.0 / frames.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination() -> Viewpoint {
        Viewpoint {
            eye: Vec3::new(10.0, 20.0, 30.0),
            look_at: Vec3::ZERO,
        }
    }

    #[test]
    fn reaches_one_after_exactly_frames_steps() {
        let mut t = Transition::new("overview", "box", Vec3::ZERO, destination(), 100);
        for _ in 0..99 {
            let _ = t.advance();
            assert!(!t.is_finished());
        }
        assert_eq!(t.advance(), 1.0);
        assert!(t.is_finished());
        // Further steps stay clamped.
        assert_eq!(t.advance(), 1.0);
    }

    #[test]
    fn progress_is_monotonic() {
        let mut t = Transition::new("a", "b", Vec3::ZERO, destination(), 37);
        let mut prev = t.progress();
        assert_eq!(prev, 0.0);
        while !t.is_finished() {
            let next = t.advance();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn eye_starts_at_snapshot_and_ends_exactly_at_destination() {
        let start = Vec3::new(-3.3, 7.1, 0.9);
        let mut t = Transition::new("a", "b", start, destination(), 3);
        assert_eq!(t.eye(EasingFunction::Smootherstep), start);
        while !t.is_finished() {
            let _ = t.advance();
        }
        assert_eq!(t.eye(EasingFunction::Smootherstep), destination().eye);
    }

    #[test]
    fn eased_midpoint_is_halfway() {
        let mut t = Transition::new("a", "b", Vec3::ZERO, destination(), 2);
        let _ = t.advance();
        let mid = t.eye(EasingFunction::Smootherstep);
        assert!((mid - destination().eye * 0.5).length() < 1e-4);
    }

    #[test]
    fn zero_frames_is_clamped_to_one() {
        let mut t = Transition::new("a", "b", Vec3::ZERO, destination(), 0);
        assert_eq!(progress_step(0), 1.0);
        assert_eq!(t.advance(), 1.0);
        assert!(t.is_finished());
    }

    #[test]
    fn default_step_is_one_hundredth() {
        assert!((progress_step(100) - 0.01).abs() < f32::EPSILON);
    }
}
