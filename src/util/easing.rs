//! Easing functions for camera transition interpolation.
//!
//! All curves map `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.
//! Inputs outside the unit interval are clamped.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for transition curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic Hermite smoothstep: `3t² - 2t³`. Zero first derivative at
    /// both endpoints.
    Smoothstep,
    /// Perlin's smootherstep: `6t⁵ - 15t⁴ + 10t³`. Zero first and second
    /// derivatives at both endpoints.
    Smootherstep,
}

impl EasingFunction {
    /// Default curve for viewpoint transitions.
    pub const DEFAULT: EasingFunction = EasingFunction::Smootherstep;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::Smoothstep => t * t * (3.0 - 2.0 * t),
            EasingFunction::Smootherstep => {
                t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
