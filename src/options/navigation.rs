use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

/// A named gallery and its world-space anchor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct GalleryPosition {
    /// Scene identifier used in navigation requests.
    pub id: String,
    /// Gallery centre in world space.
    pub position: [f32; 3],
}

impl GalleryPosition {
    /// Convenience constructor.
    #[must_use]
    pub fn new(id: &str, position: [f32; 3]) -> Self {
        Self {
            id: id.to_owned(),
            position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Navigation", inline)]
#[serde(default)]
/// Viewpoint layout and transition timing.
pub struct NavigationOptions {
    /// Camera eye for the overview viewpoint.
    #[schemars(skip)]
    pub overview_eye: [f32; 3],
    /// Look-at point for the overview viewpoint.
    #[schemars(skip)]
    pub overview_look_at: [f32; 3],
    /// Offset from a gallery's position to its viewing eye.
    #[schemars(skip)]
    pub gallery_eye_offset: [f32; 3],
    /// Number of update steps a transition takes to complete.
    #[schemars(title = "Transition Frames", range(min = 1, max = 600))]
    pub transition_frames: u32,
    /// Curve applied to transition progress.
    #[schemars(skip)]
    pub easing: EasingFunction,
    /// Whether manual orbit controls start enabled.
    #[schemars(title = "Manual Controls")]
    pub controls_enabled: bool,
    /// Galleries placed in the scene.
    #[schemars(skip)]
    pub galleries: Vec<GalleryPosition>,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            overview_eye: [0.0, 30.0, 100.0],
            overview_look_at: [0.0, 0.0, 0.0],
            gallery_eye_offset: [0.0, 10.0, 30.0],
            transition_frames: 100,
            easing: EasingFunction::Smootherstep,
            controls_enabled: true,
            galleries: vec![
                GalleryPosition::new("box", [0.0, 0.0, 0.0]),
                GalleryPosition::new("circle", [150.0, 0.0, 150.0]),
                GalleryPosition::new("triangle", [-150.0, 0.0, 150.0]),
                GalleryPosition::new("x", [0.0, 0.0, -200.0]),
            ],
        }
    }
}
