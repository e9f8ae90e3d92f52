use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Orbit Controls", inline)]
#[serde(default)]
/// Manual orbit controller sensitivity and limits.
pub struct OrbitOptions {
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Fraction of residual motion removed each update.
    #[schemars(title = "Damping", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub damping: f32,
    /// Closest the eye may get to the focus point.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest the eye may get from the focus point.
    #[schemars(skip)]
    pub max_distance: f32,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            rotate_speed: 0.5,
            pan_speed: 0.5,
            zoom_speed: 0.1,
            damping: 0.05,
            min_distance: 5.0,
            max_distance: 500.0,
        }
    }
}
