//! Centralized gallery options with TOML preset support.
//!
//! Asset registry contents, placeholder appearance, viewpoint layout,
//! transition timing, orbit sensitivity and camera projection are
//! consolidated here. Options serialize to/from TOML so hosts can ship
//! presets alongside their image folders.

mod assets;
mod camera;
mod navigation;
mod orbit;

use std::path::Path;

pub use assets::AssetOptions;
pub use camera::CameraOptions;
pub use navigation::{GalleryPosition, NavigationOptions};
pub use orbit::OrbitOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GalleriaError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[navigation]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Image registry and placeholder options.
    pub assets: AssetOptions,
    /// Viewpoint layout and transition options.
    pub navigation: NavigationOptions,
    /// Manual orbit controller options.
    pub orbit: OrbitOptions,
    /// Camera projection options.
    pub camera: CameraOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GalleriaError::Io`] if the file cannot be read and
    /// [`GalleriaError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, GalleriaError> {
        let content = std::fs::read_to_string(path).map_err(GalleriaError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GalleriaError::OptionsParse`] if `content` is not valid
    /// options TOML.
    pub fn from_toml(content: &str) -> Result<Self, GalleriaError> {
        toml::from_str(content).map_err(|e| GalleriaError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GalleriaError::OptionsParse`] if serialization fails and
    /// [`GalleriaError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GalleriaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GalleriaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GalleriaError::Io)?;
        }
        std::fs::write(path, content).map_err(GalleriaError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::easing::EasingFunction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[navigation]
transition_frames = 60
easing = "smoothstep"

[[navigation.galleries]]
id = "atrium"
position = [10.0, 0.0, -5.0]
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.navigation.transition_frames, 60);
        assert_eq!(opts.navigation.easing, EasingFunction::Smoothstep);
        assert_eq!(opts.navigation.galleries.len(), 1);
        assert_eq!(opts.navigation.galleries[0].id, "atrium");
        // Everything else should be default
        assert_eq!(opts.navigation.overview_eye, [0.0, 30.0, 100.0]);
        assert_eq!(opts.assets.available.len(), 8);
        assert_eq!(opts.orbit.min_distance, 5.0);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[assets]\nfallback_size = \"big\"").unwrap_err();
        assert!(matches!(err, GalleriaError::OptionsParse(_)));
    }

    #[test]
    fn save_and_list_presets() {
        let dir = std::env::temp_dir().join(format!("galleria-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.navigation.controls_enabled = false;
        opts.save(&dir.join("night.toml")).unwrap();
        opts.save(&dir.join("day.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["day", "night"]);
        let loaded = Options::load(&dir.join("night.toml")).unwrap();
        assert!(!loaded.navigation.controls_enabled);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value = serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("assets"));
        assert!(props.contains_key("navigation"));
        assert!(props.contains_key("orbit"));
        assert!(props.contains_key("camera"));

        let navigation = &props["navigation"]["properties"];
        assert!(navigation.get("transition_frames").is_some());
        assert!(navigation.get("galleries").is_none());
    }
}
