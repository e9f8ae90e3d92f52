use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Assets", inline)]
#[serde(default)]
/// Image registry contents and placeholder appearance.
pub struct AssetOptions {
    /// Directory the directory-backed image source reads from.
    #[schemars(skip)]
    pub root: PathBuf,
    /// Ordered asset names known to exist at build time.
    pub available: Vec<String>,
    /// Number of painting slots each gallery requests.
    #[schemars(title = "Gallery Slots", range(min = 1, max = 64))]
    pub gallery_slots: usize,
    /// Edge length in pixels of synthesized placeholder images.
    #[schemars(title = "Placeholder Size", range(min = 16, max = 2048))]
    pub fallback_size: u32,
    /// Stroke width in pixels of the placeholder diagonal cross.
    #[schemars(skip)]
    pub stroke_width: u32,
    /// Placeholder fill colours (sRGB), indexed by name length.
    #[schemars(skip)]
    pub palette: Vec<[u8; 3]>,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets/imgs"),
            available: [
                "wall.jpg",
                "wos.jpg",
                "tunnelcanals.jpg",
                "tryangles.jpg",
                "painters.jpg",
                "lido.jpg",
                "flower.jpg",
                "churchwiderview.jpg",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            gallery_slots: 8,
            fallback_size: 256,
            stroke_width: 8,
            palette: vec![
                [0x44, 0x44, 0xaa],
                [0xaa, 0x44, 0x44],
                [0x44, 0xaa, 0x44],
                [0xaa, 0xaa, 0x44],
            ],
        }
    }
}
