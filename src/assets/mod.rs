//! Image-resource lifecycle management.
//!
//! [`AssetCache`] preloads a fixed registry of images from an
//! [`ImageSource`], substitutes deterministic placeholders for anything
//! that fails, and hands out reference-stable [`ImageHandle`]s
//! synchronously. GPU textures are created lazily per handle and released
//! by [`AssetCache::dispose`].

pub mod cache;
pub mod fallback;
pub mod image;
pub mod progress;
pub mod source;

use std::fmt;

pub use cache::{placeholder_name, strip_directory, AssetCache};
pub use fallback::{FallbackPalette, FallbackStyle};
pub use image::{same_resource, ImageHandle, ImageOrigin, ImageResource};
pub use progress::{PreloadProgress, PreloadReport};
pub use source::{DirectorySource, ImageSource, LoadError, MemorySource};

/// Contract violations when using the asset cache or its resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The cache was disposed and has not been reinitialized.
    Disposed,
    /// The resource's GPU memory was already released.
    Released {
        /// Label of the released resource.
        name: String,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disposed => {
                write!(f, "asset cache used after dispose without reinitialize")
            }
            Self::Released { name } => {
                write!(f, "image resource {name} was already released")
            }
        }
    }
}

impl std::error::Error for AssetError {}
