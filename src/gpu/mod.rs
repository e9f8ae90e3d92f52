//! GPU resource management utilities.

/// Sampled image textures uploaded from RGBA8 pixel data.
pub mod texture;
