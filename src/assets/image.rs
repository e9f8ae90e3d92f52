//! Shared image resources handed out by the asset cache.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::AssetError;
use crate::gpu::texture::ImageTexture;

/// Shared handle to an image resource.
///
/// Handles are compared by identity ([`same_resource`]), not content:
/// scene code caches per-slot state keyed on the handle it was given.
pub type ImageHandle = Rc<ImageResource>;

/// Whether a resource came from a real load or was synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Decoded from bytes returned by an image source.
    Loaded,
    /// Synthesized placeholder standing in for a missing image.
    Fallback,
}

/// CPU-side RGBA8 pixels plus a lazily created GPU texture.
pub struct ImageResource {
    label: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    origin: ImageOrigin,
    texture: RefCell<Option<ImageTexture>>,
    released: Cell<bool>,
}

impl ImageResource {
    /// Wrap tightly packed RGBA8 pixels.
    ///
    /// `pixels.len()` must equal `width * height * 4`.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        origin: ImageOrigin,
    ) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self {
            label: label.into(),
            width,
            height,
            pixels,
            origin,
            texture: RefCell::new(None),
            released: Cell::new(false),
        }
    }

    /// Asset name this resource was created for.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 pixel data.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Where the pixels came from.
    #[must_use]
    pub fn origin(&self) -> ImageOrigin {
        self.origin
    }

    /// True for synthesized placeholders.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.origin == ImageOrigin::Fallback
    }

    /// True once [`release`](Self::release) has run.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released.get()
    }

    /// True if a GPU texture currently backs this resource.
    #[must_use]
    pub fn is_uploaded(&self) -> bool {
        self.texture.borrow().is_some()
    }

    /// Upload the pixels to the GPU if that has not happened yet.
    ///
    /// Repeated calls reuse the existing texture.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Released`] if the resource was released.
    pub fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<(), AssetError> {
        if self.released.get() {
            return Err(AssetError::Released {
                name: self.label.clone(),
            });
        }
        let mut slot = self.texture.borrow_mut();
        if slot.is_none() {
            *slot = Some(ImageTexture::upload(
                device,
                queue,
                &self.label,
                self.width,
                self.height,
                &self.pixels,
            ));
        }
        Ok(())
    }

    /// Run `f` against the GPU texture, if one has been uploaded.
    pub fn with_texture<R>(&self, f: impl FnOnce(&ImageTexture) -> R) -> Option<R> {
        self.texture.borrow().as_ref().map(f)
    }

    /// Destroy the GPU texture and mark the resource released.
    ///
    /// Returns `false` if it was already released.
    pub fn release(&self) -> bool {
        if self.released.replace(true) {
            return false;
        }
        if let Some(texture) = self.texture.borrow_mut().take() {
            texture.destroy();
        }
        true
    }
}

impl fmt::Debug for ImageResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageResource")
            .field("label", &self.label)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("origin", &self.origin)
            .field("uploaded", &self.is_uploaded())
            .field("released", &self.released.get())
            .finish_non_exhaustive()
    }
}

/// True if both handles point at the same resource instance.
#[must_use]
pub fn same_resource(a: &ImageHandle, b: &ImageHandle) -> bool {
    Rc::ptr_eq(a, b)
}
