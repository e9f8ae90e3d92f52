//! Deterministic placeholder images for assets that could not be loaded.
//!
//! A placeholder is a solid square in a palette colour with a white
//! diagonal cross and two centred lines of text naming the missing asset.
//! Synthesis is a pure function of the name, colour and style: it does no
//! I/O and cannot fail.

use font8x8::legacy::BASIC_LEGACY;

use super::image::{ImageOrigin, ImageResource};
use crate::options::AssetOptions;

const GLYPH_SIZE: u32 = 8;
const WHITE: [u8; 3] = [0xff, 0xff, 0xff];

/// Fill colours for placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPalette {
    colors: Vec<[u8; 3]>,
}

impl FallbackPalette {
    /// Fallback fill used when a palette is configured empty.
    pub const DEFAULT_COLOR: [u8; 3] = [0x44, 0x44, 0xaa];

    /// Build a palette from sRGB triples.
    #[must_use]
    pub fn new(colors: Vec<[u8; 3]>) -> Self {
        Self { colors }
    }

    /// Number of colours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True if no colours are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour at `index`, wrapping around the palette.
    #[must_use]
    pub fn color_at(&self, index: usize) -> [u8; 3] {
        if self.colors.is_empty() {
            return Self::DEFAULT_COLOR;
        }
        self.colors[index % self.colors.len()]
    }

    /// Colour for a named asset: indexed by the name's length in
    /// characters.
    #[must_use]
    pub fn color_for_name(&self, name: &str) -> [u8; 3] {
        self.color_at(name.chars().count())
    }
}

impl Default for FallbackPalette {
    fn default() -> Self {
        Self::new(AssetOptions::default().palette)
    }
}

/// Largest placeholder edge, in pixels. Larger requests are clamped.
pub const MAX_FALLBACK_SIZE: u32 = 2048;

/// Geometry of a synthesized placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackStyle {
    /// Edge length in pixels.
    pub size: u32,
    /// Width in pixels of the diagonal cross.
    pub stroke_width: u32,
}

impl FallbackStyle {
    /// Style described by asset options, with the edge clamped to
    /// `1..=MAX_FALLBACK_SIZE`.
    #[must_use]
    pub fn from_options(options: &AssetOptions) -> Self {
        Self {
            size: options.fallback_size.clamp(1, MAX_FALLBACK_SIZE),
            stroke_width: options.stroke_width,
        }
    }
}

impl Default for FallbackStyle {
    fn default() -> Self {
        Self::from_options(&AssetOptions::default())
    }
}

/// First text line of a placeholder.
#[must_use]
pub fn caption(name: &str) -> String {
    format!("Missing: {name}")
}

/// Second text line of a placeholder.
pub const SUBCAPTION: &str = "Image Not Found";

/// Rasterize a placeholder for `name`.
///
/// `style.size` is clamped to `1..=MAX_FALLBACK_SIZE`.
#[must_use]
pub fn synthesize(name: &str, color: [u8; 3], style: FallbackStyle) -> ImageResource {
    let size = style.size.clamp(1, MAX_FALLBACK_SIZE);
    let mut canvas = Canvas::filled(size, color);
    canvas.draw_cross(style.stroke_width);

    let center = size / 2;
    canvas.draw_text_centered(&caption(name), center.saturating_sub(12), 2);
    canvas.draw_text_centered(SUBCAPTION, center + 20, 1);

    ImageResource::new(name, size, size, canvas.pixels, ImageOrigin::Fallback)
}

struct Canvas {
    size: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn filled(size: u32, color: [u8; 3]) -> Self {
        let texels = size as usize * size as usize;
        let pixels = [color[0], color[1], color[2], 0xff].repeat(texels);
        Self { size, pixels }
    }

    fn put(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x >= self.size || y >= self.size {
            return;
        }
        let idx = (y as usize * self.size as usize + x as usize) * 4;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
    }

    /// Both corner-to-corner diagonals, `width` pixels thick measured
    /// along each axis.
    fn draw_cross(&mut self, width: u32) {
        if width == 0 {
            return;
        }
        let half = i64::from(width / 2);
        let last = i64::from(self.size) - 1;
        for y in 0..self.size {
            for x in 0..self.size {
                let (xi, yi) = (i64::from(x), i64::from(y));
                let on_main = (xi - yi).abs() <= half;
                let on_anti = (xi + yi - last).abs() <= half;
                if on_main || on_anti {
                    self.put(x, y, WHITE);
                }
            }
        }
    }

    /// Draw `text` horizontally centred with its baseline near `baseline`.
    /// The glyph scale shrinks (down to 1) until the line fits.
    fn draw_text_centered(&mut self, text: &str, baseline: u32, max_scale: u32) {
        let chars = text.chars().count() as u32;
        if chars == 0 {
            return;
        }
        let mut scale = max_scale.max(1);
        while scale > 1 && chars.saturating_mul(GLYPH_SIZE * scale) > self.size {
            scale -= 1;
        }
        let glyph = GLYPH_SIZE * scale;
        let text_width = chars.saturating_mul(glyph);
        let left = self.size.saturating_sub(text_width) / 2;
        let top = baseline.saturating_sub(glyph);

        for (col, ch) in text.chars().enumerate() {
            let origin_x = left + col as u32 * glyph;
            for (row, bits) in glyph_for_char(ch).iter().enumerate() {
                for bit in 0..GLYPH_SIZE {
                    if (bits >> bit) & 0x01 == 0 {
                        continue;
                    }
                    let px = origin_x + bit * scale;
                    let py = top + row as u32 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.put(px + dx, py + dy, WHITE);
                        }
                    }
                }
            }
        }
    }
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}
