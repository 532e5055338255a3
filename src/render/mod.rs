//! Puzzle rasterization.
//!
//! This module provides:
//! - Greedy line wrapping against a measured text width
//! - Manuscript and plain paragraph layouts (rounds 1-4)
//! - Scattered glyph, dot field and dot row layouts (round 5)
//! - PNG encoding of the finished canvas
//!
//! Drawing goes through plotters' bitmap backend into an in-memory RGB buffer,
//! which is then encoded with the image crate.

pub mod dots;
pub mod layout;
pub mod paragraph;
pub mod scatter;

use anyhow::{anyhow, Context, Result};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use rand::{Rng, RngCore};
use std::io::Cursor;

use crate::config::CountStyle;
use crate::puzzle::PuzzleContent;

/// Fixed width of every puzzle canvas.
pub const CANVAS_WIDTH: u32 = 800;

/// Tallest canvas drawn. Taller layouts fail and show the placeholder.
pub const MAX_CANVAS_HEIGHT: u32 = 8_000;

/// An encoded puzzle image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    /// PNG bytes. Empty only if even the placeholder could not be encoded.
    pub png: Vec<u8>,
}

impl RenderedImage {
    /// Blank white image shown when a puzzle fails to render.
    pub fn placeholder() -> Self {
        let (width, height) = (CANVAS_WIDTH, paragraph::PLAIN.min_height);
        let rgb = vec![255u8; rgb_len(width, height)];
        encode_png(width, height, rgb).unwrap_or(RenderedImage {
            width,
            height,
            png: Vec::new(),
        })
    }

    /// Decodes the PNG back into pixels (used for display).
    pub fn decode(&self) -> Result<RgbaImage> {
        let img = image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .context("Failed to decode puzzle image")?;
        Ok(img.to_rgba8())
    }
}

/// Byte length of a packed RGB buffer.
fn rgb_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// Encodes a packed RGB buffer as PNG.
pub fn encode_png(width: u32, height: u32, rgb: Vec<u8>) -> Result<RenderedImage> {
    let img = RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| anyhow!("Canvas buffer does not match {}x{}", width, height))?;

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .context("Failed to encode puzzle PNG")?;

    Ok(RenderedImage { width, height, png })
}

/// Runs `draw` on a fresh `width` x `height` canvas and encodes the result.
pub(crate) fn draw_canvas<F>(width: u32, height: u32, draw: F) -> Result<RenderedImage>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    if height > MAX_CANVAS_HEIGHT {
        return Err(anyhow!(
            "Canvas height {} exceeds the {} px limit",
            height,
            MAX_CANVAS_HEIGHT
        ));
    }

    let mut buffer = vec![255u8; rgb_len(width, height)];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw(&root)?;
        root.present().context("Failed to finalize puzzle canvas")?;
    }
    encode_png(width, height, buffer)
}

/// Turns puzzle content into an image.
pub trait Rasterize {
    fn rasterize(&self, content: &PuzzleContent, rng: &mut dyn RngCore) -> Result<RenderedImage>;
}

impl Rasterize for PuzzleRenderer {
    fn rasterize(&self, content: &PuzzleContent, rng: &mut dyn RngCore) -> Result<RenderedImage> {
        self.render(content, rng)
    }
}

/// Renders puzzle content with a configured font and counting style.
#[derive(Debug, Clone)]
pub struct PuzzleRenderer {
    font_family: String,
    count_style: CountStyle,
}

impl PuzzleRenderer {
    pub fn new(font_family: impl Into<String>, count_style: CountStyle) -> Self {
        Self {
            font_family: font_family.into(),
            count_style,
        }
    }

    pub fn count_style(&self) -> CountStyle {
        self.count_style
    }

    /// Renders one puzzle. Layout randomness is drawn from `rng`.
    pub fn render<R: Rng + ?Sized>(
        &self,
        content: &PuzzleContent,
        rng: &mut R,
    ) -> Result<RenderedImage> {
        match content {
            PuzzleContent::Paragraph(text) => paragraph::render_manuscript(text, &self.font_family),
            PuzzleContent::Expression(text) => paragraph::render_plain(text, &self.font_family),
            PuzzleContent::Count(count) => match self.count_style {
                CountStyle::Glyphs => scatter::render_scatter(*count, &self.font_family, rng),
                CountStyle::Dots => dots::render_dot_field(*count, rng),
                CountStyle::DotRows => dots::render_dot_rows(*count, &self.font_family, rng),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_roundtrip_dimensions() {
        let rgb = vec![200u8; 4 * 3 * 3];
        let image = encode_png(4, 3, rgb).unwrap();
        assert!(image.png.starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image.decode().unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn test_encode_png_rejects_wrong_size() {
        assert!(encode_png(10, 10, vec![0u8; 5]).is_err());
    }

    #[test]
    fn test_placeholder_is_white() {
        let image = RenderedImage::placeholder();
        assert_eq!(image.width, CANVAS_WIDTH);
        let decoded = image.decode().unwrap();
        assert_eq!(decoded.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_draw_canvas_fills_background() {
        let image = draw_canvas(20, 10, |root| {
            root.fill(&RGBColor(10, 20, 30))?;
            Ok(())
        })
        .unwrap();
        let decoded = image.decode().unwrap();
        assert_eq!(decoded.get_pixel(5, 5).0, [10, 20, 30, 255]);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_rgb_len_does_not_wrap() {
        assert_eq!(rgb_len(4, 3), 36);
        // 800 x 2_000_000 x 3 is past u32::MAX
        assert_eq!(rgb_len(CANVAS_WIDTH, 2_000_000) as u64, 4_800_000_000);
    }

    #[test]
    fn test_draw_canvas_rejects_oversized_height() {
        let mut drawn = false;
        let result = draw_canvas(CANVAS_WIDTH, 2_000_000, |_| {
            drawn = true;
            Ok(())
        });
        assert!(result.is_err());
        assert!(!drawn);
    }
}
