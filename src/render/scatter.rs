//! Scattered syllable field for the counting round.
//!
//! The canvas is divided into a randomly sized grid with more cells than
//! glyphs. Each cell gets one jittered candidate position, the candidates are
//! shuffled and the first `count` receive a random syllable.

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::{draw_canvas, RenderedImage, CANVAS_WIDTH};

pub const SCATTER_HEIGHT: u32 = 600;
const FONT_SIZE: f64 = 32.0;
const INK: RGBColor = RGBColor(0x11, 0x11, 0x11);

const MIN_COLS: u32 = 7;
const MAX_COLS: u32 = 14;
/// Jitter span as a fraction of the cell size (±20%).
const JITTER: f64 = 0.4;

/// Syllables drawn in the field.
pub const SYLLABLE_POOL: [&str; 24] = [
    "고", "혀", "레", "별", "꿈", "숲", "칼", "집", "글", "빛", "문", "공", "점", "책", "밤",
    "달", "손", "눈", "맛", "밥", "숫", "끈", "길", "값",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatterGrid {
    pub cols: u32,
    pub rows: u32,
}

impl ScatterGrid {
    /// Picks a grid with between 1.3x and 2x as many cells as glyphs.
    pub fn for_count<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Self {
        let min_cells = (count as f64 * 1.3).ceil() as u32;
        let max_cells = (count as f64 * 2.0).ceil() as u32;
        let spread = max_cells.saturating_sub(min_cells).max(1);
        let total = min_cells + rng.random_range(0..spread);

        let aspect = CANVAS_WIDTH as f64 / SCATTER_HEIGHT as f64;
        let cols = ((total as f64 * aspect).sqrt().round() as u32).clamp(MIN_COLS, MAX_COLS);
        let rows = total.div_ceil(cols);
        Self { cols, rows }
    }

    pub fn cells(&self) -> u32 {
        self.cols * self.rows
    }
}

/// A syllable and its center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub x: f64,
    pub y: f64,
    pub glyph: &'static str,
}

/// Places `min(count, cells)` glyphs on the canvas.
pub fn scatter_glyphs<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Vec<GlyphPlacement> {
    let grid = ScatterGrid::for_count(count, rng);
    if grid.rows == 0 {
        return Vec::new();
    }

    let cell_w = CANVAS_WIDTH as f64 / grid.cols as f64;
    let cell_h = SCATTER_HEIGHT as f64 / grid.rows as f64;

    let mut positions = Vec::with_capacity(grid.cells() as usize);
    for r in 0..grid.rows {
        for c in 0..grid.cols {
            let jitter_x = (rng.random::<f64>() - 0.5) * cell_w * JITTER;
            let jitter_y = (rng.random::<f64>() - 0.5) * cell_h * JITTER;
            positions.push((
                c as f64 * cell_w + cell_w / 2.0 + jitter_x,
                r as f64 * cell_h + cell_h / 2.0 + jitter_y,
            ));
        }
    }
    positions.shuffle(rng);

    positions
        .into_iter()
        .take(count as usize)
        .map(|(x, y)| GlyphPlacement {
            x,
            y,
            glyph: SYLLABLE_POOL.choose(rng).copied().unwrap_or("고"),
        })
        .collect()
}

pub fn render_scatter<R: Rng + ?Sized>(
    count: u32,
    font_family: &str,
    rng: &mut R,
) -> Result<RenderedImage> {
    let placements = scatter_glyphs(count, rng);
    if placements.len() < count as usize {
        crate::log(&format!(
            "Scatter grid too small: drew {} of {} glyphs",
            placements.len(),
            count
        ));
    }

    let style = (font_family, FONT_SIZE)
        .into_font()
        .style(FontStyle::Bold)
        .color(&INK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    draw_canvas(CANVAS_WIDTH, SCATTER_HEIGHT, |root| {
        root.fill(&WHITE)?;
        for p in &placements {
            root.draw_text(p.glyph, &style, (p.x.round() as i32, p.y.round() as i32))?;
        }
        Ok(())
    })
}
