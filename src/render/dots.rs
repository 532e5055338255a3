//! Dot based counting layouts.

use anyhow::Result;
use plotters::prelude::*;
use rand::Rng;

use super::layout::{FontMeasure, TextMeasure};
use super::{draw_canvas, RenderedImage, CANVAS_WIDTH};

pub const DOT_CANVAS_HEIGHT: u32 = 400;
const DOT_INK: RGBColor = RGBColor(0x11, 0x18, 0x27);
const ROW_INK: RGBColor = RGBColor(0x11, 0x11, 0x11);

/// Geometry of the non-overlapping dot field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotField {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub radius: f64,
    pub min_gap: f64,
    pub max_attempts: u32,
}

impl Default for DotField {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH as f64,
            height: DOT_CANVAS_HEIGHT as f64,
            margin: 30.0,
            radius: 7.0,
            min_gap: 4.0,
            max_attempts: 500,
        }
    }
}

impl DotField {
    /// Minimum distance between two dot centers.
    pub fn min_distance(&self) -> f64 {
        self.radius * 2.0 + self.min_gap
    }

    /// Places up to `count` dot centers by rejection sampling.
    ///
    /// A dot that finds no free spot within `max_attempts` is dropped, so the
    /// result may hold fewer than `count` centers on a crowded canvas.
    pub fn place<R: Rng + ?Sized>(&self, count: u32, rng: &mut R) -> Vec<(f64, f64)> {
        let min_dist_sq = self.min_distance().powi(2);
        let span_x = self.width - self.margin * 2.0;
        let span_y = self.height - self.margin * 2.0;
        let mut centers: Vec<(f64, f64)> = Vec::with_capacity(count as usize);

        for _ in 0..count {
            for _ in 0..self.max_attempts {
                let x = self.margin + rng.random::<f64>() * span_x;
                let y = self.margin + rng.random::<f64>() * span_y;

                let clear = centers.iter().all(|&(cx, cy)| {
                    let (dx, dy) = (x - cx, y - cy);
                    dx * dx + dy * dy >= min_dist_sq
                });
                if clear {
                    centers.push((x, y));
                    break;
                }
            }
        }

        centers
    }
}

pub fn render_dot_field<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Result<RenderedImage> {
    let field = DotField::default();
    let centers = field.place(count, rng);
    if centers.len() < count as usize {
        crate::log(&format!(
            "Dot field crowded: placed {} of {} dots",
            centers.len(),
            count
        ));
    }

    let radius = field.radius.round() as i32;
    draw_canvas(CANVAS_WIDTH, DOT_CANVAS_HEIGHT, |root| {
        root.fill(&WHITE)?;
        for &(x, y) in &centers {
            root.draw(&Circle::new(
                (x.round() as i32, y.round() as i32),
                radius,
                DOT_INK.filled(),
            ))?;
        }
        Ok(())
    })
}

const ROW_FONT_SIZE: f64 = 36.0;
const ROW_LINE_HEIGHT: f64 = ROW_FONT_SIZE * 1.5;
const MAX_PER_ROW: u32 = 15;
const DOT_GLYPH: char = '●';

/// Splits `count` into rows of 5 to 15 dots (the last row may be shorter).
pub fn dot_rows<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Vec<u32> {
    let mut rows = Vec::new();
    let mut remaining = count;
    while remaining > 0 {
        let take = MAX_PER_ROW.min(remaining).min(rng.random_range(5..15));
        rows.push(take);
        remaining -= take;
    }
    rows
}

pub fn render_dot_rows<R: Rng + ?Sized>(
    count: u32,
    font_family: &str,
    rng: &mut R,
) -> Result<RenderedImage> {
    let lines: Vec<String> = dot_rows(count, rng)
        .into_iter()
        .map(|n| DOT_GLYPH.to_string().repeat(n as usize))
        .collect();

    let font = (font_family, ROW_FONT_SIZE).into_font().style(FontStyle::Bold);
    let measure = FontMeasure::new(font.clone());
    let text_style = font.color(&ROW_INK);
    let block_height = lines.len() as f64 * ROW_LINE_HEIGHT;
    let start_y = (DOT_CANVAS_HEIGHT as f64 - block_height) / 2.0;

    draw_canvas(CANVAS_WIDTH, DOT_CANVAS_HEIGHT, |root| {
        root.fill(&WHITE)?;
        for (i, line) in lines.iter().enumerate() {
            let x = (CANVAS_WIDTH as f64 - measure.text_width(line)) / 2.0;
            let y = start_y + i as f64 * ROW_LINE_HEIGHT;
            root.draw_text(line, &text_style, (x.round() as i32, y.round() as i32))?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_forty_dots_keep_spacing() {
        let mut rng = StdRng::seed_from_u64(40);
        let field = DotField::default();
        let centers = field.place(40, &mut rng);
        assert!(centers.len() <= 40);
        assert!(centers.len() >= 35);

        let min = field.min_distance();
        for (i, a) in centers.iter().enumerate() {
            assert!(a.0 >= field.margin && a.0 <= field.width - field.margin);
            assert!(a.1 >= field.margin && a.1 <= field.height - field.margin);
            for b in &centers[i + 1..] {
                let d = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
                assert!(d >= min, "dots {:?} and {:?} are {} apart", a, b, d);
            }
        }
    }

    #[test]
    fn test_crowded_field_places_fewer() {
        let mut rng = StdRng::seed_from_u64(7);
        let field = DotField {
            width: 100.0,
            height: 100.0,
            margin: 30.0,
            max_attempts: 50,
            ..DotField::default()
        };
        // 40x40 inner square fits only a handful of 18 px spaced dots
        let centers = field.place(50, &mut rng);
        assert!(!centers.is_empty());
        assert!(centers.len() < 50);
    }

    #[test]
    fn test_dot_rows_sum_to_count() {
        let mut rng = StdRng::seed_from_u64(3);
        for count in 30..=50 {
            let rows = dot_rows(count, &mut rng);
            assert_eq!(rows.iter().sum::<u32>(), count);
            assert!(rows.iter().all(|&n| (1..=MAX_PER_ROW).contains(&n)));
            assert!(rows[..rows.len() - 1].iter().all(|&n| n >= 5));
        }
    }

    #[test]
    fn test_render_dot_field_png() {
        let mut rng = StdRng::seed_from_u64(12);
        let image = render_dot_field(40, &mut rng).unwrap();
        assert_eq!((image.width, image.height), (CANVAS_WIDTH, DOT_CANVAS_HEIGHT));

        let pixels = image.decode().unwrap();
        let dark = pixels.pixels().filter(|p| p[0] < 100).count();
        assert!(dark > 0);
        // Corners stay inside the blank margin
        assert_eq!(pixels.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
