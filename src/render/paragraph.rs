//! Paragraph puzzles: sentences on manuscript paper and expressions on white.

use anyhow::Result;
use plotters::prelude::*;

use super::layout::{wrap_line, wrap_paragraphs, BlockLayout, BlockStyle, FontMeasure, TextMeasure};
use super::{draw_canvas, RenderedImage, CANVAS_WIDTH};

/// Rounds 1-3.
pub const MANUSCRIPT: BlockStyle = BlockStyle {
    font_size: 24.0,
    line_height_factor: 1.6,
    padding_x: 40.0,
    padding_y: 40.0,
    min_height: 260,
};

/// Round 4.
pub const PLAIN: BlockStyle = BlockStyle {
    font_size: 28.0,
    line_height_factor: 1.4,
    padding_x: 40.0,
    padding_y: 40.0,
    min_height: 200,
};

const PAPER: RGBColor = RGBColor(0xf1, 0xf1, 0xf1);
const RULE: RGBColor = RGBColor(0xe1, 0xe1, 0xe1);
const MARGIN_RULE: RGBColor = RGBColor(0xff, 0xb4, 0xb8);
const MANUSCRIPT_INK: RGBColor = RGBColor(0x11, 0x11, 0x11);
const PLAIN_INK: RGBColor = RGBColor(0x11, 0x18, 0x27);

const RULE_SPACING: u32 = 30;
const MARGIN_RULE_X: i32 = 50;
const MARGIN_RULE_WIDTH: i32 = 2;

/// Lays out a multi-paragraph text for the manuscript style.
pub fn layout_manuscript(text: &str, measure: &dyn TextMeasure) -> BlockLayout {
    let lines = wrap_paragraphs(text, MANUSCRIPT.max_line_width(CANVAS_WIDTH), measure);
    BlockLayout::new(lines, &MANUSCRIPT)
}

/// Lays out an expression for the plain style. Newlines are not treated specially.
pub fn layout_plain(text: &str, measure: &dyn TextMeasure) -> BlockLayout {
    let lines = wrap_line(text, PLAIN.max_line_width(CANVAS_WIDTH), measure);
    BlockLayout::new(lines, &PLAIN)
}

pub fn render_manuscript(text: &str, font_family: &str) -> Result<RenderedImage> {
    let font = (font_family, MANUSCRIPT.font_size).into_font();
    let layout = layout_manuscript(text, &FontMeasure::new(font.clone()));
    let width = CANVAS_WIDTH as i32;
    let height = layout.height as i32;

    draw_canvas(CANVAS_WIDTH, layout.height, |root| {
        root.fill(&PAPER)?;

        for y in (0..layout.height).step_by(RULE_SPACING as usize) {
            let y = y as i32;
            root.draw(&PathElement::new(vec![(0, y), (width, y)], RULE.stroke_width(1)))?;
        }

        root.draw(&Rectangle::new(
            [(MARGIN_RULE_X, 0), (MARGIN_RULE_X + MARGIN_RULE_WIDTH, height)],
            MARGIN_RULE.filled(),
        ))?;

        draw_lines(root, &layout, &MANUSCRIPT, font.color(&MANUSCRIPT_INK))
    })
}

pub fn render_plain(text: &str, font_family: &str) -> Result<RenderedImage> {
    let font = (font_family, PLAIN.font_size).into_font();
    let layout = layout_plain(text, &FontMeasure::new(font.clone()));

    draw_canvas(CANVAS_WIDTH, layout.height, |root| {
        root.fill(&WHITE)?;
        draw_lines(root, &layout, &PLAIN, font.color(&PLAIN_INK))
    })
}

fn draw_lines(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    layout: &BlockLayout,
    style: &BlockStyle,
    text_style: TextStyle<'_>,
) -> Result<()> {
    let x = style.padding_x as i32;
    for (i, line) in layout.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let y = layout.line_y(i).round() as i32;
        root.draw_text(line, &text_style, (x, y))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::FixedAdvance;

    #[test]
    fn test_short_text_uses_min_height() {
        let m = FixedAdvance::for_size(MANUSCRIPT.font_size);
        let layout = layout_manuscript("짧은 문장", &m);
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.height, MANUSCRIPT.min_height);
    }

    #[test]
    fn test_manuscript_lines_fit_width() {
        let m = FixedAdvance::for_size(MANUSCRIPT.font_size);
        let text = "가".repeat(100);
        let layout = layout_manuscript(&text, &m);
        let max = MANUSCRIPT.max_line_width(CANVAS_WIDTH);
        // 720 px at 24 px per glyph
        assert_eq!(layout.lines[0].chars().count(), 30);
        assert!(layout.lines.iter().all(|l| m.text_width(l) <= max));
        assert_eq!(layout.lines.concat(), text);
    }

    #[test]
    fn test_manuscript_height_grows() {
        let m = FixedAdvance::for_size(MANUSCRIPT.font_size);
        let text = "가".repeat(30 * 8);
        let layout = layout_manuscript(&text, &m);
        assert_eq!(layout.lines.len(), 8);
        let expected = (8.0 * MANUSCRIPT.line_height() + 80.0).ceil() as u32;
        assert_eq!(layout.height, expected);
        let block = 8.0 * MANUSCRIPT.line_height();
        assert!((layout.start_y - (expected as f64 - block) / 2.0).abs() < 1e-9);
        assert!(layout.start_y >= 40.0);
    }

    #[test]
    fn test_plain_keeps_expression_on_one_line() {
        let m = FixedAdvance::for_size(PLAIN.font_size);
        let layout = layout_plain("123 × 456 + 789", &m);
        assert_eq!(layout.lines, vec!["123 × 456 + 789".to_string()]);
        assert_eq!(layout.height, PLAIN.min_height);
    }
}
