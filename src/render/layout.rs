//! Text measurement and greedy line wrapping.

use plotters::style::FontDesc;

/// Width of rendered text in pixels.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f64;
}

/// Measures with a real font through plotters.
pub struct FontMeasure<'a> {
    font: FontDesc<'a>,
}

impl<'a> FontMeasure<'a> {
    pub fn new(font: FontDesc<'a>) -> Self {
        Self { font }
    }
}

impl TextMeasure for FontMeasure<'_> {
    fn text_width(&self, text: &str) -> f64 {
        match self.font.box_size(text) {
            Ok((w, _)) => w as f64,
            // No usable font: estimate so layout still works
            Err(_) => FixedAdvance::for_size(self.font.get_size()).text_width(text),
        }
    }
}

/// Fixed per-character advance. Wide (non-ASCII) characters take a full em.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvance {
    pub narrow: f64,
    pub wide: f64,
}

impl FixedAdvance {
    pub fn for_size(font_size: f64) -> Self {
        Self {
            narrow: font_size * 0.55,
            wide: font_size,
        }
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&self, text: &str) -> f64 {
        text.chars()
            .map(|c| if c.is_ascii() { self.narrow } else { self.wide })
            .sum()
    }
}

/// Breaks `text` into lines no wider than `max_width`.
///
/// Characters are added one at a time; a line always holds at least one
/// character even if that character alone is too wide.
pub fn wrap_line(text: &str, max_width: f64, measure: &dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for ch in text.chars() {
        let mut candidate = line.clone();
        candidate.push(ch);
        if !line.is_empty() && measure.text_width(&candidate) > max_width {
            lines.push(std::mem::take(&mut line));
            line.push(ch);
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wraps each `\n` or `\r\n` separated paragraph, with one blank line between paragraphs.
pub fn wrap_paragraphs(text: &str, max_width: f64, measure: &dyn TextMeasure) -> Vec<String> {
    let paragraphs: Vec<&str> = text
        .split('\n')
        .map(|p| p.strip_suffix('\r').unwrap_or(p))
        .collect();

    let mut lines = Vec::new();
    for (i, paragraph) in paragraphs.iter().enumerate() {
        lines.extend(wrap_line(paragraph, max_width, measure));
        if i + 1 < paragraphs.len() {
            lines.push(String::new());
        }
    }
    lines
}

/// Typography and spacing of a text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub font_size: f64,
    pub line_height_factor: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub min_height: u32,
}

impl BlockStyle {
    pub fn line_height(&self) -> f64 {
        self.font_size * self.line_height_factor
    }

    pub fn max_line_width(&self, canvas_width: u32) -> f64 {
        canvas_width as f64 - self.padding_x * 2.0
    }
}

/// Wrapped lines positioned on a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub lines: Vec<String>,
    pub line_height: f64,
    pub height: u32,
    /// Top of the first line; the block is vertically centered.
    pub start_y: f64,
}

impl BlockLayout {
    pub fn new(lines: Vec<String>, style: &BlockStyle) -> Self {
        let line_height = style.line_height();
        let block_height = line_height * lines.len() as f64;
        let base_height = block_height + style.padding_y * 2.0;
        let height = (base_height.ceil() as u32).max(style.min_height);
        let start_y = (height as f64 - block_height) / 2.0;

        Self {
            lines,
            line_height,
            height,
            start_y,
        }
    }

    /// Top y coordinate of line `index`.
    pub fn line_y(&self, index: usize) -> f64 {
        self.start_y + index as f64 * self.line_height
    }
}
