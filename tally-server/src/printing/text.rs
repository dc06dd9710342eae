//! Text measurement and wrapping
//!
//! Faces measure and draw in whole pixels on a `GrayImage` (0 = black).
//! [`wrap`] breaks text greedily at whitespace so that every line fits the
//! requested width, except a single word that is wider on its own.

use std::iter::Peekable;
use std::path::Path;
use std::str::{Split, SplitWhitespace};
use std::sync::Arc;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{GrayImage, Luma};
use tracing::{info, warn};

/// Gap added below every line
pub const LINE_SPACING: u32 = 10;

/// Measurement and drawing capability of a font at a fixed size
pub trait GlyphFace: Send + Sync {
    /// Advance width of `text` in pixels
    fn text_width(&self, text: &str) -> u32;

    /// Height of one line of glyphs (ascent to descent)
    fn glyph_height(&self) -> u32;

    /// Draw `text` with its top-left corner at `(x, y)`
    fn draw_text(&self, canvas: &mut GrayImage, x: i32, y: i32, text: &str);
}

/// TrueType / OpenType face rendered with `ab_glyph`
pub struct TrueTypeFace {
    font: FontArc,
    scale: PxScale,
}

impl TrueTypeFace {
    pub fn from_bytes(data: Vec<u8>, size: f32) -> Result<Self, String> {
        let font = FontArc::try_from_vec(data).map_err(|e| e.to_string())?;
        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }

    pub fn load(path: &Path, size: f32) -> Result<Self, String> {
        let data = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        Self::from_bytes(data, size)
    }
}

impl GlyphFace for TrueTypeFace {
    fn text_width(&self, text: &str) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0f32;
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width.ceil().max(0.0) as u32
    }

    fn glyph_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        (scaled.ascent() - scaled.descent()).ceil() as u32
    }

    fn draw_text(&self, canvas: &mut GrayImage, x: i32, y: i32, text: &str) {
        let scaled = self.font.as_scaled(self.scale);
        let baseline = y as f32 + scaled.ascent();
        let (width, height) = canvas.dimensions();

        let mut x_offset = x as f32;
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                x_offset += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, ab_glyph::point(x_offset, baseline));

            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|px, py, coverage| {
                    let cx = bounds.min.x as i32 + px as i32;
                    let cy = bounds.min.y as i32 + py as i32;
                    if coverage >= 0.5
                        && cx >= 0
                        && cy >= 0
                        && (cx as u32) < width
                        && (cy as u32) < height
                    {
                        canvas.put_pixel(cx as u32, cy as u32, Luma([0]));
                    }
                });
            }

            x_offset += scaled.h_advance(id);
            previous = Some(id);
        }
    }
}

/// Fixed-cell face: every non-space character is a solid block
///
/// Used when no font file is available, and in tests where exact metrics
/// matter.
#[derive(Debug, Clone, Copy)]
pub struct BlockFace {
    pub advance: u32,
    pub height: u32,
}

impl BlockFace {
    pub fn new(advance: u32, height: u32) -> Self {
        Self { advance, height }
    }

    /// Cell proportions roughly matching a sans-serif face at `size` px
    pub fn for_size(size: f32) -> Self {
        Self {
            advance: (size * 0.6).round().max(1.0) as u32,
            height: size.round().max(1.0) as u32,
        }
    }
}

impl GlyphFace for BlockFace {
    fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance
    }

    fn glyph_height(&self) -> u32 {
        self.height
    }

    fn draw_text(&self, canvas: &mut GrayImage, x: i32, y: i32, text: &str) {
        let (width, height) = canvas.dimensions();
        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let cell = x + (i as u32 * self.advance) as i32;
            for cx in (cell + 1)..(cell + self.advance as i32 - 1) {
                for cy in y..(y + self.height as i32) {
                    if cx >= 0 && cy >= 0 && (cx as u32) < width && (cy as u32) < height {
                        canvas.put_pixel(cx as u32, cy as u32, Luma([0]));
                    }
                }
            }
        }
    }
}

/// Regular and bold faces used by the templates
#[derive(Clone)]
pub struct FontSet {
    pub regular: Arc<dyn GlyphFace>,
    pub bold: Arc<dyn GlyphFace>,
}

impl FontSet {
    /// Load both faces, falling back to [`BlockFace`] for a face that cannot
    /// be read or parsed
    pub fn load(regular: &Path, bold: &Path, size: f32) -> Self {
        Self {
            regular: load_face(regular, size),
            bold: load_face(bold, size),
        }
    }

    /// Both faces as the same fixed-cell face
    pub fn blocks(face: BlockFace) -> Self {
        Self {
            regular: Arc::new(face),
            bold: Arc::new(face),
        }
    }
}

fn load_face(path: &Path, size: f32) -> Arc<dyn GlyphFace> {
    match TrueTypeFace::load(path, size) {
        Ok(face) => {
            info!(path = %path.display(), size, "Font loaded");
            Arc::new(face)
        }
        Err(e) => {
            warn!(error = %e, "Font unavailable, using block glyphs");
            Arc::new(BlockFace::for_size(size))
        }
    }
}

/// Line pitch for `font`
pub fn line_height(font: &dyn GlyphFace) -> u32 {
    font.glyph_height() + LINE_SPACING
}

/// Wrap `text` to `max_width` pixels
///
/// `\n` forces a break. Empty input yields a single empty line.
pub fn wrap<'a>(text: &'a str, font: &'a dyn GlyphFace, max_width: u32) -> WrappedLines<'a> {
    WrappedLines {
        font,
        max_width,
        paragraphs: text.split('\n'),
        words: None,
    }
}

/// Lazy iterator over wrapped lines; clone it to restart from the same point
#[derive(Clone)]
pub struct WrappedLines<'a> {
    font: &'a dyn GlyphFace,
    max_width: u32,
    paragraphs: Split<'a, char>,
    words: Option<Peekable<SplitWhitespace<'a>>>,
}

impl Iterator for WrappedLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.words.is_none() {
            let paragraph = self.paragraphs.next()?;
            let mut words = paragraph.split_whitespace().peekable();
            if words.peek().is_none() {
                return Some(String::new());
            }
            self.words = Some(words);
        }

        let words = self.words.as_mut()?;
        let mut line = words.next()?.to_string();
        while let Some(word) = words.peek() {
            let candidate = format!("{} {}", line, word);
            if self.font.text_width(&candidate) > self.max_width {
                break;
            }
            line = candidate;
            words.next();
        }

        if words.peek().is_none() {
            self.words = None;
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face() -> BlockFace {
        BlockFace::new(10, 20)
    }

    #[test]
    fn test_block_metrics() {
        let f = face();
        assert_eq!(f.text_width("abc"), 30);
        assert_eq!(f.text_width(""), 0);
        assert_eq!(line_height(&f), 30);
    }

    #[test]
    fn test_wrap_empty_is_one_empty_line() {
        let f = face();
        let lines: Vec<String> = wrap("", &f, 100).collect();
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_wrap_oversized_word_alone() {
        let f = face();
        let lines: Vec<String> =
            wrap("a very long word with no spaces exceeding width", &f, 50).collect();

        assert!(lines.contains(&"exceeding".to_string()));
        assert!(lines.contains(&"spaces".to_string()));
        for line in &lines {
            let fits = f.text_width(line) <= 50;
            let single_word = !line.contains(' ');
            assert!(fits || single_word, "line {:?} overflows", line);
        }
        assert_eq!(
            lines.join(" "),
            "a very long word with no spaces exceeding width"
        );
    }

    #[test]
    fn test_wrap_greedy_fill() {
        let f = face();
        let lines: Vec<String> = wrap("ab cd ef gh", &f, 50).collect();
        assert_eq!(lines, vec!["ab cd", "ef gh"]);
    }

    #[test]
    fn test_wrap_hard_breaks() {
        let f = face();
        let lines: Vec<String> = wrap("ab\n\ncd", &f, 100).collect();
        assert_eq!(lines, vec!["ab", "", "cd"]);
    }

    #[test]
    fn test_wrap_is_restartable() {
        let f = face();
        let lines = wrap("one two three four", &f, 80);
        let first: Vec<String> = lines.clone().collect();
        let second: Vec<String> = lines.collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_block_draw() {
        let f = face();
        let mut canvas = GrayImage::from_pixel(40, 20, Luma([255]));
        f.draw_text(&mut canvas, 0, 0, "a b");

        assert_eq!(canvas.get_pixel(5, 5)[0], 0);
        assert_eq!(canvas.get_pixel(15, 5)[0], 255);
        assert_eq!(canvas.get_pixel(25, 5)[0], 0);
        // Cell gutter
        assert_eq!(canvas.get_pixel(0, 5)[0], 255);
    }

    #[test]
    fn test_missing_font_falls_back_to_blocks() {
        let fonts = FontSet::load(
            Path::new("/nonexistent/regular.ttf"),
            Path::new("/nonexistent/bold.ttf"),
            50.0,
        );
        assert_eq!(fonts.regular.glyph_height(), 50);
        assert_eq!(fonts.bold.text_width("ab"), 60);
    }
}
