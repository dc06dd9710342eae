//! Custom template: free text with one emphasized `#<digits>` marker
//!
//! Layout rules:
//! - text before the marker wraps normally, left aligned
//! - the marker (bold) goes on the same line when it fits, else it starts
//!   a new line
//! - the text after the marker fills the rest of that line, then wraps
//!   beneath it
//!
//! The canvas grows with the text; blank rows at the bottom are cropped.

use std::num::ParseIntError;
use std::sync::LazyLock;

use regex::Regex;

use super::{
    LabelError, LabelResult, RenderContext, SECTION_GAP, TOP_OFFSET, TemplateRenderer,
    blank_canvas, draw_date, paste_centered,
};
use crate::printing::crop::{BOTTOM_MARGIN, crop_trailing_blank};
use crate::printing::text::{FontSet, GlyphFace, line_height, wrap};
use crate::printing::types::{LabelJob, RenderedLabel};

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("marker pattern is valid"));

/// Number carried by the first `#<digits>` marker, if any
pub fn marker_number(text: &str) -> Result<Option<u32>, ParseIntError> {
    match MARKER.captures(text) {
        Some(caps) => caps[1].parse().map(Some),
        None => Ok(None),
    }
}

/// A run of text at a fixed position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    /// Left edge in pixels
    pub x: u32,
    /// Zero-based line index
    pub line: usize,
    /// Drawn with the bold face
    pub emphasized: bool,
}

/// Positioned spans of a custom label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLayout {
    pub spans: Vec<Span>,
    /// Number of lines occupied, blank lines included
    pub lines: usize,
}

impl TextLayout {
    fn push(&mut self, text: impl Into<String>, x: u32, line: usize, emphasized: bool) {
        let text = text.into();
        self.lines = self.lines.max(line + 1);
        if !text.is_empty() {
            self.spans.push(Span {
                text,
                x,
                line,
                emphasized,
            });
        }
    }

    /// Wrap `text` starting at `first_line`; returns the last line used
    fn push_wrapped(&mut self, text: &str, face: &dyn GlyphFace, width: u32, first_line: usize) -> usize {
        let mut line = first_line;
        for (i, wrapped) in wrap(text, face, width).enumerate() {
            line = first_line + i;
            self.push(wrapped, 0, line, false);
        }
        line
    }
}

/// Lay out `text` on a canvas `width` pixels wide
pub fn custom_text_layout(text: &str, fonts: &FontSet, width: u32) -> TextLayout {
    let regular = fonts.regular.as_ref();
    let bold = fonts.bold.as_ref();
    let space = regular.text_width(" ");
    let mut layout = TextLayout::default();

    let Some(marker) = MARKER.find(text) else {
        layout.push_wrapped(text, regular, width, 0);
        return layout;
    };

    // Text before the marker
    let raw_before = &text[..marker.start()];
    let before = raw_before.trim_end();
    let breaks = raw_before[before.len()..].matches('\n').count();
    let glued_before = !before.is_empty() && before.len() == raw_before.len();

    let mut line = 0;
    let mut cursor = 0;
    if !before.is_empty() {
        line = layout.push_wrapped(before, regular, width, 0);
        cursor = layout
            .spans
            .last()
            .filter(|span| span.line == line)
            .map(|span| span.x + regular.text_width(&span.text))
            .unwrap_or(0);
    }

    // The marker itself; every newline in front of it is a hard break
    let marker_width = bold.text_width(marker.as_str());
    let mut x = match cursor {
        0 => 0,
        _ if glued_before => cursor,
        _ => cursor + space,
    };
    if breaks > 0 {
        line += breaks;
        x = 0;
    } else if !before.is_empty() && x + marker_width > width {
        line += 1;
        x = 0;
    }
    layout.push(marker.as_str(), x, line, true);
    cursor = x + marker_width;

    // Remainder: fill the marker's line, then wrap beneath
    let after = &text[marker.end()..];
    let (tail, below) = match after.split_once('\n') {
        Some((tail, below)) => (tail, Some(below)),
        None => (after, None),
    };

    let glued = !after.starts_with(char::is_whitespace);
    let fill_x = if glued { cursor } else { cursor + space };
    let mut words = tail.split_whitespace().peekable();
    let mut fill = String::new();
    while let Some(word) = words.peek() {
        let candidate = if fill.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", fill, word)
        };
        if fill_x + regular.text_width(&candidate) > width {
            break;
        }
        fill = candidate;
        words.next();
    }
    layout.push(fill, fill_x, line, false);

    let mut beneath = words.collect::<Vec<_>>().join(" ");
    if let Some(below) = below {
        if !beneath.is_empty() {
            beneath.push('\n');
        }
        beneath.push_str(below);
    }
    if below.is_some() || !beneath.is_empty() {
        layout.push_wrapped(&beneath, regular, width, line + 1);
    }

    layout
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomTemplate;

impl TemplateRenderer for CustomTemplate {
    fn render(&self, job: &LabelJob, ctx: &RenderContext<'_>) -> LabelResult<RenderedLabel> {
        let text = job
            .text
            .as_deref()
            .ok_or_else(|| LabelError::Render("custom label without text".to_string()))?;

        let regular = ctx.fonts.regular.as_ref();
        let bold = ctx.fonts.bold.as_ref();
        let layout = custom_text_layout(text, ctx.fonts, ctx.width);
        let pitch = line_height(regular).max(line_height(bold));

        let barcode = ctx.barcode.render(&job.barcode, ctx.width)?;
        let date_y = TOP_OFFSET + layout.lines as u32 * pitch + SECTION_GAP;
        let barcode_y = date_y + regular.glyph_height() + SECTION_GAP;
        let height = barcode_y + barcode.height() + SECTION_GAP;

        let mut canvas = blank_canvas(ctx.width, height);
        for span in &layout.spans {
            let face = if span.emphasized { bold } else { regular };
            let y = TOP_OFFSET + span.line as u32 * pitch;
            face.draw_text(&mut canvas, span.x as i32, y as i32, &span.text);
        }
        draw_date(&mut canvas, ctx, job, date_y);
        paste_centered(&mut canvas, &barcode, ctx.width, barcode_y);

        Ok(RenderedLabel::new(crop_trailing_blank(canvas, BOTTOM_MARGIN)))
    }
}
