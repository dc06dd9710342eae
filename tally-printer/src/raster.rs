//! Brother QL raster command builder
//!
//! Provides a fluent API for building QL raster print data, plus
//! [`rasterize_label`] which turns a monochrome bitmap into a complete job.

use crate::models::{LabelSpec, ModelSpec};

/// Number of zero bytes that clear a half-received job from the printer
const INVALIDATE_BYTES: usize = 200;

/// Media type byte for continuous rolls
const MEDIA_CONTINUOUS: u8 = 0x0A;

/// Valid-flag bits for `ESC i z`: media type, width, length, quality priority
const MEDIA_FLAGS: u8 = 0x80 | 0x02 | 0x04 | 0x08 | 0x40;

/// Luma below this value prints black
const DARK_THRESHOLD: u8 = 128;

/// QL raster command builder
///
/// Commands are appended in call order. Model capabilities decide whether
/// mode switching and cutter commands are emitted at all.
pub struct QlRasterBuilder {
    buf: Vec<u8>,
    model: ModelSpec,
    label: LabelSpec,
}

impl QlRasterBuilder {
    pub fn new(model: ModelSpec, label: LabelSpec) -> Self {
        Self {
            buf: Vec::with_capacity(8192),
            model,
            label,
        }
    }

    // === Job Control ===

    /// Flush any half-received job
    pub fn invalidate(&mut self) -> &mut Self {
        self.buf.extend(std::iter::repeat_n(0x00, INVALIDATE_BYTES));
        self
    }

    /// Initialize printer (ESC @)
    pub fn initialize(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x40]);
        self
    }

    /// Ask the printer to send its status (ESC i S)
    pub fn status_request(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x69, 0x53]);
        self
    }

    /// Switch to raster mode (ESC i a 1), skipped on models without modes
    pub fn switch_to_raster(&mut self) -> &mut Self {
        if self.model.mode_switching {
            self.buf.extend_from_slice(&[0x1B, 0x69, 0x61, 0x01]);
        }
        self
    }

    // === Page Setup ===

    /// Media and quality information (ESC i z) for a page of `lines` raster lines
    pub fn media_and_quality(&mut self, lines: u32) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x69, 0x7A, MEDIA_FLAGS]);
        self.buf
            .extend_from_slice(&[MEDIA_CONTINUOUS, self.label.width_mm, 0x00]);
        self.buf.extend_from_slice(&lines.to_le_bytes());
        // First page, then reserved byte
        self.buf.extend_from_slice(&[0x00, 0x00]);
        self
    }

    /// Various mode settings (ESC i M): auto cut
    pub fn auto_cut(&mut self, enabled: bool) -> &mut Self {
        if self.model.cutting {
            let flags = if enabled { 0x40 } else { 0x00 };
            self.buf.extend_from_slice(&[0x1B, 0x69, 0x4D, flags]);
        }
        self
    }

    /// Cut after every `n` labels (ESC i A n)
    pub fn cut_every(&mut self, n: u8) -> &mut Self {
        if self.model.cutting {
            self.buf.extend_from_slice(&[0x1B, 0x69, 0x41, n.max(1)]);
        }
        self
    }

    /// Expanded mode (ESC i K): cut at end
    pub fn expanded_mode(&mut self, cut_at_end: bool) -> &mut Self {
        let flags = if cut_at_end { 0x08 } else { 0x00 };
        self.buf.extend_from_slice(&[0x1B, 0x69, 0x4B, flags]);
        self
    }

    /// Feed margin (ESC i d n1 n2)
    pub fn margins(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x69, 0x64]);
        self.buf
            .extend_from_slice(&self.label.feed_margin.to_le_bytes());
        self
    }

    // === Raster Data ===

    /// Pack one image row into head-width bytes
    ///
    /// The image is right-aligned against the label's right margin and
    /// mirrored, because the head prints the row right-to-left. Columns past
    /// the printable width are dropped.
    pub fn pack_row(&self, image_width: u32, is_dark: impl Fn(u32) -> bool) -> Vec<u8> {
        let head = self.model.head_dots();
        let printable = self.label.printable_dots;
        let left_pad = head.saturating_sub(printable + self.label.right_margin_dots);

        let mut row = vec![0u8; self.model.bytes_per_row];
        for x in 0..image_width.min(printable) {
            if !is_dark(x) {
                continue;
            }
            let mirrored = head - 1 - (left_pad + x);
            let byte = (mirrored / 8) as usize;
            row[byte] |= 1 << (7 - (mirrored % 8));
        }
        row
    }

    /// Append one uncompressed raster line (g 0x00 n data)
    pub fn raster_row(&mut self, row: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(&[0x67, 0x00, row.len() as u8]);
        self.buf.extend_from_slice(row);
        self
    }

    /// Print the last page and feed (Control-Z)
    pub fn print_last(&mut self) -> &mut Self {
        self.buf.push(0x1A);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Convert a grayscale bitmap into a complete single-label QL job
///
/// Pixels with luma below 128 print black. `cut` only takes effect on
/// models with a cutter.
#[cfg(feature = "image")]
#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn rasterize_label(
    image: &image::GrayImage,
    model: ModelSpec,
    label: LabelSpec,
    cut: bool,
) -> Vec<u8> {
    let lines = image.height();
    let cut = cut && model.cutting;

    let mut b = QlRasterBuilder::new(model, label);
    b.invalidate()
        .initialize()
        .status_request()
        .switch_to_raster()
        .status_request()
        .media_and_quality(lines);
    if cut {
        b.auto_cut(true).cut_every(1);
    }
    b.expanded_mode(cut).margins();

    for y in 0..lines {
        let row = b.pack_row(image.width(), |x| image.get_pixel(x, y).0[0] < DARK_THRESHOLD);
        b.raster_row(&row);
    }

    b.print_last();
    tracing::debug!(lines, "Raster job built");
    b.build()
}
