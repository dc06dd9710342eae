//! Label compositor
//!
//! Every template implements [`TemplateRenderer`]; [`LabelTemplate`] is the
//! closed set of templates, dispatched statically with `enum_dispatch`.
//! Shared drawing primitives (centering, the title line, pasting bitmaps)
//! live here so the templates only describe their layout.
//!
//! ```text
//!  ┌──────────────────────────────┐  ← TOP_OFFSET
//!  │        Coin  # 7             │
//!  │        01/15/2024            │  ← SECTION_GAP below each element
//!  │      ║║│║║│║│║║│║║           │
//!  └──────────────────────────────┘
//! ```

mod coupon;
mod custom;
mod default;
mod logo;

use enum_dispatch::enum_dispatch;
use image::{GrayImage, Luma, imageops};
use thiserror::Error;
use tracing::warn;

use super::barcode::BarcodeGenerator;
use super::text::FontSet;
use super::types::{LabelJob, RenderedLabel};
use crate::utils::AppError;

pub use coupon::{COUPON_CODE_LEN, CouponTemplate, coupon_code};
pub use custom::{CustomTemplate, Span, TextLayout, custom_text_layout, marker_number};
pub use default::DefaultTemplate;
pub use logo::{LogoTemplate, load_logo};

/// Distance from the top edge to the first element
pub const TOP_OFFSET: u32 = 20;

/// Vertical gap between stacked elements
pub const SECTION_GAP: u32 = 20;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Barcode encoding failed: {0}")]
    Barcode(String),

    #[error("Logo unusable: {0}")]
    Logo(String),

    #[error("Render failed: {0}")]
    Render(String),
}

pub type LabelResult<T> = Result<T, LabelError>;

impl From<LabelError> for AppError {
    fn from(err: LabelError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Everything a template needs besides the job itself
pub struct RenderContext<'a> {
    pub fonts: &'a FontSet,
    pub barcode: &'a dyn BarcodeGenerator,
    /// Canvas width (printable dots of the label roll)
    pub width: u32,
    /// Canvas height for fixed-height templates
    pub height: u32,
    pub logo: Option<&'a GrayImage>,
}

/// Render one label
#[enum_dispatch]
pub trait TemplateRenderer {
    fn render(&self, job: &LabelJob, ctx: &RenderContext<'_>) -> LabelResult<RenderedLabel>;
}

/// Available label templates
#[enum_dispatch(TemplateRenderer)]
#[derive(Debug, Clone, Copy)]
pub enum LabelTemplate {
    DefaultTemplate,
    LogoTemplate,
    CouponTemplate,
    CustomTemplate,
}

/// Template selector as named in requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Default,
    Logo,
    Coupon,
    Custom,
}

impl TemplateKind {
    /// Resolve a requested template name
    ///
    /// Absent names select the default template; unknown names fall back to
    /// it with a warning.
    pub fn parse(name: Option<&str>) -> Self {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return TemplateKind::Default;
        };

        match name.to_ascii_lowercase().as_str() {
            "default" => TemplateKind::Default,
            "logo" => TemplateKind::Logo,
            "coupon" => TemplateKind::Coupon,
            "custom" => TemplateKind::Custom,
            _ => {
                warn!(template = %name, "Unknown template, using default");
                TemplateKind::Default
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Default => "default",
            TemplateKind::Logo => "logo",
            TemplateKind::Coupon => "coupon",
            TemplateKind::Custom => "custom",
        }
    }
}

impl From<TemplateKind> for LabelTemplate {
    fn from(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Default => DefaultTemplate.into(),
            TemplateKind::Logo => LogoTemplate.into(),
            TemplateKind::Coupon => CouponTemplate.into(),
            TemplateKind::Custom => CustomTemplate.into(),
        }
    }
}

// ========== Shared primitives ==========

pub(crate) fn blank_canvas(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height.max(1), Luma([255]))
}

/// Left edge that centers `content_width` on the canvas
pub(crate) fn centered(canvas_width: u32, content_width: u32) -> i32 {
    (canvas_width.saturating_sub(content_width) / 2) as i32
}

/// Draw `text` centered in the regular face; returns the y below it
pub(crate) fn draw_centered(canvas: &mut GrayImage, ctx: &RenderContext<'_>, text: &str, y: u32) -> u32 {
    let face = &ctx.fonts.regular;
    let x = centered(ctx.width, face.text_width(text));
    face.draw_text(canvas, x, y as i32, text);
    y + face.glyph_height()
}

/// Draw `"{category}"` regular followed by `" # {number}"` bold, centered as
/// one line; returns the y below the taller of the two
pub(crate) fn draw_title(canvas: &mut GrayImage, ctx: &RenderContext<'_>, job: &LabelJob, y: u32) -> u32 {
    let regular = &ctx.fonts.regular;
    let bold = &ctx.fonts.bold;

    let main_text = job.category.as_str();
    let emphasized = format!(" # {}", job.number);
    let main_width = regular.text_width(main_text);

    let x = centered(ctx.width, main_width + bold.text_width(&emphasized));
    regular.draw_text(canvas, x, y as i32, main_text);
    bold.draw_text(canvas, x + main_width as i32, y as i32, &emphasized);

    y + regular.glyph_height().max(bold.glyph_height())
}

/// Draw the job's date as `MM/DD/YYYY`, centered; returns the y below it
pub(crate) fn draw_date(canvas: &mut GrayImage, ctx: &RenderContext<'_>, job: &LabelJob, y: u32) -> u32 {
    let date_text = job.date.format("%m/%d/%Y").to_string();
    draw_centered(canvas, ctx, &date_text, y)
}

/// Paste `image` horizontally centered at `y`; returns the y below it
pub(crate) fn paste_centered(canvas: &mut GrayImage, image: &GrayImage, canvas_width: u32, y: u32) -> u32 {
    let x = centered(canvas_width, image.width());
    imageops::overlay(canvas, image, x as i64, y as i64);
    y + image.height()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::printing::barcode::Code128Generator;

    #[test]
    fn test_template_kind_parse() {
        assert_eq!(TemplateKind::parse(None), TemplateKind::Default);
        assert_eq!(TemplateKind::parse(Some("")), TemplateKind::Default);
        assert_eq!(TemplateKind::parse(Some("Logo")), TemplateKind::Logo);
        assert_eq!(TemplateKind::parse(Some(" coupon ")), TemplateKind::Coupon);
        assert_eq!(TemplateKind::parse(Some("custom")), TemplateKind::Custom);
        assert_eq!(TemplateKind::parse(Some("fancy")), TemplateKind::Default);
    }

    #[test]
    fn test_draw_title_returns_bottom() {
        let fonts = fonts();
        let barcode = Code128Generator::default();
        let ctx = context(&fonts, &barcode);
        let mut canvas = blank_canvas(696, 200);

        let bottom = draw_title(&mut canvas, &ctx, &job(None), TOP_OFFSET);
        assert_eq!(bottom, TOP_OFFSET + 40);

        // "Coin # 7" = 8 cells of 20px, centered
        let left = centered(696, 160) as u32;
        assert_eq!(canvas.get_pixel(left + 10, TOP_OFFSET + 5)[0], 0);
        assert_eq!(canvas.get_pixel(left - 5, TOP_OFFSET + 5)[0], 255);
    }

    #[test]
    fn test_enum_dispatch_matches_kind() {
        let fonts = fonts();
        let barcode = Code128Generator::default();
        let ctx = context(&fonts, &barcode);

        let template = LabelTemplate::from(TemplateKind::Default);
        let label = template.render(&job(None), &ctx).unwrap();
        assert_eq!(label.image.width(), 696);
        assert_eq!(label.image.height(), 453);
        assert!(label.coupon_code.is_none());
    }
}
