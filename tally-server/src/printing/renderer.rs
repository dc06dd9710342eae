//! Label renderer: owns fonts, barcode generator and logo, and picks the
//! template for each job

use image::GrayImage;
use tracing::warn;

use super::barcode::Code128Generator;
use super::compositor::{
    LabelResult, LabelTemplate, RenderContext, TemplateKind, TemplateRenderer, load_logo,
};
use super::text::FontSet;
use super::types::{LabelJob, RenderedLabel};
use crate::core::Config;

/// Canvas heights of the fixed-height templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateHeights {
    pub default: u32,
    pub logo: u32,
    pub coupon: u32,
}

impl TemplateHeights {
    fn for_kind(&self, kind: TemplateKind) -> u32 {
        match kind {
            TemplateKind::Default | TemplateKind::Custom => self.default,
            TemplateKind::Logo => self.logo,
            TemplateKind::Coupon => self.coupon,
        }
    }
}

pub struct LabelRenderer {
    fonts: FontSet,
    barcode: Code128Generator,
    logo: Option<GrayImage>,
    width: u32,
    heights: TemplateHeights,
}

impl LabelRenderer {
    pub fn new(
        fonts: FontSet,
        barcode: Code128Generator,
        logo: Option<GrayImage>,
        width: u32,
        heights: TemplateHeights,
    ) -> Self {
        Self {
            fonts,
            barcode,
            logo,
            width,
            heights,
        }
    }

    /// Load fonts and logo named by `config`; `width` is the canvas width
    pub fn from_config(config: &Config, width: u32) -> Self {
        let fonts = FontSet::load(&config.font_path, &config.bold_font_path, config.font_size);

        let logo = match load_logo(&config.logo_path) {
            Ok(logo) => Some(logo),
            Err(e) => {
                warn!(error = %e, "Logo unavailable, logo labels show the caption only");
                None
            }
        };

        let heights = TemplateHeights {
            default: config.default_label_height,
            logo: config.logo_label_height,
            coupon: config.coupon_label_height,
        };

        Self::new(fonts, Code128Generator::default(), logo, width, heights)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn render(&self, kind: TemplateKind, job: &LabelJob) -> LabelResult<RenderedLabel> {
        let ctx = RenderContext {
            fonts: &self.fonts,
            barcode: &self.barcode,
            width: self.width,
            height: self.heights.for_kind(kind),
            logo: self.logo.as_ref(),
        };
        LabelTemplate::from(kind).render(job, &ctx)
    }
}
