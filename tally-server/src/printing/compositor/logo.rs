//! Logo template: logo bitmap with a caption beneath

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use tracing::debug;

use super::{
    LabelError, LabelResult, RenderContext, SECTION_GAP, TOP_OFFSET, TemplateRenderer,
    blank_canvas, centered, paste_centered,
};
use crate::printing::text::{line_height, wrap};
use crate::printing::types::{LabelJob, RenderedLabel};

const INK_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogoTemplate;

/// Load a logo file as a black/white bitmap
pub fn load_logo(path: &Path) -> LabelResult<GrayImage> {
    let image = image::open(path)
        .map_err(|e| LabelError::Logo(format!("{}: {}", path.display(), e)))?
        .to_luma8();
    Ok(threshold(image))
}

fn threshold(mut image: GrayImage) -> GrayImage {
    for pixel in image.pixels_mut() {
        *pixel = if pixel[0] < INK_THRESHOLD { Luma([0]) } else { Luma([255]) };
    }
    image
}

/// Scale down (never up) to fit `max_width` x `max_height`
fn fit(logo: &GrayImage, max_width: u32, max_height: u32) -> GrayImage {
    let (width, height) = logo.dimensions();
    if width <= max_width && height <= max_height {
        return logo.clone();
    }

    let ratio = (max_width as f32 / width as f32).min(max_height as f32 / height as f32);
    let new_width = ((width as f32 * ratio).round() as u32).clamp(1, max_width.max(1));
    let new_height = ((height as f32 * ratio).round() as u32).clamp(1, max_height.max(1));
    threshold(imageops::resize(logo, new_width, new_height, FilterType::Triangle))
}

impl TemplateRenderer for LogoTemplate {
    fn render(&self, job: &LabelJob, ctx: &RenderContext<'_>) -> LabelResult<RenderedLabel> {
        let mut canvas = blank_canvas(ctx.width, ctx.height);

        let caption = job
            .caption
            .clone()
            .unwrap_or_else(|| format!("{} # {}", job.category, job.number));

        let mut y = TOP_OFFSET;
        match ctx.logo {
            Some(logo) => {
                let scaled = fit(logo, ctx.width, ctx.height / 2);
                y = paste_centered(&mut canvas, &scaled, ctx.width, y) + SECTION_GAP;
            }
            None => debug!("No logo loaded, rendering caption only"),
        }

        let face = ctx.fonts.regular.as_ref();
        let pitch = line_height(face);
        for line in wrap(&caption, face, ctx.width) {
            let x = centered(ctx.width, face.text_width(&line));
            face.draw_text(&mut canvas, x, y as i32, &line);
            y += pitch;
        }

        Ok(RenderedLabel::new(canvas))
    }
}
