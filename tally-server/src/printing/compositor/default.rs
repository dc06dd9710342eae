//! Default template: title, date and barcode on a fixed-height canvas

use super::{
    LabelResult, RenderContext, SECTION_GAP, TOP_OFFSET, TemplateRenderer, blank_canvas,
    draw_date, draw_title, paste_centered,
};
use crate::printing::types::{LabelJob, RenderedLabel};

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTemplate;

impl TemplateRenderer for DefaultTemplate {
    fn render(&self, job: &LabelJob, ctx: &RenderContext<'_>) -> LabelResult<RenderedLabel> {
        let mut canvas = blank_canvas(ctx.width, ctx.height);

        let title_bottom = draw_title(&mut canvas, ctx, job, TOP_OFFSET);
        let date_bottom = draw_date(&mut canvas, ctx, job, title_bottom + SECTION_GAP);

        let barcode = ctx.barcode.render(&job.barcode, ctx.width)?;
        paste_centered(&mut canvas, &barcode, ctx.width, date_bottom + SECTION_GAP);

        Ok(RenderedLabel::new(canvas))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::printing::barcode::Code128Generator;

    #[test]
    fn test_layout_stacks_title_date_barcode() {
        let fonts = fonts();
        let barcode = Code128Generator::default();
        let ctx = context(&fonts, &barcode);

        let label = DefaultTemplate.render(&job(None), &ctx).unwrap();
        let image = &label.image;
        assert_eq!(image.dimensions(), (696, 453));

        let rows = inked_rows(image);
        // Title rows 20..60, date rows 80..120, barcode rows 140..290
        assert_eq!(rows.first(), Some(&20));
        assert!(rows.contains(&59) && !rows.contains(&60));
        assert!(rows.contains(&80) && rows.contains(&119));
        assert!(!rows.contains(&130));
        assert!(rows.contains(&140) && rows.contains(&289));
        assert_eq!(rows.last(), Some(&289));
    }

    #[test]
    fn test_barcode_is_centered() {
        let fonts = fonts();
        let barcode = Code128Generator::default();
        let ctx = context(&fonts, &barcode);

        let label = DefaultTemplate.render(&job(None), &ctx).unwrap();
        let y = 200;
        let inked: Vec<u32> = (0..696)
            .filter(|&x| label.image.get_pixel(x, y)[0] == 0)
            .collect();

        let left = *inked.first().unwrap();
        let right = 695 - *inked.last().unwrap();
        assert!(left.abs_diff(right) <= 3 * 2 + 1);
    }
}
