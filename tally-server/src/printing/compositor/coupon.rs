//! Coupon template: title, generated coupon code and date

use super::{
    LabelResult, RenderContext, SECTION_GAP, TOP_OFFSET, TemplateRenderer, blank_canvas,
    centered, draw_date, draw_title,
};
use crate::printing::types::{LabelJob, RenderedLabel};

/// Length of a coupon code
pub const COUPON_CODE_LEN: usize = 8;

#[derive(Debug, Clone, Copy, Default)]
pub struct CouponTemplate;

/// Fresh coupon code: upper-case hex from a random UUID
pub fn coupon_code() -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .to_uppercase()
        .chars()
        .take(COUPON_CODE_LEN)
        .collect()
}

impl TemplateRenderer for CouponTemplate {
    fn render(&self, job: &LabelJob, ctx: &RenderContext<'_>) -> LabelResult<RenderedLabel> {
        let mut canvas = blank_canvas(ctx.width, ctx.height);
        let code = coupon_code();

        let title_bottom = draw_title(&mut canvas, ctx, job, TOP_OFFSET);

        let bold = &ctx.fonts.bold;
        let code_y = title_bottom + SECTION_GAP;
        bold.draw_text(
            &mut canvas,
            centered(ctx.width, bold.text_width(&code)),
            code_y as i32,
            &code,
        );

        draw_date(&mut canvas, ctx, job, code_y + bold.glyph_height() + SECTION_GAP);

        Ok(RenderedLabel {
            image: canvas,
            coupon_code: Some(code),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::printing::barcode::Code128Generator;

    #[test]
    fn test_coupon_code_format() {
        let code = coupon_code();
        assert_eq!(code.len(), COUPON_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        assert_ne!(coupon_code(), coupon_code());
    }

    #[test]
    fn test_coupon_layout() {
        let fonts = fonts();
        let barcode = Code128Generator::default();
        let mut ctx = context(&fonts, &barcode);
        ctx.height = 420;

        let label = CouponTemplate.render(&job(None), &ctx).unwrap();
        assert_eq!(label.image.dimensions(), (696, 420));
        assert_eq!(label.coupon_code.as_deref().map(str::len), Some(COUPON_CODE_LEN));

        // Title 20..60, code 80..120, date 140..180
        let rows = inked_rows(&label.image);
        assert_eq!(rows.first(), Some(&20));
        assert!(rows.contains(&80) && rows.contains(&119));
        assert!(!rows.contains(&130));
        assert_eq!(rows.last(), Some(&179));
    }
}
