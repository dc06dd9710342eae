//! Trailing whitespace cropping

use image::{GrayImage, imageops};

/// Rows kept below the last inked row
pub const BOTTOM_MARGIN: u32 = 10;

/// Pixels darker than this count as ink
const BACKGROUND_THRESHOLD: u8 = 128;

/// Crop blank rows from the bottom, keeping `margin` rows below the last
/// inked row
///
/// The result is never taller than the input. An all-blank image is returned
/// unchanged.
pub fn crop_trailing_blank(image: GrayImage, margin: u32) -> GrayImage {
    let (width, height) = image.dimensions();

    let last_inked = (0..height)
        .rev()
        .find(|&y| (0..width).any(|x| image.get_pixel(x, y)[0] < BACKGROUND_THRESHOLD));

    let Some(last) = last_inked else {
        return image;
    };

    let new_height = (last + 1 + margin).min(height);
    if new_height == height {
        return image;
    }
    imageops::crop_imm(&image, 0, 0, width, new_height).to_image()
}
