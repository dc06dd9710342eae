//! Barcode payload and Code 128 bitmap
//!
//! Payload layout: `MMDDYYYY` + 2-digit category code + 4-digit sequence.
//!
//! ```text
//! 01152024 51 0007   ← "Coin", 2024-01-15, #7
//! ```

use barcoders::sym::code128::Code128;
use chrono::NaiveDate;
use image::{GrayImage, Luma};
use sha2::{Digest, Sha256};

use super::compositor::{LabelError, LabelResult};

const CHARSET_B: char = 'Ɓ';
const CHARSET_C: char = 'Ć';

/// Stable two-digit code for a category
///
/// First four bytes of SHA-256 over the UTF-8 bytes, big-endian, mod 100.
pub fn category_code(category: &str) -> u8 {
    let digest = Sha256::digest(category.as_bytes());
    let head = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    (head % 100) as u8
}

/// Build the barcode payload
///
/// Sequences of 10000 and above widen the last field; the payload is then
/// longer than 14 characters.
pub fn encode(category: &str, sequence: u64, date: NaiveDate) -> String {
    format!(
        "{}{:02}{:04}",
        date.format("%m%d%Y"),
        category_code(category),
        sequence
    )
}

/// Turns a payload into a monochrome barcode image
pub trait BarcodeGenerator: Send + Sync {
    /// Render `payload` no wider than `max_width` pixels
    fn render(&self, payload: &str, max_width: u32) -> LabelResult<GrayImage>;
}

/// Code 128 renderer
#[derive(Debug, Clone)]
pub struct Code128Generator {
    /// Preferred pixels per module
    pub module_width: u32,
    pub bar_height: u32,
    /// Quiet zone on each side, in modules
    pub quiet_zone: u32,
}

impl Default for Code128Generator {
    fn default() -> Self {
        Self {
            module_width: 3,
            bar_height: 150,
            quiet_zone: 10,
        }
    }
}

impl Code128Generator {
    fn modules(payload: &str) -> LabelResult<Vec<u8>> {
        if payload.is_empty() {
            return Err(LabelError::Barcode("empty payload".to_string()));
        }

        let numeric = payload.len() % 2 == 0 && payload.bytes().all(|b| b.is_ascii_digit());
        let charset = if numeric { CHARSET_C } else { CHARSET_B };

        let symbol = Code128::new(format!("{}{}", charset, payload))
            .map_err(|e| LabelError::Barcode(format!("{:?}", e)))?;
        Ok(symbol.encode())
    }
}

impl BarcodeGenerator for Code128Generator {
    fn render(&self, payload: &str, max_width: u32) -> LabelResult<GrayImage> {
        let modules = Self::modules(payload)?;
        let total = modules.len() as u32 + 2 * self.quiet_zone;

        let module_width = self.module_width.min(max_width / total.max(1)).max(1);
        let width = total * module_width;

        let mut image = GrayImage::from_pixel(width, self.bar_height, Luma([255]));
        for (i, bar) in modules.iter().enumerate() {
            if *bar == 0 {
                continue;
            }
            let x0 = (self.quiet_zone + i as u32) * module_width;
            for x in x0..x0 + module_width {
                for y in 0..self.bar_height {
                    image.put_pixel(x, y, Luma([0]));
                }
            }
        }

        Ok(image)
    }
}
