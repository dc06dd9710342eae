//! Printing data types

use chrono::NaiveDate;
use image::GrayImage;
use serde::Serialize;

/// One label to render
#[derive(Debug, Clone)]
pub struct LabelJob {
    pub category: String,
    /// Number shown on the label (and encoded in the barcode)
    pub number: u64,
    pub date: NaiveDate,
    /// Barcode payload
    pub barcode: String,
    /// Caption override (logo template)
    pub caption: Option<String>,
    /// Free text (custom template)
    pub text: Option<String>,
}

/// Finished monochrome bitmap (0 = black, 255 = white)
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub image: GrayImage,
    /// Generated code of a coupon label
    pub coupon_code: Option<String>,
}

impl RenderedLabel {
    pub fn new(image: GrayImage) -> Self {
        Self {
            image,
            coupon_code: None,
        }
    }
}

/// Result of handing a label to the printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PrintOutcome {
    pub fn printed() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
