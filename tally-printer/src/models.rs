//! Brother QL model and label roll tables

use crate::error::{PrintError, PrintResult};

/// Capabilities of a QL printer model that affect the raster stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: &'static str,
    /// Bytes per raster line (print head pins / 8)
    pub bytes_per_row: usize,
    /// Accepts `ESC i a` (switch to raster mode)
    pub mode_switching: bool,
    /// Has an automatic cutter
    pub cutting: bool,
}

impl ModelSpec {
    /// Print head width in dots
    pub fn head_dots(&self) -> u32 {
        (self.bytes_per_row * 8) as u32
    }

    /// Look up a model by its identifier (case-insensitive, e.g. "QL-700")
    pub fn find(name: &str) -> PrintResult<Self> {
        let wanted = name.trim();
        MODELS
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| PrintError::UnsupportedModel(wanted.to_string()))
    }
}

const fn model(
    name: &'static str,
    bytes_per_row: usize,
    mode_switching: bool,
    cutting: bool,
) -> ModelSpec {
    ModelSpec {
        name,
        bytes_per_row,
        mode_switching,
        cutting,
    }
}

static MODELS: &[ModelSpec] = &[
    model("QL-500", 90, false, false),
    model("QL-550", 90, false, true),
    model("QL-560", 90, false, true),
    model("QL-570", 90, true, true),
    model("QL-580N", 90, true, true),
    model("QL-650TD", 90, true, true),
    model("QL-700", 90, true, true),
    model("QL-710W", 90, true, true),
    model("QL-720NW", 90, true, true),
    model("QL-800", 90, true, true),
    model("QL-810W", 90, true, true),
    model("QL-820NWB", 90, true, true),
    model("QL-1050", 162, true, true),
    model("QL-1060N", 162, true, true),
];

/// A continuous (endless) label roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSpec {
    /// Identifier as printed on the roll, e.g. "62"
    pub id: &'static str,
    /// Tape width in millimetres
    pub width_mm: u8,
    /// Printable width in dots; this is the canvas width for rendering
    pub printable_dots: u32,
    /// Unprintable dots on the right side of the head
    pub right_margin_dots: u32,
    /// Feed margin in dots sent with `ESC i d`
    pub feed_margin: u16,
}

impl LabelSpec {
    /// Look up a continuous label roll by id (e.g. "62")
    pub fn find(id: &str) -> PrintResult<Self> {
        let wanted = id.trim();
        LABELS
            .iter()
            .find(|l| l.id == wanted)
            .copied()
            .ok_or_else(|| PrintError::UnsupportedLabel(wanted.to_string()))
    }
}

const fn label(id: &'static str, width_mm: u8, printable_dots: u32, right_margin_dots: u32) -> LabelSpec {
    LabelSpec {
        id,
        width_mm,
        printable_dots,
        right_margin_dots,
        feed_margin: 35,
    }
}

static LABELS: &[LabelSpec] = &[
    label("12", 12, 106, 29),
    label("29", 29, 306, 6),
    label("38", 38, 413, 12),
    label("50", 50, 554, 12),
    label("54", 54, 590, 0),
    label("62", 62, 696, 12),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_model_case_insensitive() {
        let m = ModelSpec::find("ql-700").unwrap();
        assert_eq!(m.name, "QL-700");
        assert_eq!(m.head_dots(), 720);
        assert!(m.cutting);
    }

    #[test]
    fn test_unknown_model() {
        assert!(matches!(
            ModelSpec::find("QL-9999"),
            Err(PrintError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_find_label_62() {
        let l = LabelSpec::find(" 62 ").unwrap();
        assert_eq!(l.printable_dots, 696);
        assert_eq!(l.right_margin_dots, 12);
        assert_eq!(l.width_mm, 62);
    }

    #[test]
    fn test_labels_fit_standard_head() {
        let head = ModelSpec::find("QL-700").unwrap().head_dots();
        for l in LABELS {
            assert!(l.printable_dots + l.right_margin_dots <= head, "{}", l.id);
        }
    }
}
