//! Label printing module
//!
//! - [`barcode`] - barcode payload and Code 128 bitmap
//! - [`text`] - glyph faces, measurement and wrapping
//! - [`compositor`] - label templates
//! - [`crop`] - trailing whitespace cropping
//! - [`renderer`] - template selection with loaded resources
//! - [`dispatcher`] - raster conversion and network printing
//! - [`service`] - the full print flow behind the HTTP API

pub mod barcode;
pub mod compositor;
pub mod crop;
pub mod dispatcher;
pub mod renderer;
pub mod service;
pub mod text;
pub mod types;

pub use barcode::{BarcodeGenerator, Code128Generator, category_code, encode};
pub use compositor::{
    LabelError, LabelResult, LabelTemplate, TemplateKind, TemplateRenderer, custom_text_layout,
};
pub use crop::crop_trailing_blank;
pub use dispatcher::PrintDispatcher;
pub use renderer::{LabelRenderer, TemplateHeights};
pub use service::{LabelService, PrintRequest};
pub use text::{BlockFace, FontSet, GlyphFace, TrueTypeFace, line_height, wrap};
pub use types::{LabelJob, PrintOutcome, RenderedLabel};
