//! # tally-printer
//!
//! Brother QL label printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - QL raster command building
//! - Model and continuous label roll tables
//! - Network printing (TCP port 9100) with status replies
//! - Bitmap to raster conversion
//!
//! Business logic (WHAT to print) should stay in application code:
//! - Label layout and counters → tally-server
//!
//! ## Example
//!
//! ```ignore
//! use tally_printer::{LabelSpec, ModelSpec, NetworkPrinter, Printer, rasterize_label};
//!
//! let model = ModelSpec::find("QL-700")?;
//! let label = LabelSpec::find("62")?;
//! let data = rasterize_label(&bitmap, model, label, true);
//!
//! let printer = NetworkPrinter::from_uri("tcp://10.0.0.13")?;
//! printer.print(&data).await?;
//! ```

mod error;
mod models;
mod printer;
mod raster;
mod status;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use models::{LabelSpec, ModelSpec};
pub use printer::{DEFAULT_PORT, NetworkPrinter, Printer};
pub use raster::QlRasterBuilder;
pub use status::{QlStatus, STATUS_LEN, StatusType};

#[cfg(feature = "image")]
pub use raster::rasterize_label;
