//! Print dispatcher
//!
//! Turns a rendered bitmap into a Brother QL raster job and sends it to the
//! configured network printer. Failures are logged and reported as a
//! [`PrintOutcome`]; they never become request errors.

use std::time::Duration;

use image::GrayImage;
use tally_printer::{
    LabelSpec, ModelSpec, NetworkPrinter, PrintResult, Printer, rasterize_label,
};
use tracing::{error, info, instrument, warn};

use super::types::PrintOutcome;
use crate::core::Config;

/// Canvas width used when the configured label roll is unknown (62 mm)
pub const FALLBACK_WIDTH: u32 = 696;

#[derive(Debug, Clone)]
pub struct PrintDispatcher {
    enabled: bool,
    address: String,
    model: String,
    label: String,
    timeout: Duration,
    status_wait: Duration,
}

impl PrintDispatcher {
    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.printer_enabled,
            address: config.printer_address.clone(),
            model: config.printer_model.clone(),
            label: config.label_size.clone(),
            timeout: Duration::from_millis(config.print_timeout_ms),
            status_wait: Duration::from_millis(config.print_status_wait_ms),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Printable width of the configured label roll
    pub fn canvas_width(&self) -> u32 {
        match LabelSpec::find(&self.label) {
            Ok(label) => label.printable_dots,
            Err(e) => {
                warn!(error = %e, width = FALLBACK_WIDTH, "Unknown label size, using fallback width");
                FALLBACK_WIDTH
            }
        }
    }

    /// Send `image` to the printer
    #[instrument(skip(self, image), fields(printer = %self.address, lines = image.height()))]
    pub async fn dispatch(&self, image: &GrayImage) -> PrintOutcome {
        if !self.enabled {
            info!("Printing disabled, label not sent");
            return PrintOutcome::failed("printing disabled");
        }

        match self.send(image).await {
            Ok(()) => {
                info!("Label printed");
                PrintOutcome::printed()
            }
            Err(e) => {
                error!(error = %e, "Print failed");
                PrintOutcome::failed(e.to_string())
            }
        }
    }

    async fn send(&self, image: &GrayImage) -> PrintResult<()> {
        let model = ModelSpec::find(&self.model)?;
        let label = LabelSpec::find(&self.label)?;
        let data = rasterize_label(image, model, label, true);

        let printer = NetworkPrinter::from_uri(&self.address)?
            .with_timeout(self.timeout)
            .with_status_wait(self.status_wait);
        printer.print(&data).await
    }
}
