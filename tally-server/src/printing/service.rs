//! Label service - counter, barcode, render, print
//!
//! Flow of one print:
//!
//! ```text
//! increment counter (persisted) → barcode payload → render (blocking pool)
//!   → debug PNG (optional) → dispatch → receipt
//! ```
//!
//! The counter is never rolled back: a label whose print fails keeps its
//! number, and the receipt reports `printed: false`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use super::barcode;
use super::compositor::{LabelError, TemplateKind, marker_number};
use super::dispatcher::PrintDispatcher;
use super::renderer::LabelRenderer;
use super::types::{LabelJob, RenderedLabel};
use crate::counter::{CounterStore, Counters, RESET_ALL};
use crate::utils::{AppError, AppResult};

/// Category used when a request names none and nothing was printed yet
pub const DEFAULT_CATEGORY: &str = "Coin";

/// Category of free-text labels
pub const CUSTOM_CATEGORY: &str = "Custom";

/// `POST /print` input
#[derive(Debug, Clone, Default)]
pub struct PrintRequest {
    pub label_type: Option<String>,
    pub template: Option<String>,
    pub caption: Option<String>,
}

/// `POST /print` result
#[derive(Debug, Clone, Serialize)]
pub struct PrintReceipt {
    pub status: &'static str,
    pub label_type: String,
    pub number: u64,
    pub template: TemplateKind,
    pub barcode: String,
    pub printed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// `POST /print_custom` result
#[derive(Debug, Clone, Serialize)]
pub struct CustomReceipt {
    pub status: &'static str,
    pub label_type: &'static str,
    /// Marker number if the text has one, else the counter value
    pub number: u64,
    pub counter: u64,
    /// Label height in pixels after cropping
    pub height: u32,
    pub barcode: String,
    pub printed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `POST /clear_counters` result
#[derive(Debug, Clone, Serialize)]
pub struct ClearReceipt {
    pub status: &'static str,
    pub cleared: Vec<String>,
    pub counters: Counters,
}

pub struct LabelService {
    counters: Arc<CounterStore>,
    last_category: Mutex<Option<String>>,
    renderer: Arc<LabelRenderer>,
    dispatcher: PrintDispatcher,
    debug_dir: Option<PathBuf>,
}

impl LabelService {
    pub fn new(
        counters: Arc<CounterStore>,
        renderer: LabelRenderer,
        dispatcher: PrintDispatcher,
        debug_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            counters,
            last_category: Mutex::new(None),
            renderer: Arc::new(renderer),
            dispatcher,
            debug_dir,
        }
    }

    pub fn counter_store(&self) -> &CounterStore {
        &self.counters
    }

    pub fn dispatcher(&self) -> &PrintDispatcher {
        &self.dispatcher
    }

    /// Category a request without `label_type` prints
    pub fn current_category(&self) -> String {
        self.last_category
            .lock()
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    /// Print the next label of a category
    pub async fn print(&self, request: PrintRequest) -> AppResult<PrintReceipt> {
        let category = match request.label_type {
            Some(label_type) => label_type.trim().to_string(),
            None => self.current_category(),
        };

        let kind = TemplateKind::parse(request.template.as_deref());
        if kind == TemplateKind::Custom {
            return Err(AppError::validation(
                "The custom template needs text; use /print_custom",
            ));
        }

        let number = self.counters.increment(&category)?;
        *self.last_category.lock() = Some(category.clone());

        let date = today();
        let job = LabelJob {
            barcode: barcode::encode(&category, number, date),
            category,
            number,
            date,
            caption: request.caption,
            text: None,
        };
        info!(category = %job.category, number, template = kind.as_str(), "Printing label");

        let (job, label) = self.render(kind, job).await?;
        let outcome = self.dispatcher.dispatch(&label.image).await;

        Ok(PrintReceipt {
            status: "success",
            label_type: job.category,
            number,
            template: kind,
            barcode: job.barcode,
            printed: outcome.success,
            message: outcome.message,
            coupon_code: label.coupon_code,
        })
    }

    /// Print a free-text label
    ///
    /// The first `#<digits>` marker sets the displayed and encoded number;
    /// the `Custom` counter advances either way.
    pub async fn print_custom(&self, text: &str) -> AppResult<CustomReceipt> {
        if text.trim().is_empty() {
            return Err(AppError::validation("Text must not be empty"));
        }
        let marker = marker_number(text)
            .map_err(|e| AppError::validation(format!("Marker number out of range: {}", e)))?;

        let counter = self.counters.increment(CUSTOM_CATEGORY)?;
        let number = marker.map(u64::from).unwrap_or(counter);

        let date = today();
        let job = LabelJob {
            category: CUSTOM_CATEGORY.to_string(),
            number,
            date,
            barcode: barcode::encode(CUSTOM_CATEGORY, number, date),
            caption: None,
            text: Some(text.to_string()),
        };
        info!(number, counter, "Printing custom label");

        let (job, label) = self.render(TemplateKind::Custom, job).await?;
        let outcome = self.dispatcher.dispatch(&label.image).await;

        Ok(CustomReceipt {
            status: "success",
            label_type: CUSTOM_CATEGORY,
            number,
            counter,
            height: label.image.height(),
            barcode: job.barcode,
            printed: outcome.success,
            message: outcome.message,
        })
    }

    /// Reset one category, or all of them when `target` is absent or `"all"`
    pub fn clear(&self, target: Option<&str>) -> AppResult<ClearReceipt> {
        let target = target.unwrap_or(RESET_ALL);
        let cleared = self.counters.reset(target)?;
        info!(target = %target.trim(), cleared = cleared.len(), "Counters cleared");

        Ok(ClearReceipt {
            status: "success",
            cleared,
            counters: self.counters.snapshot(),
        })
    }

    pub fn snapshot(&self) -> Counters {
        self.counters.snapshot()
    }

    /// Render on the blocking pool; hands the job back with the label
    async fn render(&self, kind: TemplateKind, job: LabelJob) -> AppResult<(LabelJob, RenderedLabel)> {
        let renderer = self.renderer.clone();
        let debug_dir = self.debug_dir.clone();

        let rendered = tokio::task::spawn_blocking(move || {
            let label = renderer.render(kind, &job)?;
            if let Some(dir) = debug_dir {
                save_debug_png(&dir, &job, &label);
            }
            Ok::<_, LabelError>((job, label))
        })
        .await
        .map_err(|e| AppError::internal(format!("Render task failed: {}", e)))??;

        Ok(rendered)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// File name of the debug artifact for `job`
pub fn debug_file_name(job: &LabelJob) -> String {
    let category: String = job
        .category
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!(
        "{}_{}_product_label_{}.png",
        category,
        job.date.format("%m%d%Y"),
        job.number
    )
}

fn save_debug_png(dir: &Path, job: &LabelJob, label: &RenderedLabel) {
    let path = dir.join(debug_file_name(job));
    match label.image.save(&path) {
        Ok(()) => info!(path = %path.display(), "Debug label saved"),
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to save debug label"),
    }
}
