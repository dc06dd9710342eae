//! Server state shared by all handlers

use std::sync::Arc;

use tracing::warn;

use crate::core::Config;
use crate::counter::CounterStore;
use crate::printing::{LabelRenderer, LabelService, PrintDispatcher};

/// Server state - cloned into every handler
///
/// | Field | Role |
/// |-------|------|
/// | config | Loaded configuration |
/// | labels | Counter store, renderer and printer behind one service |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub labels: Arc<LabelService>,
}

impl ServerState {
    /// Build every component from `config`
    ///
    /// Missing fonts, logo or an unknown label roll degrade with a warning;
    /// nothing here fails.
    pub fn initialize(config: &Config) -> Self {
        let counters = Arc::new(CounterStore::open(&config.counter_file));
        let dispatcher = PrintDispatcher::from_config(config);
        let renderer = LabelRenderer::from_config(config, dispatcher.canvas_width());

        if let Some(dir) = &config.debug_label_dir
            && let Err(e) = std::fs::create_dir_all(dir)
        {
            warn!(dir = %dir.display(), error = %e, "Cannot create debug label directory");
        }

        let labels = LabelService::new(
            counters,
            renderer,
            dispatcher,
            config.debug_label_dir.clone(),
        );

        Self {
            config: config.clone(),
            labels: Arc::new(labels),
        }
    }
}
