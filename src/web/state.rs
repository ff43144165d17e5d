use std::sync::Arc;

use crate::{Config, model::ModelManager};

/// Built once at startup and cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(mm: ModelManager, config: Config) -> Self {
        Self {
            mm,
            config: Arc::new(config),
        }
    }

    pub fn mm(&self) -> &ModelManager {
        &self.mm
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
