//! Shared per-instrument context.
//!
//! Both orchestration roles need the same three things: which instrument,
//! where its model artifact lives, and the pipeline/source parameters from
//! configuration. Rather than a common base object, this is a plain struct
//! passed by reference into independent fetch/train/predict functions.

use std::path::{Path, PathBuf};

use lt_core::config::AppConfig;

/// Instrument identity and model-path resolution.
#[derive(Debug, Clone)]
pub struct InstrumentContext {
    /// Exchange instrument identifier (e.g. `BTC-USDT`).
    pub inst_id: String,
    /// Root directory for model artifacts.
    pub model_root: PathBuf,
}

impl InstrumentContext {
    /// Build the context from loaded configuration.
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            inst_id: cfg.trading.inst_id.clone(),
            model_root: cfg.model.dir.clone(),
        }
    }

    /// Artifact directory for this instrument: `<model_root>/<inst_id>/`.
    pub fn model_dir(&self) -> PathBuf {
        self.model_root.join(&self.inst_id)
    }
}

impl InstrumentContext {
    /// Construct directly, mainly for tests.
    pub fn new(inst_id: impl Into<String>, model_root: impl AsRef<Path>) -> Self {
        Self {
            inst_id: inst_id.into(),
            model_root: model_root.as_ref().to_path_buf(),
        }
    }
}
