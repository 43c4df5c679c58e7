//! Layered configuration for the LT prediction platform.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (OKX production endpoint, pipeline constants)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `LT_`, nested with `__`,
//!    e.g. `LT_TRAINING__EPOCHS=50`)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

// ── Default value functions ────────────────────────────────────────────

/// Default request timeout: 5 000 ms.
fn default_timeout_ms() -> u64 {
    5_000
}

/// Default candle bar size: 1 minute.
fn default_bar() -> String {
    "1m".to_string()
}

/// Default candles per request: 300 (the exchange maximum).
fn default_batch_limit() -> u32 {
    300
}

/// Default span covered by one request, in minutes.
fn default_batch_minutes() -> i64 {
    300
}

/// Default request ceiling: 10 requests per second.
fn default_qps() -> usize {
    10
}

/// Default SMA smoothing period: 10 bars.
fn default_sma_period() -> usize {
    10
}

/// Default model input window: 50 bars.
fn default_window_size() -> usize {
    50
}

/// Default training epochs: 100.
fn default_epochs() -> usize {
    100
}

/// Default chronological train/validation split: 80 % train.
fn default_split_ratio() -> f64 {
    0.8
}

/// Default minibatch size: 32.
fn default_batch_size() -> usize {
    32
}

/// Default learning rate for the AdamW optimizer.
fn default_learning_rate() -> f64 {
    1e-3
}

/// Default shuffle seed for reproducible minibatch order.
fn default_seed() -> u64 {
    42
}

/// Default prediction cadence: one cycle per minute.
fn default_interval_secs() -> u64 {
    60
}

/// Default model artifact root directory.
fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Candle data source settings.
    pub source: SourceConfig,
    /// Feature pipeline parameters.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Training run parameters.
    #[serde(default)]
    pub training: TrainingConfig,
    /// Periodic prediction parameters.
    #[serde(default)]
    pub predict: PredictConfig,
    /// Model artifact storage settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// Instrument selection.
    pub trading: TradingConfig,
}

/// Candle data source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// REST API base URL.
    pub rest_url: String,
    /// Candle bar size (exchange bar identifier, e.g. `1m`).
    #[serde(default = "default_bar")]
    pub bar: String,
    /// Candles requested per batch.
    #[serde(default = "default_batch_limit")]
    pub batch_limit: u32,
    /// Minutes of history covered by one batch; also the checkpoint spacing
    /// when a time range is partitioned into multiple requests.
    #[serde(default = "default_batch_minutes")]
    pub batch_minutes: i64,
    /// Maximum requests dispatched per one-second group.
    #[serde(default = "default_qps")]
    pub qps: usize,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Feature pipeline parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Trailing simple-moving-average period, in bars.
    #[serde(default = "default_sma_period")]
    pub sma_period: usize,
    /// Feature window length, in bars.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

/// Training run parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Number of epochs. There is no early stopping; this is the full run.
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    /// Chronological train/validation split ratio in (0, 1).
    #[serde(default = "default_split_ratio")]
    pub split_ratio: f64,
    /// Minibatch size.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// AdamW learning rate.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Seed for the per-epoch minibatch shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Periodic prediction loop parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictConfig {
    /// Seconds between prediction cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

/// Model artifact storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Root directory; artifacts live at `<dir>/<inst_id>/`.
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
}

/// Instrument selection.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingConfig {
    /// Exchange instrument identifier (e.g. `BTC-USDT`).
    pub inst_id: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sma_period: default_sma_period(),
            window_size: default_window_size(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            split_ratio: default_split_ratio(),
            batch_size: default_batch_size(),
            learning_rate: default_learning_rate(),
            seed: default_seed(),
        }
    }
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults (OKX production REST endpoint, `BTC-USDT`).
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `LT_` and `__` as the
    ///    nesting separator (e.g. `LT_SOURCE__QPS=5`).
    ///
    /// After loading, validates pipeline and training invariants.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("source.rest_url", "https://www.okx.com")?
            .set_default("source.bar", "1m")?
            .set_default("source.batch_limit", 300i64)?
            .set_default("source.batch_minutes", 300i64)?
            .set_default("source.qps", 10i64)?
            .set_default("source.timeout_ms", 5000i64)?
            .set_default("pipeline.sma_period", 10i64)?
            .set_default("pipeline.window_size", 50i64)?
            .set_default("training.epochs", 100i64)?
            .set_default("training.split_ratio", 0.8)?
            .set_default("training.batch_size", 32i64)?
            .set_default("training.learning_rate", 1e-3)?
            .set_default("training.seed", 42i64)?
            .set_default("predict.interval_secs", 60i64)?
            .set_default("model.dir", "models")?
            .set_default("trading.inst_id", "BTC-USDT")?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides (LT_ prefix) ────────────────
        // The prefix separator must be set explicitly to `_` because the
        // `config` crate defaults it to the nesting separator when one is
        // provided.
        builder = builder.add_source(
            Environment::with_prefix("LT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration invariants.
    fn validate(&self) -> Result<()> {
        if self.source.qps == 0 {
            bail!("source.qps must be at least 1");
        }
        if self.source.batch_limit == 0 {
            bail!("source.batch_limit must be at least 1");
        }
        if self.source.batch_minutes <= 0 {
            bail!("source.batch_minutes must be positive");
        }
        if self.pipeline.sma_period == 0 {
            bail!("pipeline.sma_period must be at least 1");
        }
        if self.pipeline.window_size == 0 {
            bail!("pipeline.window_size must be at least 1");
        }
        if !(self.training.split_ratio > 0.0 && self.training.split_ratio < 1.0) {
            bail!("training.split_ratio must be strictly between 0 and 1");
        }
        if self.training.batch_size == 0 {
            bail!("training.batch_size must be at least 1");
        }
        if self.trading.inst_id.is_empty() {
            bail!("trading.inst_id must not be empty");
        }
        Ok(())
    }
}
