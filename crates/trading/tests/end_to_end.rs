//! End-to-end orchestration test over a fake candle source and the real
//! candle LSTM backend: train once, then run prediction cycles against the
//! persisted artifact, including cycle-level failure handling.

use async_trait::async_trait;

use lt_core::config::{
    AppConfig, ModelConfig, PipelineConfig, PredictConfig, SourceConfig, TradingConfig,
    TrainingConfig,
};
use lt_core::types::Candle;
use lt_core::{Error, Result};
use lt_market_data::{CandleSource, FetchRange, HistoricalFetcher};
use lt_ml::lifecycle::ModelLifecycle;
use lt_ml::lstm::LstmFactory;
use lt_trading::context::InstrumentContext;
use lt_trading::{predict, train};

/// Source returning the same deterministic series for every request.
struct RampSource {
    candles: Vec<Candle>,
}

impl RampSource {
    fn new(n: usize) -> Self {
        let candles = (0..n)
            .map(|i| {
                let t = i as f64;
                Candle::flat(i as i64 * 60_000, 50.0 + 0.2 * t + (t / 5.0).sin())
            })
            .collect();
        Self { candles }
    }
}

#[async_trait]
impl CandleSource for RampSource {
    async fn fetch_batch(&self, _inst_id: &str, _before: Option<i64>) -> Result<Vec<Candle>> {
        Ok(self.candles.clone())
    }
}

/// Source that always fails with a data-source rejection.
struct BrokenSource;

#[async_trait]
impl CandleSource for BrokenSource {
    async fn fetch_batch(&self, _inst_id: &str, _before: Option<i64>) -> Result<Vec<Candle>> {
        Err(Error::DataSource {
            code: "50013".into(),
            msg: "System busy".into(),
        })
    }
}

fn test_config(model_root: &std::path::Path) -> AppConfig {
    AppConfig {
        source: SourceConfig {
            rest_url: "http://unused.invalid".into(),
            bar: "1m".into(),
            batch_limit: 300,
            batch_minutes: 300,
            qps: 10,
            timeout_ms: 5_000,
        },
        pipeline: PipelineConfig {
            sma_period: 5,
            window_size: 8,
        },
        training: TrainingConfig {
            epochs: 2,
            split_ratio: 0.8,
            batch_size: 16,
            learning_rate: 1e-3,
            seed: 42,
        },
        predict: PredictConfig { interval_secs: 60 },
        model: ModelConfig {
            dir: model_root.to_path_buf(),
        },
        trading: TradingConfig {
            inst_id: "BTC-USDT".into(),
        },
    }
}

#[tokio::test(start_paused = true)]
async fn train_then_predict_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let ctx = InstrumentContext::from_config(&cfg);

    train::run(
        &cfg,
        &ctx,
        RampSource::new(80),
        Box::new(LstmFactory),
        FetchRange::latest(),
    )
    .await
    .unwrap();
    assert!(ctx.model_dir().join("model.safetensors").exists());

    let fetcher = HistoricalFetcher::new(
        RampSource::new(80),
        cfg.source.qps,
        cfg.source.batch_minutes,
    );
    let mut lifecycle = ModelLifecycle::new(Box::new(LstmFactory), ctx.model_dir());
    let price = predict::cycle(&cfg, &ctx, &fetcher, &mut lifecycle)
        .await
        .unwrap();
    assert!(price.is_finite());
    // Denormalized with the fetch's own scale: within (or near) its range.
    assert!(price > 0.0);
}

#[tokio::test(start_paused = true)]
async fn predict_without_artifact_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let ctx = InstrumentContext::from_config(&cfg);

    let fetcher = HistoricalFetcher::new(
        RampSource::new(80),
        cfg.source.qps,
        cfg.source.batch_minutes,
    );
    let mut lifecycle = ModelLifecycle::new(Box::new(LstmFactory), ctx.model_dir());
    let err = predict::cycle(&cfg, &ctx, &fetcher, &mut lifecycle)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Persistence(_)));
}

#[tokio::test(start_paused = true)]
async fn cycle_surfaces_data_source_errors() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let ctx = InstrumentContext::from_config(&cfg);

    // Train first so the cycle gets past the model load.
    train::run(
        &cfg,
        &ctx,
        RampSource::new(80),
        Box::new(LstmFactory),
        FetchRange::latest(),
    )
    .await
    .unwrap();

    let fetcher =
        HistoricalFetcher::new(BrokenSource, cfg.source.qps, cfg.source.batch_minutes);
    let mut lifecycle = ModelLifecycle::new(Box::new(LstmFactory), ctx.model_dir());
    let err = predict::cycle(&cfg, &ctx, &fetcher, &mut lifecycle)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DataSource { .. }));

    // The lifecycle stays loaded; the loop can succeed on the next cycle.
    assert!(lifecycle.is_ready());
    let fetcher = HistoricalFetcher::new(
        RampSource::new(80),
        cfg.source.qps,
        cfg.source.batch_minutes,
    );
    let price = predict::cycle(&cfg, &ctx, &fetcher, &mut lifecycle)
        .await
        .unwrap();
    assert!(price.is_finite());
}

#[tokio::test(start_paused = true)]
async fn training_on_short_series_is_insufficient_data() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let ctx = InstrumentContext::from_config(&cfg);

    let err = train::run(
        &cfg,
        &ctx,
        RampSource::new(10),
        Box::new(LstmFactory),
        FetchRange::latest(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::InsufficientData(_)));
}
