//! Smoke test: the full feature → train → persist → reload → predict path
//! on synthetic candles, using the real candle LSTM backend.

use lt_core::config::{PipelineConfig, TrainingConfig};
use lt_core::progress::RecordingProgress;
use lt_core::types::Candle;

use lt_ml::features::prepare;
use lt_ml::lifecycle::ModelLifecycle;
use lt_ml::lstm::LstmFactory;

fn synthetic_candles(n: usize) -> Vec<Candle> {
    // A slow sine over a linear trend: non-constant, deterministic.
    (0..n)
        .map(|i| {
            let t = i as f64;
            Candle::flat(i as i64 * 60_000, 100.0 + 0.1 * t + (t / 7.0).sin())
        })
        .collect()
}

fn small_training() -> TrainingConfig {
    TrainingConfig {
        epochs: 3,
        split_ratio: 0.8,
        batch_size: 16,
        learning_rate: 1e-3,
        seed: 42,
    }
}

#[test]
fn smoke_train_persist_reload_predict() {
    let params = PipelineConfig {
        sma_period: 5,
        window_size: 8,
    };
    let dataset = prepare(&synthetic_candles(80), &params);
    assert!(!dataset.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("BTC-USDT");

    // Train from scratch; load_or_create must fall back to a fresh model.
    let mut training = ModelLifecycle::new(Box::new(LstmFactory), model_dir.clone());
    let progress = RecordingProgress::new();
    training
        .train_once(&dataset, &small_training(), &progress)
        .unwrap();

    // One epoch event per epoch, bracketed by phase states.
    let states = progress.states();
    assert!(states.iter().any(|s| s == "training model"));
    assert_eq!(states.iter().filter(|s| s.contains("epoch ")).count(), 3);
    assert!(states.iter().any(|s| s == "training completed"));
    assert!(model_dir.join("model.safetensors").exists());
    assert!(model_dir.join("meta.json").exists());

    // A separate lifecycle strict-loads the artifact and predicts.
    let mut predicting = ModelLifecycle::new(Box::new(LstmFactory), model_dir);
    predicting.load().unwrap();
    let normalized = predicting.predict_next(&dataset).unwrap();
    assert!(normalized.is_finite());

    // Denormalization puts the prediction back on the price scale.
    let price = dataset.scale.invert(normalized);
    assert!(price.is_finite());
    assert!((dataset.scale.invert(0.0) - dataset.scale.min).abs() < 1e-9);
}

#[test]
fn smoke_retrain_overwrites_artifact() {
    let params = PipelineConfig {
        sma_period: 5,
        window_size: 8,
    };
    let dataset = prepare(&synthetic_candles(60), &params);

    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("ETH-USDT");

    let mut lifecycle = ModelLifecycle::new(Box::new(LstmFactory), model_dir.clone());
    let cfg = small_training();
    lifecycle
        .train_once(&dataset, &cfg, &lt_core::progress::NullProgress)
        .unwrap();

    // Second run loads the existing artifact and overwrites it on save.
    let mut second = ModelLifecycle::new(Box::new(LstmFactory), model_dir);
    second
        .train_once(&dataset, &cfg, &lt_core::progress::NullProgress)
        .unwrap();
    assert!(second.is_ready());
}
