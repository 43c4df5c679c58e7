//! Periodic prediction role.
//!
//! Runs forever at a fixed cadence: every cycle fetches the most recent
//! batch, rebuilds the dataset, predicts one step ahead from the latest
//! window, and denormalizes with that dataset's close-price scale. A failed
//! cycle is logged and swallowed; the loop never terminates on error.

use std::time::Duration;

use tracing::{error, info};

use lt_core::config::AppConfig;
use lt_core::{Error, Result};
use lt_market_data::{CandleSource, FetchRange, HistoricalFetcher};
use lt_ml::features::prepare;
use lt_ml::lifecycle::ModelLifecycle;
use lt_ml::model::ModelFactory;

use crate::context::InstrumentContext;

/// One prediction cycle: fetch latest → prepare → predict → denormalize.
///
/// The model is strict-loaded lazily on the first successful cycle; a load
/// failure surfaces like any other cycle error so the loop can retry once an
/// artifact appears.
pub async fn cycle<S: CandleSource>(
    cfg: &AppConfig,
    ctx: &InstrumentContext,
    fetcher: &HistoricalFetcher<S>,
    lifecycle: &mut ModelLifecycle,
) -> Result<f64> {
    if !lifecycle.is_ready() {
        lifecycle.load()?;
    }

    let candles = fetcher.fetch(&ctx.inst_id, &FetchRange::latest()).await?;
    let dataset = prepare(&candles, &cfg.pipeline);
    if dataset.is_empty() {
        return Err(Error::InsufficientData(format!(
            "{} candles produced no windows",
            candles.len()
        )));
    }

    let normalized = lifecycle.predict_next(&dataset)?;
    Ok(dataset.scale.invert(normalized))
}

/// Run prediction cycles forever at `predict.interval_secs`.
pub async fn run_loop<S: CandleSource>(
    cfg: &AppConfig,
    ctx: &InstrumentContext,
    source: S,
    factory: Box<dyn ModelFactory>,
) -> Result<()> {
    let fetcher = HistoricalFetcher::new(source, cfg.source.qps, cfg.source.batch_minutes);
    let mut lifecycle = ModelLifecycle::new(factory, ctx.model_dir());

    let mut interval = tokio::time::interval(Duration::from_secs(cfg.predict.interval_secs));
    loop {
        interval.tick().await;
        match cycle(cfg, ctx, &fetcher, &mut lifecycle).await {
            Ok(price) => info!(inst_id = %ctx.inst_id, prediction = price, "prediction"),
            Err(e) => error!(inst_id = %ctx.inst_id, error = %e, "prediction cycle failed"),
        }
    }
}
