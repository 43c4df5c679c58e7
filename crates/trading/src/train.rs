//! One-shot supervised training run.

use tracing::info;

use lt_core::config::AppConfig;
use lt_core::progress::TracingProgress;
use lt_core::Result;
use lt_market_data::{CandleSource, FetchRange, HistoricalFetcher};
use lt_ml::features::prepare;
use lt_ml::lifecycle::ModelLifecycle;
use lt_ml::model::ModelFactory;

use crate::context::InstrumentContext;

/// Fetch the requested range, build the dataset, train, and persist.
///
/// Errors propagate to the caller; the training role logs and terminates on
/// failure rather than retrying.
pub async fn run<S: CandleSource>(
    cfg: &AppConfig,
    ctx: &InstrumentContext,
    source: S,
    factory: Box<dyn ModelFactory>,
    range: FetchRange,
) -> Result<()> {
    let fetcher = HistoricalFetcher::new(source, cfg.source.qps, cfg.source.batch_minutes);

    info!(inst_id = %ctx.inst_id, ?range, "fetching training data");
    let candles = fetcher.fetch(&ctx.inst_id, &range).await?;
    info!(candles = candles.len(), "building dataset");
    let dataset = prepare(&candles, &cfg.pipeline);

    let mut lifecycle = ModelLifecycle::new(factory, ctx.model_dir());
    lifecycle.train_once(&dataset, &cfg.training, &TracingProgress)?;

    Ok(())
}
