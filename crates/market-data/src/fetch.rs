//! Rate-limited chunked historical fetching.
//!
//! [`HistoricalFetcher`] turns a time range into a checkpoint plan (see
//! [`plan`](crate::plan)), dispatches the checkpoints in groups of `qps`
//! concurrent requests, and merges the batches into a strictly-ascending
//! candle series. Each group is joined with a one-second sleep that runs in
//! parallel with the group's requests, bounding the steady-state request
//! rate to `qps` per second regardless of response latency. There is no
//! retry: pacing is the only rate-limit mechanism.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use lt_core::progress::{ProgressSink, TracingProgress};
use lt_core::types::Candle;
use lt_core::Result;

use crate::plan::{checkpoints, merge};
use crate::source::CandleSource;

/// Minimum interval between request groups.
const GROUP_INTERVAL: Duration = Duration::from_millis(1_000);

/// Optional time bounds for a historical fetch, milliseconds since epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchRange {
    /// Inclusive lower bound. Defaults to `now - batch_minutes`.
    pub start: Option<i64>,
    /// Inclusive upper bound. Defaults to `now`.
    pub end: Option<i64>,
}

impl FetchRange {
    /// The unbounded range: a single request for the most recent batch.
    pub fn latest() -> Self {
        Self::default()
    }

    /// Whether both bounds are absent.
    pub fn is_latest(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Chunked, rate-limited historical candle fetcher.
pub struct HistoricalFetcher<S> {
    source: S,
    qps: usize,
    batch_minutes: i64,
    progress: Arc<dyn ProgressSink>,
}

impl<S: CandleSource> HistoricalFetcher<S> {
    /// Create a fetcher over `source` with the given request ceiling and
    /// checkpoint spacing.
    pub fn new(source: S, qps: usize, batch_minutes: i64) -> Self {
        Self {
            source,
            qps: qps.max(1),
            batch_minutes,
            progress: Arc::new(TracingProgress),
        }
    }

    /// Replace the progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch a time-ordered, deduplicated candle series for `inst_id`.
    ///
    /// With no bounds, issues exactly one request for the most recent batch
    /// and returns it as-is (no merge step). With at least one bound, the
    /// missing bound defaults to `now - batch_minutes` / `now`, the range is
    /// partitioned into checkpoints, and all batches are merged.
    pub async fn fetch(&self, inst_id: &str, range: &FetchRange) -> Result<Vec<Candle>> {
        if range.is_latest() {
            self.progress.status("fetching latest batch");
            return self.source.fetch_batch(inst_id, None).await;
        }

        let step_ms = self.batch_minutes * 60_000;
        let now = Utc::now().timestamp_millis();
        let start = range.start.unwrap_or(now - step_ms);
        let end = range.end.unwrap_or(now);

        let plan = checkpoints(start, end, step_ms);
        info!(
            inst_id,
            requests = plan.len(),
            groups = plan.len().div_ceil(self.qps),
            "fetching historical range"
        );

        let mut batches = Vec::with_capacity(plan.len());
        for (i, group) in plan.chunks(self.qps).enumerate() {
            self.progress.status(&format!(
                "fetching group {} ({} requests)",
                i + 1,
                group.len()
            ));
            let requests = futures::future::try_join_all(
                group.iter().map(|cp| self.source.fetch_batch(inst_id, *cp)),
            );
            // The sleep paces the next group; it runs alongside the
            // requests, not after them.
            let (results, ()) = tokio::join!(requests, tokio::time::sleep(GROUP_INTERVAL));
            batches.extend(results?);
        }

        let merged = merge(batches);
        self.progress
            .status(&format!("fetched {} candles", merged.len()));
        Ok(merged)
    }
}
