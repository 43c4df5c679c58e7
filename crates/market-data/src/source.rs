//! The candle-source seam.
//!
//! [`CandleSource`] abstracts "one batch request" so the fetcher's pacing and
//! merge logic can be exercised against fakes, and so another exchange can be
//! slotted in without touching the fetch plan.

use async_trait::async_trait;

use lt_core::types::Candle;
use lt_core::Result;

/// One-batch candle retrieval for a single instrument.
///
/// Implementors handle the wire format and map failures into the shared
/// error taxonomy: a non-success body code becomes
/// [`Error::DataSource`](lt_core::Error::DataSource), anything that prevents
/// a usable body becomes [`Error::Transport`](lt_core::Error::Transport).
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch one batch of the most recent candles, or, when `before` is
    /// given, the batch of candles bounded by that millisecond timestamp.
    ///
    /// Batch ordering is source-defined; callers must not rely on it.
    async fn fetch_batch(&self, inst_id: &str, before: Option<i64>) -> Result<Vec<Candle>>;
}
