//! # lt-market-data
//!
//! Historical candle acquisition for the LT prediction platform. Provides
//! the OKX REST candle source, the checkpoint/merge planning helpers, and
//! the rate-limited [`HistoricalFetcher`](fetch::HistoricalFetcher) that
//! turns an instrument id and time range into a time-ordered, deduplicated
//! candle series.

pub mod fetch;
pub mod okx;
pub mod plan;
pub mod source;

pub use fetch::{FetchRange, HistoricalFetcher};
pub use source::CandleSource;
