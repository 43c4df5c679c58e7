//! Raw market data types shared across the workspace.
//!
//! The exchange-specific wire format (string 9-tuples) is parsed inside
//! `lt-market-data`; everything downstream works with [`Candle`].

use serde::{Deserialize, Serialize};

/// One OHLCV bar for a fixed interval.
///
/// Timestamps are milliseconds since the Unix epoch. The feature pipeline
/// only consumes `ts` and `close`, but the full bar is carried so recorders
/// and future features do not need a second fetch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time, milliseconds since the Unix epoch.
    pub ts: i64,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Base-currency volume.
    pub volume: f64,
}

impl Candle {
    /// Construct a bar with all four prices set to `close` and zero volume.
    ///
    /// Convenient for tests and synthetic series where only the close matters.
    pub fn flat(ts: i64, close: f64) -> Self {
        Self {
            ts,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_sets_all_prices() {
        let c = Candle::flat(1_700_000_000_000, 42.5);
        assert_eq!(c.ts, 1_700_000_000_000);
        assert_eq!(c.open, 42.5);
        assert_eq!(c.high, 42.5);
        assert_eq!(c.low, 42.5);
        assert_eq!(c.close, 42.5);
        assert_eq!(c.volume, 0.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = Candle {
            ts: 1_700_000_060_000,
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 100.0,
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: Candle = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
