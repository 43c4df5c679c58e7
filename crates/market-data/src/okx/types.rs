//! OKX v5 candle wire types.
//!
//! The candles endpoint returns `{code, msg, data}` where `data` is an array
//! of string tuples: `[ts, open, high, low, close, volume, ...]`. Trailing
//! tuple fields (quote volume, confirm flag, …) are ignored.

use serde::Deserialize;

use lt_core::types::Candle;
use lt_core::{Error, Result};

/// Response envelope for `GET /api/v5/market/candles`.
///
/// `code != "0"` is a hard failure carrying `msg`, even when the HTTP status
/// is 200.
#[derive(Debug, Deserialize)]
pub struct CandlesResponse {
    /// `"0"` on success, an error code otherwise.
    pub code: String,
    /// Human-readable error message; empty on success.
    #[serde(default)]
    pub msg: String,
    /// Candle tuples, newest first.
    #[serde(default)]
    pub data: Vec<Vec<String>>,
}

impl CandlesResponse {
    /// Convert the envelope into candles, surfacing a non-success `code` as
    /// [`Error::DataSource`].
    pub fn into_candles(self) -> Result<Vec<Candle>> {
        if self.code != "0" {
            return Err(Error::DataSource {
                code: self.code,
                msg: self.msg,
            });
        }
        self.data.iter().map(|k| parse_kline(k)).collect()
    }
}

/// Parse one wire tuple into a [`Candle`].
///
/// Requires at least the six leading fields; a shorter or non-numeric tuple
/// is a transport-level failure (the body never became usable data).
pub fn parse_kline(raw: &[String]) -> Result<Candle> {
    if raw.len() < 6 {
        return Err(Error::Transport(format!(
            "candle tuple has {} fields, expected at least 6",
            raw.len()
        )));
    }
    let field = |i: usize| -> Result<f64> {
        raw[i]
            .parse::<f64>()
            .map_err(|_| Error::Transport(format!("non-numeric candle field {i}: {:?}", raw[i])))
    };
    let ts = raw[0]
        .parse::<i64>()
        .map_err(|_| Error::Transport(format!("non-numeric candle timestamp: {:?}", raw[0])))?;
    Ok(Candle {
        ts,
        open: field(1)?,
        high: field(2)?,
        low: field(3)?,
        close: field(4)?,
        volume: field(5)?,
    })
}
