//! OKX REST client for the public candles endpoint.
//!
//! No authentication: `/api/v5/market/candles` is a public endpoint. One
//! `reqwest::Client` is reused for connection pooling across the chunked
//! fetch.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use lt_core::config::SourceConfig;
use lt_core::types::Candle;
use lt_core::{Error, Result};

use crate::source::CandleSource;

use super::types::CandlesResponse;

/// REST client implementing [`CandleSource`] against OKX v5.
pub struct OkxRestClient {
    base_url: String,
    bar: String,
    limit: u32,
    http: reqwest::Client,
}

impl OkxRestClient {
    /// Build a client from source configuration.
    pub fn new(cfg: &SourceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(Error::transport)?;
        Ok(Self {
            base_url: cfg.rest_url.trim_end_matches('/').to_string(),
            bar: cfg.bar.clone(),
            limit: cfg.batch_limit,
            http,
        })
    }

    fn candles_url(&self) -> String {
        format!("{}/api/v5/market/candles", self.base_url)
    }
}

#[async_trait]
impl CandleSource for OkxRestClient {
    async fn fetch_batch(&self, inst_id: &str, before: Option<i64>) -> Result<Vec<Candle>> {
        let mut query: Vec<(&str, String)> = vec![
            ("instId", inst_id.to_string()),
            ("bar", self.bar.clone()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(ts) = before {
            query.push(("before", ts.to_string()));
        }

        debug!(inst_id, ?before, "requesting candle batch");

        let response: CandlesResponse = self
            .http
            .get(self.candles_url())
            .query(&query)
            .send()
            .await
            .map_err(Error::transport)?
            .json()
            .await
            .map_err(Error::transport)?;

        response.into_candles()
    }
}
