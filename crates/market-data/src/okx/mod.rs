//! OKX v5 market data REST integration.

pub mod client;
pub mod types;

pub use client::OkxRestClient;
