//! # lt-core
//!
//! Shared building blocks for the LT price-prediction platform.
//!
//! This crate provides what every other crate in the workspace leans on:
//! the raw [`Candle`](types::Candle) type, the error taxonomy, layered
//! configuration, the logging framework, and the progress-sink capability
//! used by long-running fetch and training phases.

pub mod config;
pub mod error;
pub mod logging;
pub mod progress;
pub mod types;

pub use error::{Error, Result};
