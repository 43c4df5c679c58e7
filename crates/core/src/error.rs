//! Error taxonomy for the prediction pipeline.
//!
//! Errors are deliberately coarse: the orchestrator only needs to tell a
//! data-source rejection apart from a transport failure, a too-short series,
//! a missing model, and a broken artifact. No variant implies a retry —
//! rate limiting is pacing, not recovery, and the periodic prediction loop
//! handles failures by logging and moving to the next cycle.

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the fetch, feature, and model-lifecycle layers.
#[derive(Debug, Error)]
pub enum Error {
    /// The data source answered, but with a non-success code in the body.
    ///
    /// Propagated unchanged; never retried automatically.
    #[error("data source rejected request (code {code}): {msg}")]
    DataSource {
        /// Response `code` field as returned by the exchange.
        code: String,
        /// Response `msg` field as returned by the exchange.
        msg: String,
    },

    /// The request never produced a usable body (network, timeout, bad JSON).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The fetched series was too short to produce any feature windows.
    ///
    /// Distinct from a transport failure: the fetch succeeded, there is just
    /// not enough history. Training must treat this as an error, never as an
    /// empty-but-successful run.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Prediction was attempted before any model was loaded or created.
    #[error("model not loaded")]
    ModelNotLoaded,

    /// The model backend failed during fit or inference (tensor shape or
    /// numerical errors inside the opaque model component).
    #[error("model backend failure: {0}")]
    Model(String),

    /// Saving or loading the model artifact failed.
    ///
    /// Load-not-found during training is recovered by creating a fresh model
    /// and never reaches the caller as this variant.
    #[error("model persistence failed: {0}")]
    Persistence(String),
}

impl Error {
    /// Wrap any displayable failure as a transport error.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Wrap any displayable failure as a persistence error.
    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    /// Wrap any displayable failure as a model backend error.
    pub fn model(err: impl std::fmt::Display) -> Self {
        Self::Model(err.to_string())
    }
}
