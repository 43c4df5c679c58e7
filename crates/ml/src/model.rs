//! The sequence-model capability seam.
//!
//! The pipeline and lifecycle never see a concrete network. They see
//! [`SequenceModel`] (predict, fit, save) plus [`ModelFactory`] (load,
//! create), one adapter per numeric backend. The candle LSTM adapter lives
//! in [`crate::lstm`]; tests use in-memory fakes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use lt_core::progress::ProgressSink;

use crate::features::FeatureWindow;

/// Input geometry of a model: window length and channel count.
///
/// The pipeline produces two channels per time step: normalized close and
/// normalized SMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    /// Time steps per window.
    pub window: usize,
    /// Feature channels per time step.
    pub channels: usize,
}

impl InputShape {
    /// Number of feature channels the pipeline emits.
    pub const CHANNELS: usize = 2;

    /// Shape for a given window length with the pipeline's channel count.
    pub fn for_window(window: usize) -> Self {
        Self {
            window,
            channels: Self::CHANNELS,
        }
    }
}

/// A chronological slice of a dataset: feature windows with index-aligned
/// labels.
#[derive(Debug, Clone, Copy)]
pub struct Subset<'a> {
    /// Feature windows.
    pub features: &'a [FeatureWindow],
    /// Normalized labels, one per window.
    pub labels: &'a [f64],
}

impl Subset<'_> {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Options forwarded to the backend's fit loop.
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    /// Full epoch count; no early stopping.
    pub epochs: usize,
    /// Minibatch size.
    pub batch_size: usize,
    /// Optimizer learning rate.
    pub learning_rate: f64,
    /// Seed for the per-epoch minibatch shuffle.
    pub seed: u64,
}

/// An opaque trained or trainable sequence model.
///
/// Backends own compilation (optimizer/loss wiring) inside `fit` and the
/// artifact serialization format inside `save`.
pub trait SequenceModel: Send {
    /// Single-step inference on one window, returning the first scalar of
    /// the output (still normalized).
    fn predict_one(&self, window: &FeatureWindow) -> anyhow::Result<f64>;

    /// Fit on `train`, evaluating `val` once per epoch and reporting
    /// `{epoch, train_loss, val_loss}` through `progress`. Minibatches are
    /// shuffled within the training set; the train/val boundary itself is
    /// chosen by the caller and never reshuffled here.
    fn fit(
        &mut self,
        train: Subset<'_>,
        val: Subset<'_>,
        opts: &FitOptions,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<()>;

    /// Persist the model artifact under `dir`.
    fn save(&self, dir: &Path) -> anyhow::Result<()>;

    /// The input geometry this model was built with.
    fn input_shape(&self) -> InputShape;
}

/// Constructor capability: load a persisted artifact or create a fresh model.
pub trait ModelFactory: Send + Sync {
    /// Load a persisted model from `dir`. Any failure (missing, corrupt,
    /// incompatible) is an `Err`; the lifecycle decides whether to fall back.
    fn load(&self, dir: &Path) -> anyhow::Result<Box<dyn SequenceModel>>;

    /// Create a fresh untrained model with the given input geometry.
    fn create(&self, shape: InputShape) -> anyhow::Result<Box<dyn SequenceModel>>;
}
