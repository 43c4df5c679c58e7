//! Stateful model lifecycle: load-or-create, train, persist, predict.
//!
//! [`ModelLifecycle`] owns the opaque model handle for one instrument. The
//! training role calls [`load_or_create`](ModelLifecycle::load_or_create) —
//! load failure is always recoverable by building a fresh model — while the
//! prediction role calls the strict [`load`](ModelLifecycle::load), since it
//! has nothing useful to do with an untrained network. Callers must not run
//! training and prediction for the same instrument concurrently: persistence
//! overwrites the artifact non-atomically.

use std::path::PathBuf;

use tracing::{info, warn};

use lt_core::config::TrainingConfig;
use lt_core::progress::ProgressSink;
use lt_core::{Error, Result};

use crate::features::Dataset;
use crate::model::{FitOptions, InputShape, ModelFactory, SequenceModel, Subset};

/// Chronological split point: `floor(len * ratio)`.
///
/// Everything before the index trains, everything at/after validates. The
/// boundary follows the natural order of the windows; no shuffling.
pub fn split_index(len: usize, ratio: f64) -> usize {
    (len as f64 * ratio).floor() as usize
}

/// Owns one instrument's model handle and artifact directory.
pub struct ModelLifecycle {
    factory: Box<dyn ModelFactory>,
    model_dir: PathBuf,
    model: Option<Box<dyn SequenceModel>>,
}

impl ModelLifecycle {
    /// Create an unloaded lifecycle over `model_dir`.
    pub fn new(factory: Box<dyn ModelFactory>, model_dir: PathBuf) -> Self {
        Self {
            factory,
            model_dir,
            model: None,
        }
    }

    /// Whether a model handle is loaded and ready for prediction.
    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// The artifact directory this lifecycle persists to.
    pub fn model_dir(&self) -> &std::path::Path {
        &self.model_dir
    }

    /// Load the persisted artifact, falling back to a fresh model with the
    /// given input geometry on any load failure.
    ///
    /// Load failure is non-fatal here by contract; only a failure to build
    /// the fresh model surfaces as an error.
    pub fn load_or_create(&mut self, shape: InputShape) -> Result<()> {
        match self.factory.load(&self.model_dir) {
            Ok(model) => {
                info!(dir = %self.model_dir.display(), "loaded existing model");
                self.model = Some(model);
            }
            Err(e) => {
                info!(
                    dir = %self.model_dir.display(),
                    reason = %e,
                    "no usable model artifact, creating a fresh one"
                );
                let model = self.factory.create(shape).map_err(Error::model)?;
                self.model = Some(model);
            }
        }
        Ok(())
    }

    /// Strict load for the prediction role: a missing or corrupt artifact is
    /// a [`Error::Persistence`] failure, there is no fallback.
    pub fn load(&mut self) -> Result<()> {
        let model = self.factory.load(&self.model_dir).map_err(Error::persistence)?;
        info!(dir = %self.model_dir.display(), "loaded model for prediction");
        self.model = Some(model);
        Ok(())
    }

    /// Run one full training pass over `dataset` and persist the result.
    ///
    /// Splits chronologically at `floor(len * split_ratio)`, fits for the
    /// configured number of epochs (no early stopping), then saves. An empty
    /// dataset, or one whose training split is empty, is
    /// [`Error::InsufficientData`]; a failed save is [`Error::Persistence`]
    /// and is never swallowed.
    pub fn train_once(
        &mut self,
        dataset: &Dataset,
        cfg: &TrainingConfig,
        progress: &dyn ProgressSink,
    ) -> Result<()> {
        if dataset.is_empty() {
            return Err(Error::InsufficientData(
                "no feature/label pairs after windowing".into(),
            ));
        }

        let split = split_index(dataset.len(), cfg.split_ratio);
        if split == 0 {
            return Err(Error::InsufficientData(format!(
                "training split is empty ({} pairs at ratio {})",
                dataset.len(),
                cfg.split_ratio
            )));
        }

        if self.model.is_none() {
            let window = dataset.features[0].close.len();
            self.load_or_create(InputShape::for_window(window))?;
        }
        let model = self.model.as_mut().ok_or(Error::ModelNotLoaded)?;

        let (train_features, val_features) = dataset.features.split_at(split);
        let (train_labels, val_labels) = dataset.labels.split_at(split);
        info!(
            train = train_features.len(),
            val = val_features.len(),
            epochs = cfg.epochs,
            "starting training run"
        );

        progress.status("training model");
        model
            .fit(
                Subset {
                    features: train_features,
                    labels: train_labels,
                },
                Subset {
                    features: val_features,
                    labels: val_labels,
                },
                &FitOptions {
                    epochs: cfg.epochs,
                    batch_size: cfg.batch_size,
                    learning_rate: cfg.learning_rate,
                    seed: cfg.seed,
                },
                progress,
            )
            .map_err(Error::model)?;

        model.save(&self.model_dir).map_err(|e| {
            warn!(dir = %self.model_dir.display(), error = %e, "failed to persist model");
            Error::persistence(e)
        })?;
        info!(dir = %self.model_dir.display(), "model saved");
        progress.status("training completed");

        Ok(())
    }

    /// Single-step inference on the most recent window of `dataset`.
    ///
    /// Returns the normalized prediction; callers denormalize with
    /// `dataset.scale`. Fails with [`Error::ModelNotLoaded`] before any
    /// load/create, and [`Error::InsufficientData`] when the dataset has no
    /// windows.
    pub fn predict_next(&self, dataset: &Dataset) -> Result<f64> {
        let model = self.model.as_ref().ok_or(Error::ModelNotLoaded)?;
        let window = dataset
            .last_window()
            .ok_or_else(|| Error::InsufficientData("no window to predict from".into()))?;
        model.predict_one(window).map_err(Error::model)
    }
}
