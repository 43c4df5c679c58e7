//! Candle-backed LSTM adapter for the [`SequenceModel`] capability.
//!
//! Architecture: LSTM(2 → 64) over the window followed by a linear head on
//! the final hidden state, producing one scalar. Trained with AdamW and MSE
//! loss on CPU. Weights persist as safetensors via [`VarMap`], with a JSON
//! sidecar recording the input geometry so loading does not need the shape
//! from the caller.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{linear, loss, lstm, optim, Linear, Module, Optimizer, VarBuilder, VarMap, LSTM,
    LSTMConfig, RNN};
use serde::{Deserialize, Serialize};

use lt_core::progress::ProgressSink;

use crate::features::FeatureWindow;
use crate::model::{FitOptions, InputShape, ModelFactory, SequenceModel, Subset};

/// Hidden state width of the LSTM.
const HIDDEN_SIZE: usize = 64;

/// Weights file name inside the artifact directory.
const WEIGHTS_FILE: &str = "model.safetensors";

/// Geometry sidecar file name inside the artifact directory.
const META_FILE: &str = "meta.json";

/// Geometry sidecar persisted alongside the weights.
#[derive(Debug, Serialize, Deserialize)]
struct ModelMeta {
    window: usize,
    channels: usize,
    hidden: usize,
}

/// LSTM sequence model over (window, 2) inputs.
pub struct LstmPredictor {
    varmap: VarMap,
    lstm: LSTM,
    head: Linear,
    device: Device,
    shape: InputShape,
}

impl LstmPredictor {
    /// Create a fresh model with random weights.
    pub fn create(shape: InputShape) -> Result<Self> {
        ensure!(
            shape.channels == InputShape::CHANNELS,
            "expected {} feature channels, got {}",
            InputShape::CHANNELS,
            shape.channels
        );
        ensure!(shape.window > 0, "window length must be positive");

        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let lstm = lstm(shape.channels, HIDDEN_SIZE, LSTMConfig::default(), vb.pp("lstm"))?;
        let head = linear(HIDDEN_SIZE, 1, vb.pp("head"))?;
        Ok(Self {
            varmap,
            lstm,
            head,
            device,
            shape,
        })
    }

    /// Load a persisted model from `dir`.
    ///
    /// Reads the geometry sidecar, rebuilds the architecture, and overlays
    /// the saved weights. Any missing or inconsistent file is an error; the
    /// lifecycle decides whether to fall back to a fresh model.
    pub fn load(dir: &Path) -> Result<Self> {
        let meta_path = dir.join(META_FILE);
        let meta: ModelMeta = serde_json::from_str(
            &std::fs::read_to_string(&meta_path)
                .with_context(|| format!("read {}", meta_path.display()))?,
        )
        .context("parse model meta")?;
        ensure!(
            meta.hidden == HIDDEN_SIZE,
            "artifact hidden size {} does not match build ({HIDDEN_SIZE})",
            meta.hidden
        );

        let mut model = Self::create(InputShape {
            window: meta.window,
            channels: meta.channels,
        })?;
        let weights_path = dir.join(WEIGHTS_FILE);
        model
            .varmap
            .load(&weights_path)
            .with_context(|| format!("load {}", weights_path.display()))?;
        Ok(model)
    }

    /// Pack windows into a `(batch, window, channels)` f32 tensor.
    fn batch_tensor(&self, windows: &[&FeatureWindow]) -> Result<Tensor> {
        let w = self.shape.window;
        let mut data = Vec::with_capacity(windows.len() * w * self.shape.channels);
        for win in windows {
            ensure!(
                win.close.len() == w && win.sma.len() == w,
                "window length {}/{} does not match model window {w}",
                win.close.len(),
                win.sma.len()
            );
            for t in 0..w {
                data.push(win.close[t] as f32);
                data.push(win.sma[t] as f32);
            }
        }
        let tensor = Tensor::from_vec(data, (windows.len(), w, self.shape.channels), &self.device)?;
        Ok(tensor)
    }

    /// Forward pass: `(batch, window, channels)` → `(batch, 1)`.
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let states = self.lstm.seq(x)?;
        let last = states
            .last()
            .context("LSTM produced no states for empty sequence")?;
        let out = self.head.forward(last.h())?;
        Ok(out)
    }

    fn mean_loss(&self, features: &[FeatureWindow], labels: &[f64]) -> Result<f64> {
        let refs: Vec<&FeatureWindow> = features.iter().collect();
        let x = self.batch_tensor(&refs)?;
        let y = labels_tensor(labels, &self.device)?;
        let pred = self.forward(&x)?;
        let mse = loss::mse(&pred, &y)?;
        Ok(mse.to_vec0::<f32>()? as f64)
    }
}

fn labels_tensor(labels: &[f64], device: &Device) -> Result<Tensor> {
    let data: Vec<f32> = labels.iter().map(|&l| l as f32).collect();
    let tensor = Tensor::from_vec(data, (labels.len(), 1), device)?;
    Ok(tensor)
}

/// Seeded Fisher-Yates shuffle over `0..n` using a simple LCG, so minibatch
/// order is reproducible without a full RNG dependency.
fn shuffle_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = seed;
    for i in (1..n).rev() {
        rng = rng
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = (rng >> 33) as usize % (i + 1);
        indices.swap(i, j);
    }
    indices
}

impl SequenceModel for LstmPredictor {
    fn predict_one(&self, window: &FeatureWindow) -> Result<f64> {
        let x = self.batch_tensor(&[window])?;
        let out = self.forward(&x)?;
        let values = out.flatten_all()?.to_vec1::<f32>()?;
        Ok(values[0] as f64)
    }

    fn fit(
        &mut self,
        train: Subset<'_>,
        val: Subset<'_>,
        opts: &FitOptions,
        progress: &dyn ProgressSink,
    ) -> Result<()> {
        ensure!(!train.is_empty(), "training subset is empty");

        let mut optimizer = optim::AdamW::new(
            self.varmap.all_vars(),
            optim::ParamsAdamW {
                lr: opts.learning_rate,
                ..Default::default()
            },
        )?;

        let n = train.len();
        let batch_size = opts.batch_size.max(1).min(n);

        for epoch in 0..opts.epochs {
            let indices = shuffle_indices(n, opts.seed.wrapping_add(epoch as u64));

            let mut epoch_loss = 0.0;
            let mut n_batches = 0;
            for batch in indices.chunks(batch_size) {
                let windows: Vec<&FeatureWindow> =
                    batch.iter().map(|&i| &train.features[i]).collect();
                let labels: Vec<f64> = batch.iter().map(|&i| train.labels[i]).collect();

                let x = self.batch_tensor(&windows)?;
                let y = labels_tensor(&labels, &self.device)?;
                let pred = self.forward(&x)?;
                let mse = loss::mse(&pred, &y)?;
                optimizer.backward_step(&mse)?;

                epoch_loss += mse.to_vec0::<f32>()? as f64;
                n_batches += 1;
            }

            // Validation loss is observability only; an empty validation
            // split reports NaN rather than failing the run.
            let val_loss = if val.is_empty() {
                f64::NAN
            } else {
                self.mean_loss(val.features, val.labels)?
            };
            progress.epoch(epoch + 1, opts.epochs, epoch_loss / n_batches as f64, val_loss);
        }

        Ok(())
    }

    fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        self.varmap.save(dir.join(WEIGHTS_FILE))?;
        let meta = ModelMeta {
            window: self.shape.window,
            channels: self.shape.channels,
            hidden: HIDDEN_SIZE,
        };
        std::fs::write(dir.join(META_FILE), serde_json::to_string_pretty(&meta)?)?;
        Ok(())
    }

    fn input_shape(&self) -> InputShape {
        self.shape
    }
}

/// Factory for [`LstmPredictor`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LstmFactory;

impl ModelFactory for LstmFactory {
    fn load(&self, dir: &Path) -> Result<Box<dyn SequenceModel>> {
        Ok(Box::new(LstmPredictor::load(dir)?))
    }

    fn create(&self, shape: InputShape) -> Result<Box<dyn SequenceModel>> {
        Ok(Box::new(LstmPredictor::create(shape)?))
    }
}
