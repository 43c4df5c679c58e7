//! # lt-ml
//!
//! Feature construction and model lifecycle for the LT prediction platform.
//!
//! The pipeline turns a raw candle series into normalized, windowed
//! feature/label tensors ([`features`]), keeps the exact scalars needed to
//! invert normalization ([`normalize`]), and drives a backend-agnostic
//! load-or-create/train/save/predict lifecycle ([`lifecycle`]) over the
//! [`SequenceModel`](model::SequenceModel) capability. The candle-backed
//! LSTM adapter lives in [`lstm`]; everything else is backend-free.

pub mod features;
pub mod lifecycle;
pub mod lstm;
pub mod model;
pub mod normalize;

pub use features::{prepare, Dataset, FeatureWindow};
pub use lifecycle::ModelLifecycle;
pub use model::{InputShape, ModelFactory, SequenceModel};
pub use normalize::MinMax;
