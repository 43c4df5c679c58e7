//! # lt-trading
//!
//! Orchestration of the two call patterns over the fetch/feature/model
//! stack: a one-shot supervised [`train`] run and a periodic [`predict`]
//! loop. Both roles share an [`InstrumentContext`](context::InstrumentContext)
//! by reference; neither assumes concurrent access to the same instrument's
//! model artifact.

pub mod context;
pub mod predict;
pub mod train;
