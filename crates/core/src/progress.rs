//! Side-channel observability for long-running phases.
//!
//! Fetching and training are slow; the orchestrator wants to render their
//! state ("fetching …", "epoch 12 loss=…") without the pipeline depending on
//! any particular UI. [`ProgressSink`] is that capability: callers hand one
//! in, the pipeline pushes state strings and per-epoch loss events through
//! it, and the default implementation simply logs via `tracing`.

use std::sync::Mutex;

/// Receiver for phase-state updates from fetch and training code.
///
/// Implementations must be cheap to call; they sit inside the training loop.
pub trait ProgressSink: Send + Sync {
    /// A free-form state string for the current phase.
    fn status(&self, state: &str);

    /// Per-epoch training report.
    ///
    /// The default renders a state string through [`ProgressSink::status`],
    /// so sinks that only care about text need not override this.
    fn epoch(&self, epoch: usize, epochs: usize, train_loss: f64, val_loss: f64) {
        self.status(&format!(
            "epoch {epoch}/{epochs} loss={train_loss:.6} val_loss={val_loss:.6}"
        ));
    }
}

/// Default sink: forwards every update to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn status(&self, state: &str) {
        tracing::info!(state, "progress");
    }

    fn epoch(&self, epoch: usize, epochs: usize, train_loss: f64, val_loss: f64) {
        tracing::info!(epoch, epochs, train_loss, val_loss, "training epoch");
    }
}

/// Sink that discards everything. Useful in tests and benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn status(&self, _state: &str) {}
}

/// Sink that records every state string, for asserting on phase sequences.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    states: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// All state strings seen so far, in order.
    pub fn states(&self) -> Vec<String> {
        self.states.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn status(&self, state: &str) {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(state.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingProgress::new();
        sink.status("fetching");
        sink.status("preparing");
        assert_eq!(sink.states(), vec!["fetching", "preparing"]);
    }

    #[test]
    fn test_default_epoch_renders_status() {
        let sink = RecordingProgress::new();
        sink.epoch(3, 100, 0.25, 0.5);
        let states = sink.states();
        assert_eq!(states.len(), 1);
        assert!(states[0].contains("epoch 3/100"));
        assert!(states[0].contains("loss=0.250000"));
        assert!(states[0].contains("val_loss=0.500000"));
    }

    #[test]
    fn test_null_sink_is_silent() {
        let sink = NullProgress;
        sink.status("ignored");
        sink.epoch(1, 2, 0.0, 0.0);
    }
}
