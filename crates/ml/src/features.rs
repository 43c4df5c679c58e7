//! Deterministic feature and label construction.
//!
//! A raw candle series becomes, in order: close prices → trailing SMA →
//! aligned close series → independently normalized close and SMA series →
//! sliding windows with one-step-ahead labels. All functions are pure; the
//! caller owns the resulting [`Dataset`] for exactly one train or predict
//! cycle (it is never cached or shared).

use lt_core::config::PipelineConfig;
use lt_core::types::Candle;

use crate::normalize::{normalize, MinMax};

/// One model input: two index-aligned normalized slices of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureWindow {
    /// Normalized close-price slice.
    pub close: Vec<f64>,
    /// Normalized SMA slice covering the same index range.
    pub sma: Vec<f64>,
}

/// Windowed features, labels, and the close-price scale needed to invert
/// any prediction back to a real price.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature windows in chronological order.
    pub features: Vec<FeatureWindow>,
    /// Normalized close price immediately following each window,
    /// index-aligned with `features`.
    pub labels: Vec<f64>,
    /// Close-price min/max of the aligned series this dataset was built
    /// from. Note: recomputed per fetch, so a prediction made through this
    /// dataset is denormalized with the scale of the most recent fetch, not
    /// necessarily the scale the model was trained under.
    pub scale: MinMax,
}

impl Dataset {
    /// Number of feature/label pairs.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// `true` when windowing produced no pairs (insufficient data).
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The most recent window, used for single-step prediction.
    pub fn last_window(&self) -> Option<&FeatureWindow> {
        self.features.last()
    }
}

/// Trailing simple moving average with window `period`.
///
/// Produces `len - period + 1` values (empty when the input is shorter than
/// `period`); index `i` is the mean of `values[i..i + period]`.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut sum: f64 = values[..period].iter().sum();
    out.push(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out.push(sum / period as f64);
    }
    out
}

/// Build a [`Dataset`] from a raw candle series.
///
/// The aligned close series drops the first `sma_period - 1` entries so it
/// starts at the same bar as the SMA series; both are then normalized
/// independently and windowed together. When the aligned length is at most
/// `window_size`, the result has zero entries; callers decide whether that
/// means "insufficient data".
pub fn prepare(candles: &[Candle], params: &PipelineConfig) -> Dataset {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let smoothed = sma(&closes, params.sma_period);
    let aligned = if closes.len() >= params.sma_period {
        &closes[params.sma_period - 1..]
    } else {
        &[][..]
    };

    let (norm_close, scale) = normalize(aligned);
    let (norm_sma, _) = normalize(&smoothed);

    let window = params.window_size;
    let pairs = norm_close.len().saturating_sub(window);

    let mut features = Vec::with_capacity(pairs);
    let mut labels = Vec::with_capacity(pairs);
    for i in 0..pairs {
        features.push(FeatureWindow {
            close: norm_close[i..i + window].to_vec(),
            sma: norm_sma[i..i + window].to_vec(),
        });
        labels.push(norm_close[i + window]);
    }

    Dataset {
        features,
        labels,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles_from(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Candle::flat(i as i64 * 60_000, c))
            .collect()
    }

    fn small_params() -> PipelineConfig {
        PipelineConfig {
            sma_period: 3,
            window_size: 3,
        }
    }

    #[test]
    fn test_sma_basic() {
        let values: Vec<f64> = (1..=12).map(|v| v as f64).collect();
        let out = sma(&values, 3);
        assert_eq!(
            out,
            vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]
        );
    }

    #[test]
    fn test_sma_short_input() {
        assert!(sma(&[1.0, 2.0], 3).is_empty());
        assert!(sma(&[], 3).is_empty());
    }

    #[test]
    fn test_sma_period_one_is_identity() {
        let values = vec![4.0, 2.0, 8.0];
        assert_eq!(sma(&values, 1), values);
    }

    #[test]
    fn test_prepare_worked_scenario() {
        // Closes 1..=12, SMA period 3, window 3:
        // SMA = [2..=11] (10 values), aligned closes = [3..=12] (10 values),
        // 10 - 3 = 7 feature/label pairs.
        let candles = candles_from(&(1..=12).map(|v| v as f64).collect::<Vec<_>>());
        let ds = prepare(&candles, &small_params());

        assert_eq!(ds.len(), 7);
        assert_eq!(ds.labels.len(), 7);
        assert_eq!(ds.scale, MinMax { min: 3.0, max: 12.0 });

        // First feature window: normalized [3,4,5] and normalized SMA [2,3,4].
        let close_scale = ds.scale;
        let sma_scale = MinMax { min: 2.0, max: 11.0 };
        let first = &ds.features[0];
        for (got, raw) in first.close.iter().zip([3.0, 4.0, 5.0]) {
            assert!((got - close_scale.apply(raw)).abs() < 1e-12);
        }
        for (got, raw) in first.sma.iter().zip([2.0, 3.0, 4.0]) {
            assert!((got - sma_scale.apply(raw)).abs() < 1e-12);
        }

        // First label: normalized close at aligned index 3, i.e. raw 6.
        assert!((ds.labels[0] - close_scale.apply(6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_label_alignment_all_windows() {
        let raw: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let candles = candles_from(&raw);
        let ds = prepare(&candles, &small_params());
        // Aligned series starts at raw[2]; label i is aligned[i + window].
        let aligned: Vec<f64> = raw[2..].to_vec();
        for (i, label) in ds.labels.iter().enumerate() {
            assert!((label - ds.scale.apply(aligned[i + 3])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_window_and_label_counts_match() {
        let candles = candles_from(&(1..=30).map(|v| v as f64).collect::<Vec<_>>());
        let ds = prepare(&candles, &small_params());
        assert_eq!(ds.features.len(), ds.labels.len());
        for w in &ds.features {
            assert_eq!(w.close.len(), 3);
            assert_eq!(w.sma.len(), 3);
        }
    }

    #[test]
    fn test_aligned_length_at_most_window_is_empty() {
        // Aligned length is exactly window_size: zero pairs, no panic.
        let candles = candles_from(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let ds = prepare(&candles, &small_params());
        assert!(ds.is_empty());
        assert!(ds.labels.is_empty());
        assert!(ds.last_window().is_none());
    }

    #[test]
    fn test_input_shorter_than_sma_period_is_empty() {
        let candles = candles_from(&[1.0, 2.0]);
        let ds = prepare(&candles, &small_params());
        assert!(ds.is_empty());
        assert!(ds.scale.is_degenerate());
    }

    #[test]
    fn test_irregular_spacing_tolerated() {
        // Gaps in timestamps must not affect windowing; only order matters.
        let mut candles = candles_from(&(1..=12).map(|v| v as f64).collect::<Vec<_>>());
        for (i, c) in candles.iter_mut().enumerate() {
            c.ts += (i as i64 % 3) * 17_000;
        }
        let ds = prepare(&candles, &small_params());
        assert_eq!(ds.len(), 7);
    }
}
