//! Min-max normalization with an exact inverse.
//!
//! Each series carries its own [`MinMax`] computed over exactly that series.
//! The close-price scale is what lets a normalized model output be mapped
//! back to a real price; the SMA scale is computed the same way but
//! discarded after windowing.

use serde::{Deserialize, Serialize};

/// Range below which a scale is treated as degenerate (constant series).
const DEGENERATE_EPS: f64 = 1e-12;

/// Min/max scalars of one series, the state needed to invert normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    /// Smallest element of the series.
    pub min: f64,
    /// Largest element of the series.
    pub max: f64,
}

impl MinMax {
    /// Compute the scale of `values`. An empty series yields `{0, 0}`,
    /// which is degenerate.
    pub fn of(values: &[f64]) -> Self {
        let mut iter = values.iter();
        let Some(&first) = iter.next() else {
            return Self { min: 0.0, max: 0.0 };
        };
        let (min, max) = iter.fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Self { min, max }
    }

    /// `max - min`.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Whether the series was empty or constant, making `(x - min) / range`
    /// meaningless.
    pub fn is_degenerate(&self) -> bool {
        self.range().abs() < DEGENERATE_EPS
    }

    /// Rescale one element into `[0, 1]`. A degenerate scale maps everything
    /// to 0 instead of dividing by zero.
    pub fn apply(&self, x: f64) -> f64 {
        if self.is_degenerate() {
            0.0
        } else {
            (x - self.min) / self.range()
        }
    }

    /// Map a normalized value back to the original scale:
    /// `p * (max - min) + min`. Exact inverse of [`MinMax::apply`] for
    /// non-degenerate scales.
    pub fn invert(&self, p: f64) -> f64 {
        p * self.range() + self.min
    }
}

/// Rescale a whole series to `[0, 1]`, returning the scale used.
pub fn normalize(values: &[f64]) -> (Vec<f64>, MinMax) {
    let scale = MinMax::of(values);
    let scaled = values.iter().map(|&v| scale.apply(v)).collect();
    (scaled, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremes_map_to_unit_interval() {
        let (scaled, scale) = normalize(&[3.0, 9.0, 6.0]);
        assert_eq!(scale, MinMax { min: 3.0, max: 9.0 });
        assert_eq!(scaled[0], 0.0);
        assert_eq!(scaled[1], 1.0);
        assert_eq!(scaled[2], 0.5);
        for v in &scaled {
            assert!((0.0..=1.0).contains(v));
        }
    }

    #[test]
    fn test_round_trip() {
        let original = vec![12.5, 7.25, 19.0, 7.26, 18.99];
        let (scaled, scale) = normalize(&original);
        for (s, o) in scaled.iter().zip(&original) {
            assert!((scale.invert(*s) - o).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_series_maps_to_zero() {
        let (scaled, scale) = normalize(&[5.0, 5.0, 5.0]);
        assert!(scale.is_degenerate());
        assert!(scaled.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty_series() {
        let (scaled, scale) = normalize(&[]);
        assert!(scaled.is_empty());
        assert!(scale.is_degenerate());
    }

    #[test]
    fn test_negative_values() {
        let (scaled, scale) = normalize(&[-10.0, 0.0, 10.0]);
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
        assert_eq!(scale.invert(0.5), 0.0);
    }
}
