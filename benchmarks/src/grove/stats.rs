//! Summary-statistic computation over per-iteration durations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregate timing figures for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation (divisor n, not n-1).
    pub std_dev: f64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    #[error("cannot summarize an empty duration sequence")]
    EmptyInput,
}

/// Reduces a non-empty duration sequence to mean, extrema, and population
/// standard deviation.
pub fn summarize(durations: &[f64]) -> Result<SummaryStats, StatsError> {
    if durations.is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let n = durations.len() as f64;
    let mean = durations.iter().sum::<f64>() / n;
    let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = durations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let variance = durations.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;

    Ok(SummaryStats { mean, min, max, std_dev: variance.sqrt() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_collapses() {
        let stats = summarize(&[42.5]).unwrap();
        assert_eq!(stats.mean, 42.5);
        assert_eq!(stats.min, 42.5);
        assert_eq!(stats.max, 42.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(summarize(&[]).unwrap_err(), StatsError::EmptyInput);
    }

    #[test]
    fn known_sequence() {
        let stats = summarize(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert!((stats.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn order_does_not_matter() {
        let a = summarize(&[3.0, 1.0, 2.0]).unwrap();
        let b = summarize(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(a, b);
    }
}
