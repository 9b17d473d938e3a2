//! 描述性统计
//!
//! Quartiles use linear interpolation between the closest ranks, the same
//! convention as a `describe()` table.

use crate::errors::{AnalyticsError, Result};
use serde::Serialize;

/// 一组数值的描述性统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). `None` for a single value.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Computes count, mean, sample std-dev, min, quartiles and max.
pub fn summary_statistics(values: &[f64]) -> Result<SummaryStatistics> {
    if values.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            operation: "summary_statistics",
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let mean = mean(values);

    Ok(SummaryStatistics {
        count,
        mean,
        std_dev: sample_std_dev(values, mean),
        min: sorted[0],
        q1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// 算术平均；调用方保证非空
pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, 0.5)
}

fn sample_std_dev(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (n - 1) as f64).sqrt())
}

/// `sorted` must be non-empty and ascending; `q` in [0, 1].
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let idx = q * (n - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let frac = idx - lower as f64;

    if upper >= n {
        sorted[n - 1]
    } else if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_statistics() {
        let stats = summary_statistics(&[5.0]).expect("non-empty");
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.q1, 5.0);
        assert_eq!(stats.q3, 5.0);
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn empty_input_fails() {
        let err = summary_statistics(&[]).expect_err("must fail");
        assert!(matches!(err, AnalyticsError::EmptyInput { .. }));
    }

    #[test]
    fn quartiles_interpolate() {
        let stats = summary_statistics(&[4.0, 1.0, 3.0, 2.0]).expect("non-empty");
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.q1 - 1.75).abs() < 1e-12);
        assert!((stats.median - 2.5).abs() < 1e-12);
        assert!((stats.q3 - 3.25).abs() < 1e-12);
        assert!((stats.mean - 2.5).abs() < 1e-12);
    }

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = summary_statistics(&values).expect("non-empty");
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((stats.std_dev.expect("n > 1") - expected).abs() < 1e-12);
    }

    #[test]
    fn median_of_odd_count() {
        assert_eq!(median(&[9.0, 1.0, 5.0]), 5.0);
    }
}
