use super::stats::{self, summary_statistics, SummaryStatistics};
use crate::errors::{AnalyticsError, Result};
use crate::models::stock::Series;
use chrono::NaiveDate;
use serde::Serialize;

/// 开盘收盘差值分析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenCloseDelta {
    /// close - open，与输入序列一一对应
    pub per_bar_delta: Vec<f64>,
    /// 收盘高于开盘的天数
    pub positive_count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

pub fn open_close_delta(series: &Series) -> Result<OpenCloseDelta> {
    if series.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            operation: "open_close_delta",
        });
    }

    let per_bar_delta: Vec<f64> = series
        .bars()
        .iter()
        .map(|bar| bar.close() - bar.open())
        .collect();
    let positive_count = per_bar_delta.iter().filter(|d| **d > 0.0).count();

    Ok(OpenCloseDelta {
        positive_count,
        mean: stats::mean(&per_bar_delta),
        median: stats::median(&per_bar_delta),
        min: per_bar_delta.iter().copied().fold(f64::INFINITY, f64::min),
        max: per_bar_delta.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        per_bar_delta,
    })
}

/// 日内波动（最高价 - 最低价）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRange {
    pub dates: Vec<NaiveDate>,
    pub per_bar_range: Vec<f64>,
    pub mean: f64,
    pub max: f64,
}

impl DailyRange {
    /// Number of bars whose range is strictly greater than `threshold`.
    pub fn threshold_count(&self, threshold: f64) -> usize {
        self.per_bar_range.iter().filter(|r| **r > threshold).count()
    }

    pub fn stats(&self) -> Result<SummaryStatistics> {
        summary_statistics(&self.per_bar_range)
    }

    /// The `n` widest-range days, widest first; equal ranges keep date order.
    pub fn top_days(&self, n: usize) -> Vec<(NaiveDate, f64)> {
        let mut days: Vec<(NaiveDate, f64)> = self
            .dates
            .iter()
            .copied()
            .zip(self.per_bar_range.iter().copied())
            .collect();
        days.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        days.truncate(n);
        days
    }
}

pub fn daily_range(series: &Series) -> Result<DailyRange> {
    if series.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            operation: "daily_range",
        });
    }

    let per_bar_range: Vec<f64> = series
        .bars()
        .iter()
        .map(|bar| bar.high() - bar.low())
        .collect();

    Ok(DailyRange {
        dates: series.dates(),
        mean: stats::mean(&per_bar_range),
        max: per_bar_range.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        per_bar_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stock::DailyBar;

    fn series(rows: &[(u32, f64, f64, f64, f64)]) -> Series {
        let bars = rows
            .iter()
            .map(|&(d, open, high, low, close)| {
                let date = NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date");
                DailyBar::new(date, open, high, low, close, close, 1_000.0).expect("valid bar")
            })
            .collect();
        Series::new(bars).expect("valid series")
    }

    #[test]
    fn delta_scenario() {
        let s = series(&[
            (1, 10.0, 13.0, 8.0, 10.0),
            (2, 11.0, 13.0, 8.0, 12.0),
            (3, 11.0, 13.0, 8.0, 9.0),
        ]);
        let delta = open_close_delta(&s).expect("non-empty");
        assert_eq!(delta.per_bar_delta, vec![0.0, 1.0, -2.0]);
        assert_eq!(delta.positive_count, 1);
        assert!((delta.mean - (-1.0 / 3.0)).abs() < 1e-12);
        assert_eq!(delta.median, 0.0);
        assert_eq!(delta.min, -2.0);
        assert_eq!(delta.max, 1.0);
    }

    #[test]
    fn positive_count_matches_close_above_open() {
        let s = series(&[
            (1, 10.0, 12.0, 9.0, 11.0),
            (2, 11.0, 12.0, 9.0, 11.0),
            (3, 11.5, 12.0, 9.0, 10.0),
            (4, 9.5, 12.0, 9.0, 11.5),
        ]);
        let delta = open_close_delta(&s).expect("non-empty");
        let expected = s.bars().iter().filter(|b| b.close() > b.open()).count();
        assert_eq!(delta.positive_count, expected);
        assert_eq!(expected, 2);
    }

    #[test]
    fn empty_series_fails() {
        let empty = Series::default();
        assert!(matches!(
            open_close_delta(&empty),
            Err(AnalyticsError::EmptyInput { .. })
        ));
        assert!(matches!(
            daily_range(&empty),
            Err(AnalyticsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn range_threshold_and_top_days() {
        let s = series(&[
            (1, 10.0, 16.0, 9.0, 10.0),
            (2, 10.0, 11.0, 9.0, 10.0),
            (3, 10.0, 17.0, 10.0, 10.0),
            (4, 10.0, 12.0, 6.0, 10.0),
        ]);
        let range = daily_range(&s).expect("non-empty");
        assert_eq!(range.per_bar_range, vec![7.0, 2.0, 7.0, 6.0]);
        assert_eq!(range.max, 7.0);
        assert_eq!(range.mean, 5.5);
        assert_eq!(range.threshold_count(5.0), 3);
        assert_eq!(range.threshold_count(7.0), 0);

        let top = range.top_days(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.format("%d").to_string(), "01");
        assert_eq!(top[1].0.format("%d").to_string(), "03");
        assert_eq!(range.stats().expect("non-empty").count, 4);
    }
}
