use crate::errors::{AnalyticsError, Result};
use crate::models::stock::{PriceField, Series};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

/// Simple moving average of `field`; the first `window - 1` entries are `None`.
pub fn rolling_mean(series: &Series, field: PriceField, window: usize) -> Result<Vec<Option<f64>>> {
    rolling_mean_values(&series.values(field), window)
}

/// 对任意数值序列计算简单移动平均
pub fn rolling_mean_values(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    if window == 0 {
        return Err(AnalyticsError::InvalidWindow { window });
    }

    // 每个窗口独立求和
    let out = (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let sum: f64 = values[i + 1 - window..=i].iter().sum();
            Some(sum / window as f64)
        })
        .collect();
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossDirection {
    /// 短均线上穿长均线
    Bullish,
    /// 短均线下穿长均线
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crossover {
    pub date: NaiveDate,
    pub direction: CrossDirection,
    pub short_ma: f64,
    pub long_ma: f64,
}

/// Every point where the sign of `short MA - long MA` flips.
///
/// Indices where either average is still undefined are skipped. A bar where
/// the two averages are exactly equal does not pick a side: the crossover is
/// reported on the first later bar that lands on the opposite side.
pub fn crossover_events(
    series: &Series,
    field: PriceField,
    short_window: usize,
    long_window: usize,
) -> Result<Vec<Crossover>> {
    let values = series.values(field);
    let short = rolling_mean_values(&values, short_window)?;
    let long = rolling_mean_values(&values, long_window)?;

    let mut events = Vec::new();
    let mut last_side: Option<Ordering> = None;

    for (i, bar) in series.bars().iter().enumerate() {
        let (Some(s), Some(l)) = (short[i], long[i]) else {
            continue;
        };
        let side = match s.partial_cmp(&l) {
            Some(Ordering::Equal) | None => continue,
            Some(side) => side,
        };

        if let Some(prev) = last_side {
            if prev != side {
                events.push(Crossover {
                    date: bar.date(),
                    direction: if side == Ordering::Greater {
                        CrossDirection::Bullish
                    } else {
                        CrossDirection::Bearish
                    },
                    short_ma: s,
                    long_ma: l,
                });
            }
        }
        last_side = Some(side);
    }

    Ok(events)
}

pub fn moving_average_crossovers(
    series: &Series,
    field: PriceField,
    short_window: usize,
    long_window: usize,
) -> Result<usize> {
    Ok(crossover_events(series, field, short_window, long_window)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stock::DailyBar;

    fn closes(values: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");
        let bars = values
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let date = start + chrono::Duration::days(i as i64);
                DailyBar::new(date, c, c, c, c, c, 10.0).expect("valid bar")
            })
            .collect();
        Series::new(bars).expect("valid series")
    }

    #[test]
    fn rolling_mean_scenario() {
        let out = rolling_mean_values(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).expect("valid window");
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn window_one_reproduces_input() {
        let values = [0.1, 0.7, 1e10, 0.3, 123.456, 1e-9];
        let out = rolling_mean_values(&values, 1).expect("valid window");
        let expected: Vec<Option<f64>> = values.iter().map(|v| Some(*v)).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn output_length_matches_input() {
        let values: Vec<f64> = (0..20).map(|i| i as f64 * 1.5).collect();
        for window in [1, 4, 20, 25] {
            let out = rolling_mean_values(&values, window).expect("valid window");
            assert_eq!(out.len(), values.len());
            let undefined = window.min(values.len() + 1) - 1;
            assert!(out[..undefined.min(out.len())].iter().all(Option::is_none));
            assert!(out[undefined.min(out.len())..].iter().all(Option::is_some));
        }
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = rolling_mean_values(&[1.0], 0).expect_err("must fail");
        assert_eq!(err, AnalyticsError::InvalidWindow { window: 0 });

        let series = closes(&[1.0, 2.0]);
        assert!(moving_average_crossovers(&series, PriceField::Close, 0, 2).is_err());
    }

    #[test]
    fn constant_series_has_no_crossovers() {
        let series = closes(&[5.0; 12]);
        let count = moving_average_crossovers(&series, PriceField::Close, 2, 4).expect("valid");
        assert_eq!(count, 0);
    }

    #[test]
    fn detects_up_and_down_crossings() {
        // 先跌后涨再跌
        let series = closes(&[10.0, 9.0, 8.0, 7.0, 8.0, 10.0, 12.0, 11.0, 9.0, 7.0]);
        let events = crossover_events(&series, PriceField::Close, 1, 3).expect("valid");
        let directions: Vec<CrossDirection> = events.iter().map(|e| e.direction).collect();
        assert_eq!(
            directions,
            vec![CrossDirection::Bullish, CrossDirection::Bearish]
        );
        assert_eq!(
            moving_average_crossovers(&series, PriceField::Close, 1, 3).expect("valid"),
            2
        );
    }

    #[test]
    fn large_value_does_not_leak_into_later_windows() {
        let out = rolling_mean_values(&[1e16, 1.0, 1.0, 1.0], 2).expect("valid window");
        assert_eq!(out[0], None);
        assert_eq!(out[2], Some(1.0));
        assert_eq!(out[3], Some(1.0));
    }

    #[test]
    fn equal_bar_between_same_sides_is_not_a_crossover() {
        // MA1 - MA2 的符号依次为 +, 0, +
        let series = closes(&[1.0, 2.0, 2.0, 3.0]);
        let events = crossover_events(&series, PriceField::Close, 1, 2).expect("valid");
        assert!(events.is_empty());
    }

    #[test]
    fn equal_bar_between_opposite_sides_counts_once() {
        // MA1 - MA2 的符号依次为 +, 0, -
        let series = closes(&[1.0, 2.0, 2.0, 1.0]);
        let events = crossover_events(&series, PriceField::Close, 1, 2).expect("valid");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, CrossDirection::Bearish);
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2023, 1, 4).expect("valid date"));
    }

    #[test]
    fn windows_longer_than_series_yield_nothing() {
        let series = closes(&[1.0, 2.0, 3.0]);
        assert_eq!(
            moving_average_crossovers(&series, PriceField::Close, 7, 30).expect("valid"),
            0
        );
        let out = rolling_mean(&series, PriceField::Close, 30).expect("valid");
        assert!(out.iter().all(Option::is_none));
    }
}
