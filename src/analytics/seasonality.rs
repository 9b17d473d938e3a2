use crate::errors::{AnalyticsError, Result};
use crate::models::stock::{PriceField, Series};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// 按自然月（忽略年份）分组的均值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverages {
    pub field: PriceField,
    /// month number (1-12) -> average of `field`
    pub averages: BTreeMap<u32, f64>,
}

impl MonthlyAverages {
    pub fn get(&self, month: u32) -> Option<f64> {
        self.averages.get(&month).copied()
    }

    /// Highest average; ties go to the lower month number.
    pub fn best(&self) -> Option<(u32, f64)> {
        self.top(1).into_iter().next()
    }

    /// Lowest average; ties go to the lower month number.
    pub fn worst(&self) -> Option<(u32, f64)> {
        self.bottom(1).into_iter().next()
    }

    /// `n` highest months, highest first.
    pub fn top(&self, n: usize) -> Vec<(u32, f64)> {
        let mut months: Vec<(u32, f64)> = self.averages.iter().map(|(m, v)| (*m, *v)).collect();
        // 稳定排序：月份已升序，平局保持月份顺序
        months.sort_by(|a, b| b.1.total_cmp(&a.1));
        months.truncate(n);
        months
    }

    /// `n` lowest months, lowest first.
    pub fn bottom(&self, n: usize) -> Vec<(u32, f64)> {
        let mut months: Vec<(u32, f64)> = self.averages.iter().map(|(m, v)| (*m, *v)).collect();
        months.sort_by(|a, b| a.1.total_cmp(&b.1));
        months.truncate(n);
        months
    }

    /// Difference between the best and worst monthly average.
    pub fn spread(&self) -> Option<f64> {
        match (self.best(), self.worst()) {
            (Some((_, hi)), Some((_, lo))) => Some(hi - lo),
            _ => None,
        }
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for 1-12, `"Unknown"` otherwise.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("Unknown")
}

pub fn monthly_average(series: &Series, field: PriceField) -> Result<MonthlyAverages> {
    if series.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            operation: "monthly_average",
        });
    }

    let mut buckets: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for bar in series.bars() {
        let entry = buckets.entry(bar.date().month()).or_insert((0.0, 0));
        entry.0 += bar.field(field);
        entry.1 += 1;
    }

    let averages = buckets
        .into_iter()
        .map(|(month, (sum, count))| (month, sum / count as f64))
        .collect();

    Ok(MonthlyAverages { field, averages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stock::DailyBar;
    use chrono::NaiveDate;

    fn bar(y: i32, m: u32, d: u32, close: f64) -> DailyBar {
        let date = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
        DailyBar::new(date, close, close, close, close, close, 1.0).expect("valid bar")
    }

    #[test]
    fn two_january_bars_average() {
        let series = Series::new(vec![bar(2024, 1, 2, 10.0), bar(2024, 1, 3, 20.0)]).expect("valid");
        let monthly = monthly_average(&series, PriceField::Close).expect("non-empty");
        assert_eq!(monthly.averages.len(), 1);
        assert_eq!(monthly.get(1), Some(15.0));
        assert_eq!(monthly.best(), Some((1, 15.0)));
    }

    #[test]
    fn groups_across_years() {
        let series = Series::new(vec![
            bar(2022, 3, 1, 10.0),
            bar(2022, 4, 1, 40.0),
            bar(2023, 3, 1, 30.0),
        ])
        .expect("valid");
        let monthly = monthly_average(&series, PriceField::Close).expect("non-empty");
        assert_eq!(monthly.get(3), Some(20.0));
        assert_eq!(monthly.get(4), Some(40.0));
        assert_eq!(monthly.best(), Some((4, 40.0)));
        assert_eq!(monthly.worst(), Some((3, 20.0)));
        assert_eq!(monthly.spread(), Some(20.0));
    }

    #[test]
    fn ties_resolve_to_lower_month() {
        let series = Series::new(vec![
            bar(2024, 2, 1, 10.0),
            bar(2024, 5, 1, 10.0),
            bar(2024, 9, 1, 10.0),
        ])
        .expect("valid");
        let monthly = monthly_average(&series, PriceField::Close).expect("non-empty");
        assert_eq!(monthly.best(), Some((2, 10.0)));
        assert_eq!(monthly.worst(), Some((2, 10.0)));
        assert_eq!(
            monthly.top(3).iter().map(|(m, _)| *m).collect::<Vec<_>>(),
            vec![2, 5, 9]
        );
    }

    #[test]
    fn empty_series_fails() {
        assert!(matches!(
            monthly_average(&Series::default(), PriceField::AdjClose),
            Err(AnalyticsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }
}
