use crate::errors::{ConfigError, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 日线数据结构
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBar {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    adj_close: f64,
    volume: f64,
}

impl DailyBar {
    /// 创建日线，校验 high/low 包络与成交量非负
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: f64,
        volume: f64,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("open", open),
            ("high", high),
            ("low", low),
            ("close", close),
            ("adj_close", adj_close),
            ("volume", volume),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
        }
        if volume < 0.0 {
            return Err(ValidationError::NegativeVolume(volume));
        }
        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }
        if open > high || open < low || close > high || close < low {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            adj_close,
            volume,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn open(&self) -> f64 {
        self.open
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn close(&self) -> f64 {
        self.close
    }

    pub fn adj_close(&self) -> f64 {
        self.adj_close
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// 读取指定字段
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::AdjClose => self.adj_close,
            PriceField::Volume => self.volume,
        }
    }
}

/// 分析所读取的列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl PriceField {
    /// CSV 表头中的列名
    pub fn column_name(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::AdjClose => "Adj Close",
            PriceField::Volume => "Volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for PriceField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            "adjclose" => Ok(PriceField::AdjClose),
            "volume" => Ok(PriceField::Volume),
            _ => Err(ConfigError::UnknownField(s.to_string())),
        }
    }
}

/// 按日期严格递增排列的日线序列
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<DailyBar>,
}

impl Series {
    /// 使用已排序的日线创建序列
    pub fn new(bars: Vec<DailyBar>) -> Result<Self, ValidationError> {
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ValidationError::DatesNotIncreasing {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    /// 先按日期升序排序再校验，重复日期仍然报错
    pub fn from_unsorted(mut bars: Vec<DailyBar>) -> Result<Self, ValidationError> {
        bars.sort_by_key(|bar| bar.date);
        Self::new(bars)
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&DailyBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|bar| bar.date).collect()
    }

    /// 提取一列数值
    pub fn values(&self, field: PriceField) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.field(field)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
    }

    fn bar(d: u32, close: f64) -> DailyBar {
        DailyBar::new(day(d), close, close + 1.0, close - 1.0, close, close, 100.0)
            .expect("valid bar")
    }

    #[test]
    fn rejects_high_below_low() {
        let err = DailyBar::new(day(1), 10.0, 9.0, 11.0, 10.0, 10.0, 1.0).expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidBarRange);
    }

    #[test]
    fn rejects_close_outside_range() {
        let err = DailyBar::new(day(1), 10.0, 11.0, 9.0, 12.0, 12.0, 1.0).expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidBarBounds);
    }

    #[test]
    fn rejects_negative_volume_and_nan() {
        let err = DailyBar::new(day(1), 10.0, 11.0, 9.0, 10.0, 10.0, -1.0).expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeVolume(_)));

        let err =
            DailyBar::new(day(1), f64::NAN, 11.0, 9.0, 10.0, 10.0, 1.0).expect_err("must fail");
        assert_eq!(err, ValidationError::NonFiniteValue { field: "open" });
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let err = Series::from_unsorted(vec![bar(2, 1.0), bar(1, 2.0), bar(2, 3.0)])
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::DatesNotIncreasing { .. }));
    }

    #[test]
    fn from_unsorted_orders_by_date() {
        let series = Series::from_unsorted(vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)])
            .expect("valid series");
        assert_eq!(series.values(PriceField::Close), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.first().map(|b| b.date()), Some(day(1)));
    }

    #[test]
    fn parses_field_names() {
        assert_eq!("Adj Close".parse::<PriceField>(), Ok(PriceField::AdjClose));
        assert_eq!("adj_close".parse::<PriceField>(), Ok(PriceField::AdjClose));
        assert_eq!("VOLUME".parse::<PriceField>(), Ok(PriceField::Volume));
        assert!("vwap".parse::<PriceField>().is_err());
    }
}
