use crate::errors::ConfigError;
use crate::models::stock::PriceField;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/uber_stock_data.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_path: PathBuf,
    pub short_window: usize,
    pub long_window: usize,
    /// 均线与最新价所用的列
    pub price_field: PriceField,
    pub seasonality_field: PriceField,
    /// 高波动日阈值（最高价 - 最低价）
    pub range_threshold: f64,
    /// 波动最大的天数
    pub top_n: usize,
    pub top_months: usize,
    pub correlation_x: PriceField,
    pub correlation_y: PriceField,
}

impl Config {
    pub fn new() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            short_window: 7,
            long_window: 30,
            price_field: PriceField::Close,
            seasonality_field: PriceField::AdjClose,
            range_threshold: 5.0,
            top_n: 5,
            top_months: 3,
            correlation_x: PriceField::Volume,
            correlation_y: PriceField::Close,
        }
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_short_window(mut self, window: usize) -> Self {
        self.short_window = window;
        self
    }

    pub fn with_long_window(mut self, window: usize) -> Self {
        self.long_window = window;
        self
    }

    pub fn with_price_field(mut self, field: PriceField) -> Self {
        self.price_field = field;
        self
    }

    pub fn with_seasonality_field(mut self, field: PriceField) -> Self {
        self.seasonality_field = field;
        self
    }

    pub fn with_range_threshold(mut self, threshold: f64) -> Self {
        self.range_threshold = threshold;
        self
    }

    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    pub fn with_top_months(mut self, n: usize) -> Self {
        self.top_months = n;
        self
    }

    pub fn with_correlation_fields(mut self, x: PriceField, y: PriceField) -> Self {
        self.correlation_x = x;
        self.correlation_y = y;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_window == 0 {
            return Err(ConfigError::ZeroWindow { name: "short" });
        }
        if self.long_window == 0 {
            return Err(ConfigError::ZeroWindow { name: "long" });
        }
        if self.top_n == 0 {
            return Err(ConfigError::ZeroCount { name: "top_n" });
        }
        if self.top_months == 0 {
            return Err(ConfigError::ZeroCount { name: "top_months" });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
