use chrono::NaiveDate;
use thiserror::Error;

/// 分析运算错误：均为输入形状导致的确定性失败，不做重试
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("{operation} requires at least one value")]
    EmptyInput { operation: &'static str },

    #[error("window must be >= 1, got {window}")]
    InvalidWindow { window: usize },

    #[error("length mismatch: {left} values vs {right} values")]
    LengthMismatch { left: usize, right: usize },

    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

/// 日线/序列不变量校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("volume must be non-negative, got {0}")]
    NegativeVolume(f64),

    #[error("bar high must be >= low")]
    InvalidBarRange,

    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("dates must be strictly increasing: {previous} followed by {next}")]
    DatesNotIncreasing { previous: NaiveDate, next: NaiveDate },
}

/// 数据加载错误
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Arrow error: {0}")]
    ArrowError(String),

    #[error("Date parsing error at line {line}: '{value}'")]
    DateError { line: u64, value: String },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid bar at line {line}: {source}")]
    InvalidBar {
        line: u64,
        #[source]
        source: ValidationError,
    },

    #[error("Invalid series: {0}")]
    InvalidSeries(#[from] ValidationError),
}

impl From<arrow::error::ArrowError> for DataLoadError {
    fn from(e: arrow::error::ArrowError) -> Self {
        DataLoadError::ArrowError(e.to_string())
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} window must be >= 1")]
    ZeroWindow { name: &'static str },

    #[error("{name} must be >= 1")]
    ZeroCount { name: &'static str },

    #[error("unknown price field: '{0}'")]
    UnknownField(String),
}

/// 服务层统一错误
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Load(#[from] DataLoadError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
pub type LoadResult<T> = std::result::Result<T, DataLoadError>;
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
