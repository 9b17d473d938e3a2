// 公开导出的模块，供外部使用
pub mod analytics;
pub mod config;
pub mod data_provider;
pub mod errors;
pub mod loader;
pub mod models;
pub mod services;

#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use data_provider::SeriesCache;
pub use errors::{AnalyticsError, DataLoadError, Result, ServiceError, ValidationError};
pub use loader::{ArrowSeriesLoader, CsvSeriesLoader, SeriesLoader};
pub use models::stock::{DailyBar, PriceField, Series};
pub use services::{AnalysisService, TextReport};
