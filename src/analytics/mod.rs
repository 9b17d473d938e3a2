//! 行情序列分析
//!
//! Every operation here is a pure function over a borrowed [`Series`] or
//! numeric slice. Derived columns come back as new vectors parallel to the
//! input; nothing is written back into the series.
//!
//! [`Series`]: crate::models::stock::Series

pub mod correlation;
pub mod price;
pub mod rolling;
pub mod seasonality;
pub mod special;
pub mod stats;

pub use correlation::{
    field_correlation, pearson_correlation, spearman_correlation, Correlation, FieldCorrelation,
};
pub use price::{daily_range, open_close_delta, DailyRange, OpenCloseDelta};
pub use rolling::{
    crossover_events, moving_average_crossovers, rolling_mean, rolling_mean_values,
    CrossDirection, Crossover,
};
pub use seasonality::{month_name, monthly_average, MonthlyAverages};
pub use stats::{summary_statistics, SummaryStatistics};
