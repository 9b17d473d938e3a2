use crate::analytics::{
    self, month_name, Correlation, Crossover, MonthlyAverages, SummaryStatistics,
};
use crate::config::Config;
use crate::errors::{AnalyticsError, Result};
use crate::models::stock::{PriceField, Series};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// 纯文本渲染
pub trait TextReport {
    fn render_text(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaReport {
    pub bar_count: usize,
    pub positive_days: usize,
    /// positive_days / bar_count
    pub positive_share: f64,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// 价格高于两条均线
    Uptrend,
    /// 价格低于两条均线
    Downtrend,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageReport {
    pub field: PriceField,
    pub short_window: usize,
    pub long_window: usize,
    pub latest_date: NaiveDate,
    pub latest_price: f64,
    pub latest_short_ma: Option<f64>,
    pub latest_long_ma: Option<f64>,
    pub trend: Option<Trend>,
    pub crossover_count: usize,
    pub crossovers: Vec<Crossover>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatileDay {
    pub date: NaiveDate,
    pub range: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityReport {
    pub stats: SummaryStatistics,
    pub threshold: f64,
    pub days_above_threshold: usize,
    pub top_days: Vec<VolatileDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePriceReport {
    pub x_field: PriceField,
    pub y_field: PriceField,
    pub x_stats: SummaryStatistics,
    pub y_stats: SummaryStatistics,
    pub pearson: Correlation,
    pub spearman: Correlation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthAverage {
    pub month: u32,
    pub name: &'static str,
    pub average: f64,
}

impl From<(u32, f64)> for MonthAverage {
    fn from((month, average): (u32, f64)) -> Self {
        Self {
            month,
            name: month_name(month),
            average,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalityReport {
    pub field: PriceField,
    pub months: Vec<MonthAverage>,
    pub top: Vec<MonthAverage>,
    pub bottom: Vec<MonthAverage>,
    /// 最高与最低月均值之差
    pub spread: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub bar_count: usize,
    pub delta: DeltaReport,
    pub moving_average: MovingAverageReport,
    pub volatility: VolatilityReport,
    pub volume_price: VolumePriceReport,
    pub seasonality: SeasonalityReport,
}

pub fn build_delta_report(series: &Series) -> Result<DeltaReport> {
    let delta = analytics::open_close_delta(series)?;
    let bar_count = delta.per_bar_delta.len();
    Ok(DeltaReport {
        bar_count,
        positive_days: delta.positive_count,
        positive_share: delta.positive_count as f64 / bar_count as f64,
        mean: delta.mean,
        median: delta.median,
        min: delta.min,
        max: delta.max,
    })
}

pub fn build_moving_average_report(series: &Series, config: &Config) -> Result<MovingAverageReport> {
    let field = config.price_field;
    let latest = series.last().ok_or(AnalyticsError::EmptyInput {
        operation: "moving_average_report",
    })?;

    let short = analytics::rolling_mean(series, field, config.short_window)?;
    let long = analytics::rolling_mean(series, field, config.long_window)?;
    let crossovers =
        analytics::crossover_events(series, field, config.short_window, config.long_window)?;

    let latest_price = latest.field(field);
    let latest_short_ma = short.last().copied().flatten();
    let latest_long_ma = long.last().copied().flatten();
    let trend = match (latest_short_ma, latest_long_ma) {
        (Some(s), Some(l)) if latest_price > s && latest_price > l => Some(Trend::Uptrend),
        (Some(s), Some(l)) if latest_price < s && latest_price < l => Some(Trend::Downtrend),
        (Some(_), Some(_)) => Some(Trend::Mixed),
        _ => None,
    };

    Ok(MovingAverageReport {
        field,
        short_window: config.short_window,
        long_window: config.long_window,
        latest_date: latest.date(),
        latest_price,
        latest_short_ma,
        latest_long_ma,
        trend,
        crossover_count: crossovers.len(),
        crossovers,
    })
}

pub fn build_volatility_report(series: &Series, config: &Config) -> Result<VolatilityReport> {
    let range = analytics::daily_range(series)?;
    Ok(VolatilityReport {
        stats: range.stats()?,
        threshold: config.range_threshold,
        days_above_threshold: range.threshold_count(config.range_threshold),
        top_days: range
            .top_days(config.top_n)
            .into_iter()
            .map(|(date, range)| VolatileDay { date, range })
            .collect(),
    })
}

pub fn build_volume_price_report(series: &Series, config: &Config) -> Result<VolumePriceReport> {
    let xs = series.values(config.correlation_x);
    let ys = series.values(config.correlation_y);
    let correlation = analytics::field_correlation(series, config.correlation_x, config.correlation_y)?;
    Ok(VolumePriceReport {
        x_field: config.correlation_x,
        y_field: config.correlation_y,
        x_stats: analytics::summary_statistics(&xs)?,
        y_stats: analytics::summary_statistics(&ys)?,
        pearson: correlation.pearson,
        spearman: correlation.spearman,
    })
}

pub fn build_seasonality_report(series: &Series, config: &Config) -> Result<SeasonalityReport> {
    let monthly: MonthlyAverages = analytics::monthly_average(series, config.seasonality_field)?;
    Ok(SeasonalityReport {
        field: monthly.field,
        months: monthly.averages.iter().map(|(m, v)| (*m, *v).into()).collect(),
        top: monthly.top(config.top_months).into_iter().map(Into::into).collect(),
        bottom: monthly
            .bottom(config.top_months)
            .into_iter()
            .map(Into::into)
            .collect(),
        spread: monthly.spread().unwrap_or_default(),
    })
}

pub fn build_full_report(series: &Series, config: &Config) -> Result<FullReport> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.date(), last.date()),
        _ => {
            return Err(AnalyticsError::EmptyInput {
                operation: "full_report",
            })
        }
    };

    Ok(FullReport {
        first_date: first,
        last_date: last,
        bar_count: series.len(),
        delta: build_delta_report(series)?,
        moving_average: build_moving_average_report(series, config)?,
        volatility: build_volatility_report(series, config)?,
        volume_price: build_volume_price_report(series, config)?,
        seasonality: build_seasonality_report(series, config)?,
    })
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn write_stats(out: &mut String, label: &str, stats: &SummaryStatistics) {
    let _ = writeln!(out, "{}:", label);
    let _ = writeln!(out, "  count   {}", stats.count);
    let _ = writeln!(out, "  mean    {:.2}", stats.mean);
    let _ = writeln!(out, "  std     {}", fmt_opt(stats.std_dev));
    let _ = writeln!(out, "  min     {:.2}", stats.min);
    let _ = writeln!(out, "  q1      {:.2}", stats.q1);
    let _ = writeln!(out, "  median  {:.2}", stats.median);
    let _ = writeln!(out, "  q3      {:.2}", stats.q3);
    let _ = writeln!(out, "  max     {:.2}", stats.max);
}

impl TextReport for DeltaReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Open/close delta");
        let _ = writeln!(out, "{:-<40}", "");
        let _ = writeln!(
            out,
            "Days closing above open: {} of {} ({:.1}%)",
            self.positive_days,
            self.bar_count,
            self.positive_share * 100.0
        );
        let _ = writeln!(out, "Mean delta:   {:.2}", self.mean);
        let _ = writeln!(out, "Median delta: {:.2}", self.median);
        let _ = writeln!(out, "Min delta:    {:.2}", self.min);
        let _ = writeln!(out, "Max delta:    {:.2}", self.max);
        out
    }
}

impl TextReport for MovingAverageReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Moving averages ({}, {}/{} bars)",
            self.field, self.short_window, self.long_window
        );
        let _ = writeln!(out, "{:-<40}", "");
        let _ = writeln!(out, "Latest {} ({}): {:.2}", self.field, self.latest_date, self.latest_price);
        let _ = writeln!(out, "MA{}: {}", self.short_window, fmt_opt(self.latest_short_ma));
        let _ = writeln!(out, "MA{}: {}", self.long_window, fmt_opt(self.latest_long_ma));
        if let Some(trend) = self.trend {
            let _ = writeln!(out, "Trend: {:?}", trend);
        }
        let _ = writeln!(out, "Crossovers: {}", self.crossover_count);
        for cross in self.crossovers.iter().rev().take(5) {
            let _ = writeln!(
                out,
                "  {} {:?} (short {:.2}, long {:.2})",
                cross.date, cross.direction, cross.short_ma, cross.long_ma
            );
        }
        out
    }
}

impl TextReport for VolatilityReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Daily volatility (high - low)");
        let _ = writeln!(out, "{:-<40}", "");
        write_stats(&mut out, "Range", &self.stats);
        let _ = writeln!(out, "Days above {:.2}: {}", self.threshold, self.days_above_threshold);
        let _ = writeln!(out, "Most volatile days:");
        for day in &self.top_days {
            let _ = writeln!(out, "  {}  {:.2}", day.date, day.range);
        }
        out
    }
}

impl TextReport for VolumePriceReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} vs {}", self.x_field, self.y_field);
        let _ = writeln!(out, "{:-<40}", "");
        write_stats(&mut out, self.x_field.column_name(), &self.x_stats);
        write_stats(&mut out, self.y_field.column_name(), &self.y_stats);
        let _ = writeln!(
            out,
            "Pearson:  {:.4} (p = {:.4})",
            self.pearson.coefficient, self.pearson.p_value
        );
        let _ = writeln!(
            out,
            "Spearman: {:.4} (p = {:.4})",
            self.spearman.coefficient, self.spearman.p_value
        );
        out
    }
}

impl TextReport for SeasonalityReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Seasonality ({} by month)", self.field);
        let _ = writeln!(out, "{:-<40}", "");
        for month in &self.months {
            let _ = writeln!(out, "  {:<10} {:.2}", month.name, month.average);
        }
        let names = |months: &[MonthAverage]| {
            months.iter().map(|m| m.name).collect::<Vec<_>>().join(", ")
        };
        let _ = writeln!(out, "Strongest months: {}", names(&self.top[..]));
        let _ = writeln!(out, "Weakest months:   {}", names(&self.bottom[..]));
        let _ = writeln!(out, "Peak/trough spread: {:.2}", self.spread);
        out
    }
}

impl TextReport for FullReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} daily bars from {} to {}",
            self.bar_count, self.first_date, self.last_date
        );
        let _ = writeln!(out);
        for section in [
            self.delta.render_text(),
            self.moving_average.render_text(),
            self.volatility.render_text(),
            self.volume_price.render_text(),
            self.seasonality.render_text(),
        ] {
            out.push_str(&section);
            out.push('\n');
        }
        out
    }
}
