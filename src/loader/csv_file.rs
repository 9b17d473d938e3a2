use crate::errors::{DataLoadError, LoadResult};
use crate::loader::base::{SeriesLoader, SourceFingerprint};
use crate::models::stock::{DailyBar, Series};
use crate::util;
use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

// CSV 原始行，列名与数据集表头一致
#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Adj Close", default)]
    adj_close: Option<f64>,
    #[serde(rename = "Volume")]
    volume: f64,
}

const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Loads a `Date,Open,High,Low,Close,Adj Close,Volume` CSV file.
pub struct CsvSeriesLoader {
    path: PathBuf,
    name: String,
}

impl CsvSeriesLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl SeriesLoader for CsvSeriesLoader {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn fingerprint(&self) -> LoadResult<SourceFingerprint> {
        SourceFingerprint::of_file(&self.path)
    }

    fn load(&self) -> LoadResult<Series> {
        info!("Loading daily bars from {}", self.path.display());
        let file = File::open(&self.path)?;
        let series = read_series_from_csv(file)?;
        info!("Loaded {} daily bars from {}", series.len(), self.path.display());
        Ok(series)
    }
}

/// 从任意读取源解析 CSV；行按日期升序排序后返回
pub fn read_series_from_csv<R: Read>(reader: R) -> LoadResult<Series> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataLoadError::MissingColumn(column.to_string()));
        }
    }

    let mut bars = Vec::new();
    for record in rdr.deserialize::<RawBar>() {
        let raw = record?;
        // 表头为第 1 行
        let line = bars.len() as u64 + 2;

        let date = util::parse_date(&raw.date).ok_or_else(|| DataLoadError::DateError {
            line,
            value: raw.date.clone(),
        })?;
        let bar = DailyBar::new(
            date,
            raw.open,
            raw.high,
            raw.low,
            raw.close,
            raw.adj_close.unwrap_or(raw.close),
            raw.volume,
        )
        .map_err(|source| DataLoadError::InvalidBar { line, source })?;
        bars.push(bar);
    }

    debug!("Parsed {} CSV rows", bars.len());
    Ok(Series::from_unsorted(bars)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stock::PriceField;
    use crate::errors::ValidationError;

    #[test]
    fn parses_and_sorts_rows() {
        let data = "\
Date,Open,High,Low,Close,Adj Close,Volume
2019-05-13,38.79,39.24,36.08,37.10,37.10,79442400
2019-05-10,42.00,45.00,41.06,41.57,41.57,186322500
";
        let series = read_series_from_csv(data.as_bytes()).expect("valid csv");
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(PriceField::Close), vec![41.57, 37.10]);
        assert_eq!(series.values(PriceField::Volume)[0], 186_322_500.0);
    }

    #[test]
    fn adj_close_defaults_to_close() {
        let data = "Date,Open,High,Low,Close,Volume\n2024-01-02,10,11,9,10.5,100\n";
        let series = read_series_from_csv(data.as_bytes()).expect("valid csv");
        assert_eq!(series.values(PriceField::AdjClose), vec![10.5]);
    }

    #[test]
    fn reports_missing_column() {
        let data = "Date,Open,High,Low,Volume\n2024-01-02,10,11,9,100\n";
        let err = read_series_from_csv(data.as_bytes()).expect_err("must fail");
        assert!(matches!(err, DataLoadError::MissingColumn(ref c) if c == "Close"));
    }

    #[test]
    fn reports_bad_date_with_line() {
        let data = "Date,Open,High,Low,Close,Volume\n2024-01-02,10,11,9,10,1\nsoon,10,11,9,10,1\n";
        let err = read_series_from_csv(data.as_bytes()).expect_err("must fail");
        assert!(matches!(err, DataLoadError::DateError { line: 3, .. }));
    }

    #[test]
    fn reports_invalid_bar() {
        let data = "Date,Open,High,Low,Close,Volume\n2024-01-02,10,9,11,10,1\n";
        let err = read_series_from_csv(data.as_bytes()).expect_err("must fail");
        assert!(matches!(
            err,
            DataLoadError::InvalidBar {
                line: 2,
                source: ValidationError::InvalidBarRange
            }
        ));
    }

    #[test]
    fn duplicate_dates_fail() {
        let data = "Date,Open,High,Low,Close,Volume\n2024-01-02,10,11,9,10,1\n2024-01-02,10,11,9,10,1\n";
        let err = read_series_from_csv(data.as_bytes()).expect_err("must fail");
        assert!(matches!(err, DataLoadError::InvalidSeries(_)));
    }
}
