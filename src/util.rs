use chrono::{NaiveDate, NaiveDateTime};
use crate::errors::{DataLoadError, LoadResult};

// 数据集中出现过的日期格式
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// 解析日期字符串，支持 YYYY-MM-DD、带时间、YYYYMMDD 等格式
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    // 带时区偏移的时间戳，只取日期部分
    if value.len() > 10 && value.is_char_boundary(10) {
        if let Ok(date) = NaiveDate::parse_from_str(&value[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }

    value.parse::<i32>().ok().and_then(int_to_naive_date)
}

// YYYYMMDD 整数日期
pub fn int_to_naive_date(date_int: i32) -> Option<NaiveDate> {
    if !(1_000_00_00..=9_999_12_31).contains(&date_int) {
        return None;
    }
    let year = date_int / 10_000;
    let month = (date_int / 100 % 100) as u32;
    let day = (date_int % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

// Arrow Date32 为距 1970-01-01 的天数
pub fn naive_date_to_days(date: NaiveDate) -> i32 {
    date.signed_duration_since(unix_epoch()).num_days() as i32
}

pub fn days_to_naive_date(days: i32) -> LoadResult<NaiveDate> {
    unix_epoch()
        .checked_add_signed(chrono::Duration::days(days as i64))
        .ok_or_else(|| DataLoadError::ArrowError(format!("Date32 value out of range: {}", days)))
}

// Arrow数据转换工具
pub mod arrow_utils {
    use super::*;
    use crate::models::stock::{DailyBar, PriceField, Series};
    use arrow::ipc::reader::FileReader;
    use arrow::ipc::writer::FileWriter;
    use arrow::record_batch::RecordBatch;
    use arrow_array::{Array, ArrayRef, Date32Array, Float64Array};
    use arrow_schema::{DataType, Field, Schema};
    use log::info;
    use std::fs::File;
    use std::io::{Read, Seek};
    use std::path::Path;
    use std::sync::Arc;

    const NUMERIC_COLUMNS: [(&str, PriceField); 6] = [
        ("open", PriceField::Open),
        ("high", PriceField::High),
        ("low", PriceField::Low),
        ("close", PriceField::Close),
        ("adj_close", PriceField::AdjClose),
        ("volume", PriceField::Volume),
    ];

    pub fn series_schema() -> Schema {
        let mut fields = vec![Field::new("date", DataType::Date32, false)];
        for (name, _) in NUMERIC_COLUMNS {
            fields.push(Field::new(name, DataType::Float64, false));
        }
        Schema::new(fields)
    }

    // 将日线序列转换为Arrow记录批次
    pub fn series_to_record_batch(series: &Series) -> LoadResult<RecordBatch> {
        let dates: Vec<i32> = series
            .bars()
            .iter()
            .map(|bar| naive_date_to_days(bar.date()))
            .collect();

        let mut columns: Vec<ArrayRef> = vec![Arc::new(Date32Array::from(dates))];
        for (_, field) in NUMERIC_COLUMNS {
            columns.push(Arc::new(Float64Array::from(series.values(field))));
        }

        Ok(RecordBatch::try_new(Arc::new(series_schema()), columns)?)
    }

    fn float_column<'a>(batch: &'a RecordBatch, name: &str) -> LoadResult<&'a Float64Array> {
        batch
            .column_by_name(name)
            .ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))?
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| DataLoadError::ArrowError(format!("Failed to downcast {} column", name)))
    }

    fn bars_from_batch(batch: &RecordBatch, bars: &mut Vec<DailyBar>) -> LoadResult<()> {
        let date_array = batch
            .column_by_name("date")
            .ok_or_else(|| DataLoadError::MissingColumn("date".to_string()))?
            .as_any()
            .downcast_ref::<Date32Array>()
            .ok_or_else(|| DataLoadError::ArrowError("Failed to downcast date column".to_string()))?;

        let open = float_column(batch, "open")?;
        let high = float_column(batch, "high")?;
        let low = float_column(batch, "low")?;
        let close = float_column(batch, "close")?;
        let adj_close = float_column(batch, "adj_close")?;
        let volume = float_column(batch, "volume")?;

        for i in 0..batch.num_rows() {
            if date_array.is_null(i) {
                return Err(DataLoadError::ArrowError(format!("Null date at row {}", i)));
            }
            let date = days_to_naive_date(date_array.value(i))?;
            let bar = DailyBar::new(
                date,
                open.value(i),
                high.value(i),
                low.value(i),
                close.value(i),
                adj_close.value(i),
                volume.value(i),
            )
            .map_err(|source| DataLoadError::InvalidBar {
                line: i as u64 + 1,
                source,
            })?;
            bars.push(bar);
        }
        Ok(())
    }

    fn read_series<R: Read + Seek>(reader: R) -> LoadResult<Series> {
        let reader = FileReader::try_new(reader, None)?;

        let mut bars = Vec::new();
        for batch in reader {
            let batch = batch?;
            bars_from_batch(&batch, &mut bars)?;
        }

        Ok(Series::from_unsorted(bars)?)
    }

    // 从Arrow文件读取日线序列
    pub fn read_series_from_arrow(path: &Path) -> LoadResult<Series> {
        let file = File::open(path)?;
        read_series(file)
    }

    // 将日线序列保存到Arrow文件
    pub fn save_series_to_arrow(series: &Series, path: &Path) -> LoadResult<()> {
        info!("Saving {} daily bars to {}", series.len(), path.display());

        let batch = series_to_record_batch(series)?;
        let file = File::create(path)?;

        let mut writer = FileWriter::try_new(file, &batch.schema())?;
        writer.write(&batch)?;
        writer.finish()?;

        Ok(())
    }
}
