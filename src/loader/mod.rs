pub mod arrow_file;
pub mod base;
pub mod csv_file;

pub use arrow_file::{write_series_to_arrow, ArrowSeriesLoader};
pub use base::{SeriesLoader, SourceFingerprint};
pub use csv_file::{read_series_from_csv, CsvSeriesLoader};

use std::path::Path;

/// 按扩展名选择加载器：.arrow / .ipc 为 Arrow，其余按 CSV 处理
pub fn loader_for_path(path: &Path) -> Box<dyn SeriesLoader + Send + Sync> {
    let is_arrow = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("arrow") || ext.eq_ignore_ascii_case("ipc"))
        .unwrap_or(false);

    if is_arrow {
        Box::new(ArrowSeriesLoader::new(path))
    } else {
        Box::new(CsvSeriesLoader::new(path))
    }
}
