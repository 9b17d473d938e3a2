use crate::errors::LoadResult;
use crate::loader::base::{SeriesLoader, SourceFingerprint};
use crate::models::stock::Series;
use crate::util::arrow_utils;
use log::info;
use std::path::{Path, PathBuf};

/// Loads a series previously exported as an Arrow IPC file.
pub struct ArrowSeriesLoader {
    path: PathBuf,
    name: String,
}

impl ArrowSeriesLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl SeriesLoader for ArrowSeriesLoader {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn fingerprint(&self) -> LoadResult<SourceFingerprint> {
        SourceFingerprint::of_file(&self.path)
    }

    fn load(&self) -> LoadResult<Series> {
        info!("Loading daily bars from Arrow file {}", self.path.display());
        arrow_utils::read_series_from_arrow(&self.path)
    }
}

/// 导出序列为 Arrow IPC 文件，必要时创建父目录
pub fn write_series_to_arrow(series: &Series, path: &Path) -> LoadResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    arrow_utils::save_series_to_arrow(series, path)
}
