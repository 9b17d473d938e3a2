use crate::errors::LoadResult;
use crate::models::stock::Series;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Identity of a data source at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub fn of_file(path: &Path) -> LoadResult<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            len: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Base trait for daily series loaders
pub trait SeriesLoader {
    /// Cache key for this source
    fn source_name(&self) -> &str;

    /// Current identity of the source, used to detect changes
    fn fingerprint(&self) -> LoadResult<SourceFingerprint>;

    /// Load the full series, sorted ascending by date
    fn load(&self) -> LoadResult<Series>;
}
