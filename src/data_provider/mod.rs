use crate::errors::LoadResult;
use crate::loader::{SeriesLoader, SourceFingerprint};
use crate::models::stock::Series;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

struct CacheEntry {
    fingerprint: SourceFingerprint,
    series: Arc<Series>,
}

/// 已加载序列的缓存，按数据源名称索引
///
/// An entry is served only while the source's fingerprint (size and
/// modification time) matches the one recorded at load time. Any change
/// triggers a reload on the next request.
#[derive(Default)]
pub struct SeriesCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // 缓存内容在持锁期间不会处于半更新状态，中毒后继续使用
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 命中则返回缓存，否则（或数据源已变化时）重新加载
    pub fn get_or_load(&self, loader: &dyn SeriesLoader) -> LoadResult<Arc<Series>> {
        let key = loader.source_name();
        let fingerprint = loader.fingerprint()?;

        if let Some(entry) = self.lock().get(key) {
            if entry.fingerprint == fingerprint {
                debug!("Cache hit for {}", key);
                return Ok(Arc::clone(&entry.series));
            }
            info!("Source {} changed on disk, reloading", key);
        }

        let series = Arc::new(loader.load()?);
        self.lock().insert(
            key.to_string(),
            CacheEntry {
                fingerprint,
                series: Arc::clone(&series),
            },
        );
        Ok(series)
    }

    /// 移除指定数据源，返回是否存在
    pub fn invalidate(&self, source_name: &str) -> bool {
        self.lock().remove(source_name).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, source_name: &str) -> bool {
        self.lock().contains_key(source_name)
    }
}
