use crate::config::Config;
use crate::data_provider::SeriesCache;
use crate::errors::ServiceResult;
use crate::loader::{self, SeriesLoader};
use crate::models::stock::Series;
use crate::services::reports::{
    self, DeltaReport, FullReport, MovingAverageReport, SeasonalityReport, VolatilityReport,
    VolumePriceReport,
};
use log::info;
use std::sync::Arc;

/// 分析服务：加载（带缓存）行情序列并按配置生成各类报告
pub struct AnalysisService {
    config: Config,
    loader: Box<dyn SeriesLoader + Send + Sync>,
    cache: SeriesCache,
}

impl AnalysisService {
    /// 按配置中的数据路径选择加载器
    pub fn new(config: Config) -> ServiceResult<Self> {
        let loader = loader::loader_for_path(&config.data_path);
        Self::with_loader(config, loader)
    }

    pub fn with_loader(
        config: Config,
        loader: Box<dyn SeriesLoader + Send + Sync>,
    ) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            loader,
            cache: SeriesCache::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 加载数据，源文件未变化时复用缓存
    pub fn load_series(&self) -> ServiceResult<Arc<Series>> {
        Ok(self.cache.get_or_load(self.loader.as_ref())?)
    }

    /// 丢弃缓存的序列，下次请求时重新加载
    pub fn invalidate(&self) -> bool {
        self.cache.invalidate(self.loader.source_name())
    }

    pub fn delta_report(&self) -> ServiceResult<DeltaReport> {
        let series = self.load_series()?;
        Ok(reports::build_delta_report(&series)?)
    }

    pub fn moving_average_report(&self) -> ServiceResult<MovingAverageReport> {
        let series = self.load_series()?;
        Ok(reports::build_moving_average_report(&series, &self.config)?)
    }

    pub fn volatility_report(&self) -> ServiceResult<VolatilityReport> {
        let series = self.load_series()?;
        Ok(reports::build_volatility_report(&series, &self.config)?)
    }

    pub fn volume_price_report(&self) -> ServiceResult<VolumePriceReport> {
        let series = self.load_series()?;
        Ok(reports::build_volume_price_report(&series, &self.config)?)
    }

    pub fn seasonality_report(&self) -> ServiceResult<SeasonalityReport> {
        let series = self.load_series()?;
        Ok(reports::build_seasonality_report(&series, &self.config)?)
    }

    pub fn full_report(&self) -> ServiceResult<FullReport> {
        let series = self.load_series()?;
        info!(
            "Building full report for {} ({} bars)",
            self.loader.source_name(),
            series.len()
        );
        Ok(reports::build_full_report(&series, &self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConfigError, ServiceError};

    #[test]
    fn rejects_invalid_config() {
        let config = Config::new().with_long_window(0);
        let err = AnalysisService::new(config).err().expect("must fail");
        assert!(matches!(
            err,
            ServiceError::Config(ConfigError::ZeroWindow { name: "long" })
        ));
    }

    #[test]
    fn missing_file_surfaces_load_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config::new().with_data_path(dir.path().join("missing.csv"));
        let service = AnalysisService::new(config).expect("valid config");
        assert!(matches!(
            service.delta_report(),
            Err(ServiceError::Load(_))
        ));
    }
}
