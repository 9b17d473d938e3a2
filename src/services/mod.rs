pub mod analysis_service;
pub mod reports;

pub use analysis_service::AnalysisService;
pub use reports::TextReport;
