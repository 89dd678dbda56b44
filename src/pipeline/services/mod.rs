pub mod analyzer;
pub mod analyzer_service;
pub mod image_loader;
pub mod preprocessing;
pub mod random_analyzer;

pub use analyzer::ChartAnalyzer;
pub use analyzer_service::{AnalysisService, AnalyzerService, AnalyzerServiceBuilder};
pub use image_loader::ImageLoader;
pub use random_analyzer::RandomChartAnalyzer;
