mod analysis_result;
mod image_handle;
mod market_signal;

pub use analysis_result::{AnalysisResult, DEFAULT_PREDICTION, prediction_for};
pub use image_handle::{ImageHandle, ImageOrigin};
pub use market_signal::{ChartPattern, Trend, VolumeTrend};
