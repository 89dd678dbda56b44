pub mod analysis_pipeline;
pub mod services;
pub mod session;
pub mod state;
pub mod types;

pub use analysis_pipeline::{AnalysisPipeline, AnalysisTicket};
pub use session::AnalysisSession;
pub use state::PipelineState;
pub use types::{AnalysisResult, ImageHandle, ImageOrigin};
