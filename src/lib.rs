pub mod app;
pub mod config;
pub mod error;
pub mod intake;
pub mod pipeline;

pub use error::{AnalysisError, AppError, InputError};
