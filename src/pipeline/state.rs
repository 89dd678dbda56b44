use crate::pipeline::types::{AnalysisResult, ImageHandle};

/// What the pipeline is doing right now. Exactly one variant is active.
#[derive(Debug, Clone, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Loading {
        image: ImageHandle,
    },
    Success {
        image: ImageHandle,
        result: AnalysisResult,
    },
    Error {
        image: ImageHandle,
        message: String,
    },
}

impl PipelineState {
    pub fn state_name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Loading { .. } => "Loading",
            PipelineState::Success { .. } => "Success",
            PipelineState::Error { .. } => "Error",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PipelineState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PipelineState::Loading { .. })
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            PipelineState::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PipelineState::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}
