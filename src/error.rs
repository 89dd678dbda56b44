use thiserror::Error;

/// Message shown to the user for any failed analysis. The cause goes to the log.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze chart. Please try again.";

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
    #[error("Analysis Error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("UI Error: {0}")]
    Ui(String),
}

// Chart intake errors. None of these touch pipeline state.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Unsupported file type '{media_type}', expected an image")]
    UnsupportedType { media_type: String },
    #[error("Chart URL is empty")]
    EmptyUrl,
    #[error("File '{name}' is {size} bytes, the limit is {limit}")]
    TooLarge {
        name: String,
        size: u64,
        limit: usize,
    },
    #[error("Failed to read '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to load image: {0}")]
    Load(String),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Analysis timed out")]
    TimedOut,
    #[error("Analysis failed: {0}")]
    Failed(String),
}

impl AnalysisError {
    /// Every failure kind surfaces the same way in the UI.
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILED_MESSAGE
    }

    /// Recovers an `AnalysisError` from the boxed error a tower stack hands back.
    pub fn from_boxed(error: tower::BoxError) -> Self {
        if error.is::<tower::timeout::error::Elapsed>() {
            return AnalysisError::TimedOut;
        }
        match error.downcast::<AnalysisError>() {
            Ok(analysis_error) => *analysis_error,
            Err(other) => AnalysisError::Failed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_elapsed_maps_to_timed_out() {
        let boxed: tower::BoxError = Box::new(tower::timeout::error::Elapsed::new());
        assert!(matches!(
            AnalysisError::from_boxed(boxed),
            AnalysisError::TimedOut
        ));
    }

    #[test]
    fn boxed_analysis_error_is_unwrapped() {
        let boxed: tower::BoxError = Box::new(AnalysisError::Load("connection refused".into()));
        match AnalysisError::from_boxed(boxed) {
            AnalysisError::Load(reason) => assert_eq!(reason, "connection refused"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn every_failure_shares_the_user_message() {
        assert_eq!(AnalysisError::TimedOut.user_message(), ANALYSIS_FAILED_MESSAGE);
        assert_eq!(
            AnalysisError::Failed("boom".into()).user_message(),
            ANALYSIS_FAILED_MESSAGE
        );
    }
}
