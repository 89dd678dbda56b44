use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::pipeline::types::{AnalysisResult, ImageHandle};

/// Seam where an inference backend plugs in. One call per analysis; the
/// pipeline and the views only ever see the returned result or error.
#[async_trait]
pub trait ChartAnalyzer: Send + Sync {
    async fn analyze(&self, image: &ImageHandle) -> Result<AnalysisResult, AnalysisError>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    pub(crate) fn triangle_result() -> AnalysisResult {
        AnalysisResult {
            pattern: "Triangle".into(),
            confidence: 0.82,
            support: Some(39_500.0),
            resistance: Some(41_200.0),
            trend: "Uptrend".into(),
            volume: "Stable".into(),
            prediction: "Continuation or reversal depending on breakout direction".into(),
        }
    }

    /// Answers with a fixed outcome once the test releases a permit.
    pub(crate) struct GatedAnalyzer {
        gate: Arc<Semaphore>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl GatedAnalyzer {
        pub(crate) fn succeeding() -> Self {
            Self {
                gate: Arc::new(Semaphore::new(0)),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::succeeding()
            }
        }

        pub(crate) fn gate(&self) -> Arc<Semaphore> {
            self.gate.clone()
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChartAnalyzer for GatedAnalyzer {
        async fn analyze(&self, _image: &ImageHandle) -> Result<AnalysisResult, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| AnalysisError::Failed(e.to_string()))?;
            permit.forget();
            if self.fail {
                Err(AnalysisError::Load("unreachable".into()))
            } else {
                Ok(triangle_result())
            }
        }

        fn name(&self) -> &'static str {
            "GatedAnalyzer"
        }
    }

    /// Panics on every call, like a backend with a bug.
    pub(crate) struct PanickingAnalyzer;

    #[async_trait]
    impl ChartAnalyzer for PanickingAnalyzer {
        async fn analyze(&self, _image: &ImageHandle) -> Result<AnalysisResult, AnalysisError> {
            panic!("model weights missing")
        }

        fn name(&self) -> &'static str {
            "PanickingAnalyzer"
        }
    }
}
