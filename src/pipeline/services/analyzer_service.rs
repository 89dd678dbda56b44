use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::Future;
use futures::task::{Context, Poll};
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{BoxError, Service, ServiceBuilder};

use crate::pipeline::services::analyzer::ChartAnalyzer;
use crate::pipeline::types::{AnalysisResult, ImageHandle};

/// Analyzer stack as the session sees it: boxed, cloneable, errors erased.
pub type AnalysisService = BoxCloneService<ImageHandle, AnalysisResult, BoxError>;

#[derive(Clone)]
pub struct AnalyzerService {
    inner: Arc<dyn ChartAnalyzer>,
}

impl AnalyzerService {
    pub fn new(inner: Arc<dyn ChartAnalyzer>) -> Self {
        Self { inner }
    }
}

impl Service<ImageHandle> for AnalyzerService {
    type Response = AnalysisResult;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, image: ImageHandle) -> Self::Future {
        let inner = self.inner.clone();
        Box::pin(async move {
            tracing::debug!("{} analyzing chart {}", inner.name(), image.id());
            let result = inner.analyze(&image).await?;
            Ok(result)
        })
    }
}

pub struct AnalyzerServiceBuilder {
    analyzer: Arc<dyn ChartAnalyzer>,
    timeout: Option<Duration>,
}

impl AnalyzerServiceBuilder {
    pub fn new(analyzer: Arc<dyn ChartAnalyzer>) -> Self {
        Self {
            analyzer,
            timeout: None,
        }
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> AnalysisService {
        let service = ServiceBuilder::new()
            .option_layer(self.timeout.map(TimeoutLayer::new))
            .service(AnalyzerService::new(self.analyzer));
        BoxCloneService::new(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::pipeline::services::analyzer::testing::{GatedAnalyzer, triangle_result};
    use tower::ServiceExt;

    #[tokio::test]
    async fn service_returns_analyzer_result() {
        let analyzer = Arc::new(GatedAnalyzer::succeeding());
        analyzer.gate().add_permits(1);
        let service = AnalyzerServiceBuilder::new(analyzer).build();

        let result = service
            .oneshot(ImageHandle::remote("https://example.com/sol.png"))
            .await
            .unwrap();
        assert_eq!(result, triangle_result());
    }

    #[tokio::test]
    async fn analyzer_errors_survive_boxing() {
        let analyzer = Arc::new(GatedAnalyzer::failing());
        analyzer.gate().add_permits(1);
        let service = AnalyzerServiceBuilder::new(analyzer).build();

        let error = service
            .oneshot(ImageHandle::remote("https://example.com/sol.png"))
            .await
            .unwrap_err();
        assert!(matches!(
            AnalysisError::from_boxed(error),
            AnalysisError::Load(_)
        ));
    }

    #[tokio::test]
    async fn slow_analyzer_times_out() {
        // Gate never opens
        let analyzer = Arc::new(GatedAnalyzer::succeeding());
        let service = AnalyzerServiceBuilder::new(analyzer)
            .timeout(Some(Duration::from_millis(20)))
            .build();

        let error = service
            .oneshot(ImageHandle::remote("https://example.com/sol.png"))
            .await
            .unwrap_err();
        assert!(matches!(
            AnalysisError::from_boxed(error),
            AnalysisError::TimedOut
        ));
    }
}
