use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::config::AnalysisSettings;
use crate::error::AnalysisError;
use crate::pipeline::services::analyzer::ChartAnalyzer;
use crate::pipeline::services::image_loader::ImageLoader;
use crate::pipeline::services::preprocessing::{ChartTensor, tensor_from_bytes};
use crate::pipeline::types::{
    AnalysisResult, ChartPattern, ImageHandle, Trend, VolumeTrend, prediction_for,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLevels {
    pub support: f64,
    pub resistance: f64,
}

/// Stand-in for a chart classifier. It loads and preprocesses the image like
/// a real model would, then draws every field at random.
pub struct RandomChartAnalyzer {
    loader: ImageLoader,
    settings: AnalysisSettings,
    rng: Mutex<StdRng>,
}

impl RandomChartAnalyzer {
    pub fn new(loader: ImageLoader, settings: AnalysisSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            loader,
            settings,
            rng: Mutex::new(rng),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn load_tensor(&self, image: &ImageHandle) -> Result<ChartTensor, AnalysisError> {
        let bytes = self.loader.fetch(image).await?;
        let size = self.settings.input_size;
        tokio::task::spawn_blocking(move || tensor_from_bytes(&bytes, size))
            .await
            .map_err(|e| AnalysisError::Failed(format!("preprocessing task: {e}")))?
    }

    async fn detect_pattern(&self, _tensor: &ChartTensor) -> (ChartPattern, f64) {
        let mut rng = self.rng();
        let pattern = rng.random::<ChartPattern>();
        let confidence =
            rng.random_range(self.settings.min_confidence..self.settings.max_confidence);
        (pattern, confidence)
    }

    async fn analyze_levels(&self, _tensor: &ChartTensor) -> PriceLevels {
        let reference = self.settings.reference_price;
        let variance = self.settings.price_variance;
        let mut rng = self.rng();
        // Offsets of at least 1 keep support strictly below resistance after flooring
        let support = (reference - rng.random_range(1.0..=variance)).floor();
        let resistance = (reference + rng.random_range(1.0..=variance)).floor();
        PriceLevels {
            support,
            resistance,
        }
    }

    async fn analyze_trend(&self, _tensor: &ChartTensor) -> Trend {
        self.rng().random()
    }

    async fn analyze_volume(&self, _tensor: &ChartTensor) -> VolumeTrend {
        self.rng().random()
    }
}

#[async_trait]
impl ChartAnalyzer for RandomChartAnalyzer {
    async fn analyze(&self, image: &ImageHandle) -> Result<AnalysisResult, AnalysisError> {
        let tensor = self.load_tensor(image).await?;
        debug!(
            "Chart {} preprocessed to {:?}, mean {:.3}",
            image.id(),
            tensor.shape(),
            tensor.mean()
        );

        let ((pattern, confidence), levels, trend, volume) = futures::join!(
            self.detect_pattern(&tensor),
            self.analyze_levels(&tensor),
            self.analyze_trend(&tensor),
            self.analyze_volume(&tensor),
        );
        drop(tensor);

        Ok(AnalysisResult {
            pattern: pattern.to_string(),
            confidence,
            support: Some(levels.support),
            resistance: Some(levels.resistance),
            trend: trend.to_string(),
            volume: volume.to_string(),
            prediction: prediction_for(pattern.name()).to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "RandomChartAnalyzer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderSettings;
    use crate::pipeline::services::preprocessing::tests::png_bytes;

    fn analyzer(seed: u64) -> RandomChartAnalyzer {
        let settings = AnalysisSettings {
            seed: Some(seed),
            input_size: 32,
            ..AnalysisSettings::default()
        };
        RandomChartAnalyzer::new(ImageLoader::new(&LoaderSettings::default()).unwrap(), settings)
    }

    fn chart() -> ImageHandle {
        ImageHandle::embedded("image/png", png_bytes(64, 48, [20, 200, 120]))
    }

    #[tokio::test]
    async fn results_stay_within_documented_ranges() {
        let analyzer = analyzer(42);
        let image = chart();
        for _ in 0..50 {
            let result = analyzer.analyze(&image).await.unwrap();
            assert!(ChartPattern::ALL.iter().any(|p| p.name() == result.pattern));
            assert!((0.7..0.9).contains(&result.confidence));
            let support = result.support.unwrap();
            let resistance = result.resistance.unwrap();
            assert!((38_000.0..40_000.0).contains(&support));
            assert!(resistance > 40_000.0 && resistance <= 42_000.0);
            assert!(support < resistance);
            assert_eq!(support.fract(), 0.0);
            assert!(Trend::ALL.iter().any(|t| t.name() == result.trend));
            assert!(VolumeTrend::ALL.iter().any(|v| v.name() == result.volume));
            assert_eq!(result.prediction, prediction_for(&result.pattern));
        }
    }

    #[tokio::test]
    async fn same_seed_gives_same_result() {
        let image = chart();
        let first = analyzer(7).analyze(&image).await.unwrap();
        let second = analyzer(7).analyze(&image).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn corrupt_upload_is_rejected() {
        let image = ImageHandle::embedded("image/png", b"not an image".to_vec());
        let result = analyzer(1).analyze(&image).await;
        assert!(matches!(result, Err(AnalysisError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_source_is_rejected() {
        let image = ImageHandle::remote("/nonexistent/cryptolens/btc-usd.png");
        let result = analyzer(1).analyze(&image).await;
        assert!(matches!(result, Err(AnalysisError::Load(_))));
    }
}
