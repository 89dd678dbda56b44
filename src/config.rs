use serde::Deserialize;
use std::time::Duration;

use crate::error::AppError;

const CONFIG_FILE: &str = "cryptolens";
const ENV_PREFIX: &str = "CRYPTOLENS";
const MAX_INPUT_SIZE: u32 = 2048;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub loader: LoaderSettings,
    pub ui: UiSettings,
}

/// Tunables for the random-valued chart analyzer
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub reference_price: f64,
    pub price_variance: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    /// Side length of the square tensor the chart is resized to
    pub input_size: u32,
    pub timeout_ms: Option<u64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub request_timeout_secs: u64,
    pub max_image_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub title: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            reference_price: 40_000.0,
            price_variance: 2_000.0,
            min_confidence: 0.7,
            max_confidence: 0.9,
            input_size: 224,
            timeout_ms: Some(30_000),
            seed: None,
        }
    }
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 20,
            max_image_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            title: "CryptoLens - AI Analysis of Your Crypto Chart".to_string(),
            window_width: 960.0,
            window_height: 820.0,
        }
    }
}

impl AnalysisSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl LoaderSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Settings {
    /// Reads `cryptolens.{toml,yaml,json}` if present, then `CRYPTOLENS__*` overrides.
    pub fn load() -> Result<Self, AppError> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let analysis = &self.analysis;
        if !(0.0..=1.0).contains(&analysis.min_confidence)
            || !(0.0..=1.0).contains(&analysis.max_confidence)
        {
            return Err(AppError::InvalidSettings(
                "Confidence bounds must be between 0.0 and 1.0".to_string(),
            ));
        }
        if analysis.min_confidence >= analysis.max_confidence {
            return Err(AppError::InvalidSettings(
                "min_confidence must be below max_confidence".to_string(),
            ));
        }
        // Offsets are drawn from [1, variance]
        if !analysis.price_variance.is_finite() || analysis.price_variance < 1.0 {
            return Err(AppError::InvalidSettings(
                "price_variance must be a finite number of at least 1".to_string(),
            ));
        }
        if !analysis.reference_price.is_finite() || analysis.reference_price <= 0.0 {
            return Err(AppError::InvalidSettings(
                "reference_price must be a positive number".to_string(),
            ));
        }
        if analysis.input_size == 0 || analysis.input_size > MAX_INPUT_SIZE {
            return Err(AppError::InvalidSettings(format!(
                "input_size must be between 1 and {MAX_INPUT_SIZE}"
            )));
        }
        if self.loader.max_image_bytes == 0 {
            return Err(AppError::InvalidSettings(
                "max_image_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.analysis.reference_price, 40_000.0);
        assert_eq!(settings.analysis.input_size, 224);
    }

    #[test]
    fn inverted_confidence_range_is_rejected() {
        let mut settings = Settings::default();
        settings.analysis.min_confidence = 0.9;
        settings.analysis.max_confidence = 0.7;
        assert!(matches!(
            settings.validate(),
            Err(AppError::InvalidSettings(_))
        ));
    }

    #[test]
    fn sub_unit_variance_is_rejected() {
        let mut settings = Settings::default();
        settings.analysis.price_variance = 0.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn non_finite_variance_is_rejected() {
        for variance in [f64::NAN, f64::INFINITY] {
            let mut settings = Settings::default();
            settings.analysis.price_variance = variance;
            assert!(matches!(
                settings.validate(),
                Err(AppError::InvalidSettings(_))
            ));
        }
    }

    #[test]
    fn oversized_input_size_is_rejected() {
        let mut settings = Settings::default();
        settings.analysis.input_size = MAX_INPUT_SIZE;
        assert!(settings.validate().is_ok());
        settings.analysis.input_size = MAX_INPUT_SIZE + 1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn partial_sources_fall_back_to_defaults() {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[analysis]\nreference_price = 65000.0\nseed = 7\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.analysis.reference_price, 65_000.0);
        assert_eq!(settings.analysis.seed, Some(7));
        assert_eq!(settings.analysis.price_variance, 2_000.0);
        assert_eq!(settings.loader.request_timeout_secs, 20);
    }
}
