use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::config::LoaderSettings;
use crate::error::AnalysisError;
use crate::pipeline::types::{ImageHandle, ImageOrigin};

/// Resolves an image handle to raw encoded bytes.
#[derive(Clone)]
pub struct ImageLoader {
    client: reqwest::Client,
    max_bytes: usize,
}

impl ImageLoader {
    pub fn new(settings: &LoaderSettings) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| AnalysisError::Failed(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            max_bytes: settings.max_image_bytes,
        })
    }

    pub async fn fetch(&self, image: &ImageHandle) -> Result<Arc<[u8]>, AnalysisError> {
        let bytes = match image.origin() {
            ImageOrigin::Embedded { bytes, .. } => return Ok(bytes.clone()),
            ImageOrigin::Remote { url } => self.fetch_url(url.trim()).await?,
        };
        self.check_size(bytes.len() as u64)?;
        Ok(bytes.into())
    }

    fn check_size(&self, size: u64) -> Result<(), AnalysisError> {
        if size > self.max_bytes as u64 {
            return Err(AnalysisError::Load(format!(
                "image is {} bytes, the limit is {}",
                size, self.max_bytes
            )));
        }
        Ok(())
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, AnalysisError> {
        if let Some(payload) = url.strip_prefix("data:") {
            return decode_data_uri(payload);
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.fetch_http(url).await;
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        self.read_local(Path::new(path)).await
    }

    /// Streams the body, giving up as soon as it outgrows the limit.
    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, AnalysisError> {
        debug!("Fetching chart from {}", url);
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AnalysisError::Load(e.to_string()))?;
        if let Some(length) = response.content_length() {
            self.check_size(length)?;
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AnalysisError::Load(e.to_string()))?
        {
            self.check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    async fn read_local(&self, path: &Path) -> Result<Vec<u8>, AnalysisError> {
        let load_error = |e: std::io::Error| AnalysisError::Load(format!("{}: {}", path.display(), e));
        let metadata = tokio::fs::metadata(path).await.map_err(load_error)?;
        self.check_size(metadata.len())?;
        tokio::fs::read(path).await.map_err(load_error)
    }
}

/// Decodes the part of a `data:` URI after the scheme. Only base64 payloads
/// carry binary images, so anything else is rejected.
fn decode_data_uri(payload: &str) -> Result<Vec<u8>, AnalysisError> {
    let (header, data) = payload
        .split_once(',')
        .ok_or_else(|| AnalysisError::Load("malformed data URI".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(AnalysisError::Load(
            "data URI is not base64 encoded".to_string(),
        ));
    }
    STANDARD
        .decode(data.trim())
        .map_err(|e| AnalysisError::Load(format!("data URI: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> ImageLoader {
        ImageLoader::new(&LoaderSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn embedded_bytes_are_shared_not_copied() {
        let handle = ImageHandle::embedded("image/png", vec![9u8; 16]);
        let bytes = loader().fetch(&handle).await.unwrap();
        match handle.origin() {
            ImageOrigin::Embedded { bytes: original, .. } => assert!(Arc::ptr_eq(original, &bytes)),
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn data_uri_round_trips_through_loader() {
        let embedded = ImageHandle::embedded("image/png", b"chart".to_vec());
        let typed = ImageHandle::remote(embedded.uri());
        let bytes = loader().fetch(&typed).await.unwrap();
        assert_eq!(&bytes[..], b"chart");
    }

    #[tokio::test]
    async fn missing_local_file_is_a_load_error() {
        let handle = ImageHandle::remote("file:///nonexistent/cryptolens/chart.png");
        let result = loader().fetch(&handle).await;
        assert!(matches!(result, Err(AnalysisError::Load(_))));
    }

    #[tokio::test]
    async fn oversized_remote_image_is_rejected() {
        let settings = LoaderSettings {
            max_image_bytes: 4,
            ..LoaderSettings::default()
        };
        let loader = ImageLoader::new(&settings).unwrap();
        let handle = ImageHandle::remote("data:image/png;base64,AAAAAAAAAAA=");
        assert!(matches!(loader.fetch(&handle).await, Err(AnalysisError::Load(_))));
    }

    #[tokio::test]
    async fn oversized_local_file_is_rejected_before_reading() {
        let path = std::env::temp_dir().join(format!("cryptolens-{}.png", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, vec![0u8; 64]).await.unwrap();
        let settings = LoaderSettings {
            max_image_bytes: 16,
            ..LoaderSettings::default()
        };
        let loader = ImageLoader::new(&settings).unwrap();

        let result = loader.fetch(&ImageHandle::remote(path.display().to_string())).await;
        tokio::fs::remove_file(&path).await.unwrap();
        match result {
            Err(AnalysisError::Load(reason)) => assert!(reason.contains("limit")),
            other => panic!("expected size rejection, got {other:?}"),
        }
    }

    #[test]
    fn plain_text_data_uri_is_rejected() {
        assert!(decode_data_uri("text/plain,hello").is_err());
        assert!(decode_data_uri("image/png;base64").is_err());
    }
}
