use std::sync::Arc;
use tracing::debug;

use crate::error::InputError;
use crate::intake::chart_file::{ChartFile, FileContents};
use crate::pipeline::types::ImageHandle;

/// Turns user input into image handles. Stateless apart from limits; the
/// session decides what to do with the handle.
#[derive(Debug, Clone)]
pub struct InputSource {
    max_file_bytes: usize,
}

impl InputSource {
    pub fn new(max_file_bytes: usize) -> Self {
        Self { max_file_bytes }
    }

    /// Media type gate shared by drag-and-drop and browse.
    pub fn check(&self, file: &ChartFile) -> Result<(), InputError> {
        if file.is_image() {
            Ok(())
        } else {
            Err(InputError::UnsupportedType {
                media_type: file.media_type().to_string(),
            })
        }
    }

    /// Reads an offered file into an embedded handle.
    pub async fn read_file(&self, file: ChartFile) -> Result<ImageHandle, InputError> {
        self.check(&file)?;
        let (name, media_type, contents) = file.into_parts();
        let read_error = |source| InputError::Read {
            name: name.clone(),
            source,
        };
        let bytes: Arc<[u8]> = match contents {
            FileContents::Bytes(bytes) => bytes,
            FileContents::Path(path) => {
                let metadata = tokio::fs::metadata(&path).await.map_err(read_error)?;
                self.check_size(&name, metadata.len())?;
                tokio::fs::read(&path).await.map_err(read_error)?.into()
            }
        };
        self.check_size(&name, bytes.len() as u64)?;
        debug!("Read {} ({}, {} bytes)", name, media_type, bytes.len());
        Ok(ImageHandle::embedded(media_type, bytes))
    }

    fn check_size(&self, name: &str, size: u64) -> Result<(), InputError> {
        if size > self.max_file_bytes as u64 {
            return Err(InputError::TooLarge {
                name: name.to_string(),
                size,
                limit: self.max_file_bytes,
            });
        }
        Ok(())
    }

    /// Wraps a typed URL. Only emptiness is checked; loading happens on analyze.
    pub fn from_url(&self, url: &str) -> Result<ImageHandle, InputError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(InputError::EmptyUrl);
        }
        Ok(ImageHandle::remote(url))
    }
}
