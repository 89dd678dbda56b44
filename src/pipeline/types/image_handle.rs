use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Where the chart bytes live.
#[derive(Debug, Clone)]
pub enum ImageOrigin {
    /// Uploaded file held in memory, shared between clones
    Embedded {
        media_type: String,
        bytes: Arc<[u8]>,
    },
    /// Whatever the user typed, resolved only when analyzed
    Remote { url: String },
}

/// Reference to a chart image. Immutable once created; replacing the image
/// means creating a new handle with a new id.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    id: Uuid,
    origin: ImageOrigin,
    attached_at: DateTime<Utc>,
}

impl ImageHandle {
    pub fn embedded(media_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(ImageOrigin::Embedded {
            media_type: media_type.into(),
            bytes: bytes.into(),
        })
    }

    pub fn remote(url: impl Into<String>) -> Self {
        Self::new(ImageOrigin::Remote { url: url.into() })
    }

    fn new(origin: ImageOrigin) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            attached_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn origin(&self) -> &ImageOrigin {
        &self.origin
    }

    pub fn attached_at(&self) -> DateTime<Utc> {
        self.attached_at
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.origin, ImageOrigin::Embedded { .. })
    }

    /// The remote URL as typed, if this handle wraps one.
    pub fn url(&self) -> Option<&str> {
        match &self.origin {
            ImageOrigin::Remote { url } => Some(url),
            ImageOrigin::Embedded { .. } => None,
        }
    }

    /// `data:` URI for embedded images, the raw URL otherwise.
    pub fn uri(&self) -> String {
        match &self.origin {
            ImageOrigin::Embedded { media_type, bytes } => {
                format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
            }
            ImageOrigin::Remote { url } => url.clone(),
        }
    }

    /// Short label for logs and the UI.
    pub fn describe(&self) -> String {
        match &self.origin {
            ImageOrigin::Embedded { media_type, bytes } => {
                format!("uploaded {} ({} bytes)", media_type, bytes.len())
            }
            ImageOrigin::Remote { url } => url.clone(),
        }
    }
}

// Two handles are the same image when their ids match
impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ImageHandle {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloning_handle_shares_image_bytes() {
        let handle = ImageHandle::embedded("image/png", vec![1u8, 2, 3]);
        let copy = handle.clone();
        match (handle.origin(), copy.origin()) {
            (ImageOrigin::Embedded { bytes: a, .. }, ImageOrigin::Embedded { bytes: b, .. }) => {
                assert!(Arc::ptr_eq(a, b));
            }
            _ => panic!("expected embedded handles"),
        }
        assert_eq!(handle.id(), copy.id());
    }

    #[test]
    fn embedded_handle_renders_data_uri() {
        let handle = ImageHandle::embedded("image/png", b"png".to_vec());
        assert_eq!(handle.uri(), "data:image/png;base64,cG5n");
        assert!(handle.url().is_none());
    }

    #[test]
    fn remote_handle_keeps_raw_url() {
        let handle = ImageHandle::remote("https://example.com/btc.png");
        assert_eq!(handle.uri(), "https://example.com/btc.png");
        assert_eq!(handle.url(), Some("https://example.com/btc.png"));
        assert_ne!(handle.id(), ImageHandle::remote("https://example.com/btc.png").id());
    }
}
