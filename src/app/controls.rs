use std::path::Path;

use crate::intake::ChartFile;
use crate::intake::chart_file::media_type_for_path;
use crate::pipeline::types::ImageHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMethod {
    #[default]
    Url,
    Upload,
}

/// Widget state for the input card. Holds no pipeline data.
#[derive(Debug, Default)]
pub struct InputControls {
    pub method: InputMethod,
    pub url: String,
    pub browse_path: String,
    pub drag_active: bool,
}

impl InputControls {
    /// Whether the Analyze button is enabled.
    pub fn can_analyze(&self, image: Option<&ImageHandle>, loading: bool) -> bool {
        if loading {
            return false;
        }
        match self.method {
            InputMethod::Url => !self.url.trim().is_empty(),
            InputMethod::Upload => image.is_some_and(ImageHandle::is_embedded),
        }
    }
}

/// Converts an egui drop into a chart file. Web drops carry bytes, native
/// drops carry a path; a drop with neither yields `None`.
pub fn chart_file_from_drop(dropped: &egui::DroppedFile) -> Option<ChartFile> {
    let file = if let Some(bytes) = &dropped.bytes {
        let name = if dropped.name.is_empty() {
            "dropped chart"
        } else {
            dropped.name.as_str()
        };
        ChartFile::from_bytes(name, media_type_for_path(Path::new(name)), bytes.clone())
    } else if let Some(path) = &dropped.path {
        ChartFile::from_path(path.clone())
    } else {
        return None;
    };
    Some(file.with_declared_type(&dropped.mime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn url_mode_needs_text() {
        let mut controls = InputControls::default();
        assert!(!controls.can_analyze(None, false));
        controls.url = "   ".into();
        assert!(!controls.can_analyze(None, false));
        controls.url = "https://example.com/btc.png".into();
        assert!(controls.can_analyze(None, false));
        assert!(!controls.can_analyze(None, true));
    }

    #[test]
    fn upload_mode_needs_uploaded_image() {
        let controls = InputControls {
            method: InputMethod::Upload,
            ..InputControls::default()
        };
        let uploaded = ImageHandle::embedded("image/png", vec![0u8]);
        let typed = ImageHandle::remote("https://example.com/btc.png");
        assert!(!controls.can_analyze(None, false));
        assert!(!controls.can_analyze(Some(&typed), false));
        assert!(controls.can_analyze(Some(&uploaded), false));
    }

    #[test]
    fn native_drop_declares_type_from_extension() {
        let dropped = egui::DroppedFile {
            path: Some(PathBuf::from("/home/trader/eth-4h.png")),
            ..Default::default()
        };
        let file = chart_file_from_drop(&dropped).unwrap();
        assert_eq!(file.media_type(), "image/png");
        assert_eq!(file.name(), "eth-4h.png");
    }

    #[test]
    fn web_drop_uses_reported_mime() {
        let dropped = egui::DroppedFile {
            name: "notes.txt".into(),
            mime: "text/plain".into(),
            bytes: Some(Arc::from(&b"hello"[..])),
            ..Default::default()
        };
        let file = chart_file_from_drop(&dropped).unwrap();
        assert!(!file.is_image());
    }

    #[test]
    fn empty_drop_is_ignored() {
        assert!(chart_file_from_drop(&egui::DroppedFile::default()).is_none());
    }
}
