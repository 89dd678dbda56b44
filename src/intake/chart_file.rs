use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where an offered file's contents can be found.
#[derive(Debug, Clone)]
pub enum FileContents {
    /// Already in memory, e.g. a web drop
    Bytes(Arc<[u8]>),
    /// Still on disk, e.g. a native drop or a typed path
    Path(PathBuf),
}

/// A file the user offered as a chart, before any validation.
#[derive(Debug, Clone)]
pub struct ChartFile {
    name: String,
    media_type: String,
    contents: FileContents,
}

impl ChartFile {
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            contents: FileContents::Bytes(bytes.into()),
        }
    }

    /// Declares the media type from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            media_type: media_type_for_path(&path),
            contents: FileContents::Path(path),
        }
    }

    /// Falls back to the extension when the declared media type is blank.
    pub fn with_declared_type(mut self, media_type: &str) -> Self {
        if !media_type.trim().is_empty() {
            self.media_type = media_type.trim().to_string();
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    pub(crate) fn into_parts(self) -> (String, String, FileContents) {
        (self.name, self.media_type, self.contents)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `image/png` for `chart.png`, empty when the extension is unknown.
pub fn media_type_for_path(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_follows_extension() {
        assert_eq!(ChartFile::from_path("/tmp/chart.png").media_type(), "image/png");
        assert_eq!(ChartFile::from_path("shots/BTC.JPG").media_type(), "image/jpeg");
        assert_eq!(ChartFile::from_path("notes.txt").media_type(), "");
    }

    #[test]
    fn declared_type_wins_over_extension() {
        let file = ChartFile::from_path("export.bin").with_declared_type("image/webp");
        assert!(file.is_image());
        assert_eq!(file.name(), "export.bin");

        let blank = ChartFile::from_path("chart.gif").with_declared_type("");
        assert_eq!(blank.media_type(), "image/gif");
    }
}
