pub mod analysis_view;
pub mod presentation;
pub mod upload_view;

use image::ImageFormat;
use std::path::PathBuf;

use crate::pipeline::types::{ImageHandle, ImageOrigin};

pub trait View {
    fn draw(&mut self, ui: &mut egui::Ui);
}

/// User intents collected while drawing, applied once the frame is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Analyze,
    RemoveImage,
    OpenPath(PathBuf),
}

/// Image widget for a chart handle. Embedded bytes go through the egui bytes
/// loader under a per-handle uri; remote URLs are fetched by the http loader.
pub fn chart_image(image: &ImageHandle) -> egui::Image<'static> {
    match image.origin() {
        ImageOrigin::Embedded { media_type, bytes } => {
            let extension = ImageFormat::from_mime_type(media_type)
                .and_then(|format| format.extensions_str().first().copied())
                .unwrap_or("png");
            egui::Image::from_bytes(
                format!("bytes://chart-{}.{}", image.id(), extension),
                bytes.clone(),
            )
        }
        ImageOrigin::Remote { url } => egui::Image::from_uri(url.clone()),
    }
}
