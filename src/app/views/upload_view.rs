use egui::{Color32, RichText, Stroke};
use std::path::PathBuf;

use crate::app::views::{UiCommand, View, chart_image};
use crate::pipeline::types::ImageHandle;

const DRAG_ACCENT: Color32 = Color32::from_rgb(232, 121, 249);
const LOADED_ACCENT: Color32 = Color32::from_rgb(34, 211, 238);

/// Drop zone with preview, remove button and a path field for browsing.
pub struct UploadView<'a> {
    image: Option<&'a ImageHandle>,
    drag_active: bool,
    browse_path: &'a mut String,
    commands: &'a mut Vec<UiCommand>,
}

impl<'a> UploadView<'a> {
    pub fn new(
        image: Option<&'a ImageHandle>,
        drag_active: bool,
        browse_path: &'a mut String,
        commands: &'a mut Vec<UiCommand>,
    ) -> Self {
        // A typed URL is not an upload
        let image = image.filter(|image| image.is_embedded());
        Self {
            image,
            drag_active,
            browse_path,
            commands,
        }
    }

    fn draw_drop_zone(&mut self, ui: &mut egui::Ui) {
        let stroke_color = if self.drag_active {
            DRAG_ACCENT
        } else if self.image.is_some() {
            LOADED_ACCENT
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke.color
        };

        egui::Frame::group(ui.style())
            .stroke(Stroke::new(2.0, stroke_color))
            .show(ui, |ui| {
                ui.set_min_height(160.0);
                ui.vertical_centered(|ui| match self.image {
                    Some(image) => {
                        ui.add(chart_image(image).max_height(256.0));
                        if ui.button("✖ Remove").clicked() {
                            self.commands.push(UiCommand::RemoveImage);
                        }
                    }
                    None => {
                        ui.add_space(48.0);
                        ui.label(RichText::new("⬆").size(32.0).color(LOADED_ACCENT));
                        let hint = if self.drag_active {
                            "Drop your image here"
                        } else {
                            "Drag and drop your chart image here, or browse for a file below"
                        };
                        ui.label(hint);
                    }
                });
            });
    }

    fn draw_browse(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(self.browse_path)
                    .hint_text("Path to a chart image...")
                    .desired_width(ui.available_width() - 80.0),
            );
            let path = self.browse_path.trim();
            if ui
                .add_enabled(!path.is_empty(), egui::Button::new("Browse"))
                .clicked()
            {
                self.commands.push(UiCommand::OpenPath(PathBuf::from(path)));
            }
        });
    }
}

impl View for UploadView<'_> {
    fn draw(&mut self, ui: &mut egui::Ui) {
        self.draw_drop_zone(ui);
        ui.add_space(8.0);
        self.draw_browse(ui);
    }
}
