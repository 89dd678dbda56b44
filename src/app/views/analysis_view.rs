use egui::{Color32, RichText, Stroke};
use tracing::error;

use crate::app::views::View;
use crate::app::views::chart_image;
use crate::app::views::presentation::{
    Accent, AnalysisCard, Presentation, ResultsPanel, Tone,
};

const CYAN: Color32 = Color32::from_rgb(34, 211, 238);
const FUCHSIA: Color32 = Color32::from_rgb(232, 121, 249);
const GREEN: Color32 = Color32::from_rgb(74, 222, 128);
const RED: Color32 = Color32::from_rgb(248, 113, 113);
const YELLOW: Color32 = Color32::from_rgb(250, 204, 21);
const PURPLE: Color32 = Color32::from_rgb(192, 132, 252);
const BLUE: Color32 = Color32::from_rgb(96, 165, 250);
const MUTED: Color32 = Color32::from_gray(156);
const SKELETON: Color32 = Color32::from_gray(40);

const CARD_WIDTH: f32 = 220.0;

/// Draws whatever the pipeline currently presents below the Analyze button.
pub struct AnalysisView<'a> {
    presentation: &'a Presentation,
}

impl<'a> AnalysisView<'a> {
    pub fn new(presentation: &'a Presentation) -> Self {
        Self { presentation }
    }

    fn draw_feature_preview(ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            Self::feature_card(
                ui,
                "Support & Resistance",
                "AI-powered identification of key price levels",
                CYAN,
            );
            Self::feature_card(
                ui,
                "Trend Analysis",
                "Advanced pattern recognition and trend forecasting",
                FUCHSIA,
            );
        });
    }

    fn feature_card(ui: &mut egui::Ui, title: &str, body: &str, color: Color32) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.label(RichText::new(title).strong().size(16.0).color(color));
            ui.label(RichText::new(body).color(MUTED));
        });
    }

    fn draw_loading(ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add(egui::Spinner::new().size(28.0));
                for _ in 0..2 {
                    ui.horizontal(|ui| {
                        for _ in 0..2 {
                            let (rect, _) = ui.allocate_exact_size(
                                egui::vec2(CARD_WIDTH, 96.0),
                                egui::Sense::hover(),
                            );
                            ui.painter().rect_filled(rect, 4.0, SKELETON);
                        }
                    });
                }
                ui.label(RichText::new("Analyzing chart pattern...").color(MUTED));
            });
        });
    }

    fn draw_failure(ui: &mut egui::Ui, message: &str) {
        egui::Frame::group(ui.style())
            .fill(Color32::from_rgb(60, 18, 18))
            .stroke(Stroke::new(1.0, Color32::from_rgb(153, 27, 27)))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("⚠").size(32.0).color(RED));
                    ui.label(RichText::new(message).color(RED));
                });
            });
    }

    fn draw_results(ui: &mut egui::Ui, panel: &ResultsPanel) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("📊 Analysis Results").color(CYAN));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add(
                        chart_image(&panel.thumbnail)
                            .max_height(64.0)
                            .sense(egui::Sense::hover()),
                    )
                    .on_hover_ui(|ui| {
                        ui.add(chart_image(&panel.thumbnail).max_width(448.0));
                    });
                    if ui.button("Copy JSON").clicked() {
                        match panel.result.to_json_pretty() {
                            Ok(json) => ui.ctx().copy_text(json),
                            Err(e) => error!("Failed to serialize analysis result: {}", e),
                        }
                    }
                });
            });
            ui.separator();

            egui::Grid::new("analysis_cards")
                .num_columns(2)
                .spacing([12.0, 12.0])
                .show(ui, |ui| {
                    for (index, card) in panel.cards.iter().enumerate() {
                        Self::draw_card(ui, card);
                        if index % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });

            ui.add_space(8.0);
            egui::Frame::group(ui.style())
                .stroke(Stroke::new(1.0, BLUE.gamma_multiply(0.4)))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new("Prediction").strong().color(BLUE));
                    ui.label(&panel.prediction);
                });
        });
    }

    fn draw_card(ui: &mut egui::Ui, card: &AnalysisCard) {
        let accent = accent_color(card.accent);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.label(RichText::new(card.title).strong());
            if let Some(value) = &card.value {
                ui.label(RichText::new(value).size(22.0).strong().color(accent));
            }
            for line in &card.lines {
                let color = match line.tone {
                    Tone::Muted => MUTED,
                    Tone::Positive => GREEN,
                    Tone::Negative => RED,
                };
                ui.label(RichText::new(&line.text).color(color));
            }
        });
    }
}

fn accent_color(accent: Accent) -> Color32 {
    match accent {
        Accent::Cyan => CYAN,
        Accent::Green => GREEN,
        Accent::Yellow => YELLOW,
        Accent::Purple => PURPLE,
    }
}

impl View for AnalysisView<'_> {
    fn draw(&mut self, ui: &mut egui::Ui) {
        ui.add_space(16.0);
        match self.presentation {
            Presentation::FeaturePreview => Self::draw_feature_preview(ui),
            Presentation::Loading => Self::draw_loading(ui),
            Presentation::Failure { message } => Self::draw_failure(ui, message),
            Presentation::Results(panel) => Self::draw_results(ui, panel),
        }
    }
}
