use std::sync::Arc;
use std::time::Duration;

use egui::{Color32, RichText};
use tracing::{debug, info, warn};

use crate::app::controls::{InputControls, InputMethod, chart_file_from_drop};
use crate::app::views::analysis_view::AnalysisView;
use crate::app::views::presentation::present;
use crate::app::views::upload_view::UploadView;
use crate::app::views::{UiCommand, View};
use crate::config::Settings;
use crate::error::AppError;
use crate::intake::{ChartFile, InputSource};
use crate::pipeline::AnalysisSession;
use crate::pipeline::services::{AnalyzerServiceBuilder, ImageLoader, RandomChartAnalyzer};

const HEADER_ACCENT: Color32 = Color32::from_rgb(34, 211, 238);
const ANALYZE_FILL: Color32 = Color32::from_rgb(8, 145, 178);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct CryptoLensApp {
    session: AnalysisSession,
    controls: InputControls,
    commands: Vec<UiCommand>,
}

impl CryptoLensApp {
    pub fn new(session: AnalysisSession) -> Self {
        Self {
            session,
            controls: InputControls::default(),
            commands: Vec::new(),
        }
    }

    pub fn start_gui(settings: &Settings) -> Result<(), AppError> {
        let loader = ImageLoader::new(&settings.loader)?;
        let analyzer = Arc::new(RandomChartAnalyzer::new(loader, settings.analysis.clone()));
        let service = AnalyzerServiceBuilder::new(analyzer)
            .timeout(settings.analysis.timeout())
            .build();
        let input = InputSource::new(settings.loader.max_image_bytes);
        let session = AnalysisSession::new(input, service);

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(settings.ui.window_width, settings.ui.window_height))
                .with_title(settings.ui.title.clone())
                .with_drag_and_drop(true),
            ..Default::default()
        };

        info!("Starting {}", settings.ui.title);
        eframe::run_native(
            &settings.ui.title,
            options,
            Box::new(move |cc| {
                egui_extras::install_image_loaders(&cc.egui_ctx);
                Ok(Box::new(CryptoLensApp::new(session)))
            }),
        )
        .map_err(|e| AppError::Ui(e.to_string()))
    }

    fn handle_drops(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.first().cloned(),
            )
        });
        self.controls.drag_active = hovering;

        let Some(dropped) = dropped else {
            return;
        };
        self.controls.method = InputMethod::Upload;
        self.offer_file(chart_file_from_drop(&dropped));
    }

    fn offer_file(&mut self, file: Option<ChartFile>) {
        if let Err(e) = self.session.set_from_file(file) {
            warn!("Ignoring offered file: {}", e);
        }
    }

    fn run_commands(&mut self) {
        for command in std::mem::take(&mut self.commands) {
            debug!("Running UI command {:?}", command);
            match command {
                UiCommand::Analyze => {
                    if self.controls.method == InputMethod::Url {
                        if let Err(e) = self.session.set_from_url(&self.controls.url) {
                            warn!("Cannot analyze URL: {}", e);
                            continue;
                        }
                    }
                    if !self.session.analyze() {
                        debug!("Analyze request ignored");
                    }
                }
                UiCommand::RemoveImage => self.session.clear(),
                UiCommand::OpenPath(path) => {
                    self.offer_file(Some(ChartFile::from_path(path)));
                }
            }
        }
    }

    fn draw_header(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.heading(RichText::new("🧠 CryptoLens").size(32.0).strong().color(HEADER_ACCENT));
            ui.label(RichText::new("AI Analysis of Your Crypto Chart").size(16.0));
            ui.add_space(12.0);
        });
    }

    fn draw_input_card(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.controls.method, InputMethod::Url, "🔗 URL");
                ui.selectable_value(&mut self.controls.method, InputMethod::Upload, "⬆ Upload");
            });
            ui.add_space(8.0);

            match self.controls.method {
                InputMethod::Url => {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.controls.url)
                            .hint_text("Enter TradingView chart URL...")
                            .desired_width(f32::INFINITY),
                    );
                }
                InputMethod::Upload => {
                    UploadView::new(
                        self.session.image(),
                        self.controls.drag_active,
                        &mut self.controls.browse_path,
                        &mut self.commands,
                    )
                    .draw(ui);
                }
            }

            ui.add_space(8.0);
            let loading = self.session.state().is_loading();
            let enabled = self.controls.can_analyze(self.session.image(), loading);
            let label = if loading {
                "⏳ Analyzing..."
            } else {
                "📊 Analyze Chart"
            };
            let button = egui::Button::new(RichText::new(label).strong().color(Color32::WHITE))
                .fill(ANALYZE_FILL)
                .min_size(egui::vec2(ui.available_width(), 36.0));
            if ui.add_enabled(enabled, button).clicked() {
                self.commands.push(UiCommand::Analyze);
            }
        });
    }
}

impl eframe::App for CryptoLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let applied = self.session.poll();
        if applied > 0 {
            debug!(
                "Applied {} background results, pipeline is {}",
                applied,
                self.session.state().state_name()
            );
        }
        self.handle_drops(ctx);

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("© 2024 CryptoLens. All rights reserved.")
                        .small()
                        .color(Color32::GRAY),
                );
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                Self::draw_header(ui);
                self.draw_input_card(ui);
                let presentation = present(self.session.state());
                AnalysisView::new(&presentation).draw(ui);
            });
        });

        self.run_commands();

        if self.session.is_busy() || self.controls.drag_active {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}
