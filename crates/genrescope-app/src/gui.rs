//! Desktop interface: text entry, ranked results, embedded probability chart
//!
//! The model session loads on a background thread so the UI stays
//! responsive; completion is handed over through a channel consumed exactly
//! once by the update loop. The predict action stays disabled until the
//! session arrives.

use eframe::egui;
use genrescope_chart::{default_chart_path, ChartInput, ChartStyle};
use genrescope_core::Result;
use genrescope_infer::{AppConfig, ModelSession};
use std::sync::mpsc;
use std::time::Duration;

/// Rows shown in the results table when nothing configures it
const DEFAULT_TOP_K: usize = 10;

/// Launch the desktop interface, blocking until the window closes
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([820.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GenreScope",
        options,
        Box::new(|_cc| Ok(Box::new(GenreScopeApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start GUI: {e}"))
}

enum SessionState {
    /// Background load in flight; the receiver yields exactly one result
    Loading(mpsc::Receiver<Result<ModelSession>>),
    Ready(ModelSession),
    Failed,
}

struct GenreScopeApp {
    config: AppConfig,
    session: SessionState,
    status: String,
    synopsis: String,
    results: Vec<(String, f32)>,
    chart_texture: Option<egui::TextureHandle>,
    dialog: Option<String>,
}

impl GenreScopeApp {
    fn new(config: AppConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let loader_config = config.clone();
        std::thread::spawn(move || {
            let result = ModelSession::load(&loader_config);
            // The UI may have closed already; nothing to do then.
            let _ = tx.send(result);
        });

        Self {
            config,
            session: SessionState::Loading(rx),
            status: "Loading model... (this can take a while)".to_string(),
            synopsis: String::new(),
            results: Vec::new(),
            chart_texture: None,
            dialog: None,
        }
    }

    fn poll_loader(&mut self, ctx: &egui::Context) {
        let SessionState::Loading(rx) = &self.session else {
            return;
        };

        let outcome = rx.try_recv();
        match outcome {
            Ok(Ok(session)) => {
                self.status = format!("Model loaded. {} labels found.", session.labels().len());
                self.session = SessionState::Ready(session);
            }
            Ok(Err(e)) => {
                self.status = "Failed to load model.".to_string();
                self.dialog = Some(format!("Failed to load model/tokenizer:\n{e}"));
                self.session = SessionState::Failed;
            }
            Err(mpsc::TryRecvError::Empty) => {
                // Keep polling while the loader thread works.
                ctx.request_repaint_after(Duration::from_millis(200));
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                self.status = "Failed to load model.".to_string();
                self.dialog = Some("Model loader stopped unexpectedly.".to_string());
                self.session = SessionState::Failed;
            }
        }
    }

    fn top_k(&self) -> usize {
        let metadata_top_k = match &self.session {
            SessionState::Ready(session) => session.metadata().top_k,
            _ => None,
        };
        self.config.top_k.or(metadata_top_k).unwrap_or(DEFAULT_TOP_K)
    }

    fn on_predict(&mut self, ctx: &egui::Context) {
        let synopsis = self.synopsis.trim().to_string();
        if synopsis.is_empty() {
            self.dialog = Some("Type a synopsis before predicting!".to_string());
            return;
        }

        let SessionState::Ready(session) = &self.session else {
            return;
        };

        self.status = "Predicting...".to_string();
        match session.predict(&synopsis) {
            Ok(predictions) => {
                let input = ChartInput::from(predictions);
                let top_k = self.top_k();
                self.results = genrescope_chart::ranked_entries(&input)
                    .into_iter()
                    .take(top_k)
                    .collect();
                self.render_chart(ctx, &input);
                self.status = "Ready".to_string();
            }
            Err(e) => {
                self.dialog = Some(format!("Prediction failed: {e}"));
                self.status = "Error".to_string();
            }
        }
    }

    fn render_chart(&mut self, ctx: &egui::Context, input: &ChartInput) {
        let path = default_chart_path();
        if path.exists() {
            // Stale chart from a previous run; render overwrites anyway.
            let _ = std::fs::remove_file(&path);
        }

        let rendered = genrescope_chart::render(input, &path, &ChartStyle::default())
            .and_then(|path| {
                image::open(&path)
                    .map_err(|e| genrescope_core::Error::chart(format!("failed to decode chart: {e}")))
            })
            .map(|img| img.to_rgba8());

        match rendered {
            Ok(rgba) => {
                let size = [rgba.width() as usize, rgba.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
                self.chart_texture =
                    Some(ctx.load_texture("probability-chart", color_image, Default::default()));
            }
            Err(e) => {
                tracing::error!("chart rendering failed: {e}");
                self.dialog = Some(format!("Chart rendering failed: {e}"));
                self.chart_texture = None;
            }
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.dialog.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.dialog = None;
        }
    }
}

impl eframe::App for GenreScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Movie Genre Classifier");
            ui.add_space(8.0);

            ui.label("Type the movie synopsis:");
            ui.add(
                egui::TextEdit::multiline(&mut self.synopsis)
                    .desired_rows(6)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(6.0);

            let ready = matches!(self.session, SessionState::Ready(_));
            let mut predict_clicked = false;
            ui.horizontal(|ui| {
                predict_clicked = ui
                    .add_enabled(ready, egui::Button::new("Predict"))
                    .clicked();
                if ui.button("Clear").clicked() {
                    self.synopsis.clear();
                }
            });
            if predict_clicked {
                self.on_predict(ctx);
            }

            ui.add_space(10.0);
            if !self.results.is_empty() {
                ui.label("Top predictions:");
                egui::Grid::new("results")
                    .num_columns(2)
                    .striped(true)
                    .min_col_width(160.0)
                    .show(ui, |ui| {
                        ui.strong("Genre");
                        ui.strong("Probability");
                        ui.end_row();
                        for (label, prob) in &self.results {
                            ui.label(label);
                            ui.label(format!("{prob:.3}"));
                            ui.end_row();
                        }
                    });
                ui.add_space(10.0);
            }

            if let Some(texture) = &self.chart_texture {
                ui.add(
                    egui::Image::new((texture.id(), texture.size_vec2()))
                        .max_width(ui.available_width()),
                );
            }

            ui.add_space(8.0);
            ui.separator();
            ui.label(&self.status);
        });

        self.show_dialog(ctx);
    }
}
