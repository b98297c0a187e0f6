/// Detection page — parameter panel, frame/particle browser, feature table
/// and the subpixel-bias histogram

use std::path::{Path, PathBuf};

use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::gallery::frame_index::FrameRef;
use crate::gui::photo_view::PhotoView;
use crate::gui::theme::ThemeColors;
use crate::pipeline::particles::{self, DetectionParams, DetectionResult, Feature};

const BIAS_BINS: usize = 10;

/// Which collection the photo area is browsing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrowseMode {
    Frames,
    Particles,
}

pub struct DetectionViewState {
    pub params: DetectionParams,
    /// Frames extracted from the imported video
    pub frames: Vec<FrameRef>,
    pub frame_idx: usize,
    /// Saved particle crops of the last run (or found on disk)
    pub crops: Vec<PathBuf>,
    pub crop_idx: usize,
    pub features: Vec<Feature>,
    pub mode: BrowseMode,
    pub show_bias: bool,
    pub photo: PhotoView,
}

impl DetectionViewState {
    pub fn new(params: DetectionParams) -> Self {
        Self {
            params,
            frames: Vec::new(),
            frame_idx: 0,
            crops: Vec::new(),
            crop_idx: 0,
            features: Vec::new(),
            mode: BrowseMode::Frames,
            show_bias: false,
            photo: PhotoView::new("detection_photo"),
        }
    }

    pub fn set_frames(&mut self, frames: Vec<FrameRef>) {
        self.frames = frames;
        self.frame_idx = 0;
        self.mode = BrowseMode::Frames;
        self.photo.invalidate();
    }

    /// Pick up crops already saved in `folder` (from an earlier session)
    pub fn load_crops(&mut self, folder: &Path) {
        self.crops = particles::list_crops(folder);
        self.crop_idx = 0;
        let csv = folder.join(particles::FEATURES_FILE);
        self.features = std::fs::read_to_string(&csv)
            .ok()
            .and_then(|text| match particles::parse_features_csv(&text) {
                Ok(features) => Some(features),
                Err(e) => {
                    log::warn!("Ignoring {}: {}", csv.display(), e);
                    None
                }
            })
            .unwrap_or_default();
    }

    pub fn set_result(&mut self, result: DetectionResult) {
        self.crops = result.crops;
        self.crop_idx = 0;
        self.features = result.features;
        self.mode = BrowseMode::Particles;
        self.photo.invalidate();
    }

    pub fn current_frame(&self) -> Option<&FrameRef> {
        self.frames.get(self.frame_idx)
    }

    fn current_crop(&self) -> Option<&Path> {
        self.crops.get(self.crop_idx).map(PathBuf::as_path)
    }

    /// (index, count) of the collection being browsed
    fn position(&self) -> (usize, usize) {
        match self.mode {
            BrowseMode::Frames => (self.frame_idx, self.frames.len()),
            BrowseMode::Particles => (self.crop_idx, self.crops.len()),
        }
    }

    pub fn step(&mut self, forward: bool) {
        let (idx, len) = match self.mode {
            BrowseMode::Frames => (&mut self.frame_idx, self.frames.len()),
            BrowseMode::Particles => (&mut self.crop_idx, self.crops.len()),
        };
        if forward && *idx + 1 < len {
            *idx += 1;
        } else if !forward && *idx > 0 {
            *idx -= 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetectionAction {
    None,
    FindParticles,
    ImportVideo,
}

/// Right-hand panel: detection parameters and the bias plot
pub fn show_parameter_panel(
    ctx: &egui::Context,
    state: &mut DetectionViewState,
    colors: &ThemeColors,
) -> DetectionAction {
    let mut action = DetectionAction::None;

    egui::SidePanel::right("detection_params")
        .resizable(true)
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.heading("Detection Parameters");
            ui.separator();

            egui::Grid::new("params_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Feature size (px)");
                    let resp = ui.add(
                        egui::DragValue::new(&mut state.params.feature_size)
                            .range(3..=101)
                            .speed(2.0),
                    );
                    // trackpy needs an odd diameter
                    if resp.changed() && state.params.feature_size % 2 == 0 {
                        state.params.feature_size += 1;
                    }
                    ui.end_row();

                    ui.label("Minimum mass");
                    ui.add(
                        egui::DragValue::new(&mut state.params.min_mass)
                            .range(0.0..=1.0e6)
                            .speed(5.0),
                    );
                    ui.end_row();

                    ui.label("Threshold");
                    ui.add(
                        egui::DragValue::new(&mut state.params.threshold)
                            .range(0.0..=255.0)
                            .speed(0.5),
                    );
                    ui.end_row();

                    ui.label("Dark spots");
                    ui.checkbox(&mut state.params.invert, "Invert");
                    ui.end_row();
                });

            ui.add_space(8.0);
            let has_frame = state.current_frame().is_some();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(has_frame, egui::Button::new("🔍 Find Particles"))
                    .on_disabled_hover_text("Import a video first")
                    .clicked()
                {
                    action = DetectionAction::FindParticles;
                }
                if ui.button("🎞 Import Video…").clicked() {
                    action = DetectionAction::ImportVideo;
                }
            });
            if let Some(frame) = state.current_frame() {
                ui.label(
                    egui::RichText::new(format!("Frame: {}", frame.file_name()))
                        .small()
                        .color(colors.text_muted),
                );
            }

            ui.add_space(8.0);
            ui.separator();
            let label = if state.show_bias {
                "Hide Subpixel Bias"
            } else {
                "Plot Subpixel Bias"
            };
            if ui
                .add_enabled(!state.features.is_empty(), egui::Button::new(label))
                .clicked()
            {
                state.show_bias = !state.show_bias;
            }
            if state.show_bias && !state.features.is_empty() {
                show_bias_plot(ui, &state.features, colors);
            }
        });

    action
}

fn show_bias_plot(ui: &mut egui::Ui, features: &[Feature], colors: &ThemeColors) {
    let bias = particles::subpixel_bias(features, BIAS_BINS);
    let width = 1.0 / bias.bins() as f64;

    let bars = |counts: &[usize], shift: f64| -> Vec<Bar> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &n)| Bar::new(bias.bin_start(i) + width * shift, n as f64).width(width * 0.45))
            .collect()
    };
    let x_chart = BarChart::new(bars(&bias.x, 0.25)).name("x").color(colors.bias_x);
    let y_chart = BarChart::new(bars(&bias.y, 0.75)).name("y").color(colors.bias_y);

    Plot::new("subpixel_bias")
        .height(220.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_label("fractional part (px)")
        .y_axis_label("count")
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(x_chart);
            plot_ui.bar_chart(y_chart);
        });
}

/// Central area: photo, browse controls and the feature table
pub fn show_detection_view(
    ui: &mut egui::Ui,
    state: &mut DetectionViewState,
    colors: &ThemeColors,
) {
    ui.horizontal(|ui| {
        ui.heading("Particle Detection");
        ui.separator();
        let before = state.mode;
        ui.selectable_value(&mut state.mode, BrowseMode::Frames, "Frames");
        ui.selectable_value(&mut state.mode, BrowseMode::Particles, "Particles");
        if state.mode != before {
            state.photo.invalidate();
        }
    });
    ui.separator();

    let table_height = if state.features.is_empty() { 0.0 } else { 160.0 };
    let min_height = 200.0;
    match state.mode {
        BrowseMode::Frames => {
            let path = state.current_frame().map(|f| f.path.clone());
            state
                .photo
                .show_file(ui, path.as_deref(), "No frames — import a video", min_height, colors);
        }
        BrowseMode::Particles => {
            let path = state.current_crop().map(Path::to_path_buf);
            state
                .photo
                .show_file(ui, path.as_deref(), "No particles found yet", min_height, colors);
        }
    }

    ui.add_space(4.0);
    let (idx, len) = state.position();
    ui.horizontal(|ui| {
        let pad = ((ui.available_width() - 200.0) / 2.0).max(0.0);
        ui.add_space(pad);
        if ui.add_enabled(idx > 0, egui::Button::new("<")).clicked() {
            state.step(false);
        }
        let mut text = if len == 0 {
            "0".to_string()
        } else {
            format!("{} / {}", idx, len - 1)
        };
        ui.add_sized(
            egui::vec2(90.0, 22.0),
            egui::TextEdit::singleline(&mut text)
                .interactive(false)
                .horizontal_align(egui::Align::Center),
        );
        if ui.add_enabled(idx + 1 < len, egui::Button::new("->")).clicked() {
            state.step(true);
        }
    });

    if table_height > 0.0 {
        ui.add_space(6.0);
        ui.label(
            egui::RichText::new(format!("{} feature(s)", state.features.len()))
                .color(colors.text_muted),
        );
        show_feature_table(ui, &state.features, table_height);
    }
}

fn show_feature_table(ui: &mut egui::Ui, features: &[Feature], height: f32) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(height)
        .column(Column::auto().at_least(40.0))
        .columns(Column::remainder().at_least(60.0), 6)
        .header(20.0, |mut header| {
            for title in ["#", "x", "y", "mass", "size", "ecc", "signal"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, features.len(), |mut row| {
                let i = row.index();
                let f = &features[i];
                row.col(|ui| {
                    ui.label(i.to_string());
                });
                for value in [f.x, f.y, f.mass, f.size, f.ecc, f.signal] {
                    row.col(|ui| {
                        ui.monospace(format!("{:.2}", value));
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: usize) -> FrameRef {
        FrameRef {
            path: PathBuf::from(format!("frame_{:05}.jpg", n)),
            position: n,
            parsed_number: Some(n as u64),
        }
    }

    #[test]
    fn test_step_clamps_per_mode() {
        let mut state = DetectionViewState::new(DetectionParams::default());
        state.step(true);
        assert_eq!(state.position(), (0, 0));

        state.set_frames((0..3).map(frame).collect());
        for _ in 0..5 {
            state.step(true);
        }
        assert_eq!(state.position(), (2, 3));

        state.set_result(DetectionResult {
            frame: PathBuf::from("frame_00002.jpg"),
            features: Vec::new(),
            crops: vec![PathBuf::from("particle_00000.jpg"), PathBuf::from("particle_00001.jpg")],
        });
        assert_eq!(state.mode, BrowseMode::Particles);
        state.step(false);
        assert_eq!(state.position(), (0, 2));
        state.step(true);
        state.step(true);
        assert_eq!(state.position(), (1, 2));

        // Frame selection survives the switch to particle browsing
        assert_eq!(state.current_frame().map(|f| f.position), Some(2));
    }
}
