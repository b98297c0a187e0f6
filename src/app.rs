/// Main application state and eframe::App implementation
///
/// One window, two pages. The page value owned here replaces the pair of
/// top-level windows that used to show/hide each other; the navigator is
/// the single gallery controller handed to the trajectory page each frame.

use std::path::{Path, PathBuf};

use eframe::egui;

use crate::config::AppConfig;
use crate::gallery::Navigator;
use crate::gui::detection_panel::{self, DetectionAction, DetectionViewState};
use crate::gui::gallery_view::{self, GalleryAction, GalleryViewState};
use crate::gui::theme::{self, AppTheme, ThemeColors};
use crate::gui::toolbar::{self, ToolbarAction};
use crate::log::activity::ActivityLog;
use crate::pipeline::command;
use crate::pipeline::frames;
use crate::pipeline::particles::{self, TrackpyLocator};

/// Which page the window is showing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Page {
    ParticleDetection,
    TrajectoryTracking,
}

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Page::ParticleDetection => "Particle Detection",
            Page::TrajectoryTracking => "Trajectory Tracking",
        }
    }
}

const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "avi", "mov"];

fn is_video(path: &Path) -> bool {
    path.extension()
        .map(|e| {
            let e = e.to_string_lossy().to_lowercase();
            VIDEO_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

pub struct TrackerApp {
    config: AppConfig,
    config_path: PathBuf,

    page: Page,
    navigator: Navigator,
    gallery_state: GalleryViewState,
    detection_state: DetectionViewState,

    activity: ActivityLog,
    status_message: String,
    show_log_window: bool,
    show_about: bool,

    ffmpeg_available: bool,
    trackpy_available: bool,

    current_theme: AppTheme,
    theme_colors: ThemeColors,

    dropped_files: Vec<PathBuf>,
}

impl TrackerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, config_path: PathBuf) -> Self {
        let default_theme = AppTheme::Light;
        theme::apply_theme(&cc.egui_ctx, default_theme);

        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 5.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        cc.egui_ctx.set_style(style);

        let ffmpeg_available = command::check_tool_available(&config.ffmpeg, "-version");
        let trackpy_available = command::ToolCommand::new(&config.python)
            .args(&["-c", "import trackpy"])
            .execute()
            .is_ok();
        if !ffmpeg_available {
            log::warn!("{} not found — video import disabled", config.ffmpeg);
        }
        if !trackpy_available {
            log::warn!("trackpy not importable from {} — particle finding will fail", config.python);
        }

        let navigator = Navigator::with_root(&config.memory_dir());

        let mut detection_state = DetectionViewState::new(config.detection.clone());
        detection_state.set_frames(frames::extracted_frames(&config.frames_dir()));
        detection_state.load_crops(&config.particles_dir());

        Self {
            page: Page::ParticleDetection,
            navigator,
            gallery_state: GalleryViewState::default(),
            detection_state,
            activity: ActivityLog::new(),
            status_message: "Ready".to_string(),
            show_log_window: false,
            show_about: false,
            ffmpeg_available,
            trackpy_available,
            current_theme: default_theme,
            theme_colors: ThemeColors::from_theme(default_theme),
            dropped_files: Vec::new(),
            config,
            config_path,
        }
    }

    fn set_page(&mut self, page: Page) {
        if self.page != page {
            log::debug!("Switching to page: {}", page.label());
            self.page = page;
        }
    }

    fn import_video(&mut self, video: &Path) {
        let out = self.config.frames_dir();
        match frames::extract_frames(&self.config.ffmpeg, video, &out, self.config.max_frames) {
            Ok(extracted) => {
                self.activity.add_entry(
                    "Import Video",
                    &format!("Extracted {} frame(s) from {} into {}", extracted.len(), video.display(), out.display()),
                );
                self.status_message = format!("Imported {} ({} frames)", video.display(), extracted.len());
                self.detection_state.set_frames(extracted);
                self.set_page(Page::ParticleDetection);
            }
            Err(e) => {
                log::error!("Video import failed: {}", e);
                self.status_message = format!("Import failed: {}", e);
            }
        }
    }

    fn find_particles(&mut self) {
        let Some(frame) = self.detection_state.current_frame().map(|f| f.path.clone()) else {
            self.status_message = "No frame to search, import a video first".to_string();
            return;
        };
        let params = self.detection_state.params.clone();
        let locator = TrackpyLocator::new(&self.config.python);
        let folder = self.config.particles_dir();

        match particles::find_and_save_particles(&locator, &frame, &params, &folder) {
            Ok(result) => {
                self.activity.add_entry(
                    "Find Particles",
                    &format!(
                        "{} particle(s) in {} (diameter {}, minmass {}, invert {}, threshold {})",
                        result.features.len(),
                        result.frame.display(),
                        params.feature_size,
                        params.min_mass,
                        params.invert,
                        params.threshold
                    ),
                );
                self.status_message = format!(
                    "Located {} particle(s) in {}",
                    result.features.len(),
                    result.frame.file_name().unwrap_or_default().to_string_lossy()
                );
                self.config.detection = params;
                self.detection_state.set_result(result);
            }
            Err(e) => {
                log::error!("Particle detection failed: {}", e);
                self.status_message = format!("Find Particles failed: {}", e);
            }
        }
    }

    fn refresh_links(&mut self) {
        self.navigator.refresh();
        self.gallery_state.photo.invalidate();
        self.activity.add_entry(
            "Refresh Links",
            &format!("{} memory link(s) in {}", self.navigator.link_count(), self.config.memory_dir().display()),
        );
        self.status_message = format!("{} memory link(s) found", self.navigator.link_count());
    }

    fn open_memory_folder(&mut self) {
        if let Some(dir) = toolbar::open_memory_folder_dialog() {
            self.set_memory_root(dir);
        }
    }

    /// Point the gallery at a new memory folder; `set_root` rescans it once
    fn set_memory_root(&mut self, dir: PathBuf) {
        self.navigator.set_root(Some(dir.clone()));
        self.gallery_state.photo.invalidate();
        self.activity.add_entry(
            "Open Memory Folder",
            &format!("{} memory link(s) in {}", self.navigator.link_count(), dir.display()),
        );
        self.status_message = format!("{} memory link(s) found", self.navigator.link_count());
        self.config.memory_folder = dir;
        self.set_page(Page::TrajectoryTracking);
    }

    fn save_parameters(&mut self) {
        self.config.detection = self.detection_state.params.clone();
        if let Err(e) = self.config.detection.validate() {
            self.status_message = e.to_string();
            return;
        }
        match self.config.save(&self.config_path) {
            Ok(()) => {
                self.activity.add_entry(
                    "Save Parameters",
                    &format!("Wrote {}", self.config_path.display()),
                );
                self.status_message = format!("Parameters saved to {}", self.config_path.display());
            }
            Err(e) => {
                log::error!("Saving parameters failed: {}", e);
                self.status_message = format!("Save failed: {}", e);
            }
        }
    }

    fn handle_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::ImportVideo => {
                if let Some(path) = toolbar::open_video_dialog(&self.config.videos_dir()) {
                    self.import_video(&path);
                }
            }
            ToolbarAction::OpenMemoryFolder => self.open_memory_folder(),
            ToolbarAction::ExportLog => {
                if let Some(path) = toolbar::save_log_dialog() {
                    match self.activity.save(&path) {
                        Ok(()) => self.status_message = format!("Log exported: {}", path.display()),
                        Err(e) => self.status_message = format!("Log export failed: {}", e),
                    }
                }
            }
            ToolbarAction::FindParticles => {
                self.set_page(Page::ParticleDetection);
                self.find_particles();
            }
            ToolbarAction::SaveParameters => self.save_parameters(),
            ToolbarAction::ShowDetection => self.set_page(Page::ParticleDetection),
            ToolbarAction::ShowTrajectories => self.set_page(Page::TrajectoryTracking),
            ToolbarAction::RefreshLinks => self.refresh_links(),
            ToolbarAction::ThemeToggle => {
                self.current_theme = self.current_theme.next();
                self.theme_colors = ThemeColors::from_theme(self.current_theme);
            }
            ToolbarAction::ShowLog => self.show_log_window = true,
            ToolbarAction::ShowAbout => self.show_about = true,
            ToolbarAction::None => {}
        }
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        let tc = &self.theme_colors;
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::new().fill(tc.status_bar_bg).inner_margin(egui::Margin::symmetric(12, 4)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&self.status_message).size(11.5).color(tc.status_text));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let badge = |ok: bool, name: &str| {
                            let color = if ok { tc.success } else { tc.warning };
                            egui::RichText::new(format!("{} {}", if ok { "●" } else { "○" }, name))
                                .size(11.0)
                                .color(color)
                        };
                        ui.label(badge(self.trackpy_available, "trackpy"));
                        ui.label(badge(self.ffmpeg_available, "ffmpeg"));
                        ui.separator();
                        ui.label(
                            egui::RichText::new(format!("{} op(s)", self.activity.len()))
                                .size(11.0)
                                .color(tc.text_muted),
                        );
                    });
                });
            });
    }

    fn show_windows(&mut self, ctx: &egui::Context) {
        if self.show_log_window {
            let mut open = true;
            egui::Window::new("📜 Activity Log")
                .open(&mut open)
                .default_size([560.0, 320.0])
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if self.activity.is_empty() {
                            ui.label("Nothing recorded yet.");
                        }
                        for entry in &self.activity.entries {
                            ui.monospace(entry.to_text());
                        }
                    });
                });
            self.show_log_window = open;
        }

        if self.show_about {
            let mut open = true;
            egui::Window::new("About")
                .open(&mut open)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.heading("Particle Tracker");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.label("Frame extraction, trackpy particle finding and memory-link browsing.");
                    ui.separator();
                    ui.label(format!("Config: {}", self.config_path.display()));
                    ui.label(format!("Frames: {}", self.config.frames_dir().display()));
                    ui.label(format!("Particles: {}", self.config.particles_dir().display()));
                    ui.label(format!("Memory links: {}", self.config.memory_dir().display()));
                });
            self.show_about = open;
        }
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        theme::apply_theme(ctx, self.current_theme);

        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    self.dropped_files.push(path.clone());
                }
            }
        });
        if let Some(path) = self.dropped_files.pop() {
            if is_video(&path) {
                self.import_video(&path);
            } else if path.is_dir() {
                self.set_memory_root(path);
            } else {
                self.status_message = format!("Not a video or folder: {}", path.display());
            }
        }

        let action = toolbar::show_toolbar(ctx, self.current_theme.label(), self.page.label());
        if action != ToolbarAction::None {
            self.handle_toolbar_action(action);
        }

        self.show_status_bar(ctx);
        self.show_windows(ctx);

        match self.page {
            Page::ParticleDetection => {
                let action =
                    detection_panel::show_parameter_panel(ctx, &mut self.detection_state, &self.theme_colors);
                egui::CentralPanel::default().show(ctx, |ui| {
                    detection_panel::show_detection_view(ui, &mut self.detection_state, &self.theme_colors);
                });
                match action {
                    DetectionAction::FindParticles => self.find_particles(),
                    DetectionAction::ImportVideo => {
                        self.handle_toolbar_action(ToolbarAction::ImportVideo)
                    }
                    DetectionAction::None => {}
                }
            }
            Page::TrajectoryTracking => {
                let mut action = GalleryAction::None;
                egui::CentralPanel::default().show(ctx, |ui| {
                    action = gallery_view::show_gallery(
                        ui,
                        &mut self.navigator,
                        &mut self.gallery_state,
                        &self.theme_colors,
                    );
                });
                match action {
                    GalleryAction::Refresh => self.refresh_links(),
                    GalleryAction::OpenFolder => self.open_memory_folder(),
                    GalleryAction::None => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video() {
        assert!(is_video(Path::new("clip.MP4")));
        assert!(is_video(Path::new("/data/run.avi")));
        assert!(!is_video(Path::new("frame_00000.jpg")));
        assert!(!is_video(Path::new("memory")));
    }
}
