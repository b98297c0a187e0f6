/// Toolbar — top menu bar with file operations and page switching

use std::path::PathBuf;

/// Actions that can be triggered from the toolbar
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    None,
    ImportVideo,
    OpenMemoryFolder,
    ExportLog,
    FindParticles,
    SaveParameters,
    ShowDetection,
    ShowTrajectories,
    RefreshLinks,
    ThemeToggle,
    ShowLog,
    ShowAbout,
}

/// Render the toolbar and return any triggered action
pub fn show_toolbar(ctx: &egui::Context, theme_label: &str, page_label: &str) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("📁 File", |ui| {
                if ui.button("🎞 Import Video…").clicked() {
                    action = ToolbarAction::ImportVideo;
                    ui.close_menu();
                }
                if ui.button("📂 Open Memory Folder…").clicked() {
                    action = ToolbarAction::OpenMemoryFolder;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("📋 Export Activity Log…").clicked() {
                    action = ToolbarAction::ExportLog;
                    ui.close_menu();
                }
            });

            ui.menu_button("🔬 Particles", |ui| {
                if ui.button("🔍 Find Particles").clicked() {
                    action = ToolbarAction::FindParticles;
                    ui.close_menu();
                }
                if ui.button("💾 Save Particle Parameters").clicked() {
                    action = ToolbarAction::SaveParameters;
                    ui.close_menu();
                }
                if ui.button("⚙ Change Particle Parameters").clicked() {
                    action = ToolbarAction::ShowDetection;
                    ui.close_menu();
                }
                if ui.button("➰ Go to Trajectory Tracking").clicked() {
                    action = ToolbarAction::ShowTrajectories;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("🔄 Refresh Memory Links").clicked() {
                    action = ToolbarAction::RefreshLinks;
                    ui.close_menu();
                }
            });

            ui.menu_button("🔍 View", |ui| {
                if ui.button(format!("🎨 Theme: {}", theme_label)).clicked() {
                    action = ToolbarAction::ThemeToggle;
                    ui.close_menu();
                }
                if ui.button("📜 Activity Log").clicked() {
                    action = ToolbarAction::ShowLog;
                    ui.close_menu();
                }
            });

            ui.menu_button("❓ Help", |ui| {
                if ui.button("ℹ About").clicked() {
                    action = ToolbarAction::ShowAbout;
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(egui::RichText::new(theme_label).size(12.0)).corner_radius(12.0))
                    .clicked()
                {
                    action = ToolbarAction::ThemeToggle;
                }
                ui.separator();
                ui.label(
                    egui::RichText::new(page_label)
                        .color(egui::Color32::from_rgb(0x70, 0x75, 0x80))
                        .size(12.0),
                );
            });
        });
    });

    action
}

/// Show file-open dialog for videos
pub fn open_video_dialog(start_dir: &std::path::Path) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Video")
        .set_directory(start_dir)
        .add_filter("Video Files", &["mp4", "avi", "mov"])
        .add_filter("All Files", &["*"])
        .pick_file()
}

/// Show folder picker for the memory-link root
pub fn open_memory_folder_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open Memory Link Folder")
        .pick_folder()
}

/// Show save dialog for log export
pub fn save_log_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Export Activity Log")
        .add_filter("Text File", &["txt"])
        .add_filter("JSON", &["json"])
        .save_file()
}
