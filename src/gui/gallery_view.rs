/// Trajectory page — memory-link gallery with link/frame navigation
///
/// Layout: photo area, status line, then `◀◀ ◀ j / m ▶ ▶▶` centered.

use crate::gallery::Navigator;
use crate::gui::photo_view::PhotoView;
use crate::gui::theme::ThemeColors;

pub struct GalleryViewState {
    pub photo: PhotoView,
}

impl Default for GalleryViewState {
    fn default() -> Self {
        Self {
            photo: PhotoView::new("memory_link_frame"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GalleryAction {
    None,
    Refresh,
    OpenFolder,
}

fn nav_button(ui: &mut egui::Ui, label: &str, enabled: bool, hint: &str) -> bool {
    ui.add_enabled(enabled, egui::Button::new(label).min_size(egui::vec2(40.0, 30.0)))
        .on_hover_text(hint)
        .clicked()
}

pub fn show_gallery(
    ui: &mut egui::Ui,
    nav: &mut Navigator,
    state: &mut GalleryViewState,
    colors: &ThemeColors,
) -> GalleryAction {
    let mut action = GalleryAction::None;

    ui.horizontal(|ui| {
        ui.heading("Memory Links");
        if let Some(link) = nav.current_link() {
            ui.label(egui::RichText::new(&link.name).color(colors.accent));
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("🔄 Refresh").clicked() {
                action = GalleryAction::Refresh;
            }
            if ui.button("📂 Open…").clicked() {
                action = GalleryAction::OpenFolder;
            }
            let root = nav
                .root()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(no folder)".to_string());
            ui.label(egui::RichText::new(root).small().color(colors.text_muted));
        });
    });
    ui.separator();

    // Arrow keys mirror the buttons: ←/→ frames, ↑/↓ links
    let (left, right, up, down) = ui.input(|i| {
        (
            i.key_pressed(egui::Key::ArrowLeft),
            i.key_pressed(egui::Key::ArrowRight),
            i.key_pressed(egui::Key::ArrowUp),
            i.key_pressed(egui::Key::ArrowDown),
        )
    });
    if left {
        nav.previous_frame();
    }
    if right {
        nav.next_frame();
    }
    if up {
        nav.previous_link();
    }
    if down {
        nav.next_link();
    }

    state
        .photo
        .show_target(ui, nav.display_target(), 300.0, colors);

    ui.add_space(6.0);
    ui.vertical_centered(|ui| {
        ui.label(nav.status_text());
    });
    ui.add_space(4.0);

    let info = nav.info();
    ui.horizontal(|ui| {
        // Center the row: ~ 5 buttons/labels of fixed width
        let row_width = 320.0;
        let pad = ((ui.available_width() - row_width) / 2.0).max(0.0);
        ui.add_space(pad);

        ui.label("Memory Link:");
        if nav_button(ui, "◀◀", info.has_previous_link, "Previous memory link") {
            nav.previous_link();
        }
        if nav_button(ui, "◀", info.has_previous_frame, "Previous frame") {
            nav.previous_frame();
        }
        ui.add_sized(
            egui::vec2(60.0, 30.0),
            egui::Label::new(nav.frame_counter_text()),
        );
        if nav_button(ui, "▶", info.has_next_frame, "Next frame") {
            nav.next_frame();
        }
        if nav_button(ui, "▶▶", info.has_next_link, "Next memory link") {
            nav.next_link();
        }
    });

    action
}
