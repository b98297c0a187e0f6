/// Photo area: paints a `FrameRenderer` result into an egui rect
///
/// The rect is measured in physical pixels before rendering so the bitmap
/// is scaled once on the CPU and drawn 1:1.

use std::path::Path;

use crate::gallery::navigator::DisplayTarget;
use crate::gallery::render::{DisplayState, FrameRenderer};
use crate::gui::theme::ThemeColors;

pub struct PhotoView {
    id: &'static str,
    renderer: FrameRenderer,
    texture: Option<egui::TextureHandle>,
    uploaded_generation: u64,
}

impl PhotoView {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            renderer: FrameRenderer::new(),
            texture: None,
            uploaded_generation: 0,
        }
    }

    /// Drop cached decode results (after the files on disk changed)
    pub fn invalidate(&mut self) {
        self.renderer.invalidate();
    }

    pub fn show_target(
        &mut self,
        ui: &mut egui::Ui,
        target: DisplayTarget<'_>,
        min_height: f32,
        colors: &ThemeColors,
    ) {
        let (rect, viewport) = allocate_photo_rect(ui, min_height, colors);
        self.renderer.show(target, viewport);
        self.paint(ui, rect, colors);
    }

    /// Show the image at `path`, or `empty_text` when there is none
    pub fn show_file(
        &mut self,
        ui: &mut egui::Ui,
        path: Option<&Path>,
        empty_text: &str,
        min_height: f32,
        colors: &ThemeColors,
    ) {
        let (rect, viewport) = allocate_photo_rect(ui, min_height, colors);
        match path {
            Some(path) => {
                self.renderer.show_file(path, viewport);
                self.paint(ui, rect, colors);
            }
            None => paint_text(ui, rect, empty_text, colors),
        }
    }

    fn paint(&mut self, ui: &egui::Ui, rect: egui::Rect, colors: &ThemeColors) {
        match self.renderer.state() {
            DisplayState::Placeholder(text) => paint_text(ui, rect, text, colors),
            DisplayState::Image(scaled) => {
                let (w, h) = scaled.image.dimensions();
                if self.texture.is_none() || self.uploaded_generation != self.renderer.generation() {
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [w as usize, h as usize],
                        scaled.image.as_raw(),
                    );
                    match &mut self.texture {
                        Some(tex) => tex.set(color_image, egui::TextureOptions::LINEAR),
                        None => {
                            self.texture = Some(ui.ctx().load_texture(
                                self.id,
                                color_image,
                                egui::TextureOptions::LINEAR,
                            ))
                        }
                    }
                    self.uploaded_generation = self.renderer.generation();
                }

                if let Some(tex) = &self.texture {
                    let ppp = ui.ctx().pixels_per_point();
                    let min = rect.min
                        + egui::vec2(scaled.offset[0] as f32 / ppp, scaled.offset[1] as f32 / ppp);
                    let img_rect =
                        egui::Rect::from_min_size(min, egui::vec2(w as f32 / ppp, h as f32 / ppp));
                    ui.painter().image(
                        tex.id(),
                        img_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            }
        }
    }
}

/// Reserve the photo rect (full width) and return it with its pixel size
fn allocate_photo_rect(
    ui: &mut egui::Ui,
    min_height: f32,
    colors: &ThemeColors,
) -> (egui::Rect, [u32; 2]) {
    let avail = ui.available_size();
    let size = egui::vec2(avail.x.max(100.0), (avail.y - 90.0).max(min_height));
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    ui.painter().rect(
        rect,
        0.0,
        colors.photo_bg,
        egui::Stroke::new(1.0, colors.photo_border),
        egui::StrokeKind::Inside,
    );

    let ppp = ui.ctx().pixels_per_point();
    let viewport = [
        ((rect.width() - 2.0) * ppp).round().max(1.0) as u32,
        ((rect.height() - 2.0) * ppp).round().max(1.0) as u32,
    ];
    (rect.shrink(1.0), viewport)
}

fn paint_text(ui: &egui::Ui, rect: egui::Rect, text: &str, colors: &ThemeColors) {
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(15.0),
        colors.photo_text,
    );
}
