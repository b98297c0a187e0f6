/// Theme system — switchable color themes for the application
///
/// Provides a Light and a Dark theme. The photo area keeps its own colors
/// so frames are judged against a neutral background in both themes.

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AppTheme {
    Light,
    Dark,
}

impl AppTheme {
    pub fn label(&self) -> &'static str {
        match self {
            AppTheme::Light => "☀ Light",
            AppTheme::Dark => "🌙 Dark",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AppTheme::Light => AppTheme::Dark,
            AppTheme::Dark => AppTheme::Light,
        }
    }
}

/// All colors a theme needs to provide
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub panel_fill: egui::Color32,
    pub window_fill: egui::Color32,
    pub faint_bg: egui::Color32,

    pub widget_inactive_bg: egui::Color32,
    pub widget_inactive_stroke: egui::Color32,
    pub widget_hovered_bg: egui::Color32,
    pub widget_hovered_stroke: egui::Color32,
    pub widget_active_bg: egui::Color32,

    pub selection_bg: egui::Color32,
    pub selection_stroke: egui::Color32,

    pub text_primary: egui::Color32,
    pub text_muted: egui::Color32,

    pub accent: egui::Color32,
    pub success: egui::Color32,
    pub warning: egui::Color32,

    // Photo area
    pub photo_bg: egui::Color32,
    pub photo_border: egui::Color32,
    pub photo_text: egui::Color32,

    // Subpixel-bias histogram
    pub bias_x: egui::Color32,
    pub bias_y: egui::Color32,

    pub status_bar_bg: egui::Color32,
    pub status_text: egui::Color32,

    pub is_dark: bool,
}

impl ThemeColors {
    pub fn from_theme(theme: AppTheme) -> Self {
        match theme {
            AppTheme::Light => Self::light(),
            AppTheme::Dark => Self::dark(),
        }
    }

    fn light() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0xF7, 0xF7, 0xF8),
            window_fill: egui::Color32::from_rgb(0xFF, 0xFF, 0xFF),
            faint_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),

            widget_inactive_bg: egui::Color32::from_rgb(0xE3, 0xE5, 0xE8),
            widget_inactive_stroke: egui::Color32::from_rgb(0xC8, 0xCA, 0xCE),
            widget_hovered_bg: egui::Color32::from_rgb(0xD8, 0xDD, 0xE6),
            widget_hovered_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            widget_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            selection_bg: egui::Color32::from_rgba_premultiplied(0x3B, 0x7D, 0xC0, 0x40),
            selection_stroke: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            text_primary: egui::Color32::from_rgb(0x2A, 0x2E, 0x36),
            text_muted: egui::Color32::from_rgb(0x88, 0x8C, 0x94),

            accent: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),
            success: egui::Color32::from_rgb(0x27, 0x8B, 0x4A),
            warning: egui::Color32::from_rgb(0xB8, 0x8B, 0x00),

            photo_bg: egui::Color32::WHITE,
            photo_border: egui::Color32::from_rgb(0x55, 0x55, 0x55),
            photo_text: egui::Color32::from_rgb(0x33, 0x33, 0x33),

            bias_x: egui::Color32::from_rgb(0x1A, 0x47, 0x80),
            bias_y: egui::Color32::from_rgb(0xD4, 0x55, 0x45),

            status_bar_bg: egui::Color32::from_rgb(0xF0, 0xF1, 0xF3),
            status_text: egui::Color32::from_rgb(0x44, 0x48, 0x52),

            is_dark: false,
        }
    }

    fn dark() -> Self {
        Self {
            panel_fill: egui::Color32::from_rgb(0x1B, 0x1D, 0x22),
            window_fill: egui::Color32::from_rgb(0x22, 0x24, 0x2A),
            faint_bg: egui::Color32::from_rgb(0x26, 0x28, 0x2E),

            widget_inactive_bg: egui::Color32::from_rgb(0x2E, 0x31, 0x38),
            widget_inactive_stroke: egui::Color32::from_rgb(0x44, 0x48, 0x52),
            widget_hovered_bg: egui::Color32::from_rgb(0x38, 0x3C, 0x46),
            widget_hovered_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            widget_active_bg: egui::Color32::from_rgb(0x3B, 0x7D, 0xC0),

            selection_bg: egui::Color32::from_rgba_premultiplied(0x3B, 0x7D, 0xC0, 0x50),
            selection_stroke: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),

            text_primary: egui::Color32::from_rgb(0xDD, 0xDF, 0xE4),
            text_muted: egui::Color32::from_rgb(0x80, 0x84, 0x8E),

            accent: egui::Color32::from_rgb(0x5B, 0x9B, 0xD5),
            success: egui::Color32::from_rgb(0x4C, 0xC0, 0x70),
            warning: egui::Color32::from_rgb(0xE0, 0xB0, 0x30),

            photo_bg: egui::Color32::from_rgb(0x22, 0x22, 0x22),
            photo_border: egui::Color32::from_rgb(0x55, 0x55, 0x55),
            photo_text: egui::Color32::from_rgb(0xCC, 0xCC, 0xCC),

            bias_x: egui::Color32::from_rgb(0x00, 0xB8, 0xE0),
            bias_y: egui::Color32::from_rgb(0xFF, 0x80, 0x60),

            status_bar_bg: egui::Color32::from_rgb(0x15, 0x16, 0x1A),
            status_text: egui::Color32::from_rgb(0xA8, 0xAC, 0xB6),

            is_dark: true,
        }
    }
}

/// Apply a theme to the egui context
pub fn apply_theme(ctx: &egui::Context, theme: AppTheme) {
    let c = ThemeColors::from_theme(theme);

    let mut visuals = if c.is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };

    visuals.panel_fill = c.panel_fill;
    visuals.window_fill = c.window_fill;
    visuals.faint_bg_color = c.faint_bg;

    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, c.text_primary);

    visuals.widgets.inactive.bg_fill = c.widget_inactive_bg;
    visuals.widgets.inactive.weak_bg_fill = c.widget_inactive_bg;
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(0.5, c.widget_inactive_stroke);
    visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(4);

    visuals.widgets.hovered.bg_fill = c.widget_hovered_bg;
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, c.widget_hovered_stroke);

    visuals.widgets.active.bg_fill = c.widget_active_bg;
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.5, egui::Color32::WHITE);

    visuals.selection.bg_fill = c.selection_bg;
    visuals.selection.stroke = egui::Stroke::new(1.5, c.selection_stroke);

    ctx.set_visuals(visuals);
}
