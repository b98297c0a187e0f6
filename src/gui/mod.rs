pub mod detection_panel;
pub mod gallery_view;
pub mod photo_view;
pub mod theme;
pub mod toolbar;
