/// Frame renderer — decode a frame and scale it to fit the photo area
///
/// Output is a plain RGBA bitmap plus its centered offset; turning it into a
/// texture is left to the GUI. Any failure becomes placeholder text.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use super::navigator::DisplayTarget;

pub const NO_LINKS_TEXT: &str = "No memory links available";
pub const MISSING_FILE_TEXT: &str = "Frame file not found";
pub const DECODE_FAILED_TEXT: &str = "Failed to load frame";

/// Bitmap already scaled for the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledFrame {
    pub image: RgbaImage,
    /// Top-left corner inside the viewport, in pixels
    pub offset: [u32; 2],
    /// Size of the decoded source image
    pub source_size: [u32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Placeholder(String),
    Image(ScaledFrame),
}

impl DisplayState {
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            DisplayState::Placeholder(text) => Some(text),
            DisplayState::Image(_) => None,
        }
    }
}

/// Largest size with the source aspect ratio that fits in `viewport`,
/// and the offset that centers it. Returns `(offset, size)`.
pub fn fit_rect(source: [u32; 2], viewport: [u32; 2]) -> ([u32; 2], [u32; 2]) {
    let [sw, sh] = [source[0].max(1) as f64, source[1].max(1) as f64];
    let [vw, vh] = [viewport[0].max(1), viewport[1].max(1)];
    let scale = (vw as f64 / sw).min(vh as f64 / sh);
    let w = ((sw * scale).round() as u32).clamp(1, vw);
    let h = ((sh * scale).round() as u32).clamp(1, vh);
    ([(vw - w) / 2, (vh - h) / 2], [w, h])
}

/// Scale a decoded image to fit the viewport, keeping aspect ratio
pub fn scale_to_fit(source: &DynamicImage, viewport: [u32; 2]) -> ScaledFrame {
    let source_size = [source.width(), source.height()];
    let (offset, [w, h]) = fit_rect(source_size, viewport);
    let image = if [w, h] == source_size {
        source.to_rgba8()
    } else {
        source.resize_exact(w, h, FilterType::Triangle).to_rgba8()
    };
    ScaledFrame {
        image,
        offset,
        source_size,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum RenderKey {
    NoLinks,
    NoFrames(usize),
    Frame(PathBuf),
}

/// Keeps the decoded source of the current frame so a viewport resize only
/// rescales. `generation` bumps whenever `state` changes.
#[derive(Debug)]
pub struct FrameRenderer {
    key: Option<(RenderKey, [u32; 2])>,
    source: Option<(PathBuf, DynamicImage)>,
    state: DisplayState,
    generation: u64,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self {
            key: None,
            source: None,
            state: DisplayState::Placeholder(NO_LINKS_TEXT.to_string()),
            generation: 0,
        }
    }
}

impl FrameRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forget the cached source so the next `show` decodes from disk again
    pub fn invalidate(&mut self) {
        self.key = None;
        self.source = None;
    }

    /// Produce the display state for `target` at `viewport` pixels
    pub fn show(&mut self, target: DisplayTarget<'_>, viewport: [u32; 2]) -> &DisplayState {
        match target {
            DisplayTarget::NoLinks => {
                self.show_text(RenderKey::NoLinks, NO_LINKS_TEXT.to_string(), viewport)
            }
            DisplayTarget::NoFrames { link } => self.show_text(
                RenderKey::NoFrames(link),
                format!("No frames in memory link {}", link),
                viewport,
            ),
            DisplayTarget::Frame(frame) => self.show_file(&frame.path, viewport),
        }
    }

    /// Decode (or reuse) the image at `path` and fit it to `viewport`
    pub fn show_file(&mut self, path: &Path, viewport: [u32; 2]) -> &DisplayState {
        let key = (RenderKey::Frame(path.to_path_buf()), viewport);
        if self.key.as_ref() != Some(&key) {
            self.state = self.render_path(path, viewport);
            self.key = Some(key);
            self.generation += 1;
        }
        &self.state
    }

    fn show_text(&mut self, key: RenderKey, text: String, viewport: [u32; 2]) -> &DisplayState {
        let key = (key, viewport);
        if self.key.as_ref() != Some(&key) {
            self.state = DisplayState::Placeholder(text);
            self.key = Some(key);
            self.generation += 1;
        }
        &self.state
    }

    fn render_path(&mut self, path: &Path, viewport: [u32; 2]) -> DisplayState {
        let cached = matches!(&self.source, Some((p, _)) if p == path);
        if !cached {
            self.source = None;
            match decode_frame(path) {
                Ok(img) => self.source = Some((path.to_path_buf(), img)),
                Err(text) => return DisplayState::Placeholder(text.to_string()),
            }
        }
        match &self.source {
            Some((_, img)) => DisplayState::Image(scale_to_fit(img, viewport)),
            None => DisplayState::Placeholder(DECODE_FAILED_TEXT.to_string()),
        }
    }
}

/// Decode an image file; the error is the placeholder text to show
fn decode_frame(path: &Path) -> Result<DynamicImage, &'static str> {
    if !path.exists() {
        log::warn!("Frame file not found: {}", path.display());
        return Err(MISSING_FILE_TEXT);
    }
    image::open(path).map_err(|e| {
        log::warn!("Failed to decode frame {}: {}", path.display(), e);
        DECODE_FAILED_TEXT
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::frame_index::FrameRef;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::tempdir;

    fn frame_at(path: &Path) -> FrameRef {
        FrameRef {
            path: path.to_path_buf(),
            position: 0,
            parsed_number: Some(0),
        }
    }

    #[test]
    fn test_fit_rect_wide_source() {
        // 200×100 into 100×100 → 100×50 centered vertically
        let (offset, size) = fit_rect([200, 100], [100, 100]);
        assert_eq!(size, [100, 50]);
        assert_eq!(offset, [0, 25]);
    }

    #[test]
    fn test_fit_rect_upscales_tall_source() {
        let (offset, size) = fit_rect([10, 20], [300, 100]);
        assert_eq!(size, [50, 100]);
        assert_eq!(offset, [125, 0]);
    }

    #[test]
    fn test_fit_rect_zero_viewport() {
        let (offset, size) = fit_rect([64, 64], [0, 0]);
        assert_eq!(size, [1, 1]);
        assert_eq!(offset, [0, 0]);
    }

    #[test]
    fn test_renders_and_rescales() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame_00000.jpg");
        RgbImage::from_pixel(80, 40, Rgb([200, 50, 50])).save(&path).unwrap();
        let frame = frame_at(&path);

        let mut renderer = FrameRenderer::new();
        match renderer.show(DisplayTarget::Frame(&frame), [40, 40]) {
            DisplayState::Image(scaled) => {
                assert_eq!(scaled.source_size, [80, 40]);
                assert_eq!(scaled.image.dimensions(), (40, 20));
                assert_eq!(scaled.offset, [0, 10]);
            }
            other => panic!("expected image, got {:?}", other),
        }
        let gen = renderer.generation();

        // Same target and viewport: cached
        renderer.show(DisplayTarget::Frame(&frame), [40, 40]);
        assert_eq!(renderer.generation(), gen);

        // Resize works from the cached source even if the file goes away
        fs::remove_file(&path).unwrap();
        match renderer.show(DisplayTarget::Frame(&frame), [160, 160]) {
            DisplayState::Image(scaled) => assert_eq!(scaled.image.dimensions(), (160, 80)),
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_corrupt_files_are_placeholders() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("frame_00001.jpg");
        let corrupt = dir.path().join("frame_00002.jpg");
        fs::write(&corrupt, b"definitely not a jpeg").unwrap();

        let mut renderer = FrameRenderer::new();
        let state = renderer.show(DisplayTarget::Frame(&frame_at(&missing)), [50, 50]);
        assert_eq!(state.placeholder(), Some(MISSING_FILE_TEXT));

        let state = renderer.show(DisplayTarget::Frame(&frame_at(&corrupt)), [50, 50]);
        assert_eq!(state.placeholder(), Some(DECODE_FAILED_TEXT));
    }

    #[test]
    fn test_empty_states() {
        let mut renderer = FrameRenderer::new();
        let state = renderer.show(DisplayTarget::NoLinks, [10, 10]);
        assert_eq!(state.placeholder(), Some(NO_LINKS_TEXT));
        let state = renderer.show(DisplayTarget::NoFrames { link: 3 }, [10, 10]);
        assert_eq!(state.placeholder(), Some("No frames in memory link 3"));
    }
}
