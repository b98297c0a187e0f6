/// Frame index — ordered image files inside one memory link folder
///
/// Ordering is by file name only. The frame number parsed from the name is
/// used for display; names that do not parse fall back to their position.

use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix carrying the original frame number
pub const FRAME_PREFIX: &str = "frame_";
/// Extension of saved frame crops (matched case-insensitively)
pub const FRAME_EXTENSION: &str = "jpg";

/// A frame file plus the frame number shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRef {
    pub path: PathBuf,
    /// Position within the link
    pub position: usize,
    /// Frame number parsed from `frame_<digits>.jpg`, if the name has one
    pub parsed_number: Option<u64>,
}

impl FrameRef {
    /// Frame number for display; the position when the name did not parse
    pub fn display_number(&self) -> u64 {
        self.parsed_number.unwrap_or(self.position as u64)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Parse `frame_00010.jpg` → 10. Anything else → None.
pub fn parse_frame_number(file_name: &str) -> Option<u64> {
    let rest = file_name.strip_prefix(FRAME_PREFIX)?;
    let digits = rest.split('.').next()?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(FRAME_EXTENSION))
        .unwrap_or(false)
}

/// Scan a link folder for frame images, sorted by file name.
///
/// A missing or unreadable folder gives an empty list.
pub fn scan_frames(folder: &Path) -> Vec<FrameRef> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Link folder {} not readable: {}", folder.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .flatten()
        .map(|entry| (entry.file_name().to_string_lossy().to_string(), entry.path()))
        .filter(|(_, path)| path.is_file() && has_frame_extension(path))
        .collect();
    files.sort_by(|a, b| a.0.cmp(&b.0));

    files
        .into_iter()
        .enumerate()
        .map(|(position, (name, path))| FrameRef {
            parsed_number: parse_frame_number(&name),
            path,
            position,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_frame_number() {
        assert_eq!(parse_frame_number("frame_00010.jpg"), Some(10));
        assert_eq!(parse_frame_number("frame_00000.JPG"), Some(0));
        assert_eq!(parse_frame_number("frame_.jpg"), None);
        assert_eq!(parse_frame_number("frame_12a.jpg"), None);
        assert_eq!(parse_frame_number("rudimentary.jpg"), None);
    }

    #[test]
    fn test_malformed_name_uses_position() {
        let dir = tempdir().unwrap();
        for name in ["frame_00000.jpg", "rudimentary.jpg", "frame_00002.jpg"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let frames = scan_frames(dir.path());
        assert_eq!(frames.len(), 3);

        let names: Vec<String> = frames.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["frame_00000.jpg", "frame_00002.jpg", "rudimentary.jpg"]);
        assert_eq!(frames[1].display_number(), 2);
        assert_eq!(frames[2].parsed_number, None);
        assert_eq!(frames[2].display_number(), 2);
    }

    #[test]
    fn test_non_images_and_dirs_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("frame_00001.jpg"), b"x").unwrap();
        fs::write(dir.path().join("frame_00002.png"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("frame_00003.jpg")).unwrap();

        let frames = scan_frames(dir.path());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].parsed_number, Some(1));
    }

    #[test]
    fn test_zero_padded_order_is_numeric() {
        let dir = tempdir().unwrap();
        for n in [10, 2, 1] {
            fs::write(dir.path().join(format!("frame_{:05}.jpg", n)), b"x").unwrap();
        }
        let numbers: Vec<u64> = scan_frames(dir.path())
            .iter()
            .map(|f| f.display_number())
            .collect();
        assert_eq!(numbers, vec![1, 2, 10]);
    }
}
