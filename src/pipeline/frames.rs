/// Frame extraction: decode an imported video into numbered JPEG frames
///
/// Frames are written as `frame_<00000>.jpg` so the same frame index used by
/// the memory-link gallery can list them.

use std::fs;
use std::path::Path;

use crate::error::{Result, TrackerError};
use crate::gallery::frame_index::{self, FrameRef, FRAME_PREFIX};

use super::command::ToolCommand;

/// Build the ffmpeg invocation for `video` → `output_folder`
pub fn extraction_command(
    ffmpeg: &str,
    video: &Path,
    output_folder: &Path,
    max_frames: Option<usize>,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(ffmpeg)
        .args(&["-hide_banner", "-loglevel", "error", "-y", "-i"])
        .path_arg(video);
    if let Some(n) = max_frames {
        cmd = cmd.arg("-frames:v").arg(n.to_string());
    }
    cmd.args(&["-start_number", "0", "-q:v", "2"])
        .path_arg(&output_folder.join(format!("{}%05d.jpg", FRAME_PREFIX)))
        .describe("Extract video frames")
}

/// Delete `frame_*.jpg` files left by a previous import. Returns the count.
pub fn clear_frames(folder: &Path) -> Result<usize> {
    let frames = extracted_frames(folder);
    for frame in &frames {
        fs::remove_file(&frame.path).map_err(|e| TrackerError::io(&frame.path, e))?;
    }
    Ok(frames.len())
}

/// Numbered `frame_<digits>.jpg` files in `folder`; other JPEGs are ignored
pub fn extracted_frames(folder: &Path) -> Vec<FrameRef> {
    frame_index::scan_frames(folder)
        .into_iter()
        .filter(|f| f.parsed_number.is_some())
        .enumerate()
        .map(|(position, frame)| FrameRef { position, ..frame })
        .collect()
}

/// Extract frames from `video` into `output_folder` and list them
pub fn extract_frames(
    ffmpeg: &str,
    video: &Path,
    output_folder: &Path,
    max_frames: Option<usize>,
) -> Result<Vec<FrameRef>> {
    if !video.is_file() {
        return Err(TrackerError::io(
            video,
            std::io::Error::new(std::io::ErrorKind::NotFound, "video file not found"),
        ));
    }
    fs::create_dir_all(output_folder).map_err(|e| TrackerError::io(output_folder, e))?;

    let stale = clear_frames(output_folder)?;
    if stale > 0 {
        log::debug!("Removed {} stale frame(s) from {}", stale, output_folder.display());
    }

    let cmd = extraction_command(ffmpeg, video, output_folder, max_frames);
    let result = cmd.execute()?;

    let frames = extracted_frames(output_folder);
    if frames.is_empty() {
        return Err(TrackerError::CommandFailed {
            command: result.command_string,
            exit_code: result.exit_code,
            stderr: format!("Could not open video: {}", video.display()),
        });
    }
    log::info!("Saved {} frames to {}", frames.len(), output_folder.display());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extraction_command_args() {
        let cmd = extraction_command(
            "ffmpeg",
            Path::new("/data/clip.mp4"),
            Path::new("/data/frames"),
            Some(6),
        );
        let args = cmd.args.join(" ");
        assert!(args.contains("-i /data/clip.mp4"));
        assert!(args.contains("-frames:v 6"));
        assert!(args.contains("-start_number 0"));
        assert!(args.ends_with("/data/frames/frame_%05d.jpg"));

        let unlimited = extraction_command("ffmpeg", Path::new("a.mp4"), Path::new("f"), None);
        assert!(!unlimited.args.iter().any(|a| a == "-frames:v"));
    }

    #[test]
    fn test_clear_frames_keeps_other_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("frame_00000.jpg"), b"x").unwrap();
        fs::write(dir.path().join("frame_00001.jpg"), b"x").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        assert_eq!(clear_frames(dir.path()).unwrap(), 2);
        assert!(dir.path().join("cover.jpg").exists());
        assert!(dir.path().join("notes.txt").exists());
        assert!(frame_index::scan_frames(dir.path())
            .iter()
            .all(|f| f.parsed_number.is_none()));
    }

    #[test]
    fn test_extracted_frames_skip_unnumbered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        fs::write(dir.path().join("frame_00000.jpg"), b"x").unwrap();
        fs::write(dir.path().join("frame_00001.jpg"), b"x").unwrap();

        let frames = extracted_frames(dir.path());
        let names: Vec<String> = frames.iter().map(|f| f.file_name()).collect();
        assert_eq!(names, vec!["frame_00000.jpg", "frame_00001.jpg"]);
        assert_eq!(frames[1].position, 1);
        assert_eq!(frame_index::scan_frames(dir.path()).len(), 3);
    }

    #[test]
    fn test_missing_video_is_error() {
        let dir = tempdir().unwrap();
        let err = extract_frames(
            "ffmpeg",
            &dir.path().join("nope.mp4"),
            &dir.path().join("frames"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TrackerError::Io { .. }));
        assert!(!dir.path().join("frames").exists());
    }
}
