/// Error type shared by configuration, extraction, detection and export
///
/// The gallery browser never returns these: its failures degrade to
/// display states instead (see `gallery::render::DisplayState`).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Filesystem access failed for a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image could not be decoded or encoded
    #[error("Image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Config error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// An external program (ffmpeg, python) could not be started
    #[error("{tool} not found. Ensure it is installed and in PATH.")]
    ToolNotFound { tool: String },

    #[error("Command failed (exit {exit_code:?}): {command}\n{stderr}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Invalid detection parameters: {0}")]
    InvalidParams(String),

    /// The particle locator produced output we could not parse
    #[error("Malformed detector output: {0}")]
    DetectorOutput(String),
}

impl TrackerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        TrackerError::Image {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
