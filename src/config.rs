/// Application configuration — folder layout and default detection settings
///
/// Stored as JSON (`tracker_config.json`). Relative folders resolve against
/// the directory holding the config file, so a project folder can be moved
/// as a whole.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::pipeline::particles::DetectionParams;

pub const DEFAULT_CONFIG_FILE: &str = "tracker_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub videos_folder: PathBuf,
    pub frames_folder: PathBuf,
    pub particles_folder: PathBuf,
    pub memory_folder: PathBuf,
    /// Stop frame extraction after this many frames (None = whole video)
    pub max_frames: Option<usize>,
    pub python: String,
    pub ffmpeg: String,
    pub detection: DetectionParams,

    /// Directory relative folders resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            videos_folder: PathBuf::from("videos"),
            frames_folder: PathBuf::from("frames"),
            particles_folder: PathBuf::from("particles"),
            memory_folder: PathBuf::from("memory"),
            max_frames: None,
            python: "python3".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            detection: DetectionParams::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Read a config file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| TrackerError::io(path, e))?;
        let mut config: AppConfig =
            serde_json::from_str(&json).map_err(|e| TrackerError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.base_dir = base_dir_of(path);
        config.detection.validate().map_err(|e| TrackerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Read a config file, falling back to defaults when it does not exist.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let config = Self::load(path)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self {
                base_dir: base_dir_of(path),
                ..Self::default()
            })
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| TrackerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| TrackerError::io(path, e))
    }

    fn resolve(&self, folder: &Path) -> PathBuf {
        if folder.is_absolute() {
            folder.to_path_buf()
        } else {
            self.base_dir.join(folder)
        }
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.resolve(&self.videos_folder)
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.resolve(&self.frames_folder)
    }

    pub fn particles_dir(&self) -> PathBuf {
        self.resolve(&self.particles_folder)
    }

    pub fn memory_dir(&self) -> PathBuf {
        self.resolve(&self.memory_folder)
    }
}

fn base_dir_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(config.frames_dir(), dir.path().join("frames"));
        assert_eq!(config.detection, DetectionParams::default());
    }

    #[test]
    fn test_partial_file_and_relative_paths() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "memory_folder": "out/memory", "particles_folder": "/abs/particles",
                 "max_frames": 6, "detection": { "feature_size": 11 } }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.memory_dir(), dir.path().join("out/memory"));
        assert_eq!(config.particles_dir(), PathBuf::from("/abs/particles"));
        assert_eq!(config.max_frames, Some(6));
        assert_eq!(config.detection.feature_size, 11);
        assert_eq!(config.detection.min_mass, 100.0);
        assert_eq!(config.python, "python3");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let mut config = AppConfig::default();
        config.ffmpeg = "/opt/ffmpeg/bin/ffmpeg".to_string();
        config.detection.invert = true;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.ffmpeg, config.ffmpeg);
        assert!(loaded.detection.invert);
        assert_eq!(loaded.base_dir, dir.path());
    }

    #[test]
    fn test_bad_json_and_bad_params_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load_or_default(&path),
            Err(TrackerError::Config { .. })
        ));

        std::fs::write(&path, r#"{ "detection": { "feature_size": 4 } }"#).unwrap();
        assert!(matches!(AppConfig::load(&path), Err(TrackerError::Config { .. })));
    }
}
