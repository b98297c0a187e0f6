/// Link index — enumerates `memory_link_<n>` folders under a memory root

use std::fs;
use std::path::{Path, PathBuf};

/// Folder name prefix marking a memory link
pub const LINK_PREFIX: &str = "memory_link_";

/// One memory link folder, identified by its position in the sorted listing
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub ordinal: usize,
    pub folder: PathBuf,
    pub name: String,
}

/// Scan `root` for link folders, sorted by name.
///
/// A missing, unreadable or empty root gives an empty list.
pub fn scan_links(root: &Path) -> Vec<Link> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Memory folder {} not readable: {}", root.display(), e);
            return Vec::new();
        }
    };

    let mut folders: Vec<(String, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();
            if name.starts_with(LINK_PREFIX) && path.is_dir() {
                Some((name, path))
            } else {
                None
            }
        })
        .collect();
    folders.sort_by(|a, b| a.0.cmp(&b.0));

    folders
        .into_iter()
        .enumerate()
        .map(|(ordinal, (name, folder))| Link {
            ordinal,
            folder,
            name,
        })
        .collect()
}
