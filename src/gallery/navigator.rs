/// Navigator: bounded link/frame counters over the memory folder
///
/// Owns the link list and the frame list of the selected link. Both are
/// rebuilt from disk (never patched): the link list on `refresh`, the frame
/// list whenever the selected link changes.

use std::path::{Path, PathBuf};

use super::frame_index::{self, FrameRef};
use super::link_index::{self, Link};

/// What the photo area should show for the current navigator state
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayTarget<'a> {
    NoLinks,
    /// The selected link exists but holds no frames
    NoFrames { link: usize },
    Frame(&'a FrameRef),
}

/// Snapshot used to enable/disable the navigation buttons
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavigationInfo {
    pub has_previous_link: bool,
    pub has_next_link: bool,
    pub has_previous_frame: bool,
    pub has_next_frame: bool,
    pub link_count: usize,
    pub frame_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    root: Option<PathBuf>,
    links: Vec<Link>,
    frames: Vec<FrameRef>,
    link_idx: usize,
    frame_idx: usize,
}

impl Navigator {
    /// Navigator with no root: always in the "no links" state
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigator over `root`, scanned immediately
    pub fn with_root(root: &Path) -> Self {
        let mut nav = Self::new();
        nav.set_root(Some(root.to_path_buf()));
        nav
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Point at a new memory folder and rescan it
    pub fn set_root(&mut self, root: Option<PathBuf>) {
        self.root = root;
        self.refresh();
    }

    /// Rescan the memory folder; selection goes back to link 0, frame 0
    pub fn refresh(&mut self) {
        self.links = match &self.root {
            Some(root) => link_index::scan_links(root),
            None => Vec::new(),
        };
        self.link_idx = 0;
        self.load_link_frames();
        log::info!(
            "Memory links refreshed: {} link(s), {} frame(s) in first link",
            self.links.len(),
            self.frames.len()
        );
    }

    fn load_link_frames(&mut self) {
        self.frame_idx = 0;
        self.frames = match self.links.get(self.link_idx) {
            Some(link) => frame_index::scan_frames(&link.folder),
            None => Vec::new(),
        };
    }

    // ── Transitions ──

    pub fn next_link(&mut self) -> bool {
        if self.links.is_empty() || self.link_idx + 1 >= self.links.len() {
            return false;
        }
        self.link_idx += 1;
        self.load_link_frames();
        true
    }

    pub fn previous_link(&mut self) -> bool {
        if self.links.is_empty() || self.link_idx == 0 {
            return false;
        }
        self.link_idx -= 1;
        self.load_link_frames();
        true
    }

    pub fn next_frame(&mut self) -> bool {
        if self.frames.is_empty() || self.frame_idx + 1 >= self.frames.len() {
            return false;
        }
        self.frame_idx += 1;
        true
    }

    pub fn previous_frame(&mut self) -> bool {
        if self.frames.is_empty() || self.frame_idx == 0 {
            return false;
        }
        self.frame_idx -= 1;
        true
    }

    // ── Queries ──

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_link_index(&self) -> usize {
        self.link_idx
    }

    pub fn current_frame_index(&self) -> usize {
        self.frame_idx
    }

    pub fn current_link(&self) -> Option<&Link> {
        self.links.get(self.link_idx)
    }

    pub fn current_frame(&self) -> Option<&FrameRef> {
        self.frames.get(self.frame_idx)
    }

    pub fn display_target(&self) -> DisplayTarget<'_> {
        if self.links.is_empty() {
            return DisplayTarget::NoLinks;
        }
        match self.current_frame() {
            Some(frame) => DisplayTarget::Frame(frame),
            None => DisplayTarget::NoFrames { link: self.link_idx },
        }
    }

    pub fn info(&self) -> NavigationInfo {
        NavigationInfo {
            has_previous_link: self.link_idx > 0 && !self.links.is_empty(),
            has_next_link: self.link_idx + 1 < self.links.len(),
            has_previous_frame: self.frame_idx > 0 && !self.frames.is_empty(),
            has_next_frame: self.frame_idx + 1 < self.frames.len(),
            link_count: self.links.len(),
            frame_count: self.frames.len(),
        }
    }

    /// Short counter shown between the frame buttons, e.g. `3 / 9`
    pub fn frame_counter_text(&self) -> String {
        if self.frames.is_empty() {
            "0 / 0".to_string()
        } else {
            format!("{} / {}", self.frame_idx, self.frames.len() - 1)
        }
    }

    /// Full status line under the photo area
    pub fn status_text(&self) -> String {
        match (self.links.is_empty(), self.current_frame()) {
            (false, Some(frame)) => format!(
                "Memory Link: {} / {} | Frame: {} / {} (Original: {})",
                self.link_idx,
                self.links.len() - 1,
                self.frame_idx,
                self.frames.len() - 1,
                frame.display_number()
            ),
            _ => "Memory Link: 0 / 0 | Frame: 0 / 0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// memory_link_0 with 3 frames, memory_link_1 empty, memory_link_2 with 2
    fn make_memory_folder(root: &Path) {
        let counts = [3usize, 0, 2];
        for (link, count) in counts.iter().enumerate() {
            let folder = root.join(format!("memory_link_{}", link));
            fs::create_dir_all(&folder).unwrap();
            for i in 0..*count {
                fs::write(folder.join(format!("frame_{:05}.jpg", i * 5)), b"x").unwrap();
            }
        }
    }

    #[test]
    fn test_empty_navigator() {
        let mut nav = Navigator::new();
        assert_eq!(nav.display_target(), DisplayTarget::NoLinks);
        assert!(!nav.next_link());
        assert!(!nav.previous_link());
        assert!(!nav.next_frame());
        assert!(!nav.previous_frame());
        assert_eq!(nav.status_text(), "Memory Link: 0 / 0 | Frame: 0 / 0");
        assert_eq!(nav.frame_counter_text(), "0 / 0");
    }

    #[test]
    fn test_existing_empty_root() {
        let dir = tempdir().unwrap();
        let nav = Navigator::with_root(dir.path());
        assert_eq!(nav.link_count(), 0);
        assert_eq!(nav.display_target(), DisplayTarget::NoLinks);
        assert_eq!(nav.status_text(), "Memory Link: 0 / 0 | Frame: 0 / 0");
    }

    #[test]
    fn test_set_root_rescans_and_resets() {
        let first = tempdir().unwrap();
        make_memory_folder(first.path());
        let mut nav = Navigator::with_root(first.path());
        nav.next_link();
        nav.next_link();
        nav.next_frame();

        let second = tempdir().unwrap();
        fs::create_dir(second.path().join("memory_link_0")).unwrap();
        nav.set_root(Some(second.path().to_path_buf()));
        assert_eq!(nav.root(), Some(second.path()));
        assert_eq!(nav.link_count(), 1);
        assert_eq!(nav.current_link_index(), 0);
        assert_eq!(nav.current_frame_index(), 0);
        assert_eq!(nav.display_target(), DisplayTarget::NoFrames { link: 0 });
    }

    #[test]
    fn test_empty_link_state() {
        let dir = tempdir().unwrap();
        make_memory_folder(dir.path());
        let mut nav = Navigator::with_root(dir.path());
        assert_eq!(nav.link_count(), 3);
        assert_eq!(nav.frame_count(), 3);

        assert!(nav.next_link());
        assert_eq!(nav.current_link_index(), 1);
        assert_eq!(nav.display_target(), DisplayTarget::NoFrames { link: 1 });
        assert!(!nav.previous_frame());
        assert!(!nav.next_frame());
        assert_eq!(nav.current_frame_index(), 0);
        assert_eq!(nav.status_text(), "Memory Link: 0 / 0 | Frame: 0 / 0");
    }

    #[test]
    fn test_link_change_resets_frame() {
        let dir = tempdir().unwrap();
        make_memory_folder(dir.path());
        let mut nav = Navigator::with_root(dir.path());

        assert!(nav.next_frame());
        assert!(nav.next_frame());
        assert_eq!(nav.current_frame_index(), 2);

        nav.next_link();
        nav.next_link();
        assert_eq!(nav.current_link_index(), 2);
        assert_eq!(nav.current_frame_index(), 0);
        assert_eq!(nav.frame_count(), 2);

        nav.next_frame();
        nav.previous_link();
        assert_eq!(nav.current_frame_index(), 0);
    }

    #[test]
    fn test_boundaries_are_noops() {
        let dir = tempdir().unwrap();
        make_memory_folder(dir.path());
        let mut nav = Navigator::with_root(dir.path());

        assert!(!nav.previous_link());
        assert!(!nav.previous_frame());
        for _ in 0..10 {
            nav.next_frame();
        }
        assert_eq!(nav.current_frame_index(), 2);
        assert!(!nav.next_frame());

        for _ in 0..10 {
            nav.next_link();
        }
        assert_eq!(nav.current_link_index(), 2);
        assert!(!nav.next_link());
    }

    #[test]
    fn test_indices_stay_in_bounds_for_any_sequence() {
        let dir = tempdir().unwrap();
        make_memory_folder(dir.path());
        let mut nav = Navigator::with_root(dir.path());

        // Deterministic pseudo-random walk over the four transitions
        let mut seed: u32 = 12345;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            match (seed >> 16) % 4 {
                0 => nav.next_link(),
                1 => nav.previous_link(),
                2 => nav.next_frame(),
                _ => nav.previous_frame(),
            };
            assert!(nav.current_link_index() < nav.link_count());
            if nav.frame_count() == 0 {
                assert_eq!(nav.current_frame_index(), 0);
            } else {
                assert!(nav.current_frame_index() < nav.frame_count());
            }
        }
    }

    #[test]
    fn test_status_text_uses_parsed_number() {
        let dir = tempdir().unwrap();
        make_memory_folder(dir.path());
        let mut nav = Navigator::with_root(dir.path());
        nav.next_frame();
        assert_eq!(
            nav.status_text(),
            "Memory Link: 0 / 2 | Frame: 1 / 2 (Original: 5)"
        );
        assert_eq!(nav.frame_counter_text(), "1 / 2");
    }

    #[test]
    fn test_refresh_picks_up_changes() {
        let dir = tempdir().unwrap();
        make_memory_folder(dir.path());
        let mut nav = Navigator::with_root(dir.path());
        nav.next_link();

        let extra = dir.path().join("memory_link_3");
        fs::create_dir(&extra).unwrap();
        fs::write(dir.path().join("memory_link_0").join("frame_00099.jpg"), b"x").unwrap();

        nav.refresh();
        assert_eq!(nav.link_count(), 4);
        assert_eq!(nav.current_link_index(), 0);
        assert_eq!(nav.frame_count(), 4);
    }

    #[test]
    fn test_info_flags() {
        let dir = tempdir().unwrap();
        make_memory_folder(dir.path());
        let mut nav = Navigator::with_root(dir.path());
        let info = nav.info();
        assert!(!info.has_previous_link);
        assert!(info.has_next_link);
        assert!(!info.has_previous_frame);
        assert!(info.has_next_frame);

        nav.next_link();
        let info = nav.info();
        assert!(info.has_previous_link);
        assert!(!info.has_next_frame);
        assert_eq!(info.frame_count, 0);
    }
}
