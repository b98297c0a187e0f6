/// Activity log — ordered record of what the user did in this session
///
/// Each import, extraction, detection run and gallery refresh is appended
/// with a timestamp. The log can be exported as plain text or JSON.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TrackerError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// 1-based
    pub sequence: usize,
    pub timestamp: DateTime<Local>,
    pub operation: String,
    pub description: String,
}

impl ActivityEntry {
    pub fn to_text(&self) -> String {
        format!(
            "[{:03}] {} | {} | {}",
            self.sequence,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.description
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub session_id: String,
    pub session_start: DateTime<Local>,
    pub software_version: String,
    pub entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            session_start: Local::now(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            entries: Vec::new(),
        }
    }

    pub fn add_entry(&mut self, operation: &str, description: &str) {
        let seq = self.entries.len() + 1;
        self.entries.push(ActivityEntry {
            sequence: seq,
            timestamp: Local::now(),
            operation: operation.to_string(),
            description: description.to_string(),
        });
        log::info!("[LOG {:03}] {} — {}", seq, operation, description);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out.push_str("  Particle Tracker Activity Log\n");
        out.push_str("═══════════════════════════════════════════════════════════════\n");
        out.push_str(&format!("  Session ID:  {}\n", self.session_id));
        out.push_str(&format!(
            "  Started:     {}\n",
            self.session_start.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("  Software:    v{}\n", self.software_version));
        out.push_str(&format!("  Operations:  {}\n", self.entries.len()));
        out.push_str("───────────────────────────────────────────────────────────────\n\n");
        for entry in &self.entries {
            out.push_str(&entry.to_text());
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// Write as JSON when the extension is `.json`, text otherwise
    pub fn save(&self, path: &Path) -> Result<()> {
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let body = if is_json { self.to_json() } else { self.to_text() };
        std::fs::write(path, body).map_err(|e| TrackerError::io(path, e))
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_entries_numbered_in_order() {
        let mut log = ActivityLog::new();
        assert!(log.is_empty());
        log.add_entry("Import Video", "clip.mp4");
        log.add_entry("Find Particles", "12 features");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries[0].sequence, 1);
        assert_eq!(log.entries[1].sequence, 2);
        assert_eq!(log.entries[1].operation, "Find Particles");
    }

    #[test]
    fn test_text_export() {
        let mut log = ActivityLog::new();
        log.add_entry("Refresh Links", "3 memory links");
        let text = log.to_text();
        assert!(text.contains(&log.session_id));
        assert!(text.contains("Refresh Links | 3 memory links"));
    }

    #[test]
    fn test_save_picks_format_by_extension() {
        let dir = tempdir().unwrap();
        let mut log = ActivityLog::new();
        log.add_entry("Extract Frames", "6 frames");

        let json_path = dir.path().join("log.json");
        log.save(&json_path).unwrap();
        let parsed: ActivityLog =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.session_id, log.session_id);

        let txt_path = dir.path().join("log.txt");
        log.save(&txt_path).unwrap();
        assert!(std::fs::read_to_string(&txt_path)
            .unwrap()
            .starts_with("═══"));
    }
}
