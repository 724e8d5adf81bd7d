//! # Append-only log collaborator.
//!
//! [`Journal`] is the single sink every process of a run writes to. Each call to
//! [`Journal::record`] appends one line:
//!
//! ```text
//! [Mon Oct 19 04:02:11 2026] [PID:4242] Producer: read numbers 3 and 7
//! ```
//!
//! The file is opened per record so that independent processes can share it
//! with `O_APPEND` semantics. Write failures are swallowed: losing a log line
//! must never change the outcome of a run.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

/// `ctime(3)` layout without the trailing newline.
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Append-only text sink shared by all processes of a run.
#[derive(Clone, Debug)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Creates a journal writing to `path` (created on first record).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record stamped with the local time and the caller's pid.
    pub fn record(&self, text: &str) {
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let line = format_line(&stamp, std::process::id(), text);
        let file = OpenOptions::new().create(true).append(true).open(&self.path);
        if let Ok(mut file) = file {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

fn format_line(timestamp: &str, pid: u32, text: &str) -> String {
    format!("[{timestamp}] [PID:{pid}] {text}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_layout() {
        let line = format_line("Mon Oct 19 04:02:11 2026", 42, "hello");
        assert_eq!(line, "[Mon Oct 19 04:02:11 2026] [PID:42] hello\n");
    }

    #[test]
    fn records_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let journal = Journal::new(dir.path().join("logs.txt"));
        journal.record("first");
        journal.record("second");

        let text = std::fs::read_to_string(journal.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("first"));
        assert!(lines[1].ends_with("second"));
        assert!(lines[0].contains(&format!("[PID:{}]", std::process::id())));
        assert!(!lines[0].starts_with("[\n"));
    }

    #[test]
    fn unwritable_path_is_ignored() {
        let journal = Journal::new("/nonexistent-dir/for/sure/logs.txt");
        journal.record("dropped");
    }
}
