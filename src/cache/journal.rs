//! Fetch journal
//!
//! Appends one JSON line per completed fetch to
//! `~/.local/state/gradle-pin/fetch.log`. The journal is a record only; cache
//! presence is never decided from it.

use crate::cache::checksum::Checksum;
use crate::cache::descriptor::ArtifactDescriptor;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Append-only JSON-lines log of fetched artifacts
#[derive(Debug, Clone)]
pub struct FetchJournal {
    path: PathBuf,
}

impl FetchJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a completed fetch.
    ///
    /// Failures are logged and dropped; a broken journal must not fail the
    /// fetch it describes.
    pub fn record(&self, descriptor: &ArtifactDescriptor, checksum: &Checksum, bytes: u64) {
        let entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "label": descriptor.label,
            "checksum": checksum.as_hex(),
            "algorithm": checksum.algorithm().to_string(),
            "bytes": bytes,
            "archive": descriptor.archive_path.display().to_string(),
            "local_path": descriptor.local_path.display().to_string(),
        });

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize fetch journal entry: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = self.append(&line) {
            warn!("Failed to write fetch journal {}: {}", self.path.display(), e);
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(line.as_bytes())?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DIGEST: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";

    fn descriptor() -> ArtifactDescriptor {
        ArtifactDescriptor::from_archive("/c/protoc", "/c/protoc.tar.gz", "Proto Compiler")
    }

    #[test]
    fn writes_json_line() {
        let dir = TempDir::new().unwrap();
        let journal = FetchJournal::new(dir.path().join("state/fetch.log"));

        journal.record(&descriptor(), &Checksum::parse(DIGEST).unwrap(), 11);

        let content = fs::read_to_string(journal.path()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();

        assert_eq!(parsed["label"], "Proto Compiler");
        assert_eq!(parsed["checksum"], DIGEST);
        assert_eq!(parsed["algorithm"], "sha1");
        assert_eq!(parsed["bytes"], 11);
        assert!(parsed["timestamp"].is_string());
    }

    #[test]
    fn appends_multiple_lines() {
        let dir = TempDir::new().unwrap();
        let journal = FetchJournal::new(dir.path().join("fetch.log"));
        let checksum = Checksum::parse(DIGEST).unwrap();

        journal.record(&descriptor(), &checksum, 1);
        journal.record(&descriptor(), &checksum, 2);

        let content = fs::read_to_string(journal.path()).unwrap();
        assert_eq!(content.trim().lines().count(), 2);
    }

    #[test]
    fn unwritable_path_is_ignored() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"file, not a directory").unwrap();

        let journal = FetchJournal::new(blocker.join("fetch.log"));
        journal.record(&descriptor(), &Checksum::parse(DIGEST).unwrap(), 1);

        assert!(!journal.path().exists());
    }
}
