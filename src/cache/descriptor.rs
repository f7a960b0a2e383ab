//! Artifact descriptors
//!
//! A descriptor names where an artifact lives once materialized, the archive
//! it expands from, and the checksum file (kept in source control) that keys
//! the archive in the remote store.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of checksum descriptor files next to their archive
pub const CHECKSUM_SUFFIX: &str = ".sha1";

/// A declared external dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// File or directory that exists once the artifact is materialized
    pub local_path: PathBuf,
    /// Compressed package that expands to `local_path`
    pub archive_path: PathBuf,
    /// File holding the expected checksum of the archive
    pub checksum_path: PathBuf,
    /// Human-readable name for diagnostics
    pub label: String,
}

impl ArtifactDescriptor {
    pub fn new(
        local_path: impl Into<PathBuf>,
        archive_path: impl Into<PathBuf>,
        checksum_path: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            archive_path: archive_path.into(),
            checksum_path: checksum_path.into(),
            label: label.into(),
        }
    }

    /// Build a descriptor whose checksum file follows the `<archive>.sha1`
    /// naming convention
    pub fn from_archive(
        local_path: impl Into<PathBuf>,
        archive_path: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Self {
        let archive_path = archive_path.into();
        let checksum_path = checksum_path_for(&archive_path);
        Self::new(local_path, archive_path, checksum_path, label)
    }

    /// Whether the artifact is materialized on disk
    pub fn is_materialized(&self) -> bool {
        self.local_path.exists()
    }

    /// Directory the archive expands into
    pub fn extract_root(&self) -> &Path {
        self.archive_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Whether the archive is older than its checksum file (or missing).
    ///
    /// A checksum bump in source control makes the cached archive stale.
    pub fn archive_is_stale(&self) -> bool {
        let archive = match fs::metadata(&self.archive_path).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => return true,
        };
        match fs::metadata(&self.checksum_path).and_then(|m| m.modified()) {
            Ok(checksum) => archive < checksum,
            Err(_) => false,
        }
    }
}

impl fmt::Display for ArtifactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.local_path.display())
    }
}

/// `<archive>.sha1`
pub fn checksum_path_for(archive_path: &Path) -> PathBuf {
    let mut name = archive_path.as_os_str().to_owned();
    name.push(CHECKSUM_SUFFIX);
    PathBuf::from(name)
}
