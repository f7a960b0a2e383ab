//! Dependency cache manager
//!
//! Guarantees a declared set of artifacts exists locally, fetching from the
//! remote store only when an artifact is absent. Presence is decided from the
//! filesystem alone; see [`PresencePolicy`].

use crate::cache::checksum::Checksum;
use crate::cache::descriptor::ArtifactDescriptor;
use crate::cache::extract::extract_tar_gz;
use crate::cache::journal::FetchJournal;
use crate::cache::store::{RemoteStore, StoreError};
use crate::error::{PinError, PinResult};
use crate::ui::{self, FetchProgress, UiContext};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::time::SystemTime;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// How an already materialized artifact is judged present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresencePolicy {
    /// The local path exists. Materialized artifacts are never re-verified,
    /// so a local copy that drifted from its checksum file goes unnoticed.
    #[default]
    Presence,
    /// The local path exists and the archive is not older than its checksum
    /// file. Bumping a checksum in source control triggers a refetch.
    Timestamp,
}

/// Result of ensuring one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Already on disk, no store access
    Present,
    /// Downloaded, verified and expanded
    Fetched { bytes: u64 },
}

/// Summary of an `ensure_all` run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnsureReport {
    pub present: Vec<String>,
    pub fetched: Vec<String>,
}

impl EnsureReport {
    pub fn total(&self) -> usize {
        self.present.len() + self.fetched.len()
    }
}

/// Materializes artifacts from a remote content store
pub struct CacheManager {
    store: Box<dyn RemoteStore>,
    policy: PresencePolicy,
    journal: Option<FetchJournal>,
    ui: UiContext,
}

impl CacheManager {
    pub fn new(store: Box<dyn RemoteStore>) -> Self {
        Self {
            store,
            policy: PresencePolicy::default(),
            journal: None,
            ui: UiContext::non_interactive(),
        }
    }

    pub fn with_policy(mut self, policy: PresencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_journal(mut self, journal: FetchJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn with_ui(mut self, ui: UiContext) -> Self {
        self.ui = ui;
        self
    }

    /// Whether the artifact counts as present under the configured policy
    pub fn is_present(&self, descriptor: &ArtifactDescriptor) -> bool {
        if !descriptor.is_materialized() {
            return false;
        }
        match self.policy {
            PresencePolicy::Presence => true,
            PresencePolicy::Timestamp => !descriptor.archive_is_stale(),
        }
    }

    /// Make sure one artifact is materialized.
    ///
    /// A present artifact returns immediately without touching the store.
    pub fn ensure(&self, descriptor: &ArtifactDescriptor) -> PinResult<EnsureOutcome> {
        if self.is_present(descriptor) {
            debug!("Ensure dependency: {} present", descriptor);
            return Ok(EnsureOutcome::Present);
        }

        let checksum = Checksum::read(&descriptor.checksum_path)?;
        info!(
            "Fetching {} ({} {}) from {}",
            descriptor.label,
            checksum.algorithm(),
            checksum,
            self.store.location()
        );

        let bytes = self.download(descriptor, &checksum)?;
        self.expand(descriptor)?;
        touch(descriptor);

        if let Some(ref journal) = self.journal {
            journal.record(descriptor, &checksum, bytes);
        }

        Ok(EnsureOutcome::Fetched { bytes })
    }

    /// Ensure every descriptor in order, stopping at the first failure
    pub fn ensure_all(&self, descriptors: &[ArtifactDescriptor]) -> PinResult<EnsureReport> {
        let mut report = EnsureReport::default();

        for descriptor in descriptors {
            match self.ensure(descriptor) {
                Ok(EnsureOutcome::Present) => report.present.push(descriptor.label.clone()),
                Ok(EnsureOutcome::Fetched { .. }) => report.fetched.push(descriptor.label.clone()),
                Err(e) => {
                    ui::step_error(&self.ui, &format!("{}: {}", descriptor.label, e));
                    return Err(e);
                }
            }
        }

        debug!(
            "Dependencies ready: {} present, {} fetched",
            report.present.len(),
            report.fetched.len()
        );
        Ok(report)
    }

    /// Stream the archive into place, verifying it before it becomes visible
    /// at `archive_path`
    fn download(&self, descriptor: &ArtifactDescriptor, checksum: &Checksum) -> PinResult<u64> {
        let dir = descriptor.extract_root();
        fs::create_dir_all(dir)
            .map_err(|e| PinError::io(format!("creating directory {}", dir.display()), e))?;

        let mut object = self.store.open(checksum).map_err(|e| match e {
            StoreError::NotFound => PinError::FetchNotFound {
                label: descriptor.label.clone(),
                checksum: checksum.to_string(),
            },
            other => PinError::FetchTransport {
                label: descriptor.label.clone(),
                reason: other.to_string(),
            },
        })?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
            PinError::io(format!("creating temporary file in {}", dir.display()), e)
        })?;

        let progress = FetchProgress::start(&self.ui, &descriptor.label, object.size);
        let copied = progress
            .copy(&mut object.reader, temp.as_file_mut())
            .and_then(|n| temp.as_file_mut().flush().map(|_| n));
        let bytes = match copied {
            Ok(n) => n,
            Err(e) => {
                progress.abandon();
                return Err(PinError::FetchTransport {
                    label: descriptor.label.clone(),
                    reason: format!("download interrupted: {}", e),
                });
            }
        };

        let verified = checksum.verify_file(temp.path()).map_err(|e| {
            PinError::io(format!("hashing download for {}", descriptor.label), e)
        })?;
        if let Err(actual) = verified {
            progress.abandon();
            return Err(PinError::ChecksumMismatch {
                label: descriptor.label.clone(),
                expected: checksum.to_string(),
                actual,
            });
        }
        progress.finish(&format!("Fetched {} ({} bytes)", descriptor.label, bytes));

        temp.persist(&descriptor.archive_path).map_err(|e| {
            PinError::io(
                format!("moving download to {}", descriptor.archive_path.display()),
                e.error,
            )
        })?;

        Ok(bytes)
    }

    fn expand(&self, descriptor: &ArtifactDescriptor) -> PinResult<()> {
        let installed = extract_tar_gz(&descriptor.archive_path, descriptor.extract_root())
            .map_err(|e| {
                PinError::extract(&descriptor.label, &descriptor.archive_path, e.to_string())
            })?;
        debug!("Installed {:?}", installed);

        if !descriptor.local_path.exists() {
            return Err(PinError::extract(
                &descriptor.label,
                &descriptor.archive_path,
                format!("archive did not produce {}", descriptor.local_path.display()),
            ));
        }
        Ok(())
    }
}

/// Mark the archive as fresh so the timestamp policy does not refetch it
fn touch(descriptor: &ArtifactDescriptor) {
    let result = fs::File::options()
        .write(true)
        .open(&descriptor.archive_path)
        .and_then(|f| f.set_modified(SystemTime::now()));
    if let Err(e) = result {
        debug!(
            "Could not update mtime of {}: {}",
            descriptor.archive_path.display(),
            e
        );
    }
}
