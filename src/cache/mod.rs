//! Content-addressed dependency cache with lazy fetch
//!
//! Each artifact is declared by an [`ArtifactDescriptor`]: a local path, the
//! archive it expands from, and a checksum file kept in source control. The
//! checksum is both the integrity check and the key into the remote store.
//!
//! # Lifecycle
//!
//! | State | On disk | `ensure` does |
//! |-------|---------|---------------|
//! | Absent | checksum file only | download, verify, expand |
//! | Present | local path exists | nothing |
//! | Stale (timestamp policy) | archive older than checksum file | refetch |
//!
//! Cache state is the filesystem itself; there is no manifest. Nothing here
//! takes a lock, so two concurrent runs against one cache root may both
//! fetch the same artifact.

pub mod checksum;
pub mod descriptor;
pub mod extract;
pub mod journal;
pub mod manager;
pub mod store;

pub use checksum::{Algorithm, Checksum};
pub use descriptor::{checksum_path_for, ArtifactDescriptor};
pub use journal::FetchJournal;
pub use manager::{CacheManager, EnsureOutcome, EnsureReport, PresencePolicy};
pub use store::{store_from_url, DirectoryStore, HttpStore, RemoteStore, StoreError};
