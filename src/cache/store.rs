//! Remote content store
//!
//! Objects are addressed by the hex digest from their checksum descriptor.
//! Two backends are provided:
//! - `HttpStore`: `GET <base_url>/<digest>` against a public bucket
//! - `DirectoryStore`: `<dir>/<digest>` on a local or mounted mirror

use crate::cache::checksum::Checksum;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default store holding the pinned dependencies
pub const DEFAULT_STORE_URL: &str = "https://storage.googleapis.com/r8-deps";

const USER_AGENT_STRING: &str = concat!("gradle-pin/", env!("CARGO_PKG_VERSION"));

/// Failure to open an object in the store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("object not found")]
    NotFound,

    #[error("{0}")]
    Transport(String),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An object being streamed out of the store
pub struct RemoteObject {
    /// Object contents
    pub reader: Box<dyn Read>,
    /// Size in bytes, when the store reports it
    pub size: Option<u64>,
}

impl fmt::Debug for RemoteObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteObject")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// A content store keyed by checksum
pub trait RemoteStore {
    /// Open the object whose content hashes to `checksum`
    fn open(&self, checksum: &Checksum) -> Result<RemoteObject, StoreError>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}

/// Store served over HTTP(S)
pub struct HttpStore {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpStore {
    /// Create a store rooted at `base_url`.
    ///
    /// Without a timeout a stalled transfer blocks indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build();
        Self {
            agent: config.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of the object for a checksum
    pub fn object_url(&self, checksum: &Checksum) -> String {
        format!("{}/{}", self.base_url, checksum.as_hex())
    }
}

impl RemoteStore for HttpStore {
    fn open(&self, checksum: &Checksum) -> Result<RemoteObject, StoreError> {
        let url = self.object_url(checksum);
        debug!("GET {}", url);

        match self
            .agent
            .get(&url)
            .header("User-Agent", USER_AGENT_STRING)
            .call()
        {
            Ok(response) => {
                let size = response.body().content_length();
                debug!("Received {} for {} ({:?} bytes)", response.status(), url, size);
                Ok(RemoteObject {
                    reader: Box::new(response.into_body().into_reader()),
                    size,
                })
            }
            Err(ureq::Error::StatusCode(404)) => Err(StoreError::NotFound),
            Err(e) => Err(StoreError::Transport(format!("GET {}: {}", url, e))),
        }
    }

    fn location(&self) -> String {
        self.base_url.clone()
    }
}

/// Store backed by a directory of digest-named files
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RemoteStore for DirectoryStore {
    fn open(&self, checksum: &Checksum) -> Result<RemoteObject, StoreError> {
        let path = self.root.join(checksum.as_hex());
        debug!("Opening mirror object {}", path.display());

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        let size = file.metadata().ok().map(|m| m.len());

        Ok(RemoteObject {
            reader: Box::new(file),
            size,
        })
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Pick a store implementation for a configured URL.
///
/// `http://` and `https://` URLs use `HttpStore`; `file://` URLs and bare
/// paths use `DirectoryStore`.
pub fn store_from_url(url: &str, timeout: Option<Duration>) -> Box<dyn RemoteStore> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Box::new(HttpStore::new(url, timeout))
    } else {
        let path = url.strip_prefix("file://").unwrap_or(url);
        Box::new(DirectoryStore::new(path))
    }
}
