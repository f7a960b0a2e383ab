//! Checksum descriptors and archive verification
//!
//! A descriptor file holds exactly one hex digest. The digest length selects
//! the algorithm: 40 hex chars is SHA-1 (the `.sha1` convention of the
//! remote store), 64 hex chars is SHA-256.

use crate::error::{PinError, PinResult};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::debug;

/// Digest algorithm of a checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha1,
    Sha256,
}

impl Algorithm {
    /// Infer the algorithm from a hex digest length
    fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "sha1"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Expected content hash of an archive, also the key into the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    algorithm: Algorithm,
    hex: String,
}

impl Checksum {
    /// Parse a digest from descriptor contents
    pub fn parse(contents: &str) -> Result<Self, String> {
        let mut tokens = contents.split_whitespace();
        let digest = tokens.next().ok_or_else(|| "empty file".to_string())?;
        if tokens.next().is_some() {
            return Err("expected exactly one digest".to_string());
        }

        if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("'{}' is not a hex digest", digest));
        }

        let algorithm = Algorithm::from_hex_len(digest.len())
            .ok_or_else(|| format!("unsupported digest length {}", digest.len()))?;

        Ok(Self {
            algorithm,
            hex: digest.to_ascii_lowercase(),
        })
    }

    /// Read the digest from a checksum descriptor file
    pub fn read(path: &Path) -> PinResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            PinError::io(format!("reading checksum file {}", path.display()), e)
        })?;

        Self::parse(&contents).map_err(|reason| PinError::ChecksumInvalid {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Lowercase hex digest
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// Hash a file with this checksum's algorithm, returning the hex digest
    pub fn digest_file(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let (digest, bytes) = match self.algorithm {
            Algorithm::Sha1 => {
                let mut hasher = Sha1::new();
                let bytes = io::copy(&mut file, &mut hasher)?;
                (hex::encode(hasher.finalize()), bytes)
            }
            Algorithm::Sha256 => {
                let mut hasher = Sha256::new();
                let bytes = io::copy(&mut file, &mut hasher)?;
                (hex::encode(hasher.finalize()), bytes)
            }
        };
        debug!(
            "Calculated {} {} ({} bytes read) for {}",
            self.algorithm,
            digest,
            bytes,
            path.display()
        );
        Ok(digest)
    }

    /// Check whether a file matches this checksum.
    ///
    /// Returns the actual digest on mismatch.
    pub fn verify_file(&self, path: &Path) -> io::Result<Result<(), String>> {
        let actual = self.digest_file(path)?;
        if actual.eq_ignore_ascii_case(&self.hex) {
            Ok(Ok(()))
        } else {
            Ok(Err(actual))
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}
