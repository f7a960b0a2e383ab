//! Archive expansion
//!
//! Archives are `.tar.gz` packages whose top-level entries land in the
//! archive's own directory (`third_party/protoc.tar.gz` holds `protoc/`).
//! Entries are unpacked into a staging directory first and only moved into
//! place once the whole archive has been read, so a corrupt archive never
//! leaves a half-populated artifact behind.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tar::Archive;
use tempfile::TempDir;
use tracing::debug;

const STAGING_PREFIX: &str = ".extract-";

/// Expand `archive` into `dest`, replacing any existing top-level entries
/// with the same names.
///
/// Returns the installed top-level paths.
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dest)?;
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(dest)?;

    unpack_into(archive, &staging)?;
    install_staged(&staging, dest)
}

fn unpack_into(archive: &Path, staging: &TempDir) -> io::Result<()> {
    debug!(
        "Unpacking {} into {}",
        archive.display(),
        staging.path().display()
    );
    let file = File::open(archive)?;
    let mut tar = Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);
    tar.set_overwrite(true);
    tar.unpack(staging.path())
}

fn install_staged(staging: &TempDir, dest: &Path) -> io::Result<Vec<PathBuf>> {
    let mut installed = Vec::new();

    for entry in fs::read_dir(staging.path())? {
        let entry = entry?;
        let target = dest.join(entry.file_name());

        if let Ok(meta) = fs::symlink_metadata(&target) {
            debug!("Replacing existing {}", target.display());
            if meta.is_dir() {
                fs::remove_dir_all(&target)?;
            } else {
                fs::remove_file(&target)?;
            }
        }

        fs::rename(entry.path(), &target)?;
        installed.push(target);
    }

    if installed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "archive contains no entries",
        ));
    }

    installed.sort();
    Ok(installed)
}

/// Build a `.tar.gz` from `(path, contents)` pairs. Test helper shared by
/// the cache tests.
#[cfg(test)]
pub(crate) fn build_tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, path, *contents).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}
