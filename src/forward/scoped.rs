//! Scoped change of the process-wide working directory

use crate::error::{PinError, PinResult};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Changes the process working directory until dropped.
///
/// The previous directory is restored on every exit path, including early
/// returns and unwinding panics.
#[derive(Debug)]
pub struct ScopedWorkingDirectory {
    original: PathBuf,
}

impl ScopedWorkingDirectory {
    /// Enter `dir`, remembering the current directory
    pub fn enter(dir: &Path) -> PinResult<Self> {
        let original =
            env::current_dir().map_err(|e| PinError::io("getting current directory", e))?;
        env::set_current_dir(dir).map_err(|e| {
            PinError::io(format!("changing directory to {}", dir.display()), e)
        })?;
        debug!("Changed working directory to {}", dir.display());
        Ok(Self { original })
    }

    /// Directory that will be restored
    pub fn original(&self) -> &Path {
        &self.original
    }
}

impl Drop for ScopedWorkingDirectory {
    fn drop(&mut self) {
        match env::set_current_dir(&self.original) {
            Ok(()) => debug!("Restored working directory to {}", self.original.display()),
            Err(e) => warn!(
                "Failed to restore working directory to {}: {}",
                self.original.display(),
                e
            ),
        }
    }
}

/// Run `f` with the process working directory set to `dir`
pub fn with_working_directory<T>(
    dir: &Path,
    f: impl FnOnce() -> PinResult<T>,
) -> PinResult<T> {
    let _guard = ScopedWorkingDirectory::enter(dir)?;
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::panic;
    use tempfile::TempDir;

    fn canonical_cwd() -> PathBuf {
        env::current_dir().unwrap().canonicalize().unwrap()
    }

    #[test]
    #[serial]
    fn restores_after_success() {
        let before = env::current_dir().unwrap();
        let dir = TempDir::new().unwrap();

        let seen = with_working_directory(dir.path(), || Ok(canonical_cwd())).unwrap();

        assert_eq!(seen, dir.path().canonicalize().unwrap());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn restores_after_error() {
        let before = env::current_dir().unwrap();
        let dir = TempDir::new().unwrap();

        let result: PinResult<()> =
            with_working_directory(dir.path(), || Err(PinError::ProcessSignaled));

        assert!(result.is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn restores_after_panic() {
        let before = env::current_dir().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let result = panic::catch_unwind(move || {
            let _guard = ScopedWorkingDirectory::enter(&path).unwrap();
            panic!("boom");
        });

        assert!(result.is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn missing_directory_leaves_cwd_alone() {
        let before = env::current_dir().unwrap();
        let dir = TempDir::new().unwrap();

        let err = ScopedWorkingDirectory::enter(&dir.path().join("missing")).unwrap_err();

        assert!(matches!(err, PinError::Io { .. }));
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
