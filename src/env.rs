//! Environment for the forwarded build tool
//!
//! The environment is built fresh for each invocation from a snapshot of the
//! caller's variables. Nothing here reads or writes the process environment.

use crate::error::{PinError, PinResult};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

/// Ordered environment variable map
pub type EnvMap = BTreeMap<String, String>;

pub const JAVA_HOME: &str = "JAVA_HOME";
pub const PATH: &str = "PATH";
pub const GRADLE_OPTS: &str = "GRADLE_OPTS";

/// Default heap limit for the Gradle client
pub const DEFAULT_MEMORY_OPTS: &str = "-Xmx1g";

/// Snapshot the current process environment.
///
/// Variables that are not valid Unicode are skipped.
pub fn capture() -> EnvMap {
    env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Derive the environment for a build-tool invocation.
///
/// Returns a new map with `JAVA_HOME` pointing at `jdk_home`, the JDK's
/// `bin` directory prepended to `PATH`, and `GRADLE_OPTS` set to
/// `memory_opts`. `base` is left untouched.
pub fn resolve_invocation_environment(
    base: &EnvMap,
    jdk_home: &Path,
    memory_opts: &str,
) -> PinResult<EnvMap> {
    let mut derived = base.clone();

    let mut search_path: Vec<PathBuf> = vec![jdk_home.join("bin")];
    if let Some(existing) = base.get(PATH) {
        search_path.extend(env::split_paths(existing));
    }
    let joined = env::join_paths(&search_path).map_err(|e| PinError::ConfigInvalid {
        path: jdk_home.to_path_buf(),
        reason: format!("cannot be placed on {}: {}", PATH, e),
    })?;

    derived.insert(JAVA_HOME.to_string(), jdk_home.display().to_string());
    derived.insert(PATH.to_string(), joined.to_string_lossy().into_owned());
    derived.insert(GRADLE_OPTS.to_string(), memory_opts.to_string());

    Ok(derived)
}
