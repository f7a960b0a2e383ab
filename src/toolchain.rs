//! Pinned toolchain layout
//!
//! Declares which artifacts must be materialized before Gradle runs and
//! where they live under the repository's third-party directory:
//!
//! ```text
//! third_party/
//!   gradle.tar.gz.sha1          -> gradle/bin/gradle
//!   openjdk/jdk-21/linux.tar.gz.sha1 -> openjdk/jdk-21/linux/
//!   protoc.tar.gz.sha1          -> protoc/
//! ```

use crate::cache::ArtifactDescriptor;
use crate::config::Config;
use crate::error::{PinError, PinResult};
use std::path::{Path, PathBuf};

pub const GRADLE_LABEL: &str = "Gradle binary";
pub const PROTOC_LABEL: &str = "Proto Compiler";

const ARCHIVE_EXT: &str = ".tar.gz";

/// Host platform, which selects the JDK build and launcher script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
}

impl Platform {
    /// Detect the current platform
    pub fn detect() -> PinResult<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS` value to a platform
    pub fn from_os(os: &str) -> PinResult<Self> {
        match os {
            "linux" => Ok(Platform::Linux),
            "macos" => Ok(Platform::MacOS),
            "windows" => Ok(Platform::Windows),
            other => Err(PinError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Directory name of this platform's JDK build
    pub fn jdk_dir(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOS => "osx",
            Platform::Windows => "windows",
        }
    }

    fn gradle_launcher(&self) -> &'static str {
        match self {
            Platform::Windows => "gradle.bat",
            _ => "gradle",
        }
    }
}

/// The pinned dependencies of one repository checkout
#[derive(Debug, Clone)]
pub struct Toolchain {
    third_party: PathBuf,
    platform: Platform,
    jdks: Vec<String>,
    default_jdk: String,
}

impl Toolchain {
    /// The default JDK is always fetched, appended after `jdks` when it is
    /// not listed there.
    pub fn new(
        third_party: impl Into<PathBuf>,
        platform: Platform,
        mut jdks: Vec<String>,
        default_jdk: impl Into<String>,
    ) -> Self {
        let default_jdk = default_jdk.into();
        if !jdks.contains(&default_jdk) {
            jdks.push(default_jdk.clone());
        }
        Self {
            third_party: third_party.into(),
            platform,
            jdks,
            default_jdk,
        }
    }

    /// Build the toolchain for a checkout rooted at `repo_root`
    pub fn from_config(repo_root: &Path, config: &Config, platform: Platform) -> Self {
        Self::new(
            repo_root.join(&config.cache.third_party),
            platform,
            config.jdk.variants.clone(),
            config.jdk.default.clone(),
        )
    }

    pub fn third_party(&self) -> &Path {
        &self.third_party
    }

    /// Launcher script of the pinned Gradle
    pub fn gradle_binary(&self) -> PathBuf {
        self.third_party
            .join("gradle")
            .join("bin")
            .join(self.platform.gradle_launcher())
    }

    pub fn gradle(&self) -> ArtifactDescriptor {
        ArtifactDescriptor::from_archive(
            self.gradle_binary(),
            self.third_party.join(format!("gradle{}", ARCHIVE_EXT)),
            GRADLE_LABEL,
        )
    }

    /// Root of a JDK variant for this platform
    pub fn jdk_root(&self, variant: &str) -> PathBuf {
        self.third_party
            .join("openjdk")
            .join(variant)
            .join(self.platform.jdk_dir())
    }

    /// `JAVA_HOME` for a JDK variant
    pub fn jdk_home_for(&self, variant: &str) -> PathBuf {
        let root = self.jdk_root(variant);
        match self.platform {
            Platform::MacOS => root.join("Contents").join("Home"),
            _ => root,
        }
    }

    /// `JAVA_HOME` of the JDK Gradle runs on
    pub fn jdk_home(&self) -> PathBuf {
        self.jdk_home_for(&self.default_jdk)
    }

    pub fn jdks(&self) -> Vec<ArtifactDescriptor> {
        self.jdks
            .iter()
            .map(|variant| {
                let root = self.jdk_root(variant);
                let mut archive = root.clone().into_os_string();
                archive.push(ARCHIVE_EXT);
                let label = root.display().to_string();
                ArtifactDescriptor::from_archive(root, archive, label)
            })
            .collect()
    }

    pub fn protoc(&self) -> ArtifactDescriptor {
        ArtifactDescriptor::from_archive(
            self.third_party.join("protoc"),
            self.third_party.join(format!("protoc{}", ARCHIVE_EXT)),
            PROTOC_LABEL,
        )
    }

    /// Every artifact in the order it is ensured: Gradle, each JDK, protoc
    pub fn descriptors(&self) -> Vec<ArtifactDescriptor> {
        let mut all = vec![self.gradle()];
        all.extend(self.jdks());
        all.push(self.protoc());
        all
    }
}
