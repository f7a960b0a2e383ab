//! Default command - ensure pinned dependencies, then run Gradle

use crate::cache::{store_from_url, CacheManager, FetchJournal};
use crate::cli::args::Cli;
use crate::config::{Config, ConfigManager};
use crate::env::{capture, resolve_invocation_environment};
use crate::error::PinResult;
use crate::forward::{FailurePolicy, ForwardFlags, Forwarder};
use crate::toolchain::{Platform, Toolchain};
use crate::ui::{self, UiContext};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the checkout lives and which repository-local config applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    /// Absolute repository root
    pub root: PathBuf,
    /// `.gradle-pin.toml` found at or above the search start
    pub local_config: Option<PathBuf>,
}

/// Resolve the repository root against `cwd`.
///
/// An explicit root (relative ones are taken from `cwd`) is used as given
/// and is where the local config search starts. Otherwise the search starts
/// at `cwd` and the directory holding the config becomes the root.
pub fn locate_repo(cwd: &Path, requested: Option<&Path>) -> RepoLocation {
    match requested {
        Some(root) => {
            let root = cwd.join(root);
            let local_config = ConfigManager::find_local_config(&root);
            RepoLocation { root, local_config }
        }
        None => {
            let local_config = ConfigManager::find_local_config(cwd);
            let root = local_config
                .as_deref()
                .and_then(Path::parent)
                .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
            RepoLocation { root, local_config }
        }
    }
}

/// Build the cache manager described by `config`
pub fn cache_manager(config: &Config, ui: UiContext) -> CacheManager {
    let store = store_from_url(&config.store.url, config.store.timeout());
    debug!("Using remote store {}", store.location());

    let manager = CacheManager::new(store)
        .with_policy(config.cache.policy)
        .with_ui(ui);

    if config.general.fetch_journal {
        manager.with_journal(FetchJournal::new(ConfigManager::fetch_journal_path()))
    } else {
        manager
    }
}

/// Execute the default command and return Gradle's exit code
pub fn execute(cli: &Cli, config: &Config, repo_root: &Path) -> PinResult<i32> {
    let ui = UiContext::detect();
    let platform = Platform::detect()?;
    let toolchain = Toolchain::from_config(repo_root, config, platform);
    debug!(
        "Third-party directory: {}",
        toolchain.third_party().display()
    );

    let report = cache_manager(config, ui.clone()).ensure_all(&toolchain.descriptors())?;
    info!(
        "{} dependencies ready ({} fetched)",
        report.total(),
        report.fetched.len()
    );

    if cli.ensure_only {
        ui::step_ok(
            &ui,
            &format!("{} dependencies ready", report.total()),
        );
        return Ok(0);
    }

    let env = resolve_invocation_environment(
        &capture(),
        &toolchain.jdk_home(),
        &config.gradle.memory_opts,
    )?;

    let flags = ForwardFlags {
        offline: config.gradle.offline,
        settings_file: config.gradle.settings_file.clone(),
    };
    let args = cli.gradle_invocation_args(repo_root, &config.gradle.worktree_user_home);

    Forwarder::new(toolchain.gradle_binary(), env)
        .with_flags(flags)
        .with_ui(ui)
        .run_in(repo_root, &args, FailurePolicy::Tolerate)
}
