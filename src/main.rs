//! gradle-pin - pinned Gradle bootstrapper
//!
//! CLI entry point: loads configuration, ensures dependencies and forwards
//! to Gradle.

use console::style;
use gradle_pin::cli::{locate_repo, Cli};
use gradle_pin::config::{Config, ConfigManager};
use gradle_pin::error::{PinError, PinResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, config: &Config) {
    // 0 = warn (status lines only), 1 = info, 2+ = debug
    let filter = match verbose {
        0 => EnvFilter::new("gradle_pin=warn"),
        1 => EnvFilter::new("gradle_pin=info"),
        _ => EnvFilter::new("gradle_pin=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run() -> PinResult<i32> {
    let cli = Cli::parse_known();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let cwd = std::env::current_dir().map_err(|e| PinError::io("getting current directory", e))?;
    let location = locate_repo(&cwd, cli.repo_root.as_deref());
    let config = config_manager.load_merged(location.local_config.as_deref())?;

    init_logging(cli.verbose, &config);
    debug!("Global config: {}", config_manager.path().display());
    if let Some(ref path) = location.local_config {
        debug!("Found local config: {}", path.display());
    }
    debug!("Repository root: {}", location.root.display());

    gradle_pin::cli::execute(&cli, &config, &location.root)
}
