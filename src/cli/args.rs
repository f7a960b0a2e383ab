//! CLI argument definitions using clap derive
//!
//! gradle-pin sits in front of Gradle, so it only claims the flags it knows
//! and hands everything else to Gradle untouched. [`split_known_args`] does
//! that split before clap sees the wrapper half. Gradle's own short flags
//! (`-v`, `-V`, `-q`, ...) are never claimed.

use clap::{ArgAction, Parser};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Fetch pinned Gradle, JDKs and protoc, then run Gradle
///
/// Unrecognized arguments are passed to Gradle in order. Everything after a
/// literal `--` is passed through as well.
#[derive(Parser, Debug, Default)]
#[command(name = "gradle-pin")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(override_usage = "gradle-pin [OPTIONS] [GRADLE ARGS]...")]
pub struct Cli {
    /// Increase wrapper log verbosity (once for info, twice for debug)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(long, env = "GRADLE_PIN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Repository root (defaults to the directory holding .gradle-pin.toml)
    #[arg(long, env = "GRADLE_PIN_REPO_ROOT", value_name = "PATH")]
    pub repo_root: Option<PathBuf>,

    /// Fetch dependencies and exit without running Gradle
    #[arg(long, alias = "ensure_only")]
    pub ensure_only: bool,

    /// Build without internalized dependencies
    #[arg(long, alias = "exclude_deps")]
    pub exclude_deps: bool,

    /// Do not build with support for internal tests
    #[arg(long, alias = "no_internal")]
    pub no_internal: bool,

    /// Use a custom JDK to run Gradle
    #[arg(long, alias = "java_home", value_name = "PATH")]
    pub java_home: Option<PathBuf>,

    /// Use a Gradle user home inside the repository (avoids cache lockups
    /// when running from a worktree)
    #[arg(long)]
    pub worktree: bool,

    /// Arguments passed through to Gradle
    #[arg(skip)]
    pub gradle_args: Vec<OsString>,
}

/// Wrapper flags taking a value, as `--flag value` or `--flag=value`
const VALUE_FLAGS: &[&str] = &["--config", "--repo-root", "--java-home", "--java_home"];

/// Wrapper flags without a value
const SWITCH_FLAGS: &[&str] = &[
    "--verbose",
    "--ensure-only",
    "--ensure_only",
    "--exclude-deps",
    "--exclude_deps",
    "--no-internal",
    "--no_internal",
    "--worktree",
    "-h",
    "--help",
];

enum Claim {
    Value { inline: bool },
    Switch,
}

/// Which wrapper flag, if any, `arg` is. Arguments that are not valid
/// Unicode are never wrapper flags.
fn claim(arg: &OsStr) -> Option<Claim> {
    let arg = arg.to_str()?;
    let name = arg.split_once('=').map_or(arg, |(name, _)| name);
    if VALUE_FLAGS.contains(&name) {
        Some(Claim::Value {
            inline: name.len() < arg.len(),
        })
    } else if SWITCH_FLAGS.contains(&arg) {
        Some(Claim::Switch)
    } else {
        None
    }
}

/// Split a command line (without the program name) into wrapper flags and
/// pass-through arguments.
///
/// Both halves keep their relative order and their exact bytes. A value
/// flag at the end of the line stays on the wrapper side so clap can report
/// the missing value. The first `--` ends recognition and is itself dropped.
pub fn split_known_args<I, S>(args: I) -> (Vec<OsString>, Vec<OsString>)
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut known = Vec::new();
    let mut rest = Vec::new();
    let mut iter = args.into_iter().map(Into::into);

    while let Some(arg) = iter.next() {
        if arg == "--" {
            rest.extend(iter.by_ref());
            break;
        }

        match claim(&arg) {
            Some(Claim::Value { inline }) => {
                known.push(arg);
                if !inline {
                    known.extend(iter.next());
                }
            }
            Some(Claim::Switch) => known.push(arg),
            None => rest.push(arg),
        }
    }

    (known, rest)
}

impl Cli {
    /// Parse the process command line, exiting on usage errors
    pub fn parse_known() -> Self {
        Self::try_parse_known_from(std::env::args_os().skip(1)).unwrap_or_else(|e| e.exit())
    }

    /// Parse a command line without the program name
    pub fn try_parse_known_from<I, S>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let (known, rest) = split_known_args(args);
        let argv = std::iter::once(OsString::from("gradle-pin")).chain(known);

        let mut cli = Self::try_parse_from(argv)?;
        cli.gradle_args = rest;
        Ok(cli)
    }

    /// Gradle arguments: the pass-through arguments followed by the ones
    /// derived from wrapper flags.
    ///
    /// Derived arguments are appended in a fixed order: java home, internal
    /// support, dependency exclusion, worktree user home.
    pub fn gradle_invocation_args(&self, repo_root: &Path, user_home: &Path) -> Vec<OsString> {
        let mut args = self.gradle_args.clone();
        if let Some(ref java_home) = self.java_home {
            args.push(prefixed("-Dorg.gradle.java.home=", java_home));
        }
        if self.no_internal {
            args.push(OsString::from("-Pno_internal"));
        }
        if self.exclude_deps {
            args.push(OsString::from("-Pexclude_deps"));
        }
        if self.worktree {
            args.push(prefixed("-g=", &repo_root.join(user_home)));
        }
        args
    }
}

fn prefixed(prefix: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(path);
    arg
}
