//! Forwarding command lines to the build tool
//!
//! The tool runs with a derived environment inside a scoped working
//! directory. The program may be a relative path such as `./gradlew`, which
//! resolves against the process working directory, so the directory change
//! is process-wide and undone on every exit path.

mod scoped;

pub use scoped::{with_working_directory, ScopedWorkingDirectory};

use crate::env::EnvMap;
use crate::error::{PinError, PinResult};
use crate::ui::{self, UiContext};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// What to do when the tool exits non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Non-zero exit becomes `PinError::Invocation`
    Fail,
    /// Non-zero exit code is returned to the caller
    Tolerate,
}

/// Fixed flags appended to fire-and-wait invocations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardFlags {
    /// Append `--offline`
    pub offline: bool,
    /// Append `-c=<settings file>`
    pub settings_file: Option<PathBuf>,
}

impl ForwardFlags {
    fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if self.offline {
            args.push(OsString::from("--offline"));
        }
        if let Some(ref settings) = self.settings_file {
            let mut arg = OsString::from("-c=");
            arg.push(settings);
            args.push(arg);
        }
        args
    }
}

/// Runs the build tool with a prepared environment
#[derive(Debug, Clone)]
pub struct Forwarder {
    program: PathBuf,
    env: EnvMap,
    flags: ForwardFlags,
    ui: UiContext,
}

impl Forwarder {
    /// Create a forwarder for `program`.
    ///
    /// `env` is the complete environment of the child; nothing is inherited
    /// beyond it.
    pub fn new(program: impl Into<PathBuf>, env: EnvMap) -> Self {
        Self {
            program: program.into(),
            env,
            flags: ForwardFlags::default(),
            ui: UiContext::non_interactive(),
        }
    }

    pub fn with_flags(mut self, flags: ForwardFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_ui(mut self, ui: UiContext) -> Self {
        self.ui = ui;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument list for a fire-and-wait run
    pub fn run_args(&self, args: &[OsString]) -> Vec<OsString> {
        let mut full = args.to_vec();
        full.extend(self.flags.to_args());
        full
    }

    /// Run the tool in `working_dir` and wait for it.
    ///
    /// Fixed flags are appended. Returns the exit code; a non-zero code is
    /// an error unless `on_failure` is `FailurePolicy::Tolerate`.
    pub fn run_in(
        &self,
        working_dir: &Path,
        args: &[OsString],
        on_failure: FailurePolicy,
    ) -> PinResult<i32> {
        let args = self.run_args(args);
        let command_line = self.command_line(&args);
        ui::running(&self.ui, &command_line);

        with_working_directory(working_dir, || {
            let status = self
                .command(&args)
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(|e| PinError::command_failed(&command_line, e))?;

            let code = status.code().ok_or(PinError::ProcessSignaled)?;
            debug!("{} exited with {}", command_line, code);

            if code != 0 && on_failure == FailurePolicy::Fail {
                return Err(PinError::Invocation {
                    command: command_line.clone(),
                    code,
                });
            }
            Ok(code)
        })
    }

    /// Run the tool in `working_dir` and return its standard output.
    ///
    /// No fixed flags are appended. Non-zero exit is always an error.
    pub fn output_in(&self, working_dir: &Path, args: &[OsString]) -> PinResult<String> {
        let command_line = self.command_line(args);
        ui::running(&self.ui, &command_line);

        let output: Output = with_working_directory(working_dir, || {
            self.command(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .output()
                .map_err(|e| PinError::command_failed(&command_line, e))
        })?;

        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            Some(code) => Err(PinError::Invocation {
                command: command_line,
                code,
            }),
            None => Err(PinError::ProcessSignaled),
        }
    }

    fn command(&self, args: &[OsString]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).env_clear().envs(&self.env);
        cmd
    }

    /// Lossy rendering of the command for messages
    fn command_line(&self, args: &[OsString]) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(args.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
