//! Terminal detection for status output

use std::env;
use std::io::IsTerminal;

/// Variables whose presence marks a CI run
const CI_MARKERS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "JENKINS_URL",
    "TF_BUILD",
];

/// Whether status lines get colors and progress bars
#[derive(Debug, Clone)]
pub struct UiContext {
    fancy: bool,
}

impl UiContext {
    /// Fancy output only when stderr is a terminal outside CI
    pub fn detect() -> Self {
        let in_ci = CI_MARKERS.iter().any(|var| env::var_os(var).is_some());
        Self {
            fancy: std::io::stderr().is_terminal() && !in_ci,
        }
    }

    /// Plain bracketed output, no bars
    pub fn non_interactive() -> Self {
        Self { fancy: false }
    }

    pub fn use_fancy_output(&self) -> bool {
        self.fancy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_plain() {
        assert!(!UiContext::non_interactive().use_fancy_output());
    }
}
