//! Command-line interface

pub mod args;
pub mod run;

pub use args::{split_known_args, Cli};
pub use run::{execute, locate_repo, RepoLocation};
