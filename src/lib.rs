//! gradle-pin - pinned Gradle bootstrapper
//!
//! Materializes content-addressed build dependencies (Gradle, JDKs, protoc)
//! from a remote store on first use, then runs Gradle with a derived
//! environment inside a scoped working directory.

pub mod cache;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod forward;
pub mod toolchain;
pub mod ui;

pub use error::{PinError, PinResult};
