//! Terminal output for the wrapper's own status lines
//!
//! Everything here writes to stderr so the forwarded tool owns stdout.
//! Interactive terminals get colors and progress bars; CI and pipes get
//! plain bracketed prefixes.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{running, step_error, step_info, step_ok};
pub use progress::FetchProgress;
