//! Status line formatting

use super::context::UiContext;
use console::style;

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("✓").green(), message);
    } else {
        eprintln!("{} {}", style("[OK]").green(), message);
    }
}

/// Display an info step
pub fn step_info(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("•").cyan(), message);
    } else {
        eprintln!("{} {}", style("[INFO]").cyan(), message);
    }
}

/// Display an error step
pub fn step_error(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("✗").red(), message);
    } else {
        eprintln!("{} {}", style("[FAIL]").red(), message);
    }
}

/// Echo a command line before it runs
pub fn running(ctx: &UiContext, command: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("Running:").bold(), style(command).dim());
    } else {
        eprintln!("Running: {}", command);
    }
}
