//! Download progress with CI fallback

use super::context::UiContext;
use super::output;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::time::Duration;

/// Progress indicator for a single artifact download.
///
/// Shows a byte-counting bar when the size is known, a spinner otherwise,
/// and a single plain line in non-interactive mode.
pub struct FetchProgress {
    bar: Option<ProgressBar>,
    ctx: UiContext,
}

impl FetchProgress {
    /// Start reporting a download of `label`
    pub fn start(ctx: &UiContext, label: &str, size: Option<u64>) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = match size {
                Some(len) => {
                    let bar = ProgressBar::new(len);
                    if let Ok(style) = ProgressStyle::default_bar().template(
                        "  {spinner:.cyan} {prefix}  {bar:24.cyan/dim} {bytes}/{total_bytes} {elapsed:.dim}",
                    ) {
                        bar.set_style(style.progress_chars("━╸─"));
                    }
                    bar
                }
                None => {
                    let bar = ProgressBar::new_spinner();
                    if let Ok(style) =
                        ProgressStyle::default_spinner().template("  {spinner:.cyan} {prefix}  {bytes}")
                    {
                        bar.set_style(style);
                    }
                    bar
                }
            };
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            output::step_info(ctx, &format!("Fetching {}", label));
            None
        };

        Self {
            bar,
            ctx: ctx.clone(),
        }
    }

    /// Copy a download stream into `sink`, advancing the bar as bytes arrive
    pub fn copy(&self, reader: &mut dyn Read, sink: &mut dyn Write) -> io::Result<u64> {
        match self.bar {
            Some(ref bar) => io::copy(&mut bar.wrap_read(reader), sink),
            None => io::copy(reader, sink),
        }
    }

    /// Clear the bar and report success
    pub fn finish(self, message: &str) {
        if let Some(bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
        output::step_ok(&self.ctx, message);
    }

    /// Clear the bar without a success line
    pub fn abandon(self) {
        if let Some(bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_non_interactive() {
        let ctx = UiContext::non_interactive();
        let progress = FetchProgress::start(&ctx, "Proto Compiler", Some(5));

        let mut source: &[u8] = b"hello";
        let mut sink = Vec::new();
        let copied = progress.copy(&mut source, &mut sink).unwrap();
        progress.finish("Fetched Proto Compiler");

        assert_eq!(copied, 5);
        assert_eq!(sink, b"hello");
    }

    #[test]
    fn abandon_non_interactive() {
        let ctx = UiContext::non_interactive();
        let progress = FetchProgress::start(&ctx, "Gradle binary", None);
        progress.abandon();
        // Should not panic
    }
}
