//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escape codes when
//! stdout is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark used in success lines
pub const CHECK: &str = "✓";

/// Cross used in failure lines
pub const CROSS: &str = "✗";

/// Semantic color helpers for anything printable
pub trait Stylize: Display + Sized {
    /// Secondary information
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Headings and titles
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Values worth noticing (handles, URLs)
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Passed checks
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Non-fatal problems
    fn warning(&self) -> String {
        self.yellow().to_string()
    }

    /// Fatal problems
    fn failure(&self) -> String {
        self.red().bold().to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.failure()
}

/// Spinner style shared by long-running steps
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
