//! Diagnostic formatting for the Basalt CLI
//!
//! ANSI color support with TTY auto-detection and a one-line header style
//! for terminal error reports.

/// ANSI color codes for terminal output
#[derive(Debug, Clone)]
pub struct Colors {
    pub enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn red(&self) -> &'static str {
        if self.enabled { "\x1b[31m" } else { "" }
    }

    pub fn bold(&self) -> &'static str {
        if self.enabled { "\x1b[1m" } else { "" }
    }

    pub fn dim(&self) -> &'static str {
        if self.enabled { "\x1b[2m" } else { "" }
    }

    pub fn reset(&self) -> &'static str {
        if self.enabled { "\x1b[0m" } else { "" }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Format a terminal diagnostic: a dashed header naming the error kind and
/// the offending file, followed by the message.
pub fn format_diagnostic(
    kind: &str,
    message: &str,
    filename: Option<&str>,
    colors: &Colors,
) -> String {
    let title = kind.to_uppercase();
    let location = filename.unwrap_or("");

    // Pad the header to a fixed width, Elm style.
    let used = 4 + title.len() + 1 + location.len();
    let dashes = "-".repeat(80usize.saturating_sub(used).max(1));

    format!(
        "{}{}-- {} {} {}{}\n\n{}\n",
        colors.red(),
        colors.bold(),
        title,
        dashes,
        location,
        colors.reset(),
        message
    )
}
