//! Terminal output.
//!
//! Page content goes to stdout. Status messages go to stderr so that
//! rendered output can be piped.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    out: Term,
    term: Term,
    dim: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            term: Term::stderr(),
            dim: Style::new().dim(),
            red: Style::new().red(),
        }
    }

    /// Write rendered content to stdout as is.
    pub(crate) fn content(&self, content: &str) {
        let _ = self.out.write_str(content);
    }

    /// Print a status message (dimmed).
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(&self.dim.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}
