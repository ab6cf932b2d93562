//! Render backend trait for format-specific output.
//!
//! The [`Renderer`](crate::Renderer) walks calls and keeps list state; the
//! backend decides what each element looks like in its output format.

/// Inline formatting kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Strong,
    Emphasis,
    Underline,
    Monospace,
}

/// Backend trait for format-specific rendering operations.
pub trait RenderBackend {
    /// Output format name, used as cache bucket and in logs.
    const FORMAT: &'static str;

    fn document_start(_out: &mut String) {}

    fn document_end(_out: &mut String) {}

    fn paragraph_open(out: &mut String);

    fn paragraph_close(out: &mut String);

    /// Render a section header. `level` is 1 (largest) to 5.
    fn header(text: &str, level: u8, out: &mut String);

    fn hr(out: &mut String);

    fn linebreak(out: &mut String);

    /// Open a list. `level` is the nesting level, starting at 1.
    fn list_open(ordered: bool, level: usize, out: &mut String);

    fn list_close(ordered: bool, level: usize, out: &mut String);

    fn listitem_open(ordered: bool, level: u8, out: &mut String);

    fn listitem_close(_out: &mut String) {}

    fn listcontent_open(_out: &mut String) {}

    fn listcontent_close(_out: &mut String) {}

    fn format_open(format: Format, out: &mut String);

    fn format_close(format: Format, out: &mut String);

    /// Render literal text.
    fn cdata(text: &str, out: &mut String);

    /// Render verbatim text. Defaults to [`cdata`](Self::cdata).
    fn unformatted(text: &str, out: &mut String) {
        Self::cdata(text, out);
    }
}
