//! Plain text backend.

use crate::backend::{Format, RenderBackend};

/// Plain text render backend.
///
/// Drops inline formatting, keeps block structure as blank lines and list
/// items as indented bullets.
pub struct TextBackend;

impl RenderBackend for TextBackend {
    const FORMAT: &'static str = "text";

    fn paragraph_open(_out: &mut String) {}

    fn paragraph_close(out: &mut String) {
        out.push_str("\n\n");
    }

    fn header(text: &str, _level: u8, out: &mut String) {
        out.push_str(text);
        out.push_str("\n\n");
    }

    fn hr(out: &mut String) {
        out.push_str("----\n\n");
    }

    fn linebreak(out: &mut String) {
        out.push('\n');
    }

    fn list_open(_ordered: bool, _level: usize, _out: &mut String) {}

    fn list_close(_ordered: bool, level: usize, out: &mut String) {
        if level == 1 {
            out.push('\n');
        }
    }

    fn listitem_open(ordered: bool, level: u8, out: &mut String) {
        for _ in 0..level {
            out.push_str("  ");
        }
        out.push_str(if ordered { "- " } else { "* " });
    }

    fn listcontent_close(out: &mut String) {
        out.push('\n');
    }

    fn format_open(_format: Format, _out: &mut String) {}

    fn format_close(_format: Format, _out: &mut String) {}

    fn cdata(text: &str, out: &mut String) {
        out.push_str(text);
    }
}
