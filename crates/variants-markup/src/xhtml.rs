//! XHTML backend.

use crate::backend::{Format, RenderBackend};
use crate::util::escape_html;

/// XHTML render backend.
///
/// All text is escaped; underline is rendered as `<em class="u">`.
pub struct XhtmlBackend;

impl RenderBackend for XhtmlBackend {
    const FORMAT: &'static str = "xhtml";

    fn paragraph_open(out: &mut String) {
        out.push_str("\n<p>\n");
    }

    fn paragraph_close(out: &mut String) {
        out.push_str("\n</p>\n");
    }

    fn header(text: &str, level: u8, out: &mut String) {
        out.push_str(&format!("\n<h{level}>{}</h{level}>\n", escape_html(text)));
    }

    fn hr(out: &mut String) {
        out.push_str("\n<hr />\n");
    }

    fn linebreak(out: &mut String) {
        out.push_str("<br/>\n");
    }

    fn list_open(ordered: bool, _level: usize, out: &mut String) {
        out.push_str(if ordered { "<ol>\n" } else { "<ul>\n" });
    }

    fn list_close(ordered: bool, _level: usize, out: &mut String) {
        out.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }

    fn listitem_open(_ordered: bool, level: u8, out: &mut String) {
        out.push_str(&format!(r#"<li class="level{level}">"#));
    }

    fn listitem_close(out: &mut String) {
        out.push_str("</li>\n");
    }

    fn listcontent_open(out: &mut String) {
        out.push_str(r#"<div class="li">"#);
    }

    fn listcontent_close(out: &mut String) {
        out.push_str("</div>\n");
    }

    fn format_open(format: Format, out: &mut String) {
        out.push_str(match format {
            Format::Strong => "<strong>",
            Format::Emphasis => "<em>",
            Format::Underline => r#"<em class="u">"#,
            Format::Monospace => "<code>",
        });
    }

    fn format_close(format: Format, out: &mut String) {
        out.push_str(match format {
            Format::Strong => "</strong>",
            Format::Emphasis | Format::Underline => "</em>",
            Format::Monospace => "</code>",
        });
    }

    fn cdata(text: &str, out: &mut String) {
        out.push_str(&escape_html(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_escaped() {
        let mut out = String::new();
        XhtmlBackend::header("a < b", 2, &mut out);
        assert_eq!(out, "\n<h2>a &lt; b</h2>\n");
    }

    #[test]
    fn test_underline_closes_as_em() {
        let mut out = String::new();
        XhtmlBackend::format_open(Format::Underline, &mut out);
        XhtmlBackend::cdata("u", &mut out);
        XhtmlBackend::format_close(Format::Underline, &mut out);
        assert_eq!(out, r#"<em class="u">u</em>"#);
    }

    #[test]
    fn test_unformatted_is_escaped() {
        let mut out = String::new();
        XhtmlBackend::unformatted("**<b>**", &mut out);
        assert_eq!(out, "**&lt;b&gt;**");
    }
}
