//! Section headers: `====== Title ======` (six `=` is level 1, two is level 5).

use crate::MarkupError;
use crate::call::CallKind;
use crate::handler::Handler;
use crate::lexer::{LexPattern, Lexer, LexerState};

use super::{ModeType, SyntaxMode};

pub struct HeaderMode;

impl SyntaxMode for HeaderMode {
    fn name(&self) -> &'static str {
        "header"
    }

    fn mode_type(&self) -> ModeType {
        ModeType::BaseOnly
    }

    fn sort(&self) -> u32 {
        50
    }

    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_special_pattern(
            LexPattern::new(r"(?m)[ \t]*={2,}[^\n]+={2,}[ \t]*$")?,
            mode,
            self.name(),
        );
        Ok(())
    }

    fn handle(&self, text: &str, state: LexerState, pos: usize, handler: &mut Handler) {
        if state != LexerState::Special {
            return;
        }
        let (text, level) = parse_header(text);
        handler.add_call(CallKind::Header { text, level }, pos);
    }
}

/// Split a header match into its title and level.
fn parse_header(source: &str) -> (String, u8) {
    let source = source.trim();
    let marks = source.chars().take_while(|&c| c == '=').count();
    let level = u8::try_from(7_usize.saturating_sub(marks).max(1)).unwrap_or(1);
    let title = source.trim_matches('=').trim();
    (title.to_owned(), level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_levels() {
        assert_eq!(parse_header("====== Top ======"), ("Top".to_owned(), 1));
        assert_eq!(parse_header("  === Mid ===  "), ("Mid".to_owned(), 4));
        assert_eq!(parse_header("== Low =="), ("Low".to_owned(), 5));
        assert_eq!(parse_header("========= Deep ========="), ("Deep".to_owned(), 1));
    }
}
