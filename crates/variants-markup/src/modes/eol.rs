//! Line ends.

use crate::MarkupError;
use crate::call::CallKind;
use crate::handler::Handler;
use crate::lexer::{LexPattern, Lexer, LexerState};

use super::{ModeType, SyntaxMode};

/// Emits [`CallKind::Eol`] for every line end; whitespace-only lines
/// collapse into the line end.
pub struct EolMode;

impl SyntaxMode for EolMode {
    fn name(&self) -> &'static str {
        "eol"
    }

    fn mode_type(&self) -> ModeType {
        ModeType::Paragraphs
    }

    fn sort(&self) -> u32 {
        370
    }

    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_special_pattern(LexPattern::new(r"(?m)(?:^[ \t]*)?\n")?, mode, self.name());
        Ok(())
    }

    fn handle(&self, _text: &str, state: LexerState, pos: usize, handler: &mut Handler) {
        if state == LexerState::Special {
            handler.add_call(CallKind::Eol, pos);
        }
    }
}
