//! Forced line breaks: `\\` followed by whitespace or a line end.

use crate::MarkupError;
use crate::call::CallKind;
use crate::handler::Handler;
use crate::lexer::{LexPattern, Lexer, LexerState};

use super::{ModeType, SyntaxMode};

pub struct LinebreakMode;

impl SyntaxMode for LinebreakMode {
    fn name(&self) -> &'static str {
        "linebreak"
    }

    fn mode_type(&self) -> ModeType {
        ModeType::Substitution
    }

    fn sort(&self) -> u32 {
        140
    }

    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_special_pattern(LexPattern::new(r"(?m)\\\\(?:[ \t]+|$)")?, mode, self.name());
        Ok(())
    }

    fn handle(&self, _text: &str, state: LexerState, pos: usize, handler: &mut Handler) {
        if state == LexerState::Special {
            handler.add_call(CallKind::Linebreak, pos);
        }
    }
}
