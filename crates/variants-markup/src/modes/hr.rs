//! Horizontal rules: a line of four or more dashes.

use crate::MarkupError;
use crate::call::CallKind;
use crate::handler::Handler;
use crate::lexer::{LexPattern, Lexer, LexerState};

use super::{ModeType, SyntaxMode};

pub struct HrMode;

impl SyntaxMode for HrMode {
    fn name(&self) -> &'static str {
        "hr"
    }

    fn mode_type(&self) -> ModeType {
        ModeType::Container
    }

    fn sort(&self) -> u32 {
        160
    }

    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_special_pattern(LexPattern::new(r"(?m)\n[ \t]*-{4,}[ \t]*$")?, mode, self.name());
        Ok(())
    }

    fn handle(&self, _text: &str, state: LexerState, pos: usize, handler: &mut Handler) {
        if state == LexerState::Special {
            handler.add_call(CallKind::Hr, pos);
        }
    }
}
