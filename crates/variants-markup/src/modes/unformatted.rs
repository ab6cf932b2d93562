//! Unformatted text: `%%...%%` is shown verbatim.

use crate::MarkupError;
use crate::call::CallKind;
use crate::handler::Handler;
use crate::lexer::{LexPattern, Lexer, LexerState};

use super::{ModeType, SyntaxMode};

pub struct UnformattedMode;

impl SyntaxMode for UnformattedMode {
    fn name(&self) -> &'static str {
        "unformatted"
    }

    fn mode_type(&self) -> ModeType {
        ModeType::Protected
    }

    fn sort(&self) -> u32 {
        170
    }

    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_entry_pattern(LexPattern::new("%%")?.requiring("%%")?, mode, self.name());
        Ok(())
    }

    fn post_connect(&self, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_exit_pattern(LexPattern::new("%%")?, self.name());
        Ok(())
    }

    fn handle(&self, text: &str, state: LexerState, pos: usize, handler: &mut Handler) {
        if state == LexerState::Unmatched {
            handler.add_call(CallKind::Unformatted(text.to_owned()), pos);
        }
    }
}
