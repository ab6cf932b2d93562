//! Inline formatting: `**strong**`, `//emphasis//`, `__underline__`,
//! `''monospace''`.

use crate::MarkupError;
use crate::call::CallKind;
use crate::handler::Handler;
use crate::lexer::{LexPattern, Lexer, LexerState};

use super::{ModeType, SyntaxMode};

/// A delimiter-pair formatting mode.
///
/// The opening delimiter only enters the mode when a closing delimiter
/// follows somewhere later in the text.
pub struct FormattingMode {
    name: &'static str,
    delimiter: &'static str,
    sort: u32,
    open: CallKind,
    close: CallKind,
}

impl FormattingMode {
    #[must_use]
    pub fn strong() -> Self {
        Self {
            name: "strong",
            delimiter: r"\*\*",
            sort: 70,
            open: CallKind::StrongOpen,
            close: CallKind::StrongClose,
        }
    }

    #[must_use]
    pub fn emphasis() -> Self {
        Self {
            name: "emphasis",
            delimiter: "//",
            sort: 80,
            open: CallKind::EmphasisOpen,
            close: CallKind::EmphasisClose,
        }
    }

    #[must_use]
    pub fn underline() -> Self {
        Self {
            name: "underline",
            delimiter: "__",
            sort: 90,
            open: CallKind::UnderlineOpen,
            close: CallKind::UnderlineClose,
        }
    }

    #[must_use]
    pub fn monospace() -> Self {
        Self {
            name: "monospace",
            delimiter: "''",
            sort: 100,
            open: CallKind::MonospaceOpen,
            close: CallKind::MonospaceClose,
        }
    }
}

impl SyntaxMode for FormattingMode {
    fn name(&self) -> &'static str {
        self.name
    }

    fn mode_type(&self) -> ModeType {
        ModeType::Formatting
    }

    fn sort(&self) -> u32 {
        self.sort
    }

    fn allowed_types(&self) -> &'static [ModeType] {
        &[ModeType::Formatting, ModeType::Substitution, ModeType::Disabled]
    }

    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError> {
        let entry = LexPattern::new(self.delimiter)?.requiring(self.delimiter)?;
        lexer.add_entry_pattern(entry, mode, self.name);
        Ok(())
    }

    fn post_connect(&self, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_exit_pattern(LexPattern::new(self.delimiter)?, self.name);
        Ok(())
    }

    fn handle(&self, text: &str, state: LexerState, pos: usize, handler: &mut Handler) {
        match state {
            LexerState::Enter => handler.add_call(self.open.clone(), pos),
            LexerState::Exit => handler.add_call(self.close.clone(), pos),
            LexerState::Unmatched => handler.add_call(CallKind::Cdata(text.to_owned()), pos),
            LexerState::Matched | LexerState::Special => {}
        }
    }
}
