//! Syntax modes.
//!
//! A syntax mode contributes lexer patterns and turns the tokens it receives
//! into calls. Modes declare a [`ModeType`] and the types they allow inside
//! themselves; the [`Parser`](crate::Parser) uses that to decide which modes
//! connect into which.

mod eol;
mod formatting;
mod header;
mod hr;
mod linebreak;
mod listblock;
mod unformatted;

pub use eol::EolMode;
pub use formatting::FormattingMode;
pub use header::HeaderMode;
pub use hr::HrMode;
pub use linebreak::LinebreakMode;
pub use listblock::{ListWriter, ListblockMode};
pub use unformatted::UnformattedMode;

use crate::handler::Handler;
use crate::ifvar::IfvarMode;
use crate::lexer::{Lexer, LexerState};
use crate::MarkupError;

/// Category of a syntax mode, used for nesting rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeType {
    /// Block containers (lists, rules, conditionals).
    Container,
    /// Only allowed at the top level (headers).
    BaseOnly,
    /// Inline formatting (strong, emphasis, ...).
    Formatting,
    /// Inline replacements (line breaks).
    Substitution,
    /// Content shown verbatim.
    Protected,
    /// Content with markup switched off.
    Disabled,
    /// Paragraph structure (line ends).
    Paragraphs,
}

impl ModeType {
    /// Every mode type, as allowed by the base mode.
    pub const ALL: &'static [ModeType] = &[
        Self::Container,
        Self::BaseOnly,
        Self::Formatting,
        Self::Substitution,
        Self::Protected,
        Self::Disabled,
        Self::Paragraphs,
    ];
}

/// A syntax construct known to the parser.
pub trait SyntaxMode {
    /// Unique mode name used by the lexer.
    fn name(&self) -> &'static str;

    fn mode_type(&self) -> ModeType;

    /// Connection order; lower sorts connect first and win ties between
    /// patterns matching at the same position.
    fn sort(&self) -> u32;

    /// Mode types allowed inside this mode. Empty for leaf modes.
    fn allowed_types(&self) -> &'static [ModeType] {
        &[]
    }

    /// Whether `mode` may appear inside this mode.
    fn accepts(&self, mode: &dyn SyntaxMode) -> bool {
        accepts_by_type(self.name(), self.allowed_types(), mode)
    }

    /// Register the patterns that enter this mode (or match it) from `mode`.
    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError>;

    /// Register patterns that only need adding once, after all modes are
    /// connected (typically exit patterns).
    fn post_connect(&self, _lexer: &mut Lexer) -> Result<(), MarkupError> {
        Ok(())
    }

    /// Turn a token into calls.
    fn handle(&self, text: &str, state: LexerState, pos: usize, handler: &mut Handler);
}

/// Default nesting rule: the mode's type is allowed and it is not the mode
/// itself.
pub fn accepts_by_type(name: &str, allowed: &[ModeType], mode: &dyn SyntaxMode) -> bool {
    mode.name() != name && allowed.contains(&mode.mode_type())
}

/// The built-in modes, including the conditional block.
#[must_use]
pub fn default_modes() -> Vec<Box<dyn SyntaxMode>> {
    vec![
        Box::new(ListblockMode),
        Box::new(HeaderMode),
        Box::new(FormattingMode::strong()),
        Box::new(FormattingMode::emphasis()),
        Box::new(FormattingMode::underline()),
        Box::new(FormattingMode::monospace()),
        Box::new(LinebreakMode),
        Box::new(HrMode),
        Box::new(UnformattedMode),
        Box::new(IfvarMode),
        Box::new(EolMode),
    ]
}
