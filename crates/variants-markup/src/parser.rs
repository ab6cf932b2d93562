//! Parser: wires syntax modes into a lexer and turns text into calls.

use crate::MarkupError;
use crate::call::{Call, CallKind};
use crate::handler::Handler;
use crate::lexer::Lexer;
use crate::modes::{SyntaxMode, default_modes};

/// Name of the bottom lexer mode.
pub const BASE_MODE: &str = "base";

/// Markup parser.
///
/// Construction compiles every pattern once; [`parse`](Self::parse) can then
/// be called for any number of documents.
///
/// # Example
///
/// ```
/// use variants_markup::{CallKind, Parser};
///
/// let parser = Parser::new().unwrap();
/// let calls = parser.parse("Hello **world**");
/// assert_eq!(calls.first().map(|c| &c.kind), Some(&CallKind::DocumentStart));
/// assert!(calls.iter().any(|c| c.kind == CallKind::StrongOpen));
/// ```
pub struct Parser {
    lexer: Lexer,
    modes: Vec<Box<dyn SyntaxMode>>,
}

impl Parser {
    /// Parser with the built-in modes.
    pub fn new() -> Result<Self, MarkupError> {
        Self::with_modes(default_modes())
    }

    /// Parser with a custom set of modes.
    ///
    /// Modes connect in ascending [`sort`](SyntaxMode::sort) order: each
    /// mode is reachable from the base mode and from every mode that
    /// [`accepts`](SyntaxMode::accepts) it.
    pub fn with_modes(mut modes: Vec<Box<dyn SyntaxMode>>) -> Result<Self, MarkupError> {
        modes.sort_by_key(|mode| mode.sort());
        for (i, mode) in modes.iter().enumerate() {
            if modes[..i].iter().any(|other| other.name() == mode.name()) {
                return Err(MarkupError::DuplicateMode(mode.name().to_owned()));
            }
        }

        let mut lexer = Lexer::new(BASE_MODE);
        for mode in &modes {
            mode.connect_to(BASE_MODE, &mut lexer)?;
            for host in &modes {
                if host.accepts(mode.as_ref()) {
                    mode.connect_to(host.name(), &mut lexer)?;
                }
            }
        }
        for mode in &modes {
            mode.post_connect(&mut lexer)?;
        }

        tracing::debug!(
            modes = modes.len(),
            base_patterns = lexer.pattern_count(BASE_MODE),
            "Connected syntax modes"
        );
        Ok(Self { lexer, modes })
    }

    /// Names of the connected modes in connection order.
    pub fn mode_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modes.iter().map(|mode| mode.name())
    }

    /// Parse `text` into a normalized call list.
    ///
    /// Line endings are normalized to `\n` and the text is wrapped in line
    /// ends so that line-anchored patterns also match on the first and last
    /// line. Positions refer to that wrapped text.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<Call> {
        let source = format!("\n{}\n", text.replace("\r\n", "\n"));
        let mut handler = Handler::new();

        self.lexer.parse(&source, |token| {
            match self.modes.iter().find(|mode| mode.name() == token.mode) {
                Some(mode) => mode.handle(token.text, token.state, token.pos, &mut handler),
                None => handler.add_call(CallKind::Cdata(token.text.to_owned()), token.pos),
            }
        });

        handler.finalize()
    }
}
