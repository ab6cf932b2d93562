//! Wiki markup pipeline with render-time conditional blocks.
//!
//! Text is tokenized by a mode-stack [`Lexer`], turned into [`Call`]s by the
//! [`SyntaxMode`](modes::SyntaxMode)s wired up by the [`Parser`], normalized
//! into paragraphs and blocks, and finally rendered by a [`Renderer`] with a
//! pluggable [`RenderBackend`].
//!
//! # Conditional blocks
//!
//! ```text
//! <ifvar audience=admin>
//!   * Restart the service from the admin console.
//! <else>
//! Contact your administrator.
//! </ifvar>
//! ```
//!
//! Both branches are parsed once and kept in a single
//! [`CallKind::Conditional`] call. Which branch is shown is decided on every
//! render from the request variables ([`RequestVars`]); output that contains
//! a conditional is reported as not cacheable.
//!
//! # Example
//!
//! ```
//! use variants_markup::{OutputMode, Parser, Vars, render};
//!
//! let parser = Parser::new().unwrap();
//! let calls = parser.parse("<ifvar audience!=admin>Ask an admin.</ifvar>");
//!
//! let guest = render(&calls, OutputMode::Xhtml, &Vars::new());
//! assert!(guest.output.contains("<p>\nAsk an admin.\n</p>"));
//!
//! let admin = Vars::from_iter([("audience", "admin")]);
//! assert_eq!(render(&calls, OutputMode::Xhtml, &admin).output, "");
//! ```

mod backend;
mod block;
mod call;
mod error;
mod handler;
pub mod ifvar;
mod lexer;
pub mod modes;
mod parser;
mod renderer;
mod text;
mod util;
mod vars;
mod xhtml;

pub use backend::{Format, RenderBackend};
pub use block::normalize;
pub use call::{Call, CallKind};
pub use error::MarkupError;
pub use handler::{CallWriter, Handler};
pub use ifvar::{
    Condition, ConditionError, ConditionalNode, ConditionalWriter, IfvarMode, render_conditional,
};
pub use lexer::{LexPattern, Lexer, LexerState, Token};
pub use parser::{BASE_MODE, Parser};
pub use renderer::{NestingRenderer, OutputMode, RenderResult, Renderer, UnknownOutputMode, render};
pub use text::TextBackend;
pub use util::escape_html;
pub use vars::{AssignmentError, RequestVars, Vars, parse_assignment};
pub use xhtml::XhtmlBackend;
