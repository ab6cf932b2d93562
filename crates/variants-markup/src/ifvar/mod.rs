//! Conditional blocks: `<ifvar key=value>...<else>...</ifvar>`.
//!
//! The construct is resolved in two phases:
//!
//! 1. **Parse time** ([`IfvarMode`]): the opening tag pushes a
//!    [`ConditionalWriter`] onto the handler's call-writer stack. Everything
//!    parsed until the closing tag, including nested conditionals and other
//!    containers, is captured into the if-branch, or into the else-branch
//!    after `<else>`. On close both branches are block-normalized separately
//!    and replaced by a single [`CallKind::Conditional`](crate::CallKind)
//!    call carrying a [`ConditionalNode`].
//!
//! 2. **Render time** ([`render_conditional`]): the condition is evaluated
//!    against the request variables and exactly one branch is rendered.
//!    Output depending on a conditional is never cacheable.
//!
//! # Example
//!
//! ```
//! use variants_markup::{OutputMode, Parser, Vars, render};
//!
//! let parser = Parser::new().unwrap();
//! let calls = parser.parse("<ifvar lang=de>Hallo<else>Hello</ifvar>");
//!
//! let vars = Vars::from_iter([("lang", "de")]);
//! let result = render(&calls, OutputMode::Text, &vars);
//! assert_eq!(result.output.trim(), "Hallo");
//! assert!(!result.cacheable);
//! ```

mod condition;
mod render;
mod syntax;
mod writer;

pub use condition::{Condition, ConditionError};
pub use render::render_conditional;
pub use syntax::IfvarMode;
pub use writer::ConditionalWriter;

use crate::call::Call;

/// Both branches of one conditional instance plus its raw condition.
///
/// The condition is stored verbatim and re-parsed with
/// [`Condition::parse`] when rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalNode {
    /// Raw condition text from the opening tag (`key=value`, `key!=value`).
    pub condition: String,
    /// Normalized calls rendered when the condition holds.
    pub if_calls: Vec<Call>,
    /// Normalized calls rendered otherwise.
    pub else_calls: Vec<Call>,
}

impl ConditionalNode {
    #[must_use]
    pub fn new(condition: impl Into<String>, if_calls: Vec<Call>, else_calls: Vec<Call>) -> Self {
        Self {
            condition: condition.into(),
            if_calls,
            else_calls,
        }
    }
}
