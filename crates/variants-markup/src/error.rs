//! Markup pipeline errors.

/// Error raised while assembling the parser.
///
/// Parsing itself never fails: malformed markup degrades to literal text.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// A lexer pattern failed to compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        /// The offending pattern source.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
    /// Two syntax modes were registered under the same name.
    #[error("syntax mode `{0}` registered twice")]
    DuplicateMode(String),
}
