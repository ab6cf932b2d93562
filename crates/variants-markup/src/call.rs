//! Parser instructions.
//!
//! A parsed document is a flat list of [`Call`]s. Block structure is encoded
//! with open/close pairs, and the only nested payload is the
//! [`ConditionalNode`] carried by [`CallKind::Conditional`].

use crate::ifvar::ConditionalNode;

/// A single parser instruction with the byte offset it originated from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    /// What the instruction does.
    pub kind: CallKind,
    /// Byte offset into the source text (including the leading newline the
    /// parser prepends).
    pub pos: usize,
}

impl Call {
    /// Create a new call.
    #[must_use]
    pub fn new(kind: CallKind, pos: usize) -> Self {
        Self { kind, pos }
    }
}

/// Instruction variants.
///
/// This is a closed set: render-time behaviour for every variant lives in
/// [`Renderer`](crate::Renderer), including conditional resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "data", rename_all = "snake_case"))]
pub enum CallKind {
    DocumentStart,
    DocumentEnd,
    /// Literal text.
    Cdata(String),
    /// Line end as seen by the lexer. Removed by block normalization.
    Eol,
    Linebreak,
    Hr,
    Header {
        text: String,
        level: u8,
    },
    POpen,
    PClose,
    StrongOpen,
    StrongClose,
    EmphasisOpen,
    EmphasisClose,
    UnderlineOpen,
    UnderlineClose,
    MonospaceOpen,
    MonospaceClose,
    /// Text rendered verbatim, without markup interpretation.
    Unformatted(String),
    /// Raw list start as matched by the lexer (e.g. `"\n  * "`).
    ///
    /// Only seen by the list call-writer, which rewrites it.
    ListMarker(String),
    /// Raw list item start as matched by the lexer.
    ListItemMarker(String),
    /// End of a list block.
    ListEndMarker,
    ListuOpen,
    ListuClose,
    ListoOpen,
    ListoClose,
    /// Opens a list item at the given nesting level (1-based).
    ListitemOpen(u8),
    ListitemClose,
    ListcontentOpen,
    ListcontentClose,
    /// A resolved conditional with both branches, selected at render time.
    Conditional(ConditionalNode),
}

impl CallKind {
    /// Whether this call opens a block whose content must not be wrapped in
    /// paragraphs.
    #[must_use]
    pub fn is_block_open(&self) -> bool {
        matches!(self, Self::ListuOpen | Self::ListoOpen)
    }

    /// Whether this call closes a block opened by a call for which
    /// [`is_block_open`](Self::is_block_open) holds.
    #[must_use]
    pub fn is_block_close(&self) -> bool {
        matches!(self, Self::ListuClose | Self::ListoClose)
    }

    /// Whether this call is a self-contained block.
    #[must_use]
    pub fn is_block_standalone(&self) -> bool {
        matches!(
            self,
            Self::Header { .. } | Self::Hr | Self::Conditional(_) | Self::DocumentStart | Self::DocumentEnd
        )
    }

    /// Whether this call is any kind of block-level instruction.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.is_block_open() || self.is_block_close() || self.is_block_standalone()
    }
}
