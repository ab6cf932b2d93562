//! Generic call renderer with pluggable backend.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::str::FromStr;

use crate::backend::{Format, RenderBackend};
use crate::call::{Call, CallKind};
use crate::ifvar::render_conditional;
use crate::text::TextBackend;
use crate::vars::RequestVars;
use crate::xhtml::XhtmlBackend;

/// Renderer primitives available to syntax plugins at render time.
pub trait NestingRenderer {
    /// Mark the output of the current pass as not cacheable.
    fn nocache(&mut self);

    /// Render a previously captured sub-tree in place.
    fn nest(&mut self, calls: &[Call]);
}

/// Result of rendering a call list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered content.
    pub output: String,
    /// Whether the output may be reused for another request.
    pub cacheable: bool,
}

/// Generic call renderer.
///
/// Keeps list state and request variables and delegates the look of each
/// element to the backend `B`. Conditional calls are resolved against the
/// request variables the renderer was built with.
pub struct Renderer<'v, B: RenderBackend> {
    output: String,
    list_stack: Vec<bool>,
    vars: &'v dyn RequestVars,
    cacheable: bool,
    _backend: PhantomData<B>,
}

impl<'v, B: RenderBackend> Renderer<'v, B> {
    #[must_use]
    pub fn new(vars: &'v dyn RequestVars) -> Self {
        Self {
            output: String::with_capacity(4096),
            list_stack: Vec::new(),
            vars,
            cacheable: true,
            _backend: PhantomData,
        }
    }

    /// Render `calls` and return the output of this pass.
    ///
    /// Each pass starts cacheable; conditionals reached during the pass turn
    /// that off.
    pub fn render(&mut self, calls: &[Call]) -> RenderResult {
        self.cacheable = true;
        self.list_stack.clear();
        for call in calls {
            self.render_call(call);
        }

        let output = mem::take(&mut self.output);
        tracing::debug!(
            format = B::FORMAT,
            bytes = output.len(),
            cacheable = self.cacheable,
            "Rendered calls"
        );
        RenderResult {
            output,
            cacheable: self.cacheable,
        }
    }

    fn render_call(&mut self, call: &Call) {
        let out = &mut self.output;
        match &call.kind {
            CallKind::DocumentStart => B::document_start(out),
            CallKind::DocumentEnd => B::document_end(out),
            CallKind::Cdata(text) => B::cdata(text, out),
            CallKind::Unformatted(text) => B::unformatted(text, out),
            CallKind::Linebreak => B::linebreak(out),
            CallKind::Hr => B::hr(out),
            CallKind::Header { text, level } => B::header(text, *level, out),
            CallKind::POpen => B::paragraph_open(out),
            CallKind::PClose => B::paragraph_close(out),
            CallKind::StrongOpen => B::format_open(Format::Strong, out),
            CallKind::StrongClose => B::format_close(Format::Strong, out),
            CallKind::EmphasisOpen => B::format_open(Format::Emphasis, out),
            CallKind::EmphasisClose => B::format_close(Format::Emphasis, out),
            CallKind::UnderlineOpen => B::format_open(Format::Underline, out),
            CallKind::UnderlineClose => B::format_close(Format::Underline, out),
            CallKind::MonospaceOpen => B::format_open(Format::Monospace, out),
            CallKind::MonospaceClose => B::format_close(Format::Monospace, out),
            CallKind::ListuOpen => self.list_open(false),
            CallKind::ListoOpen => self.list_open(true),
            CallKind::ListuClose | CallKind::ListoClose => self.list_close(),
            CallKind::ListitemOpen(level) => {
                let ordered = self.list_stack.last().copied().unwrap_or(false);
                B::listitem_open(ordered, *level, out);
            }
            CallKind::ListitemClose => B::listitem_close(out),
            CallKind::ListcontentOpen => B::listcontent_open(out),
            CallKind::ListcontentClose => B::listcontent_close(out),
            CallKind::Conditional(node) => {
                let vars = self.vars;
                render_conditional(node, self, vars);
            }
            // Consumed by block normalization and the list writer.
            CallKind::Eol
            | CallKind::ListMarker(_)
            | CallKind::ListItemMarker(_)
            | CallKind::ListEndMarker => {}
        }
    }

    fn list_open(&mut self, ordered: bool) {
        self.list_stack.push(ordered);
        B::list_open(ordered, self.list_stack.len(), &mut self.output);
    }

    fn list_close(&mut self) {
        let level = self.list_stack.len();
        let ordered = self.list_stack.pop().unwrap_or(false);
        B::list_close(ordered, level, &mut self.output);
    }
}

impl<B: RenderBackend> NestingRenderer for Renderer<'_, B> {
    fn nocache(&mut self) {
        self.cacheable = false;
    }

    fn nest(&mut self, calls: &[Call]) {
        for call in calls {
            self.render_call(call);
        }
    }
}

/// Error returned when parsing an unknown output mode name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown output mode `{0}` (expected `xhtml` or `text`)")]
pub struct UnknownOutputMode(pub String);

/// Output format selected for a render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum OutputMode {
    #[default]
    Xhtml,
    Text,
}

impl OutputMode {
    /// Mode name, also the backend's format name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xhtml => XhtmlBackend::FORMAT,
            Self::Text => TextBackend::FORMAT,
        }
    }
}

impl FromStr for OutputMode {
    type Err = UnknownOutputMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xhtml" | "html" => Ok(Self::Xhtml),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(UnknownOutputMode(s.to_owned())),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `calls` in `mode` against `vars`.
pub fn render(calls: &[Call], mode: OutputMode, vars: &dyn RequestVars) -> RenderResult {
    match mode {
        OutputMode::Xhtml => Renderer::<XhtmlBackend>::new(vars).render(calls),
        OutputMode::Text => Renderer::<TextBackend>::new(vars).render(calls),
    }
}
