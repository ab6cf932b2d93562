//! Call collection and the call-writer stack.
//!
//! Syntax modes never touch the output list directly. Every call goes through
//! [`Handler::write_call`], which appends to the innermost active
//! [`CallWriter`] or, when none is active, to the document's root list.
//! Constructs that need to rewrite their content (lists, conditionals) push a
//! writer when they open and pop it when they close.

use std::any::Any;

use crate::block;
use crate::call::{Call, CallKind};

/// A sink that temporarily captures calls for one open construct.
///
/// Writers are stacked: while a writer is on top of the [`Handler`] stack,
/// it receives every call, including calls produced by constructs nested
/// inside it. When popped, [`process`](Self::process) turns the captured calls
/// into the calls handed to the sink beneath.
pub trait CallWriter: Any {
    /// Capture a single call.
    fn write_call(&mut self, call: Call);

    /// Capture several calls, preserving order.
    fn write_calls(&mut self, calls: Vec<Call>) {
        for call in calls {
            self.write_call(call);
        }
    }

    /// Flush: return the rewritten calls and clear internal buffers.
    fn process(&mut self) -> Vec<Call>;
}

/// Collects calls emitted by syntax modes during one parse.
#[derive(Default)]
pub struct Handler {
    calls: Vec<Call>,
    writers: Vec<Box<dyn CallWriter>>,
}

impl Handler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call of `kind` at `pos` to the current sink.
    pub fn add_call(&mut self, kind: CallKind, pos: usize) {
        self.write_call(Call::new(kind, pos));
    }

    /// Append a call to the current sink.
    pub fn write_call(&mut self, call: Call) {
        match self.writers.last_mut() {
            Some(writer) => writer.write_call(call),
            None => self.calls.push(call),
        }
    }

    /// Append several calls to the current sink.
    pub fn write_calls(&mut self, calls: Vec<Call>) {
        match self.writers.last_mut() {
            Some(writer) => writer.write_calls(calls),
            None => self.calls.extend(calls),
        }
    }

    /// Install `writer` in front of the current sink.
    pub fn push_writer<W: CallWriter>(&mut self, writer: W) {
        self.writers.push(Box::new(writer));
    }

    /// Flush the top writer into the sink beneath it and make that sink
    /// current again.
    ///
    /// Returns `false` if no writer is active.
    pub fn pop_writer(&mut self) -> bool {
        let Some(mut writer) = self.writers.pop() else {
            return false;
        };
        let calls = writer.process();
        self.write_calls(calls);
        true
    }

    /// The top writer, if it is a `W`.
    pub fn writer_mut<W: CallWriter>(&mut self) -> Option<&mut W> {
        let top: &mut dyn CallWriter = &mut **self.writers.last_mut()?;
        let top: &mut dyn Any = top;
        top.downcast_mut::<W>()
    }

    /// Number of active writers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.writers.len()
    }

    /// Calls written to the root list so far.
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Close every still-open writer, normalize block structure and wrap the
    /// result in document start/end calls.
    #[must_use]
    pub fn finalize(mut self) -> Vec<Call> {
        if !self.writers.is_empty() {
            tracing::debug!(depth = self.writers.len(), "Closing unterminated constructs");
        }
        while self.pop_writer() {}

        let end = self.calls.last().map_or(0, |call| call.pos);
        let body = block::normalize(std::mem::take(&mut self.calls));

        let mut calls = Vec::with_capacity(body.len() + 2);
        calls.push(Call::new(CallKind::DocumentStart, 0));
        calls.extend(body);
        calls.push(Call::new(CallKind::DocumentEnd, end));
        calls
    }
}
