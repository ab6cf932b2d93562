use std::mem;

use crate::block;
use crate::call::{Call, CallKind};
use crate::handler::CallWriter;

use super::ConditionalNode;

/// Call-writer for one open conditional.
///
/// Routes every call to the if-branch until [`start_else`](Self::start_else),
/// then to the else-branch. Nested constructs write through it like through
/// any other sink, so a nested conditional ends up as a single `Conditional`
/// call inside the active branch of its parent.
#[derive(Debug)]
pub struct ConditionalWriter {
    condition: String,
    pos: usize,
    if_calls: Vec<Call>,
    else_calls: Vec<Call>,
    in_else: bool,
}

impl ConditionalWriter {
    /// Writer for a conditional whose opening tag sits at `pos`.
    #[must_use]
    pub fn new(condition: impl Into<String>, pos: usize) -> Self {
        Self {
            condition: condition.into(),
            pos,
            if_calls: Vec::new(),
            else_calls: Vec::new(),
            in_else: false,
        }
    }

    /// Switch to the else-branch. Calls already captured stay in the
    /// if-branch.
    pub fn start_else(&mut self) {
        self.in_else = true;
    }

    #[must_use]
    pub fn is_in_else(&self) -> bool {
        self.in_else
    }

    /// Raw condition text.
    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    fn active(&mut self) -> &mut Vec<Call> {
        if self.in_else {
            &mut self.else_calls
        } else {
            &mut self.if_calls
        }
    }
}

impl CallWriter for ConditionalWriter {
    fn write_call(&mut self, call: Call) {
        self.active().push(call);
    }

    fn write_calls(&mut self, calls: Vec<Call>) {
        self.active().extend(calls);
    }

    /// Normalize each branch on its own and fold both into one
    /// `Conditional` call.
    fn process(&mut self) -> Vec<Call> {
        let if_calls = block::normalize(mem::take(&mut self.if_calls));
        let else_calls = block::normalize(mem::take(&mut self.else_calls));

        tracing::debug!(
            condition = %self.condition,
            pos = self.pos,
            if_calls = if_calls.len(),
            else_calls = else_calls.len(),
            "Resolved conditional"
        );

        let node = ConditionalNode::new(self.condition.clone(), if_calls, else_calls);
        vec![Call::new(CallKind::Conditional(node), self.pos)]
    }
}
