//! Block normalization.
//!
//! Turns the flat call stream produced by the handler into valid block
//! structure: inline runs are wrapped in paragraphs, blank lines split
//! paragraphs, and block calls never end up inside a paragraph.

use crate::call::{Call, CallKind};

/// Restructure a flat run of calls into paragraphs and blocks.
///
/// Each call sequence is normalized on its own; the function has no state
/// beyond its input. Normalizing already-normalized calls returns them
/// unchanged.
#[must_use]
pub fn normalize(calls: Vec<Call>) -> Vec<Call> {
    let mut block = Block::with_capacity(calls.len() + 4);
    let mut calls = calls.into_iter().peekable();

    while let Some(call) = calls.next() {
        match call.kind {
            CallKind::POpen => {
                if block.depth == 0 && !block.in_paragraph {
                    block.open_paragraph(call.pos);
                }
            }
            CallKind::PClose => block.close_paragraph(call.pos),
            CallKind::Eol => {
                if block.depth > 0 || !block.in_paragraph {
                    continue;
                }
                let paragraph_ends = match calls.peek() {
                    None => true,
                    Some(next) => next.kind == CallKind::Eol,
                };
                if paragraph_ends {
                    while calls.next_if(|next| next.kind == CallKind::Eol).is_some() {}
                    block.close_paragraph(call.pos);
                } else {
                    block.push_text("\n", call.pos);
                }
            }
            CallKind::Cdata(ref text) => {
                if block.depth == 0 && !block.in_paragraph {
                    let text = text.trim_start();
                    if text.is_empty() {
                        continue;
                    }
                    block.open_paragraph(call.pos);
                    block.push_text(text, call.pos);
                } else {
                    block.push_text(text, call.pos);
                }
            }
            _ if call.kind.is_block() => {
                block.close_paragraph(call.pos);
                if call.kind.is_block_open() {
                    block.depth += 1;
                } else if call.kind.is_block_close() {
                    block.depth = block.depth.saturating_sub(1);
                }
                block.out.push(call);
            }
            _ => {
                if block.depth == 0 && !block.in_paragraph {
                    block.open_paragraph(call.pos);
                }
                block.out.push(call);
            }
        }
    }

    let end = block.out.last().map_or(0, |call| call.pos);
    block.close_paragraph(end);
    block.out
}

struct Block {
    out: Vec<Call>,
    in_paragraph: bool,
    depth: usize,
}

impl Block {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            in_paragraph: false,
            depth: 0,
        }
    }

    fn open_paragraph(&mut self, pos: usize) {
        self.out.push(Call::new(CallKind::POpen, pos));
        self.in_paragraph = true;
    }

    /// Close the open paragraph, trimming trailing whitespace and dropping it
    /// entirely if nothing is left inside.
    fn close_paragraph(&mut self, pos: usize) {
        if !self.in_paragraph {
            return;
        }
        self.in_paragraph = false;

        if let Some(Call {
            kind: CallKind::Cdata(text),
            ..
        }) = self.out.last_mut()
        {
            text.truncate(text.trim_end().len());
            if text.is_empty() {
                self.out.pop();
            }
        }

        if self.out.last().is_some_and(|call| call.kind == CallKind::POpen) {
            self.out.pop();
        } else {
            self.out.push(Call::new(CallKind::PClose, pos));
        }
    }

    /// Append text, merging with a directly preceding text call.
    fn push_text(&mut self, text: &str, pos: usize) {
        if let Some(Call {
            kind: CallKind::Cdata(last),
            ..
        }) = self.out.last_mut()
        {
            last.push_str(text);
        } else {
            self.out.push(Call::new(CallKind::Cdata(text.to_owned()), pos));
        }
    }
}
