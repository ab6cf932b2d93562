//! Lists.
//!
//! Items are lines indented by at least two spaces (or a tab) starting with
//! `*` (unordered) or `-` (ordered). Indentation depth decides nesting.
//! The lexer hook only emits raw markers; [`ListWriter`] rewrites them into
//! nested list structure while the list is open.

use std::mem;

use crate::MarkupError;
use crate::call::{Call, CallKind};
use crate::handler::{CallWriter, Handler};
use crate::lexer::{LexPattern, Lexer, LexerState};

use super::{ModeType, SyntaxMode};

pub struct ListblockMode;

impl SyntaxMode for ListblockMode {
    fn name(&self) -> &'static str {
        "listblock"
    }

    fn mode_type(&self) -> ModeType {
        ModeType::Container
    }

    fn sort(&self) -> u32 {
        10
    }

    fn allowed_types(&self) -> &'static [ModeType] {
        &[
            ModeType::Formatting,
            ModeType::Substitution,
            ModeType::Disabled,
            ModeType::Protected,
        ]
    }

    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_entry_pattern(
            LexPattern::new(r"[ \t]*\n(?: {2,}|\t+)[\-\*]")?,
            mode,
            self.name(),
        );
        Ok(())
    }

    fn post_connect(&self, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_pattern(LexPattern::new(r"\n(?: {2,}|\t+)[\-\*]")?, self.name());
        lexer.add_exit_pattern(LexPattern::new(r"\n")?, self.name());
        Ok(())
    }

    fn handle(&self, text: &str, state: LexerState, pos: usize, handler: &mut Handler) {
        match state {
            LexerState::Enter => {
                handler.push_writer(ListWriter::default());
                handler.add_call(CallKind::ListMarker(text.to_owned()), pos);
            }
            LexerState::Matched => {
                handler.add_call(CallKind::ListItemMarker(text.to_owned()), pos);
            }
            LexerState::Unmatched => handler.add_call(CallKind::Cdata(text.to_owned()), pos),
            LexerState::Exit => {
                if handler.writer_mut::<ListWriter>().is_some() {
                    handler.add_call(CallKind::ListEndMarker, pos);
                    handler.pop_writer();
                }
            }
            LexerState::Special => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn open(self) -> CallKind {
        match self {
            Self::Unordered => CallKind::ListuOpen,
            Self::Ordered => CallKind::ListoOpen,
        }
    }

    fn close(self) -> CallKind {
        match self {
            Self::Unordered => CallKind::ListuClose,
            Self::Ordered => CallKind::ListoClose,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Level {
    kind: ListKind,
    depth: usize,
}

/// Parse a raw marker such as `"\n    - "` into list kind and depth.
///
/// Two spaces make one level, a tab counts as two spaces.
fn parse_marker(marker: &str) -> (ListKind, usize) {
    let line = marker.rsplit('\n').next().unwrap_or(marker);
    let indent: usize = line
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 2 } else { 1 })
        .sum();
    let kind = if line.trim_end().ends_with('-') {
        ListKind::Ordered
    } else {
        ListKind::Unordered
    };
    (kind, (indent / 2).max(1))
}

/// Call-writer that rewrites raw list markers into nested list calls.
#[derive(Default)]
pub struct ListWriter {
    calls: Vec<Call>,
    stack: Vec<Level>,
}

impl ListWriter {
    fn emit(&mut self, kind: CallKind, pos: usize) {
        self.calls.push(Call::new(kind, pos));
    }

    fn level(&self) -> u8 {
        u8::try_from(self.stack.len()).unwrap_or(u8::MAX)
    }

    fn open_item(&mut self, pos: usize) {
        self.emit(CallKind::ListitemOpen(self.level()), pos);
        self.emit(CallKind::ListcontentOpen, pos);
    }

    fn open_list(&mut self, kind: ListKind, depth: usize, pos: usize) {
        self.stack.push(Level { kind, depth });
        self.emit(kind.open(), pos);
        self.open_item(pos);
    }

    fn next_item(&mut self, marker: &str, pos: usize) {
        let (kind, depth) = parse_marker(marker);
        let Some(top) = self.stack.last().copied() else {
            self.open_list(kind, depth, pos);
            return;
        };

        self.emit(CallKind::ListcontentClose, pos);

        if depth > top.depth {
            self.open_list(kind, depth, pos);
            return;
        }

        while self.stack.len() > 1 && self.stack.last().is_some_and(|l| l.depth > depth) {
            if let Some(level) = self.stack.pop() {
                self.emit(CallKind::ListitemClose, pos);
                self.emit(level.kind.close(), pos);
            }
        }

        self.emit(CallKind::ListitemClose, pos);
        match self.stack.last().copied() {
            Some(current) if current.kind != kind => {
                self.stack.pop();
                self.emit(current.kind.close(), pos);
                self.open_list(kind, depth, pos);
            }
            _ => self.open_item(pos),
        }
    }

    fn close_all(&mut self, pos: usize) {
        if self.stack.is_empty() {
            return;
        }
        self.emit(CallKind::ListcontentClose, pos);
        while let Some(level) = self.stack.pop() {
            self.emit(CallKind::ListitemClose, pos);
            self.emit(level.kind.close(), pos);
        }
    }
}

impl CallWriter for ListWriter {
    fn write_call(&mut self, call: Call) {
        match call.kind {
            CallKind::ListMarker(ref marker) | CallKind::ListItemMarker(ref marker) => {
                self.next_item(marker, call.pos);
            }
            CallKind::ListEndMarker => self.close_all(call.pos),
            _ => self.calls.push(call),
        }
    }

    fn process(&mut self) -> Vec<Call> {
        let end = self.calls.last().map_or(0, |call| call.pos);
        self.close_all(end);
        mem::take(&mut self.calls)
    }
}
