//! Mode-stack lexer.
//!
//! Each mode owns an ordered list of patterns. A pattern either enters a new
//! mode, matches inside the current mode, exits the current mode, or emits a
//! one-shot special token. Text between matches is reported as
//! [`LexerState::Unmatched`] in the current mode.

use std::collections::HashMap;

use regex::{Match, Regex};

use crate::MarkupError;

/// What a token means to the mode that receives it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexerState {
    /// The mode was entered by this match.
    Enter,
    /// A plain pattern of the current mode matched.
    Matched,
    /// Literal text between matches.
    Unmatched,
    /// The mode is left by this match.
    Exit,
    /// A one-shot pattern matched; the current mode is unchanged.
    Special,
}

/// A token handed to the handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// Name of the mode that should handle the token.
    pub mode: &'a str,
    /// Matched (or unmatched) source text.
    pub text: &'a str,
    pub state: LexerState,
    /// Byte offset of `text` in the input.
    pub pos: usize,
}

/// A compiled lexer pattern.
///
/// `regex` has no lookaround, so a trailing `(?=...)` assertion is expressed
/// with [`requiring`](Self::requiring): the pattern only counts as a match if
/// the required expression matches somewhere after it.
#[derive(Clone, Debug)]
pub struct LexPattern {
    regex: Regex,
    requires: Option<Regex>,
}

impl LexPattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, MarkupError> {
        Ok(Self {
            regex: compile(pattern)?,
            requires: None,
        })
    }

    /// Require `pattern` to match somewhere after this pattern's match.
    pub fn requiring(mut self, pattern: &str) -> Result<Self, MarkupError> {
        self.requires = Some(compile(pattern)?);
        Ok(self)
    }

    /// Leftmost non-empty match at or after `start`. Adds the bytes searched
    /// to `scanned`.
    fn find_at<'i>(&self, input: &'i str, start: usize, scanned: &mut usize) -> Option<Match<'i>> {
        let mut from = start;
        let found = loop {
            let found = self.regex.find_at(input, from);
            *scanned += found.map_or(input.len(), |m| m.end()) - from;
            let found = found?;
            if !found.is_empty() {
                break found;
            }
            from = found.end() + input[found.end()..].chars().next()?.len_utf8();
        };

        if let Some(requires) = &self.requires {
            let after = requires.find_at(input, found.end());
            *scanned += after.map_or(input.len(), |m| m.end()) - found.end();
            after?;
        }
        Some(found)
    }
}

fn compile(pattern: &str) -> Result<Regex, MarkupError> {
    Regex::new(pattern).map_err(|source| MarkupError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })
}

/// Next match of one rule, remembered across tokens.
///
/// Positions only move forward, so a match starting at or after the current
/// position is still the rule's leftmost one, and a rule with no match stays
/// without one.
#[derive(Clone, Copy)]
enum NextMatch<'i> {
    Unknown,
    At(Match<'i>),
    Exhausted,
}

#[derive(Clone, Debug)]
enum Action {
    Enter(String),
    Matched,
    Exit,
    Special(String),
}

#[derive(Clone, Debug)]
struct Rule {
    pattern: LexPattern,
    action: Action,
}

/// Mode-stack lexer.
///
/// # Example
///
/// ```
/// use variants_markup::{LexPattern, Lexer, LexerState};
///
/// let mut lexer = Lexer::new("base");
/// lexer.add_entry_pattern(LexPattern::new(r"\(").unwrap(), "base", "paren");
/// lexer.add_exit_pattern(LexPattern::new(r"\)").unwrap(), "paren");
///
/// let mut states = Vec::new();
/// lexer.parse("a(b)c", |token| states.push((token.mode, token.state)));
/// assert_eq!(states[1], ("paren", LexerState::Enter));
/// ```
#[derive(Clone, Debug)]
pub struct Lexer {
    start_mode: String,
    rules: HashMap<String, Vec<Rule>>,
}

impl Lexer {
    /// Create a lexer whose stack starts in `start_mode`.
    #[must_use]
    pub fn new(start_mode: impl Into<String>) -> Self {
        Self {
            start_mode: start_mode.into(),
            rules: HashMap::new(),
        }
    }

    /// Name of the bottom mode.
    #[must_use]
    pub fn start_mode(&self) -> &str {
        &self.start_mode
    }

    /// In `mode`, enter `new_mode` on `pattern`.
    pub fn add_entry_pattern(&mut self, pattern: LexPattern, mode: &str, new_mode: &str) {
        self.add(mode, pattern, Action::Enter(new_mode.to_owned()));
    }

    /// In `mode`, report `pattern` as [`LexerState::Matched`].
    pub fn add_pattern(&mut self, pattern: LexPattern, mode: &str) {
        self.add(mode, pattern, Action::Matched);
    }

    /// Leave `mode` on `pattern`.
    pub fn add_exit_pattern(&mut self, pattern: LexPattern, mode: &str) {
        self.add(mode, pattern, Action::Exit);
    }

    /// In `mode`, report `pattern` to `special_mode` as [`LexerState::Special`].
    pub fn add_special_pattern(&mut self, pattern: LexPattern, mode: &str, special_mode: &str) {
        self.add(mode, pattern, Action::Special(special_mode.to_owned()));
    }

    /// Number of patterns registered for `mode`.
    #[must_use]
    pub fn pattern_count(&self, mode: &str) -> usize {
        self.rules.get(mode).map_or(0, Vec::len)
    }

    fn add(&mut self, mode: &str, pattern: LexPattern, action: Action) {
        self.rules
            .entry(mode.to_owned())
            .or_default()
            .push(Rule { pattern, action });
    }

    /// Tokenize `input`, calling `emit` for every token in source order.
    pub fn parse<'a, F>(&'a self, input: &'a str, emit: F)
    where
        F: FnMut(Token<'a>),
    {
        let scanned = self.scan(input, emit);
        tracing::trace!(bytes = input.len(), scanned, "Tokenized input");
    }

    /// [`parse`](Self::parse), returning the number of bytes the patterns
    /// searched.
    pub(crate) fn scan<'a, F>(&'a self, input: &'a str, mut emit: F) -> usize
    where
        F: FnMut(Token<'a>),
    {
        let mut scanner = Scanner {
            lexer: self,
            input,
            next: HashMap::new(),
            scanned: 0,
        };
        let mut stack: Vec<&'a str> = vec![self.start_mode.as_str()];
        let mut pos = 0;

        while pos < input.len() {
            let mode = stack.last().copied().unwrap_or(self.start_mode.as_str());
            let Some((found, action)) = scanner.next_match(mode, pos) else {
                break;
            };

            if found.start() > pos {
                emit(Token {
                    mode,
                    text: &input[pos..found.start()],
                    state: LexerState::Unmatched,
                    pos,
                });
            }

            let text = found.as_str();
            let at = found.start();
            match action {
                Action::Enter(new_mode) => {
                    stack.push(new_mode);
                    emit(Token {
                        mode: new_mode,
                        text,
                        state: LexerState::Enter,
                        pos: at,
                    });
                }
                Action::Matched => emit(Token {
                    mode,
                    text,
                    state: LexerState::Matched,
                    pos: at,
                }),
                Action::Exit => {
                    emit(Token {
                        mode,
                        text,
                        state: LexerState::Exit,
                        pos: at,
                    });
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Action::Special(special_mode) => emit(Token {
                    mode: special_mode,
                    text,
                    state: LexerState::Special,
                    pos: at,
                }),
            }

            pos = found.end();
        }

        if pos < input.len() {
            emit(Token {
                mode: stack.last().copied().unwrap_or(self.start_mode.as_str()),
                text: &input[pos..],
                state: LexerState::Unmatched,
                pos,
            });
        }
        scanner.scanned
    }
}

/// State of one tokenizer run.
struct Scanner<'l, 'i> {
    lexer: &'l Lexer,
    input: &'i str,
    /// Per mode, the next match of each of its rules.
    next: HashMap<&'l str, Vec<NextMatch<'i>>>,
    scanned: usize,
}

impl<'l, 'i> Scanner<'l, 'i> {
    /// Leftmost match among the mode's rules; ties go to the earliest rule.
    fn next_match(&mut self, mode: &str, pos: usize) -> Option<(Match<'i>, &'l Action)> {
        let lexer = self.lexer;
        let (name, rules) = lexer.rules.get_key_value(mode)?;
        let next = self
            .next
            .entry(name.as_str())
            .or_insert_with(|| vec![NextMatch::Unknown; rules.len()]);

        let mut best: Option<(Match<'i>, &'l Action)> = None;
        for (rule, next) in rules.iter().zip(next.iter_mut()) {
            let found = match *next {
                NextMatch::At(found) if found.start() >= pos => found,
                NextMatch::Exhausted => continue,
                NextMatch::At(_) | NextMatch::Unknown => {
                    match rule.pattern.find_at(self.input, pos, &mut self.scanned) {
                        Some(found) => {
                            *next = NextMatch::At(found);
                            found
                        }
                        None => {
                            *next = NextMatch::Exhausted;
                            continue;
                        }
                    }
                }
            };
            if best.is_none_or(|(current, _)| found.start() < current.start()) {
                best = Some((found, &rule.action));
            }
        }
        best
    }
}
