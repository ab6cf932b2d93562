use crate::MarkupError;
use crate::call::CallKind;
use crate::handler::Handler;
use crate::lexer::{LexPattern, Lexer, LexerState};
use crate::modes::{ModeType, SyntaxMode, accepts_by_type};

use super::{Condition, ConditionalWriter};

const OPEN_PREFIX: &str = "<ifvar ";

/// Syntax mode for `<ifvar key=value>...<else>...</ifvar>`.
pub struct IfvarMode;

/// Condition text between `<ifvar ` and the closing `>` of the opening tag.
fn condition_text(tag: &str) -> &str {
    let inner = tag.strip_prefix(OPEN_PREFIX).unwrap_or(tag);
    inner.strip_suffix('>').unwrap_or(inner)
}

impl SyntaxMode for IfvarMode {
    fn name(&self) -> &'static str {
        "ifvar"
    }

    fn mode_type(&self) -> ModeType {
        ModeType::Container
    }

    fn sort(&self) -> u32 {
        200
    }

    fn allowed_types(&self) -> &'static [ModeType] {
        ModeType::ALL
    }

    fn accepts(&self, mode: &dyn SyntaxMode) -> bool {
        mode.name() == self.name() || accepts_by_type(self.name(), self.allowed_types(), mode)
    }

    fn connect_to(&self, mode: &str, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_entry_pattern(LexPattern::new(r"<ifvar [^=>]+=[^>]+>")?, mode, self.name());
        Ok(())
    }

    fn post_connect(&self, lexer: &mut Lexer) -> Result<(), MarkupError> {
        lexer.add_pattern(LexPattern::new("<else>")?, self.name());
        lexer.add_exit_pattern(LexPattern::new("</ifvar>")?, self.name());
        Ok(())
    }

    fn handle(&self, text: &str, state: LexerState, pos: usize, handler: &mut Handler) {
        match state {
            LexerState::Enter => {
                let condition = condition_text(text);
                if let Err(err) = Condition::parse(condition) {
                    tracing::debug!(pos, error = %err, "Conditional will render its else-branch");
                }
                handler.push_writer(ConditionalWriter::new(condition, pos));
            }
            LexerState::Matched => match handler.writer_mut::<ConditionalWriter>() {
                Some(writer) => writer.start_else(),
                None => tracing::debug!(pos, "Ignoring <else> outside a conditional"),
            },
            LexerState::Unmatched => handler.add_call(CallKind::Cdata(text.to_owned()), pos),
            LexerState::Exit => {
                if handler.writer_mut::<ConditionalWriter>().is_some() {
                    handler.pop_writer();
                } else {
                    tracing::debug!(pos, "Ignoring </ifvar> outside a conditional");
                }
            }
            LexerState::Special => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Call;
    use crate::ifvar::ConditionalNode;
    use crate::modes::{FormattingMode, HeaderMode};
    use pretty_assertions::assert_eq;

    fn conditional(calls: &[Call]) -> &ConditionalNode {
        match &calls[0].kind {
            CallKind::Conditional(node) => node,
            other => panic!("expected a conditional call, got {other:?}"),
        }
    }

    #[test]
    fn test_condition_text() {
        assert_eq!(condition_text("<ifvar a=1>"), "a=1");
        assert_eq!(condition_text("<ifvar  a = 1 >"), " a = 1 ");
        assert_eq!(condition_text("<ifvar a!=1>"), "a!=1");
    }

    #[test]
    fn test_accepts_itself_and_containers() {
        assert!(IfvarMode.accepts(&IfvarMode));
        assert!(IfvarMode.accepts(&HeaderMode));
        assert!(IfvarMode.accepts(&FormattingMode::strong()));
    }

    #[test]
    fn test_handle_lifecycle() {
        let mut handler = Handler::new();
        IfvarMode.handle("<ifvar a=1>", LexerState::Enter, 4, &mut handler);
        assert_eq!(handler.depth(), 1);

        IfvarMode.handle("yes", LexerState::Unmatched, 15, &mut handler);
        IfvarMode.handle("<else>", LexerState::Matched, 18, &mut handler);
        assert!(handler.writer_mut::<ConditionalWriter>().unwrap().is_in_else());
        IfvarMode.handle("no", LexerState::Unmatched, 24, &mut handler);

        IfvarMode.handle("</ifvar>", LexerState::Exit, 26, &mut handler);
        assert_eq!(handler.depth(), 0);

        let calls = handler.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].pos, 4);
        let node = conditional(calls);
        assert_eq!(node.condition, "a=1");
        assert_eq!(node.if_calls[1].kind, CallKind::Cdata("yes".to_owned()));
        assert_eq!(node.else_calls[1].kind, CallKind::Cdata("no".to_owned()));
    }

    #[test]
    fn test_stray_else_and_close_are_ignored() {
        let mut handler = Handler::new();
        IfvarMode.handle("<else>", LexerState::Matched, 0, &mut handler);
        IfvarMode.handle("</ifvar>", LexerState::Exit, 6, &mut handler);
        assert_eq!(handler.depth(), 0);
        assert!(handler.calls().is_empty());
    }

    #[test]
    fn test_nested_exit_restores_parent() {
        let mut handler = Handler::new();
        IfvarMode.handle("<ifvar a=1>", LexerState::Enter, 0, &mut handler);
        IfvarMode.handle("<ifvar b=2>", LexerState::Enter, 11, &mut handler);
        IfvarMode.handle("X", LexerState::Unmatched, 22, &mut handler);
        IfvarMode.handle("</ifvar>", LexerState::Exit, 23, &mut handler);
        assert_eq!(handler.depth(), 1);

        // The parent is still in its if-branch and now holds the child.
        let parent = handler.writer_mut::<ConditionalWriter>().unwrap();
        assert_eq!(parent.condition(), "a=1");
        assert!(!parent.is_in_else());

        IfvarMode.handle("</ifvar>", LexerState::Exit, 31, &mut handler);
        let outer = conditional(handler.calls());
        let inner = conditional(&outer.if_calls);
        assert_eq!(inner.condition, "b=2");
    }
}
