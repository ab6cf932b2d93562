use crate::renderer::NestingRenderer;
use crate::vars::RequestVars;

use super::{Condition, ConditionalNode};

/// Render the branch of `node` selected by `vars`.
///
/// Always disables output caching for the current pass and always reports
/// content as produced, even when the chosen branch is empty. A condition
/// that cannot be parsed never matches.
pub fn render_conditional<R>(
    node: &ConditionalNode,
    renderer: &mut R,
    vars: &(impl RequestVars + ?Sized),
) -> bool
where
    R: NestingRenderer + ?Sized,
{
    renderer.nocache();

    let chosen = match Condition::parse(&node.condition) {
        Ok(condition) => condition.evaluate(vars),
        Err(err) => {
            tracing::debug!(error = %err, "Rendering else-branch");
            false
        }
    };

    let branch = if chosen {
        &node.if_calls
    } else {
        &node.else_calls
    };
    renderer.nest(branch);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{Call, CallKind};
    use crate::vars::Vars;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        nocache: usize,
        nested: Vec<Vec<Call>>,
    }

    impl NestingRenderer for Recorder {
        fn nocache(&mut self) {
            self.nocache += 1;
        }

        fn nest(&mut self, calls: &[Call]) {
            self.nested.push(calls.to_vec());
        }
    }

    fn text(value: &str) -> Vec<Call> {
        vec![Call::new(CallKind::Cdata(value.to_owned()), 0)]
    }

    fn node(condition: &str) -> ConditionalNode {
        ConditionalNode::new(condition, text("if"), text("else"))
    }

    fn chosen(condition: &str, vars: &Vars) -> Vec<Call> {
        let mut recorder = Recorder::default();
        assert!(render_conditional(&node(condition), &mut recorder, vars));
        assert_eq!(recorder.nocache, 1);
        assert_eq!(recorder.nested.len(), 1);
        recorder.nested.remove(0)
    }

    #[test]
    fn test_selects_if_branch_on_match() {
        let vars = Vars::from_iter([("a", "1")]);
        assert_eq!(chosen("a=1", &vars), text("if"));
        assert_eq!(chosen("a!=1", &vars), text("else"));
    }

    #[test]
    fn test_absent_key_selects_else() {
        assert_eq!(chosen("a=", &Vars::new()), text("else"));
    }

    #[test]
    fn test_unparsable_condition_selects_else() {
        let vars = Vars::from_iter([("a", "1")]);
        assert_eq!(chosen("a", &vars), text("else"));
    }

    #[test]
    fn test_empty_branch_still_reports_content() {
        let node = ConditionalNode::new("a=1", Vec::new(), text("else"));
        let mut recorder = Recorder::default();
        let vars = Vars::from_iter([("a", "1")]);
        assert!(render_conditional(&node, &mut recorder, &vars));
        assert_eq!(recorder.nested, vec![Vec::new()]);
    }

    #[test]
    fn test_works_with_trait_objects() {
        let vars: Box<dyn RequestVars> = Box::new(Vars::from_iter([("a", "1")]));
        let mut recorder = Recorder::default();
        let renderer: &mut dyn NestingRenderer = &mut recorder;
        assert!(render_conditional(&node("a=1"), renderer, &*vars));
        assert_eq!(recorder.nested, vec![text("if")]);
    }
}
