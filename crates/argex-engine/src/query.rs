//! Recognition of free-text "why" questions.
//!
//! Only a handful of phrasings are understood, matched case-insensitively
//! with a trailing `?` ignored:
//!
//! - `why is <subject>` (the framework's main adjective)
//! - `why is <subject> [not] <adjective>`
//! - `why does <subject> have <adjective>`
//! - `why is <subject> <comparison> than <its|the> <pointer>`
//!
//! The subject is the node label, `it`, or `this <node>` / `the <node>`
//! using the framework's word for nodes.

use crate::{
    adjective::{Adjective, AdjectiveKind},
    framework::ArgumentationFramework,
    node::{Node, Value},
};

/// What a recognized question asks to explain.
#[derive(Debug, Clone)]
pub(crate) struct Query<N> {
    pub(crate) adjective: String,
    pub(crate) compare_to: Option<N>,
}

impl<N> Query<N> {
    fn adjective(adjective: &Adjective<N>) -> Self {
        Self {
            adjective: adjective.name().to_owned(),
            compare_to: None,
        }
    }
}

pub(crate) fn parse<N>(
    framework: &ArgumentationFramework<N>,
    node: &N,
    question: &str,
) -> Option<Query<N>>
where
    N: Node,
{
    let text = question
        .trim()
        .trim_end_matches('?')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let is_subject = |s: &str| {
        let nodes = framework.refer_to_nodes_as().to_lowercase();
        s == node.to_string().to_lowercase()
            || s == "it"
            || s == format!("this {nodes}")
            || s == format!("the {nodes}")
    };

    if let Some(rest) = text.strip_prefix("why does ") {
        let (head, adjective) = split_adjective(framework, rest, |_| true)?;
        let subject = head.strip_suffix(" have")?;
        return is_subject(subject).then(|| Query::adjective(adjective));
    }

    let rest = text.strip_prefix("why is ")?;
    if is_subject(rest) {
        let main = framework.main_adjective()?;
        return framework.adjective(main).map(Query::adjective);
    }

    if let Some((head, target)) = rest.rsplit_once(" than ") {
        let (subject, comparison) =
            split_adjective(framework, head, |a| matches!(a.kind(), AdjectiveKind::Comparison { .. }))?;
        if !is_subject(subject) {
            return None;
        }
        let pointer = target
            .strip_prefix("its ")
            .or_else(|| target.strip_prefix("the "))?;
        let pointer = framework.adjectives().find(|a| {
            a.kind() == &AdjectiveKind::Pointer && a.name().to_lowercase() == pointer
        })?;
        let Ok(Value::Node(other)) = framework.evaluate(pointer.name(), node) else {
            return None;
        };
        return Some(Query {
            adjective: comparison.name().to_owned(),
            compare_to: Some(other),
        });
    }

    let (head, adjective) = split_adjective(framework, rest, |a| !a.is_comparison())?;
    let subject = head.strip_suffix(" not").unwrap_or(head);
    is_subject(subject).then(|| Query::adjective(adjective))
}

/// Splits `text` into `<head> <adjective>`, choosing the longest adjective
/// name (among those accepted by `filter`) that ends the text.
fn split_adjective<'t, 'f, N>(
    framework: &'f ArgumentationFramework<N>,
    text: &'t str,
    filter: impl Fn(&Adjective<N>) -> bool,
) -> Option<(&'t str, &'f Adjective<N>)>
where
    N: Node,
{
    framework
        .adjectives()
        .filter(|a| a.is_public() && filter(a))
        .filter_map(|a| {
            let name = a.name().to_lowercase();
            let head = text.strip_suffix(name.as_str())?.strip_suffix(' ')?;
            Some((name.len(), head, a))
        })
        .max_by_key(|(len, _, _)| *len)
        .map(|(_, head, a)| (head, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adjective::ComparisonOperator,
        node::{Getter, tests::TestNode},
    };

    fn framework() -> ArgumentationFramework<TestNode> {
        let mut framework = ArgumentationFramework::new("move").with_main_adjective("the best");
        framework
            .add_adjectives([
                Adjective::quantitative("score").with_getter(Getter::number(|n: &TestNode| n.0.score)),
                Adjective::pointer("next possible move")
                    .with_getter(Getter::node(|n: &TestNode| n.0.next.clone())),
                Adjective::nodes_group("alternatives")
                    .with_getter(Getter::nodes(|n: &TestNode| n.0.group.clone())),
                Adjective::comparison("better", "score", ComparisonOperator::Greater),
                Adjective::max_rank("best", "better", "alternatives"),
                Adjective::max_rank("the best", "better", "alternatives"),
            ])
            .unwrap();
        framework
    }

    fn adjective(question: &str, node: &TestNode) -> Option<String> {
        parse(&framework(), node, question).map(|q| q.adjective)
    }

    #[test]
    fn test_adjective_questions() {
        let a = TestNode::new("Child1", 3.0);
        assert_eq!(adjective("Why is child1 the best?", &a).as_deref(), Some("the best"));
        assert_eq!(adjective("why is child1 best", &a).as_deref(), Some("best"));
        assert_eq!(adjective("Why is it not best?", &a).as_deref(), Some("best"));
        assert_eq!(adjective("Why does this move have score?", &a).as_deref(), Some("score"));
        assert_eq!(adjective("Why is the move?", &a).as_deref(), Some("the best"));
    }

    #[test]
    fn test_comparison_questions_follow_the_pointer() {
        let b = TestNode::new("b", 2.0);
        let a = TestNode::with("a", 3.0, false, Some(b.clone()), vec![]);
        let query = parse(&framework(), &a, "Why is a better than its next possible move?").unwrap();
        assert_eq!(query.adjective, "better");
        assert!(query.compare_to.unwrap().same_node(&b));

        let lone = TestNode::new("lone", 1.0);
        assert!(parse(&framework(), &lone, "Why is lone better than its next possible move?").is_none());
    }

    #[test]
    fn test_unrecognized_questions() {
        let a = TestNode::new("a", 3.0);
        assert_eq!(adjective("unrecognized free text", &a), None);
        assert_eq!(adjective("Why is b best?", &a), None);
        assert_eq!(adjective("Why is a tall?", &a), None);
        assert_eq!(adjective("How is a best?", &a), None);
    }
}
