//! Ready-made frameworks explaining minimax decisions.
//!
//! - `lowlevel` talks about nodes, scores and back-propagation, printing
//!   every assumption in logic notation.
//! - `highlevel` talks about moves, hides quantitative details behind a
//!   fixed phrase and answers in sentences.

use argex_engine::{
    PrintMode,
    adjective::{Adjective, ComparisonOperator},
    error::{ExplainError, FrameworkError},
    explainer::ArgumentativeExplainer,
    explanation::{Condition, Explanation},
    framework::ArgumentationFramework,
    node::{Getter, GetterError, Value},
    settings::{AssumptionsVerbosity, SettingsPatch},
    tactic::{RelevanceMode, Tactic},
};

use crate::tree::TreeNode;

pub const LOWLEVEL: &str = "lowlevel";
pub const HIGHLEVEL: &str = "highlevel";

fn is_leaf() -> Getter<TreeNode> {
    Getter::boolean(TreeNode::is_leaf)
}

fn score() -> Getter<TreeNode> {
    Getter::number(TreeNode::score)
}

fn opponent_turn() -> Getter<TreeNode> {
    Getter::boolean(|node: &TreeNode| !node.is_maximizing_turn())
}

fn score_child() -> Getter<TreeNode> {
    Getter::node(TreeNode::score_child)
}

/// The other children of the node's parent; undefined at the root.
fn siblings() -> Getter<TreeNode> {
    Getter::new(|node: &TreeNode| {
        let parent = node
            .parent()
            .ok_or_else(|| GetterError::new(format!("{node} has no parent")))?;
        Ok(Value::Nodes(parent.children()))
    })
}

/// Framework for readers who know minimax.
pub fn lowlevel() -> Result<ArgumentationFramework<TreeNode>, FrameworkError> {
    let settings = SettingsPatch::default()
        .explanation_depth(3)
        .print_implicit_assumptions(true)
        .assumptions_verbosity(AssumptionsVerbosity::Verbose)
        .print_mode(PrintMode::Logic);
    let mut framework = ArgumentationFramework::new("node")
        .with_settings(settings)
        .with_main_adjective("best");
    framework.add_adjectives([
        Adjective::boolean("leaf")
            .with_getter(is_leaf())
            .with_definition("node.is_leaf"),
        Adjective::quantitative("score")
            .with_getter(score())
            .with_definition("node.score")
            .with_explanation(Explanation::conditional(
                Condition::holds("leaf"),
                Explanation::assumption("Leaf nodes have scores from the evaluation function"),
                Explanation::composite([
                    Explanation::assumption("Internal nodes have scores from children"),
                    Explanation::possession_via("backpropagating child", "score"),
                ]),
            )),
        Adjective::boolean("opponent player turn")
            .with_getter(opponent_turn())
            .with_definition("not node.maximizing_player_turn"),
        Adjective::pointer("backpropagating child")
            .with_getter(score_child())
            .with_definition("node.score_child")
            .with_explanation(Explanation::conditional(
                Condition::holds("opponent player turn"),
                Explanation::composite([
                    Explanation::assumption("We assume the opponent will do their best move."),
                    Explanation::possession_via("backpropagating child", "worst"),
                ]),
                Explanation::composite([
                    Explanation::assumption("On our turn we take the maximum rated move."),
                    Explanation::possession_via("backpropagating child", "best"),
                ]),
            )),
        Adjective::comparison("better", "score", ComparisonOperator::Greater),
        Adjective::nodes_group("siblings")
            .with_getter(siblings())
            .with_definition("node.parent.children")
            .excluding_self(),
        Adjective::max_rank("best", "better", "siblings"),
        Adjective::min_rank("worst", "better", "siblings"),
    ])?;
    Ok(framework)
}

/// Framework for readers who only know the game.
pub fn highlevel() -> Result<ArgumentationFramework<TreeNode>, FrameworkError> {
    let settings = SettingsPatch::default()
        .explanation_depth(4)
        .print_implicit_assumptions(false)
        .assumptions_verbosity(AssumptionsVerbosity::IfAsked)
        .print_mode(PrintMode::Verbal);
    let mut framework = ArgumentationFramework::new("move")
        .with_settings(settings)
        .with_main_adjective("the best")
        .with_tactic(Tactic::SubstituteQuantitativeExplanations(
            "it leads to a better position".to_owned(),
        ))
        .with_tactic(Tactic::SkipConditionStatement {
            except_on: vec!["score".to_owned()],
        });
    framework.add_adjectives([
        Adjective::boolean("final move")
            .with_getter(is_leaf())
            .with_definition("no move follows it"),
        Adjective::quantitative("score")
            .with_getter(score())
            .with_explanation(Explanation::conditional(
                Condition::holds("final move"),
                Explanation::assumption("final moves are scored by looking at the board"),
                Explanation::composite([
                    Explanation::assumption("We assume us and the opponent are playing optimally."),
                    Explanation::possession_via("next possible move", "score"),
                ]),
            )),
        Adjective::boolean("opponent player turn").with_getter(opponent_turn()),
        Adjective::pointer("next possible move")
            .with_getter(score_child())
            .with_explanation(Explanation::conditional(
                Condition::holds("opponent player turn"),
                Explanation::composite([
                    Explanation::assumption("We assume the opponent will do their best move."),
                    Explanation::possession_via("next possible move", "the best the opponent can do"),
                ]),
                Explanation::composite([
                    Explanation::assumption("On my turn I take the best move."),
                    Explanation::possession_via("next possible move", "the best"),
                ]),
            )),
        Adjective::comparison("better", "score", ComparisonOperator::Greater),
        Adjective::nodes_group("possible alternative moves")
            .with_getter(siblings())
            .excluding_self(),
        Adjective::max_rank("the best", "better", "possible alternative moves")
            .with_tactic(Tactic::OnlyRelevantComparisons(RelevanceMode::Top(1))),
        Adjective::min_rank("the best the opponent can do", "better", "possible alternative moves"),
    ])?;
    Ok(framework)
}

/// Explainer holding both frameworks, `highlevel` first (the default).
pub fn minimax_explainer() -> Result<ArgumentativeExplainer<TreeNode>, ExplainError> {
    let mut explainer = ArgumentativeExplainer::new();
    explainer.add_framework(HIGHLEVEL, highlevel()?)?;
    explainer.add_framework(LOWLEVEL, lowlevel()?)?;
    Ok(explainer)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use argex_engine::{explainer::Argument, node::Node as _};

    use super::*;
    use crate::tree::{GameTree, TreeSpec, tests::sample_tree};

    fn lowlevel_settings() -> SettingsPatch {
        SettingsPatch::default().with_framework(LOWLEVEL)
    }

    fn explain_lowlevel(node: &TreeNode, adjective: &str, other: Option<&TreeNode>) -> Argument {
        minimax_explainer()
            .unwrap()
            .explain_with(node, adjective, other, &lowlevel_settings())
            .unwrap()
    }

    fn resolved_claims(argument: &Argument) -> BTreeSet<String> {
        argument
            .expr()
            .claims()
            .into_iter()
            .filter(|claim| !claim.is_unresolved())
            .map(|claim| claim.logic_text())
            .collect()
    }

    #[test]
    fn test_frameworks_are_valid() {
        lowlevel().unwrap().validate().unwrap();
        highlevel().unwrap().validate().unwrap();
        let explainer = minimax_explainer().unwrap();
        assert_eq!(explainer.framework_keys().collect::<Vec<_>>(), [HIGHLEVEL, LOWLEVEL]);
    }

    #[test]
    fn test_leaf_is_not_better_than_its_sibling() {
        let tree = sample_tree();
        let leaf11 = tree.find("leaf11").unwrap();
        let leaf12 = tree.find("leaf12").unwrap();

        let argument = explain_lowlevel(&leaf11, "better", Some(&leaf12));
        assert!(argument.expr().conclusion().unwrap().is_negated());
        assert_eq!(
            argument.render(),
            "[(assumption) By definition, node1 is \"better\" than node2 if node1 score > node2 score \
             ∧ [[(assumption) Definition of \"leaf\" is node.is_leaf → leaf11 is leaf] \
             ∧ (assumption) Leaf nodes have scores from the evaluation function → leaf11 has score = 3] \
             ∧ [[(assumption) Definition of \"leaf\" is node.is_leaf → leaf12 is leaf] \
             ∧ (assumption) Leaf nodes have scores from the evaluation function → leaf12 has score = 4] \
             → ¬(leaf11 is better than leaf12)]"
        );

        let framework = lowlevel().unwrap();
        assert_eq!(framework.evaluate("worst", &leaf11).unwrap().as_bool(), Some(true));
        assert_eq!(framework.evaluate("best", &leaf11).unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_best_child_explanation_reaches_leaves_at_depth_five() {
        let tree = sample_tree();
        let child1 = tree.find("child1").unwrap();

        let text = explain_lowlevel(&child1, "best", None).render();
        assert!(text.contains("(assumption) Internal nodes have scores from children"));
        assert!(text.contains("child1 is better than child2"));
        assert!(text.ends_with("→ child1 is best]"));
        assert!(!text.contains("Leaf nodes have scores from the evaluation function"));

        // Leaf scores are explained on level four, their leaf condition on level five.
        let deeper = minimax_explainer()
            .unwrap()
            .explain_with(&child1, "best", None, &lowlevel_settings().explanation_depth(5))
            .unwrap()
            .render();
        assert!(deeper.contains("Leaf nodes have scores from the evaluation function"));
        assert!(deeper.contains("child1 has backpropagating child = leaf11"));
    }

    #[test]
    fn test_zero_depth_gives_placeholder() {
        let tree = sample_tree();
        let child1 = tree.find("child1").unwrap();
        let explainer = minimax_explainer().unwrap();

        let lowlevel = explainer
            .explain_with(&child1, "best", None, &lowlevel_settings().explanation_depth(0))
            .unwrap();
        assert_eq!(lowlevel.render(), "child1 has best = ?");

        let highlevel = explainer
            .explain_with(&child1, "the best", None, &SettingsPatch::default().explanation_depth(0))
            .unwrap();
        assert_eq!(highlevel.render(), "child1 has the best = ?");
    }

    #[test]
    fn test_skip_quantitative_explanations() {
        let tree = sample_tree();
        let child1 = tree.find("child1").unwrap();
        let child2 = tree.find("child2").unwrap();
        let mut explainer = ArgumentativeExplainer::new();
        explainer
            .add_framework(
                LOWLEVEL,
                lowlevel().unwrap().with_tactic(Tactic::SkipQuantitativeExplanations),
            )
            .unwrap();

        let text = explainer.explain(&child1, "better", Some(&child2)).unwrap().render();
        assert_eq!(
            text,
            "[(assumption) By definition, node1 is \"better\" than node2 if node1 score > node2 score \
             ∧ child1 has score = 3 ∧ child2 has score = 2 → child1 is better than child2]"
        );
        assert!(!text.contains("Internal nodes"));
    }

    #[test]
    fn test_highlevel_explanation() {
        let tree = sample_tree();
        let child1 = tree.find("child1").unwrap();
        let explainer = minimax_explainer().unwrap();

        let text = explainer.explain(&child1, "the best", None).unwrap().render();
        assert!(text.starts_with("child1 is the best (because "));
        assert!(text.contains("child1 is better than child2 (because it leads to a better position)"));
        assert!(!text.contains("assumption"));
        assert!(!text.contains("score"));
    }

    #[test]
    fn test_highlevel_score_keeps_its_value() {
        let tree = sample_tree();
        let child1 = tree.find("child1").unwrap();
        let explainer = minimax_explainer().unwrap();

        let text = explainer.explain(&child1, "score", None).unwrap().render();
        assert_eq!(text, "child1 has score = 3 (because it leads to a better position)");
        let answer = explainer
            .query_explanation(&child1, "Why does child1 have score?")
            .unwrap();
        assert_eq!(answer.render(), text);
    }

    #[test]
    fn test_free_text_questions() {
        let tree = sample_tree();
        let child1 = tree.find("child1").unwrap();
        let explainer = minimax_explainer().unwrap();

        let answer = explainer.query_explanation(&child1, "Why is child1 the best?").unwrap();
        assert_eq!(
            answer.render(),
            explainer.explain(&child1, "the best", None).unwrap().render()
        );
        assert!(explainer.query_explanation(&child1, "Why is this move?").is_some());
        assert!(explainer.query_explanation(&child1, "unrecognized free text").is_none());
    }

    #[test]
    fn test_explanations_are_deterministic() {
        let tree = sample_tree();
        let child1 = tree.find("child1").unwrap();
        let first = explain_lowlevel(&child1, "best", None);
        let second = explain_lowlevel(&child1, "best", None);
        assert_eq!(first.expr(), second.expr());
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn test_deeper_explanations_keep_resolved_claims() {
        let tree = sample_tree();
        let explainer = minimax_explainer().unwrap();
        for (key, adjective) in [(LOWLEVEL, "best"), (HIGHLEVEL, "the best")] {
            for node in tree.nodes().skip(1) {
                for depth in 0..6 {
                    let explain = |depth| {
                        let settings = SettingsPatch::default()
                            .with_framework(key)
                            .explanation_depth(depth);
                        explainer.explain_with(&node, adjective, None, &settings).unwrap()
                    };
                    let shallow = resolved_claims(&explain(depth));
                    let deep = resolved_claims(&explain(depth + 1));
                    assert!(
                        shallow.is_subset(&deep),
                        "{key} {node} depth {depth}: {shallow:?} not in {deep:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_best_and_worst_are_complementary_between_two_siblings() {
        let tree = sample_tree();
        let framework = lowlevel().unwrap();
        for node in tree.nodes().skip(1) {
            let best = framework.evaluate("best", &node).unwrap().as_bool().unwrap();
            let worst = framework.evaluate("worst", &node).unwrap().as_bool().unwrap();
            assert_ne!(best, worst, "{node}");
        }
    }

    #[test]
    fn test_only_child_is_best_and_worst() {
        let spec = TreeSpec::internal("root", vec![TreeSpec::leaf("only", 1.0)]);
        let tree = GameTree::from_spec(&spec).unwrap();
        let only = tree.find("only").unwrap();
        let framework = lowlevel().unwrap();
        assert_eq!(framework.evaluate("best", &only).unwrap().as_bool(), Some(true));
        assert_eq!(framework.evaluate("worst", &only).unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_better_is_antisymmetric() {
        let tree = sample_tree();
        let framework = lowlevel().unwrap();
        let nodes: Vec<_> = tree.nodes().collect();
        for a in &nodes {
            for b in &nodes {
                let ab = framework.compare("better", a, b).unwrap();
                let ba = framework.compare("better", b, a).unwrap();
                assert!(!(ab && ba), "{a} and {b}");
                if a.same_node(b) {
                    assert!(!ab);
                }
            }
        }
    }

    #[test]
    fn test_tied_siblings_are_not_best() {
        let spec = TreeSpec::internal(
            "root",
            vec![TreeSpec::leaf("left", 1.0), TreeSpec::leaf("right", 1.0)],
        );
        let tree = GameTree::from_spec(&spec).unwrap();
        let framework = lowlevel().unwrap();
        for label in ["left", "right"] {
            let node = tree.find(label).unwrap();
            assert_eq!(framework.evaluate("best", &node).unwrap().as_bool(), Some(false));
            assert_eq!(framework.evaluate("worst", &node).unwrap().as_bool(), Some(true));
        }
    }

    #[test]
    fn test_root_cannot_be_ranked() {
        let tree = sample_tree();
        let text = explain_lowlevel(&tree.root(), "best", None).render();
        assert!(text.contains(
            "the adjective \"best\" cannot be evaluated on root because dependent adjective \
             \"siblings\" cannot be evaluated (root has no parent)"
        ));
    }

    #[test]
    fn test_random_trees_can_be_explained() {
        let tree = GameTree::random(7, 3, 2).unwrap();
        let explainer = minimax_explainer().unwrap();
        for node in tree.nodes().skip(1) {
            let argument = explainer.explain(&node, "the best", None).unwrap();
            assert_eq!(argument.expr().failure_count(), 0, "{node}: {argument}");
        }
    }
}
