//! Instantiation of explanation templates against concrete nodes.
//!
//! Level 1 is the asked adjective. Every hop from one adjective to another
//! goes one level deeper; composite and conditional templates are
//! structural and stay on the level of their owner. A claim below
//! `explanation_depth` is left unresolved.

use argex_logic::{
    claim::{Claim, Quantifier},
    expr::{ConditionalProof, Expr, GroupMember, GroupProof, Origin, OriginKind},
};
use tracing::{debug, warn};

use crate::{
    adjective::{Adjective, AdjectiveKind},
    error::EvaluationError,
    explanation::{
        Assumption, Condition, ConditionalExplanation, Explanation, GroupComparison, Possession,
        RecursivePossession,
    },
    framework::ArgumentationFramework,
    node::{Node, Value},
    settings::{AssumptionsVerbosity, Settings},
};

/// Builds one proof tree. Holds the (node, other node, adjective) triples
/// currently being expanded so that true cycles are cut instead of unrolled
/// to the depth limit.
pub(crate) struct Instantiation<'a, N> {
    framework: &'a ArgumentationFramework<N>,
    settings: &'a Settings,
    path: Vec<(N, Option<N>, String)>,
}

impl<'a, N> Instantiation<'a, N>
where
    N: Node,
{
    pub(crate) fn new(framework: &'a ArgumentationFramework<N>, settings: &'a Settings) -> Self {
        Self {
            framework,
            settings,
            path: vec![],
        }
    }

    fn beyond_depth(&self, level: u32) -> bool {
        level > self.settings.explanation_depth
    }

    fn on_path(&self, node: &N, other: Option<&N>, name: &str) -> bool {
        self.path.iter().any(|(n, o, adjective)| {
            adjective == name
                && n.same_node(node)
                && match (o, other) {
                    (Some(o), Some(other)) => o.same_node(other),
                    (None, None) => true,
                    _ => false,
                }
        })
    }

    fn evaluation_failure(name: &str, node: &N, error: &EvaluationError) -> Expr {
        warn!(adjective = name, %node, %error, "explanation branch cannot be evaluated");
        match error {
            EvaluationError::Dependent { .. } => Expr::Failure(error.to_string()),
            _ => Expr::Failure(format!(
                "the adjective \"{name}\" cannot be evaluated on {node} ({error})"
            )),
        }
    }

    fn circular(name: &str, node: &N) -> Expr {
        warn!(adjective = name, %node, "circular explanation cut");
        Expr::Failure(format!(
            "circular explanation: \"{name}\" on {node} depends on itself"
        ))
    }

    fn unknown(name: &str) -> Expr {
        warn!(adjective = name, "explanation refers to an unknown adjective");
        Expr::Failure(format!("unknown adjective \"{name}\""))
    }

    fn with_tactics(adjective: &Adjective<N>, expr: Expr) -> Expr {
        adjective
            .tactics()
            .iter()
            .fold(expr, |expr, tactic| tactic.apply(expr))
    }

    /// Proof that `node` has the value it has for adjective `name`.
    pub(crate) fn adjective(&mut self, node: &N, name: &str, level: u32) -> Expr {
        if self.beyond_depth(level) {
            return Claim::unresolved(node.to_string(), name).into();
        }
        let framework = self.framework;
        let Some(adjective) = framework.adjective(name) else {
            return Self::unknown(name);
        };
        if self.on_path(node, None, name) {
            return Self::circular(name, node);
        }
        debug!(adjective = name, %node, level, "explaining adjective");
        let value = match framework.evaluate(name, node) {
            Ok(value) => value,
            Err(error) => return Self::evaluation_failure(name, node, &error),
        };
        let claim = framework.claim(adjective, node, &value);

        self.path.push((node.clone(), None, name.to_owned()));
        let premise = self.template(name, &adjective.effective_explanation(), node, None, level);
        self.path.pop();

        let origin = Origin::new(name, adjective.kind().origin_kind());
        Self::with_tactics(adjective, Expr::implies(premise, claim, level, origin))
    }

    /// Proof that `a` is (or is not) `name` than `b`.
    pub(crate) fn comparison(&mut self, a: &N, b: &N, name: &str, level: u32) -> Expr {
        if self.beyond_depth(level) {
            return Claim::unresolved(a.to_string(), format!("{name} than {b}")).into();
        }
        let framework = self.framework;
        let Some(adjective) = framework.adjective(name) else {
            return Self::unknown(name);
        };
        if self.on_path(a, Some(b), name) {
            return Self::circular(&format!("{name} than {b}"), a);
        }
        debug!(adjective = name, %a, %b, level, "explaining comparison");
        let holds = match framework.compare(name, a, b) {
            Ok(holds) => holds,
            Err(error) => return Self::evaluation_failure(name, a, &error),
        };
        let claim = Claim::compared(a.to_string(), name, b.to_string()).with_truth(holds);

        self.path.push((a.clone(), Some(b.clone()), name.to_owned()));
        let premise = self.template(name, &adjective.effective_explanation(), a, Some(b), level);
        self.path.pop();

        let origin = Origin::new(name, OriginKind::Comparison);
        Self::with_tactics(adjective, Expr::implies(premise, claim, level, origin))
    }

    /// States the value of `name` on `node` without explaining it.
    fn statement(&self, node: &N, name: &str, level: u32) -> Expr {
        if self.beyond_depth(level) {
            return Claim::unresolved(node.to_string(), name).into();
        }
        let Some(adjective) = self.framework.adjective(name) else {
            return Self::unknown(name);
        };
        match self.framework.evaluate(name, node) {
            Ok(value) => self.framework.claim(adjective, node, &value).into(),
            Err(error) => Self::evaluation_failure(name, node, &error),
        }
    }

    /// The node `pointer` points at from `node`, or the failure leaf explaining why there is none.
    fn follow(&self, node: &N, pointer: &str) -> Result<N, Expr> {
        match self.framework.evaluate(pointer, node) {
            Ok(Value::Node(target)) => Ok(target),
            Ok(_) => Err(Expr::Failure(format!("{node} has no {pointer}"))),
            Err(error) => Err(Self::evaluation_failure(pointer, node, &error)),
        }
    }

    /// Premise obtained by instantiating `explanation` on `node`.
    ///
    /// `owner` is the adjective whose template this is, `other` the second
    /// node when the owner is a comparison.
    fn template(
        &mut self,
        owner: &str,
        explanation: &Explanation,
        node: &N,
        other: Option<&N>,
        level: u32,
    ) -> Option<Expr> {
        match explanation {
            Explanation::Assumption(assumption) => self.assumption(assumption, level),
            Explanation::Possession(possession) => Some(self.possession(owner, possession, node, level)),
            Explanation::Comparison(comparison) => {
                let target = match self.follow(node, &comparison.pointer) {
                    Ok(target) => target,
                    Err(failure) => return Some(failure),
                };
                Some(self.comparison(node, &target, &comparison.comparison, level + 1))
            }
            Explanation::GroupComparison(group) => Some(self.group_comparison(owner, group, node, level)),
            Explanation::ComparedPossession(adjective) => {
                let Some(other) = other else {
                    return Some(Expr::Failure(format!(
                        "\"{adjective}\" can only be compared between two nodes"
                    )));
                };
                Expr::and(vec![
                    self.adjective(node, adjective, level + 1),
                    self.adjective(other, adjective, level + 1),
                ])
            }
            Explanation::Composite(items) => Expr::and(
                items
                    .iter()
                    .filter_map(|item| self.template(owner, item, node, other, level))
                    .collect(),
            ),
            Explanation::Conditional(conditional) => {
                Some(self.conditional(owner, conditional, node, other, level))
            }
            Explanation::RecursivePossession(recursive) => {
                Some(self.recursive_possession(recursive, node, level))
            }
        }
    }

    fn assumption(&self, assumption: &Assumption, level: u32) -> Option<Expr> {
        if assumption.is_implicit() && !self.settings.print_implicit_assumptions {
            return None;
        }
        let verbose = || {
            Expr::Assumption(format!(
                "(assumption) {}",
                assumption.description(self.framework.refer_to_nodes_as())
            ))
        };
        if assumption.is_necessary() {
            return Some(verbose());
        }
        match self.settings.assumptions_verbosity {
            AssumptionsVerbosity::Verbose => Some(verbose()),
            AssumptionsVerbosity::Minimal => Some(Expr::Assumption("(from assumptions)".to_owned())),
            AssumptionsVerbosity::No => None,
            AssumptionsVerbosity::IfAsked => (level == 1).then(verbose),
        }
    }

    fn possession(&mut self, owner: &str, possession: &Possession, node: &N, level: u32) -> Expr {
        let mut parts = vec![];
        let target = match &possession.via {
            None => node.clone(),
            Some(pointer) => {
                let target = match self.follow(node, pointer) {
                    Ok(target) => target,
                    Err(failure) => return failure,
                };
                if pointer != owner && possession.forward_pointer {
                    parts.push(self.adjective(node, pointer, level + 1));
                }
                target
            }
        };
        parts.push(if possession.explain_further {
            self.adjective(&target, &possession.adjective, level + 1)
        } else {
            self.statement(&target, &possession.adjective, level + 1)
        });
        Expr::and(parts).unwrap_or(Expr::And(vec![]))
    }

    fn group_comparison(&mut self, owner: &str, group: &GroupComparison, node: &N, level: u32) -> Expr {
        if self.beyond_depth(level + 1) {
            return Claim::unresolved(node.to_string(), &group.group).into();
        }
        let framework = self.framework;
        let members = match framework.evaluate_group(&group.group, node) {
            Ok(members) => members,
            Err(error) => return Self::evaluation_failure(&group.group, node, &error),
        };
        let base = match framework.adjective(&group.comparison).map(Adjective::kind) {
            Some(AdjectiveKind::Comparison { base, .. }) => Some(base.as_str()),
            _ => None,
        };
        let membership = (owner != group.group).then(|| self.adjective(node, &group.group, level + 1));

        let mut holding = 0;
        let mut undecided = false;
        let mut proofs = Vec::with_capacity(members.len());
        for member in &members {
            match framework.compare(&group.comparison, node, member) {
                Ok(true) => holding += 1,
                Ok(false) => {}
                Err(_) => undecided = true,
            }
            proofs.push(GroupMember {
                labels: vec![member.to_string()],
                relevance: base.and_then(|base| framework.evaluate_number(base, member).ok()),
                proof: self.comparison(node, member, &group.comparison, level + 1),
            });
        }
        let conclusion = if undecided {
            let quantifier = if group.positive { "every" } else { "any" };
            Claim::unresolved(
                node.to_string(),
                format!("{} than {quantifier} node in {}", group.comparison, group.group),
            )
        } else if group.positive {
            Claim::compared_to_group(node.to_string(), &group.comparison, &group.group, Quantifier::Every)
                .with_truth(holding == members.len())
        } else {
            Claim::compared_to_group(node.to_string(), &group.comparison, &group.group, Quantifier::NoneOf)
                .with_truth(holding == 0)
        };
        Expr::Group(Box::new(GroupProof {
            conclusion,
            membership,
            members: proofs,
            omitted: 0,
            depth: level + 1,
            origin: Origin::new(&group.comparison, OriginKind::Comparison),
        }))
    }

    fn conditional(
        &mut self,
        owner: &str,
        conditional: &ConditionalExplanation,
        node: &N,
        other: Option<&N>,
        level: u32,
    ) -> Expr {
        let Condition {
            adjective,
            via,
            expected,
        } = &conditional.condition;
        let mut condition = vec![];
        let subject = match via {
            None => node.clone(),
            Some(pointer) => {
                let target = match self.follow(node, pointer) {
                    Ok(target) => target,
                    Err(failure) => return failure,
                };
                if pointer != owner {
                    condition.push(self.adjective(node, pointer, level + 1));
                }
                target
            }
        };
        let holds = match self.framework.evaluate(adjective, &subject) {
            Ok(value) => value.matches(expected),
            Err(error) => return Self::evaluation_failure(adjective, &subject, &error),
        };
        condition.push(self.adjective(&subject, adjective, level + 1));
        let selected = if holds {
            &conditional.if_true
        } else {
            &conditional.if_false
        };
        let branch = self.template(owner, selected, node, other, level);
        Expr::Conditional(Box::new(ConditionalProof {
            owner: owner.to_owned(),
            condition: Expr::and(condition).unwrap_or(Expr::And(vec![])),
            branch,
        }))
    }

    fn recursive_possession(&mut self, recursive: &RecursivePossession, node: &N, level: u32) -> Expr {
        let RecursivePossession {
            pointer,
            adjective,
            until,
        } = recursive;
        let mut hops = vec![];
        let mut visited = vec![node.clone()];
        let mut current = node.clone();
        let mut hop_level = level;
        loop {
            match self.framework.evaluate(until, &current) {
                Ok(Value::Bool(true)) => break,
                Ok(_) => {}
                Err(error) => {
                    hops.push(Self::evaluation_failure(until, &current, &error));
                    return Expr::And(hops);
                }
            }
            hop_level += 1;
            if self.beyond_depth(hop_level) {
                hops.push(Claim::unresolved(current.to_string(), pointer).into());
                return Expr::and(hops).unwrap_or(Expr::And(vec![]));
            }
            let next = match self.follow(&current, pointer) {
                Ok(next) => next,
                Err(failure) => {
                    hops.push(failure);
                    return Expr::and(hops).unwrap_or(Expr::And(vec![]));
                }
            };
            hops.push(Claim::has(current.to_string(), pointer, next.to_string()).into());
            if visited.iter().any(|v| v.same_node(&next)) {
                warn!(pointer = %pointer, node = %next, "circular pointer chain cut");
                hops.push(Expr::Failure(format!(
                    "circular explanation: {next} is reached again through {pointer}"
                )));
                return Expr::And(hops);
            }
            visited.push(next.clone());
            current = next;
        }
        hops.push(self.adjective(&current, adjective, hop_level + 1));
        Expr::and(hops).unwrap_or(Expr::And(vec![]))
    }
}

#[cfg(test)]
mod tests {
    use argex_logic::render::{PrintMode, RenderOptions, render};

    use super::*;
    use crate::{
        adjective::ComparisonOperator,
        node::{Getter, GetterError, tests::TestNode},
        settings::SettingsPatch,
        tactic::Tactic,
    };

    fn framework() -> ArgumentationFramework<TestNode> {
        let mut framework = ArgumentationFramework::new("node");
        framework
            .add_adjectives([
                Adjective::boolean("flagged")
                    .with_getter(Getter::boolean(|n: &TestNode| n.0.flag))
                    .with_explanation(Explanation::assumption("flags are set by hand")),
                Adjective::quantitative("score")
                    .with_getter(Getter::number(|n: &TestNode| n.0.score))
                    .with_explanation(Explanation::assumption("scores are given")),
                Adjective::pointer("next")
                    .with_getter(Getter::node(|n: &TestNode| n.0.next.clone())),
                Adjective::nodes_group("group")
                    .with_getter(Getter::nodes(|n: &TestNode| n.0.group.clone())),
                Adjective::comparison("better", "score", ComparisonOperator::Greater),
                Adjective::max_rank("best", "better", "group"),
                Adjective::quantitative("inherited")
                    .with_getter(Getter::number(|n: &TestNode| n.0.score))
                    .with_explanation(Explanation::possession_via("next", "score")),
                Adjective::quantitative("chosen")
                    .with_getter(Getter::number(|n: &TestNode| n.0.score))
                    .with_explanation(Explanation::conditional(
                        Condition::holds("flagged"),
                        Explanation::assumption("flagged nodes keep their score"),
                        Explanation::possession_via("next", "score"),
                    )),
            ])
            .unwrap();
        framework
    }

    fn settings(patch: &SettingsPatch) -> Settings {
        let mut settings = Settings::default();
        settings.apply(&SettingsPatch::default().assumptions_verbosity(AssumptionsVerbosity::Verbose));
        settings.apply(patch);
        settings
    }

    fn explain(framework: &ArgumentationFramework<TestNode>, node: &TestNode, name: &str, patch: &SettingsPatch) -> String {
        let settings = settings(patch);
        let expr = Instantiation::new(framework, &settings).adjective(node, name, 1);
        render(&expr.normalize(), RenderOptions::new(PrintMode::Logic))
    }

    #[test]
    fn test_depth_zero_is_unresolved() {
        let framework = framework();
        let a = TestNode::new("a", 3.0);
        let patch = SettingsPatch::default().explanation_depth(0);
        assert_eq!(explain(&framework, &a, "best", &patch), "a has best = ?");
    }

    #[test]
    fn test_possession_through_pointer() {
        let framework = framework();
        let b = TestNode::new("b", 2.0);
        let a = TestNode::with("a", 3.0, false, Some(b), vec![]);
        assert_eq!(
            explain(&framework, &a, "inherited", &SettingsPatch::default()),
            "[a has next = b ∧ [(assumption) scores are given → b has score = 2] → a has inherited = 3]"
        );
        let lone = TestNode::new("lone", 1.0);
        assert_eq!(
            explain(&framework, &lone, "inherited", &SettingsPatch::default()),
            "[lone has no next → lone has inherited = 1]"
        );
    }

    #[test]
    fn test_depth_limits_nested_claims() {
        let framework = framework();
        let b = TestNode::new("b", 2.0);
        let a = TestNode::with("a", 3.0, false, Some(b), vec![]);
        let patch = SettingsPatch::default().explanation_depth(1);
        assert_eq!(
            explain(&framework, &a, "inherited", &patch),
            "[a has next = ? ∧ b has score = ? → a has inherited = 3]"
        );
    }

    #[test]
    fn test_assumption_verbosity() {
        let framework = framework();
        let a = TestNode::new("a", 3.0);
        let minimal = SettingsPatch::default().assumptions_verbosity(AssumptionsVerbosity::Minimal);
        assert_eq!(
            explain(&framework, &a, "score", &minimal),
            "[(from assumptions) → a has score = 3]"
        );
        let none = SettingsPatch::default().assumptions_verbosity(AssumptionsVerbosity::No);
        assert_eq!(explain(&framework, &a, "score", &none), "a has score = 3");

        let b = TestNode::new("b", 2.0);
        let with_next = TestNode::with("a", 3.0, false, Some(b), vec![]);
        let if_asked = SettingsPatch::default().assumptions_verbosity(AssumptionsVerbosity::IfAsked);
        assert_eq!(
            explain(&framework, &a, "score", &if_asked),
            "[(assumption) scores are given → a has score = 3]"
        );
        assert_eq!(
            explain(&framework, &with_next, "inherited", &if_asked),
            "[a has next = b ∧ b has score = 2 → a has inherited = 3]"
        );
    }

    #[test]
    fn test_implicit_assumptions_are_opt_in() {
        let framework = framework();
        let a = TestNode::new("a", 3.0);
        let b = TestNode::with("b", 1.0, false, Some(a), vec![]);
        assert_eq!(
            explain(&framework, &b, "next", &SettingsPatch::default()),
            "b has next = a"
        );
        let patch = SettingsPatch::default().print_implicit_assumptions(true);
        assert_eq!(
            explain(&framework, &b, "next", &patch),
            "[(assumption) Definition of \"next\" → b has next = a]"
        );
    }

    #[test]
    fn test_conditional_states_its_condition() {
        let framework = framework();
        let b = TestNode::new("b", 2.0);
        let flagged = TestNode::with("a", 3.0, true, Some(b.clone()), vec![]);
        assert_eq!(
            explain(&framework, &flagged, "chosen", &SettingsPatch::default()),
            "[[(assumption) flags are set by hand → a is flagged] ∧ (assumption) flagged nodes keep their score → a has chosen = 3]"
        );
        let plain = TestNode::with("a", 3.0, false, Some(b), vec![]);
        assert_eq!(
            explain(&framework, &plain, "chosen", &SettingsPatch::default()),
            "[[(assumption) flags are set by hand → ¬(a is flagged)] ∧ a has next = b ∧ [(assumption) scores are given → b has score = 2] → a has chosen = 3]"
        );
    }

    #[test]
    fn test_group_comparison() {
        let framework = framework();
        let b = TestNode::new("b", 2.0);
        let c = TestNode::new("c", 1.0);
        let a = TestNode::with("a", 3.0, false, None, vec![b, c]);
        let settings = settings(&SettingsPatch::default());
        let expr = Instantiation::new(&framework, &settings).adjective(&a, "best", 1);
        let Expr::Implies(implication) = &expr else {
            panic!("a rank is explained by an implication");
        };
        let Expr::Group(group) = &implication.premise else {
            panic!("without implicit assumptions the premise is the group proof alone");
        };
        assert_eq!(group.members.len(), 2);
        assert_eq!(group.members[0].relevance, Some(2.0));
        assert!(!group.conclusion.is_negated());
        assert_eq!(
            render(&expr, RenderOptions::new(PrintMode::Verbal)),
            "a is best (because a is better than every node in group (because a has group = b, c, \
             a is better than b (because a has score = 3 (because (assumption) scores are given) \
             and b has score = 2 (because (assumption) scores are given)) and \
             a is better than c (because a has score = 3 (because (assumption) scores are given) \
             and c has score = 1 (because (assumption) scores are given))))"
        );
    }

    #[test]
    fn test_cycles_are_cut() {
        let mut framework = framework();
        framework
            .add_adjective(
                Adjective::boolean("selfish")
                    .with_getter(Getter::boolean(|_: &TestNode| true))
                    .with_explanation(Explanation::possession("selfish")),
            )
            .unwrap();
        let a = TestNode::new("a", 3.0);
        assert_eq!(
            explain(&framework, &a, "selfish", &SettingsPatch::default()),
            "[circular explanation: \"selfish\" on a depends on itself → a is selfish]"
        );
    }

    #[test]
    fn test_evaluation_failures_stay_local() {
        let mut framework = framework();
        framework
            .set_getter("score", Getter::new(|_: &TestNode| Err(GetterError::new("no score"))))
            .unwrap();
        let b = TestNode::new("b", 2.0);
        let a = TestNode::with("a", 3.0, false, Some(b), vec![]);
        assert_eq!(
            explain(&framework, &a, "inherited", &SettingsPatch::default()),
            "[a has next = b ∧ the adjective \"score\" cannot be evaluated on b (no score) → a has inherited = 3]"
        );
    }

    #[test]
    fn test_recursive_possession() {
        let mut framework = framework();
        framework
            .add_adjective(
                Adjective::quantitative("outcome")
                    .with_getter(Getter::number(|n: &TestNode| n.0.score))
                    .with_explanation(Explanation::recursive_possession("next", "score", "flagged")),
            )
            .unwrap();
        let end = TestNode::with("end", 7.0, true, None, vec![]);
        let mid = TestNode::with("mid", 5.0, false, Some(end), vec![]);
        let start = TestNode::with("start", 1.0, false, Some(mid), vec![]);
        assert_eq!(
            explain(&framework, &start, "outcome", &SettingsPatch::default()),
            "[start has next = mid ∧ mid has next = end ∧ [(assumption) scores are given → end has score = 7] → start has outcome = 1]"
        );
        let dead_end = TestNode::new("dead", 0.0);
        assert_eq!(
            explain(&framework, &dead_end, "outcome", &SettingsPatch::default()),
            "[dead has no next → dead has outcome = 0]"
        );
    }

    #[test]
    fn test_adjective_tactics_apply_to_their_implication() {
        let mut framework = framework();
        framework
            .add_adjective_tactic("inherited", Tactic::SkipQuantitativeExplanations)
            .unwrap();
        let b = TestNode::new("b", 2.0);
        let a = TestNode::with("a", 3.0, false, Some(b), vec![]);
        assert_eq!(
            explain(&framework, &a, "inherited", &SettingsPatch::default()),
            "a has inherited = 3"
        );
    }

    #[test]
    fn test_comparison_through_pointer() {
        let mut framework = framework();
        framework
            .add_adjective(
                Adjective::boolean("ahead")
                    .with_getter(Getter::boolean(|_: &TestNode| true))
                    .with_explanation(Explanation::comparison("better", "next")),
            )
            .unwrap();
        let b = TestNode::new("b", 2.0);
        let a = TestNode::with("a", 3.0, false, Some(b), vec![]);
        assert_eq!(
            explain(&framework, &a, "ahead", &SettingsPatch::default()),
            "[[[(assumption) scores are given → a has score = 3] ∧ [(assumption) scores are given → b has score = 2] \
             → a is better than b] → a is ahead]"
        );
        let lone = TestNode::new("lone", 1.0);
        assert_eq!(
            explain(&framework, &lone, "ahead", &SettingsPatch::default()),
            "[lone has no next → lone is ahead]"
        );
    }

    #[test]
    fn test_condition_through_pointer_on_a_number() {
        let mut framework = framework();
        framework
            .add_adjective(
                Adjective::boolean("guarded")
                    .with_getter(Getter::boolean(|_: &TestNode| true))
                    .with_explanation(Explanation::conditional(
                        Condition::holds("score").via("next").equals(2.0),
                        Explanation::assumption("next scores two"),
                        Explanation::assumption("next scores otherwise"),
                    )),
            )
            .unwrap();
        let if_asked = SettingsPatch::default().assumptions_verbosity(AssumptionsVerbosity::IfAsked);
        let two = TestNode::with("a", 3.0, false, Some(TestNode::new("b", 2.0)), vec![]);
        assert_eq!(
            explain(&framework, &two, "guarded", &if_asked),
            "[a has next = b ∧ b has score = 2 ∧ (assumption) next scores two → a is guarded]"
        );
        let one = TestNode::with("a", 3.0, false, Some(TestNode::new("b", 1.0)), vec![]);
        assert_eq!(
            explain(&framework, &one, "guarded", &if_asked),
            "[a has next = b ∧ b has score = 1 ∧ (assumption) next scores otherwise → a is guarded]"
        );
    }

    #[test]
    fn test_group_conclusion_is_unresolved_when_a_comparison_fails() {
        let mut framework = framework();
        framework
            .add_adjective(
                Adjective::boolean("humble")
                    .with_getter(Getter::boolean(|_: &TestNode| true))
                    .with_explanation(Explanation::negative_group_comparison("better", "group")),
            )
            .unwrap();
        framework
            .set_getter(
                "score",
                Getter::new(|n: &TestNode| match n.0.label {
                    "broken" => Err(GetterError::new("no score")),
                    _ => Ok(Value::Number(n.0.score)),
                }),
            )
            .unwrap();
        let b = TestNode::new("b", 2.0);
        let broken = TestNode::new("broken", 0.0);
        let a = TestNode::with("a", 1.0, false, None, vec![b, broken]);
        let settings = settings(&SettingsPatch::default());
        let expr = Instantiation::new(&framework, &settings).adjective(&a, "humble", 1);
        let Expr::Implies(implication) = &expr else {
            panic!("a boolean adjective is explained by an implication");
        };
        let Expr::Group(group) = &implication.premise else {
            panic!("the premise is the group proof");
        };
        assert!(group.conclusion.is_unresolved());
        assert_eq!(group.conclusion.logic_text(), "a has better than any node in group = ?");
        assert_eq!(group.members.len(), 2);
    }

    #[test]
    fn test_same_comparison_against_another_node_is_not_circular() {
        let mut framework = framework();
        framework
            .add_adjective(
                Adjective::comparison("higher", "score", ComparisonOperator::Greater).with_explanation(
                    Explanation::composite([
                        Explanation::compared_possession("score"),
                        Explanation::comparison("higher", "next"),
                    ]),
                ),
            )
            .unwrap();
        let c = TestNode::new("c", 1.0);
        let a = TestNode::with("a", 3.0, false, Some(c), vec![]);
        let b = TestNode::new("b", 2.0);
        let settings = settings(&SettingsPatch::default());
        let expr = Instantiation::new(&framework, &settings).comparison(&a, &b, "higher", 1);
        let text = render(&expr.normalize(), RenderOptions::new(PrintMode::Logic));
        assert!(text.ends_with("→ a is higher than b]"), "{text}");
        assert!(text.contains("→ a is higher than c]"), "{text}");
        assert_eq!(
            text.matches("circular explanation: \"higher than c\" on a depends on itself")
                .count(),
            1,
            "{text}"
        );
        assert!(!text.contains("\"higher than b\" on a"), "{text}");
    }
}
