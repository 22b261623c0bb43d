//! Argumentation frameworks: named vocabularies of adjectives.

use std::fmt;

use argex_logic::claim::Claim;
use tracing::trace;

use crate::{
    adjective::{Adjective, AdjectiveKind, RankKind},
    error::{EvaluationError, FrameworkError},
    explanation::{Condition, Explanation, Possession, ReferenceRole},
    node::{Getter, Node, Value},
    settings::SettingsPatch,
    tactic::Tactic,
};

/// A set of adjectives, tactics and default settings used to explain
/// decisions to one audience.
#[derive(Debug, Clone)]
pub struct ArgumentationFramework<N> {
    refer_to_nodes_as: String,
    adjectives: Vec<Adjective<N>>,
    tactics: Vec<Tactic>,
    settings: SettingsPatch,
    main_adjective: Option<String>,
}

impl<N> ArgumentationFramework<N>
where
    N: Node,
{
    /// Creates an empty framework; nodes are called `refer_to_nodes_as` in generated text.
    #[must_use]
    pub fn new(refer_to_nodes_as: impl Into<String>) -> Self {
        Self {
            refer_to_nodes_as: refer_to_nodes_as.into(),
            adjectives: vec![],
            tactics: vec![],
            settings: SettingsPatch::default(),
            main_adjective: None,
        }
    }

    /// Framework defaults, applied before the explainer's own settings.
    #[must_use]
    pub fn with_settings(mut self, settings: SettingsPatch) -> Self {
        self.settings = settings;
        self
    }

    /// The adjective that motivates decisions (e.g. "best").
    #[must_use]
    pub fn with_main_adjective(mut self, name: impl Into<String>) -> Self {
        self.main_adjective = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_tactic(mut self, tactic: Tactic) -> Self {
        self.tactics.push(tactic);
        self
    }

    #[must_use]
    pub fn refer_to_nodes_as(&self) -> &str {
        &self.refer_to_nodes_as
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsPatch {
        &self.settings
    }

    #[must_use]
    pub fn main_adjective(&self) -> Option<&str> {
        self.main_adjective.as_deref()
    }

    /// Framework-wide tactics, in application order.
    #[must_use]
    pub fn tactics(&self) -> &[Tactic] {
        &self.tactics
    }

    pub fn adjectives(&self) -> impl Iterator<Item = &Adjective<N>> {
        self.adjectives.iter()
    }

    #[must_use]
    pub fn adjective(&self, name: &str) -> Option<&Adjective<N>> {
        self.adjectives.iter().find(|a| a.name() == name)
    }

    fn adjective_mut(&mut self, name: &str) -> Result<&mut Adjective<N>, FrameworkError> {
        self.adjectives
            .iter_mut()
            .find(|a| a.name() == name)
            .ok_or_else(|| FrameworkError::UnknownAdjective {
                name: name.to_owned(),
            })
    }

    pub fn get_adjective(&self, name: &str) -> Result<&Adjective<N>, FrameworkError> {
        self.adjective(name)
            .ok_or_else(|| FrameworkError::UnknownAdjective {
                name: name.to_owned(),
            })
    }

    pub fn add_adjective(&mut self, adjective: Adjective<N>) -> Result<(), FrameworkError> {
        if adjective.name().is_empty() {
            return Err(FrameworkError::EmptyName);
        }
        if self.adjective(adjective.name()).is_some() {
            return Err(FrameworkError::DuplicateAdjective {
                name: adjective.name().to_owned(),
            });
        }
        self.adjectives.push(adjective);
        Ok(())
    }

    pub fn add_adjectives<I>(&mut self, adjectives: I) -> Result<(), FrameworkError>
    where
        I: IntoIterator<Item = Adjective<N>>,
    {
        for adjective in adjectives {
            self.add_adjective(adjective)?;
        }
        Ok(())
    }

    pub fn remove_adjective(&mut self, name: &str) -> Result<Adjective<N>, FrameworkError> {
        let index = self
            .adjectives
            .iter()
            .position(|a| a.name() == name)
            .ok_or_else(|| FrameworkError::UnknownAdjective {
                name: name.to_owned(),
            })?;
        Ok(self.adjectives.remove(index))
    }

    /// Renames an adjective. References to the old name in other templates
    /// are left as they are; [`Self::validate`] reports them.
    pub fn rename_adjective(&mut self, name: &str, new_name: &str) -> Result<(), FrameworkError> {
        if new_name.is_empty() {
            return Err(FrameworkError::EmptyName);
        }
        if name != new_name && self.adjective(new_name).is_some() {
            return Err(FrameworkError::DuplicateAdjective {
                name: new_name.to_owned(),
            });
        }
        self.adjective_mut(name)?.set_name(new_name.to_owned());
        if self.main_adjective.as_deref() == Some(name) {
            self.main_adjective = Some(new_name.to_owned());
        }
        Ok(())
    }

    pub fn set_getter(&mut self, name: &str, getter: Getter<N>) -> Result<(), FrameworkError> {
        self.adjective_mut(name)?.set_getter(getter);
        Ok(())
    }

    pub fn add_tactic(&mut self, tactic: Tactic) {
        self.tactics.push(tactic);
    }

    /// Adds a tactic applied only when `name` is explained.
    pub fn add_adjective_tactic(&mut self, name: &str, tactic: Tactic) -> Result<(), FrameworkError> {
        self.adjective_mut(name)?.push_tactic(tactic);
        Ok(())
    }

    /// Checks that every adjective, template and tactic reference resolves to
    /// an adjective of a suitable kind.
    pub fn validate(&self) -> Result<(), FrameworkError> {
        let check = |owner: &str, reference: &str, role: ReferenceRole| {
            let Some(target) = self.adjective(reference) else {
                return Err(FrameworkError::MalformedExplanation {
                    adjective: owner.to_owned(),
                    reference: reference.to_owned(),
                });
            };
            let expected = match (role, target.kind()) {
                (ReferenceRole::Any, _)
                | (ReferenceRole::Boolean, AdjectiveKind::Boolean | AdjectiveKind::Rank { .. })
                | (ReferenceRole::Pointer, AdjectiveKind::Pointer)
                | (ReferenceRole::Quantitative, AdjectiveKind::Quantitative)
                | (ReferenceRole::NodesGroup, AdjectiveKind::NodesGroup { .. })
                | (ReferenceRole::Comparison, AdjectiveKind::Comparison { .. }) => return Ok(()),
                (ReferenceRole::Boolean, _) => "a boolean adjective",
                (ReferenceRole::Pointer, _) => "a pointer adjective",
                (ReferenceRole::Quantitative, _) => "a quantitative adjective",
                (ReferenceRole::NodesGroup, _) => "a nodes group adjective",
                (ReferenceRole::Comparison, _) => "a comparison adjective",
            };
            Err(FrameworkError::WrongKind {
                adjective: owner.to_owned(),
                reference: reference.to_owned(),
                expected,
                found: target.kind().describe(),
            })
        };

        if let Some(main) = &self.main_adjective {
            self.get_adjective(main)?;
        }
        for tactic in &self.tactics {
            for reference in tactic.references() {
                self.get_adjective(reference)?;
            }
        }
        for adjective in &self.adjectives {
            let owner = adjective.name();
            match adjective.kind() {
                AdjectiveKind::Comparison { base, .. } => {
                    check(owner, base, ReferenceRole::Quantitative)?;
                }
                AdjectiveKind::Rank {
                    comparison, group, ..
                } => {
                    check(owner, comparison, ReferenceRole::Comparison)?;
                    check(owner, group, ReferenceRole::NodesGroup)?;
                }
                _ => {}
            }
            for (reference, role) in adjective.effective_explanation().references() {
                check(owner, reference, role)?;
            }
            for tactic in adjective.tactics() {
                for reference in tactic.references() {
                    self.get_adjective(reference)?;
                }
            }
        }
        Ok(())
    }

    /// Raw value of adjective `name` on `node`.
    pub fn evaluate(&self, name: &str, node: &N) -> Result<Value<N>, EvaluationError> {
        let adjective = self
            .adjective(name)
            .ok_or_else(|| EvaluationError::UnknownReference {
                adjective: name.to_owned(),
            })?;
        trace!(adjective = name, %node, "evaluating adjective");
        match adjective.kind() {
            AdjectiveKind::Comparison { .. } => Err(EvaluationError::RequiresTwoNodes {
                adjective: name.to_owned(),
            }),
            AdjectiveKind::Rank {
                kind,
                comparison,
                group,
            } => {
                let members = self
                    .evaluate_group(group, node)
                    .map_err(|e| EvaluationError::dependent(name, node, group, e))?;
                for member in &members {
                    let holds = self
                        .compare(comparison, node, member)
                        .map_err(|e| EvaluationError::dependent(name, node, comparison, e))?;
                    let satisfied = match kind {
                        RankKind::Max => holds,
                        RankKind::Min => !holds,
                    };
                    if !satisfied {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(Value::Bool(true))
            }
            kind => {
                let getter = adjective
                    .getter()
                    .ok_or_else(|| EvaluationError::MissingGetter {
                        adjective: name.to_owned(),
                    })?;
                let value = getter
                    .call(node)
                    .map_err(|source| EvaluationError::Getter {
                        adjective: name.to_owned(),
                        node: node.to_string(),
                        source,
                    })?;
                let expected = match (kind, &value) {
                    (AdjectiveKind::Boolean, Value::Bool(_))
                    | (AdjectiveKind::Pointer, Value::Node(_) | Value::None)
                    | (AdjectiveKind::Quantitative, Value::Number(_))
                    | (AdjectiveKind::NodesGroup { .. }, Value::Nodes(_))
                    | (AdjectiveKind::Auxiliary, _) => None,
                    (AdjectiveKind::Boolean, _) => Some("a boolean"),
                    (AdjectiveKind::Pointer, _) => Some("a node"),
                    (AdjectiveKind::Quantitative, _) => Some("a number"),
                    _ => Some("a list of nodes"),
                };
                if let Some(expected) = expected {
                    return Err(EvaluationError::UnexpectedValue {
                        adjective: name.to_owned(),
                        node: node.to_string(),
                        expected,
                        found: value.kind_name(),
                    });
                }
                match (kind, value) {
                    (AdjectiveKind::NodesGroup { excluding_self: true }, Value::Nodes(nodes)) => {
                        Ok(Value::Nodes(
                            nodes.into_iter().filter(|n| !n.same_node(node)).collect(),
                        ))
                    }
                    (_, value) => Ok(value),
                }
            }
        }
    }

    /// Members of the nodes group `name` on `node`.
    pub fn evaluate_group(&self, name: &str, node: &N) -> Result<Vec<N>, EvaluationError> {
        match self.evaluate(name, node)? {
            Value::Nodes(nodes) => Ok(nodes),
            other => Err(EvaluationError::UnexpectedValue {
                adjective: name.to_owned(),
                node: node.to_string(),
                expected: "a list of nodes",
                found: other.kind_name(),
            }),
        }
    }

    /// Number value of the quantitative adjective `name` on `node`.
    pub fn evaluate_number(&self, name: &str, node: &N) -> Result<f64, EvaluationError> {
        let value = self.evaluate(name, node)?;
        value
            .as_number()
            .ok_or_else(|| EvaluationError::UnexpectedValue {
                adjective: name.to_owned(),
                node: node.to_string(),
                expected: "a number",
                found: value.kind_name(),
            })
    }

    /// Whether `a` is `name` than `b`, for the comparison adjective `name`.
    pub fn compare(&self, name: &str, a: &N, b: &N) -> Result<bool, EvaluationError> {
        let adjective = self
            .adjective(name)
            .ok_or_else(|| EvaluationError::UnknownReference {
                adjective: name.to_owned(),
            })?;
        let AdjectiveKind::Comparison { base, operator } = adjective.kind() else {
            return Err(EvaluationError::NotAComparison {
                adjective: name.to_owned(),
            });
        };
        trace!(adjective = name, %a, %b, "comparing nodes");
        let lhs = self
            .evaluate_number(base, a)
            .map_err(|e| EvaluationError::dependent(name, a, base, e))?;
        let rhs = self
            .evaluate_number(base, b)
            .map_err(|e| EvaluationError::dependent(name, b, base, e))?;
        Ok(operator.apply(lhs, rhs))
    }

    /// The proposition stating that `node` has `value` for `adjective`.
    #[must_use]
    pub fn claim(&self, adjective: &Adjective<N>, node: &N, value: &Value<N>) -> Claim {
        match (adjective.kind(), value) {
            (AdjectiveKind::Boolean | AdjectiveKind::Rank { .. }, Value::Bool(truth)) => {
                Claim::is(node.to_string(), adjective.name()).with_truth(*truth)
            }
            _ => Claim::has(node.to_string(), adjective.name(), value.to_string()),
        }
    }

    fn abstract_proposition(&self, name: &str, subject: &str) -> String {
        match self.adjective(name).map(Adjective::kind) {
            Some(AdjectiveKind::Boolean | AdjectiveKind::Rank { .. }) => {
                format!("{subject} is {name}")
            }
            Some(AdjectiveKind::Comparison { .. }) => {
                format!("{subject}1 is {name} than {subject}2")
            }
            _ => format!("{subject} has {name}"),
        }
    }

    fn abstract_condition(&self, condition: &Condition, subject: &str) -> String {
        let (prefix, subject) = match &condition.via {
            Some(via) => (format!("{subject} has {via} ∧ "), via.as_str()),
            None => (String::new(), subject),
        };
        let statement = match &condition.expected {
            crate::node::Literal::Bool(true) => self.abstract_proposition(&condition.adjective, subject),
            crate::node::Literal::Bool(false) => {
                format!("¬({})", self.abstract_proposition(&condition.adjective, subject))
            }
            expected => format!("{subject} has {} = {expected}", condition.adjective),
        };
        format!("{prefix}{statement}")
    }

    /// Premise of the abstract implication of a template, in logic notation.
    fn abstract_premise(&self, owner: &str, explanation: &Explanation) -> String {
        let r = &self.refer_to_nodes_as;
        match explanation {
            Explanation::Assumption(assumption) => {
                format!("(assumption) {}", assumption.description(r))
            }
            Explanation::Possession(Possession {
                adjective, via: None, ..
            }) => self.abstract_proposition(adjective, r),
            Explanation::Possession(Possession {
                adjective,
                via: Some(via),
                forward_pointer,
                ..
            }) => {
                let target = self.abstract_proposition(adjective, via);
                if via == owner || !forward_pointer {
                    target
                } else {
                    format!("{r} has {via} ∧ {target}")
                }
            }
            Explanation::Comparison(c) => format!("{r} is {} than {}", c.comparison, c.pointer),
            Explanation::GroupComparison(g) if g.positive => {
                format!("{r} is {} than every node in {}", g.comparison, g.group)
            }
            Explanation::GroupComparison(g) => {
                format!("{r} is not {} than any node in {}", g.comparison, g.group)
            }
            Explanation::ComparedPossession(adjective) => {
                format!("{r}1 has {adjective} ∧ {r}2 has {adjective}")
            }
            Explanation::Composite(items) => items
                .iter()
                .map(|item| match item {
                    Explanation::Conditional(_) => {
                        format!("({})", self.abstract_premise(owner, item))
                    }
                    _ => self.abstract_premise(owner, item),
                })
                .collect::<Vec<_>>()
                .join(" ∧ "),
            Explanation::Conditional(c) => {
                let condition = self.abstract_condition(&c.condition, r);
                format!(
                    "({condition} ∧ {}) ∨ (¬({condition}) ∧ {})",
                    self.abstract_premise(owner, &c.if_true),
                    self.abstract_premise(owner, &c.if_false)
                )
            }
            Explanation::RecursivePossession(p) => format!(
                "{r} reaches a {until} {r} through {pointer} ∧ {target}",
                until = p.until,
                pointer = p.pointer,
                target = self.abstract_proposition(&p.adjective, &format!("that {r}")),
            ),
        }
    }
}

impl<N> fmt::Display for ArgumentationFramework<N>
where
    N: Node,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.refer_to_nodes_as;
        writeln!(f, "Propositions:")?;
        for adjective in self.adjectives.iter().filter(|a| a.is_public()) {
            writeln!(f, "  {}", self.abstract_proposition(adjective.name(), r))?;
        }
        writeln!(f, "Implications:")?;
        for adjective in &self.adjectives {
            let premise = self.abstract_premise(adjective.name(), &adjective.effective_explanation());
            writeln!(
                f,
                "  {premise} → {}",
                self.abstract_proposition(adjective.name(), r)
            )?;
        }
        let scoped = self
            .adjectives
            .iter()
            .flat_map(|a| a.tactics().iter().map(move |t| (t, Some(a.name()))));
        let tactics: Vec<_> = scoped
            .chain(self.tactics.iter().map(|t| (t, None)))
            .collect();
        if !tactics.is_empty() {
            writeln!(f, "Tactics:")?;
            for (tactic, adjective) in tactics {
                match adjective {
                    Some(adjective) => writeln!(f, "  {} on \"{adjective}\"", tactic.name())?,
                    None => writeln!(f, "  {}", tactic.name())?,
                }
            }
        }
        Ok(())
    }
}
