//! Explanation templates.
//!
//! Templates are declared once per adjective and describe *why* the adjective
//! holds in terms of other adjectives. They never mention a concrete node:
//! they are instantiated against one when an explanation is requested.

use crate::{
    adjective::{ComparisonOperator, RankKind},
    node::Literal,
};

/// What an assumption states.
#[derive(Debug, Clone, PartialEq)]
pub enum AssumptionKind {
    /// Text supplied by the framework author.
    Stated(String),
    /// The definition of a getter-backed adjective.
    Definition {
        adjective: String,
        definition: Option<String>,
    },
    /// The definition of a comparison adjective.
    Comparison {
        adjective: String,
        base: String,
        operator: ComparisonOperator,
    },
    /// The definition of a rank adjective.
    Rank {
        kind: RankKind,
        adjective: String,
        comparison: String,
        group: String,
    },
}

/// Terminal justification with no further adjective references.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumption {
    kind: AssumptionKind,
    implicit: bool,
    necessary: bool,
}

impl Assumption {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            kind: AssumptionKind::Stated(description.into()),
            implicit: false,
            necessary: false,
        }
    }

    /// Assumption printed verbosely whatever the verbosity setting.
    #[must_use]
    pub fn necessary(mut self) -> Self {
        self.necessary = true;
        self
    }

    /// Assumption printed only when implicit assumptions are asked for.
    #[must_use]
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    #[must_use]
    pub fn definition(adjective: impl Into<String>, definition: Option<String>) -> Self {
        Self {
            kind: AssumptionKind::Definition {
                adjective: adjective.into(),
                definition,
            },
            implicit: true,
            necessary: false,
        }
    }

    #[must_use]
    pub fn comparison(
        adjective: impl Into<String>,
        base: impl Into<String>,
        operator: ComparisonOperator,
    ) -> Self {
        Self {
            kind: AssumptionKind::Comparison {
                adjective: adjective.into(),
                base: base.into(),
                operator,
            },
            implicit: true,
            necessary: false,
        }
    }

    #[must_use]
    pub fn rank(
        kind: RankKind,
        adjective: impl Into<String>,
        comparison: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            kind: AssumptionKind::Rank {
                kind,
                adjective: adjective.into(),
                comparison: comparison.into(),
                group: group.into(),
            },
            implicit: true,
            necessary: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &AssumptionKind {
        &self.kind
    }

    #[must_use]
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    #[must_use]
    pub fn is_necessary(&self) -> bool {
        self.necessary
    }

    /// Human text of the assumption, naming nodes as `refer_to_nodes_as`.
    #[must_use]
    pub fn description(&self, refer_to_nodes_as: &str) -> String {
        let r = refer_to_nodes_as;
        match &self.kind {
            AssumptionKind::Stated(text) => text.clone(),
            AssumptionKind::Definition {
                adjective,
                definition: Some(definition),
            } => format!("Definition of \"{adjective}\" is {definition}"),
            AssumptionKind::Definition {
                adjective,
                definition: None,
            } => format!("Definition of \"{adjective}\""),
            AssumptionKind::Comparison {
                adjective,
                base,
                operator,
            } => format!(
                "By definition, {r}1 is \"{adjective}\" than {r}2 if {r}1 {base} {operator} {r}2 {base}"
            ),
            AssumptionKind::Rank {
                kind: RankKind::Max,
                adjective,
                comparison,
                group,
            } => format!(
                "By definition a {r} is \"{adjective}\" if it's \"{comparison}\" than all \"{group}\""
            ),
            AssumptionKind::Rank {
                kind: RankKind::Min,
                adjective,
                comparison,
                group,
            } => format!(
                "By definition a {r} is \"{adjective}\" if it's not \"{comparison}\" than any \"{group}\""
            ),
        }
    }
}

/// "The node (or the node reached through `via`) holds `adjective`."
#[derive(Debug, Clone, PartialEq)]
pub struct Possession {
    pub adjective: String,
    pub via: Option<String>,
    /// Explain why the target holds the adjective, not only state it.
    pub explain_further: bool,
    /// Also explain why the pointer points at the target.
    pub forward_pointer: bool,
}

/// "The node is `comparison` than the node reached through `pointer`."
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub comparison: String,
    pub pointer: String,
}

/// "The node is (or is not) `comparison` than every node in `group`."
#[derive(Debug, Clone, PartialEq)]
pub struct GroupComparison {
    pub comparison: String,
    pub group: String,
    pub positive: bool,
}

/// Boolean test selecting a branch of a conditional explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub adjective: String,
    pub via: Option<String>,
    pub expected: Literal,
}

impl Condition {
    /// The node itself holds the boolean adjective `adjective`.
    #[must_use]
    pub fn holds(adjective: impl Into<String>) -> Self {
        Self {
            adjective: adjective.into(),
            via: None,
            expected: Literal::Bool(true),
        }
    }

    /// Tests the node reached through `pointer` instead of the node itself.
    #[must_use]
    pub fn via(mut self, pointer: impl Into<String>) -> Self {
        self.via = Some(pointer.into());
        self
    }

    /// Compares the adjective value against `expected` instead of `true`.
    #[must_use]
    pub fn equals(mut self, expected: impl Into<Literal>) -> Self {
        self.expected = expected.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExplanation {
    pub condition: Condition,
    pub if_true: Explanation,
    pub if_false: Explanation,
}

/// Walks `pointer` from the node until `until` holds, then explains `adjective` there.
#[derive(Debug, Clone, PartialEq)]
pub struct RecursivePossession {
    pub pointer: String,
    pub adjective: String,
    pub until: String,
}

/// How an adjective reference found in a template is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceRole {
    Any,
    Boolean,
    Pointer,
    Quantitative,
    NodesGroup,
    Comparison,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Explanation {
    Assumption(Assumption),
    Possession(Possession),
    Comparison(Comparison),
    GroupComparison(GroupComparison),
    /// Both nodes of a comparison hold `adjective`. Only meaningful in the
    /// explanation of a comparison adjective.
    ComparedPossession(String),
    Composite(Vec<Explanation>),
    Conditional(Box<ConditionalExplanation>),
    RecursivePossession(RecursivePossession),
}

impl From<Assumption> for Explanation {
    fn from(assumption: Assumption) -> Self {
        Explanation::Assumption(assumption)
    }
}

impl Explanation {
    #[must_use]
    pub fn assumption(description: impl Into<String>) -> Self {
        Explanation::Assumption(Assumption::new(description))
    }

    #[must_use]
    pub fn possession(adjective: impl Into<String>) -> Self {
        Explanation::Possession(Possession {
            adjective: adjective.into(),
            via: None,
            explain_further: true,
            forward_pointer: true,
        })
    }

    #[must_use]
    pub fn possession_via(pointer: impl Into<String>, adjective: impl Into<String>) -> Self {
        Explanation::Possession(Possession {
            adjective: adjective.into(),
            via: Some(pointer.into()),
            explain_further: true,
            forward_pointer: true,
        })
    }

    #[must_use]
    pub fn comparison(comparison: impl Into<String>, pointer: impl Into<String>) -> Self {
        Explanation::Comparison(Comparison {
            comparison: comparison.into(),
            pointer: pointer.into(),
        })
    }

    #[must_use]
    pub fn group_comparison(comparison: impl Into<String>, group: impl Into<String>) -> Self {
        Explanation::GroupComparison(GroupComparison {
            comparison: comparison.into(),
            group: group.into(),
            positive: true,
        })
    }

    /// "The node is not `comparison` than any node in `group`."
    #[must_use]
    pub fn negative_group_comparison(
        comparison: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Explanation::GroupComparison(GroupComparison {
            comparison: comparison.into(),
            group: group.into(),
            positive: false,
        })
    }

    #[must_use]
    pub fn compared_possession(adjective: impl Into<String>) -> Self {
        Explanation::ComparedPossession(adjective.into())
    }

    #[must_use]
    pub fn composite(explanations: impl IntoIterator<Item = Explanation>) -> Self {
        Explanation::Composite(explanations.into_iter().collect())
    }

    #[must_use]
    pub fn conditional(condition: Condition, if_true: Explanation, if_false: Explanation) -> Self {
        Explanation::Conditional(Box::new(ConditionalExplanation {
            condition,
            if_true,
            if_false,
        }))
    }

    #[must_use]
    pub fn recursive_possession(
        pointer: impl Into<String>,
        adjective: impl Into<String>,
        until: impl Into<String>,
    ) -> Self {
        Explanation::RecursivePossession(RecursivePossession {
            pointer: pointer.into(),
            adjective: adjective.into(),
            until: until.into(),
        })
    }

    /// Only state the possessed adjective, without explaining it.
    ///
    /// Has no effect on anything but a possession.
    #[must_use]
    pub fn without_further_explanation(mut self) -> Self {
        if let Explanation::Possession(p) = &mut self {
            p.explain_further = false;
        }
        self
    }

    /// Do not explain why the pointer of a possession points where it does.
    ///
    /// Has no effect on anything but a possession.
    #[must_use]
    pub fn without_pointer_explanation(mut self) -> Self {
        if let Explanation::Possession(p) = &mut self {
            p.forward_pointer = false;
        }
        self
    }

    /// Every adjective the template refers to, with the role it plays.
    #[must_use]
    pub fn references(&self) -> Vec<(&str, ReferenceRole)> {
        let mut out = vec![];
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<(&'a str, ReferenceRole)>) {
        match self {
            Explanation::Assumption(_) => {}
            Explanation::Possession(p) => {
                out.push((&p.adjective, ReferenceRole::Any));
                if let Some(via) = &p.via {
                    out.push((via, ReferenceRole::Pointer));
                }
            }
            Explanation::Comparison(c) => {
                out.push((&c.comparison, ReferenceRole::Comparison));
                out.push((&c.pointer, ReferenceRole::Pointer));
            }
            Explanation::GroupComparison(g) => {
                out.push((&g.comparison, ReferenceRole::Comparison));
                out.push((&g.group, ReferenceRole::NodesGroup));
            }
            Explanation::ComparedPossession(adjective) => {
                out.push((adjective, ReferenceRole::Quantitative));
            }
            Explanation::Composite(items) => {
                for item in items {
                    item.collect_references(out);
                }
            }
            Explanation::Conditional(c) => {
                out.push((&c.condition.adjective, ReferenceRole::Any));
                if let Some(via) = &c.condition.via {
                    out.push((via, ReferenceRole::Pointer));
                }
                c.if_true.collect_references(out);
                c.if_false.collect_references(out);
            }
            Explanation::RecursivePossession(r) => {
                out.push((&r.pointer, ReferenceRole::Pointer));
                out.push((&r.adjective, ReferenceRole::Any));
                out.push((&r.until, ReferenceRole::Boolean));
            }
        }
    }
}
