//! Adjectives: named, typed propositions about nodes.

use std::{borrow::Cow, str::FromStr};

use argex_logic::expr::OriginKind;

use crate::{
    error::ParseSettingError,
    explanation::{Assumption, Explanation},
    node::Getter,
    tactic::Tactic,
};

/// Arithmetic relation a comparison adjective applies to its base values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ComparisonOperator {
    #[display(">")]
    Greater,
    #[display("<")]
    Less,
    #[display("==")]
    Equal,
    #[display("!=")]
    NotEqual,
    #[display(">=")]
    GreaterOrEqual,
    #[display("<=")]
    LessOrEqual,
}

impl ComparisonOperator {
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOperator::Greater => lhs > rhs,
            ComparisonOperator::Less => lhs < rhs,
            ComparisonOperator::Equal => lhs == rhs,
            ComparisonOperator::NotEqual => lhs != rhs,
            ComparisonOperator::GreaterOrEqual => lhs >= rhs,
            ComparisonOperator::LessOrEqual => lhs <= rhs,
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(ComparisonOperator::Greater),
            "<" => Ok(ComparisonOperator::Less),
            "==" => Ok(ComparisonOperator::Equal),
            "!=" => Ok(ComparisonOperator::NotEqual),
            ">=" => Ok(ComparisonOperator::GreaterOrEqual),
            "<=" => Ok(ComparisonOperator::LessOrEqual),
            _ => Err(ParseSettingError {
                kind: "comparison operator",
                value: s.to_owned(),
                expected: ">, <, ==, !=, >=, <=",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RankKind {
    /// Beats every member of the group.
    #[display("max")]
    Max,
    /// Beats no member of the group.
    #[display("min")]
    Min,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjectiveKind {
    /// Getter returns a boolean.
    Boolean,
    /// Getter returns a single node, or nothing.
    Pointer,
    /// Getter returns a number.
    Quantitative,
    /// Getter returns a list of nodes; with `excluding_self` the subject is removed from it.
    NodesGroup { excluding_self: bool },
    /// Getter returns anything. Not listed among the framework's propositions.
    Auxiliary,
    /// `operator(base(a), base(b))` over two nodes.
    Comparison {
        base: String,
        operator: ComparisonOperator,
    },
    /// Compares the node against every member of `group` with `comparison`.
    Rank {
        kind: RankKind,
        comparison: String,
        group: String,
    },
}

impl AdjectiveKind {
    #[must_use]
    pub fn origin_kind(&self) -> OriginKind {
        match self {
            AdjectiveKind::Boolean => OriginKind::Boolean,
            AdjectiveKind::Pointer => OriginKind::Pointer,
            AdjectiveKind::Quantitative => OriginKind::Quantitative,
            AdjectiveKind::NodesGroup { .. } => OriginKind::NodesGroup,
            AdjectiveKind::Auxiliary => OriginKind::Auxiliary,
            AdjectiveKind::Comparison { .. } => OriginKind::Comparison,
            AdjectiveKind::Rank { .. } => OriginKind::Rank,
        }
    }

    /// Human name of the kind, used in validation messages.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            AdjectiveKind::Boolean => "a boolean adjective",
            AdjectiveKind::Pointer => "a pointer adjective",
            AdjectiveKind::Quantitative => "a quantitative adjective",
            AdjectiveKind::NodesGroup { .. } => "a nodes group adjective",
            AdjectiveKind::Auxiliary => "an auxiliary adjective",
            AdjectiveKind::Comparison { .. } => "a comparison adjective",
            AdjectiveKind::Rank { .. } => "a rank adjective",
        }
    }
}

/// A named property of nodes, with its evaluation rule and justification template.
#[derive(Debug, Clone)]
pub struct Adjective<N> {
    name: String,
    kind: AdjectiveKind,
    getter: Option<Getter<N>>,
    definition: Option<String>,
    explanation: Option<Explanation>,
    tactics: Vec<Tactic>,
}

impl<N> Adjective<N> {
    fn with_kind(name: impl Into<String>, kind: AdjectiveKind) -> Self {
        Self {
            name: name.into(),
            kind,
            getter: None,
            definition: None,
            explanation: None,
            tactics: vec![],
        }
    }

    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::with_kind(name, AdjectiveKind::Boolean)
    }

    #[must_use]
    pub fn pointer(name: impl Into<String>) -> Self {
        Self::with_kind(name, AdjectiveKind::Pointer)
    }

    #[must_use]
    pub fn quantitative(name: impl Into<String>) -> Self {
        Self::with_kind(name, AdjectiveKind::Quantitative)
    }

    #[must_use]
    pub fn nodes_group(name: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            AdjectiveKind::NodesGroup {
                excluding_self: false,
            },
        )
    }

    #[must_use]
    pub fn auxiliary(name: impl Into<String>) -> Self {
        Self::with_kind(name, AdjectiveKind::Auxiliary)
    }

    #[must_use]
    pub fn comparison(
        name: impl Into<String>,
        base: impl Into<String>,
        operator: ComparisonOperator,
    ) -> Self {
        Self::with_kind(
            name,
            AdjectiveKind::Comparison {
                base: base.into(),
                operator,
            },
        )
    }

    #[must_use]
    pub fn max_rank(
        name: impl Into<String>,
        comparison: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            name,
            AdjectiveKind::Rank {
                kind: RankKind::Max,
                comparison: comparison.into(),
                group: group.into(),
            },
        )
    }

    #[must_use]
    pub fn min_rank(
        name: impl Into<String>,
        comparison: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            name,
            AdjectiveKind::Rank {
                kind: RankKind::Min,
                comparison: comparison.into(),
                group: group.into(),
            },
        )
    }

    #[must_use]
    pub fn with_getter(mut self, getter: Getter<N>) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Human-readable definition, quoted by the implicit definition assumption.
    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<Explanation>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Removes the subject from the group returned by the getter.
    ///
    /// Has no effect on anything but a nodes group adjective.
    #[must_use]
    pub fn excluding_self(mut self) -> Self {
        if let AdjectiveKind::NodesGroup { excluding_self } = &mut self.kind {
            *excluding_self = true;
        }
        self
    }

    /// Tactic applied whenever this adjective is explained.
    #[must_use]
    pub fn with_tactic(mut self, tactic: Tactic) -> Self {
        self.tactics.push(tactic);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    #[must_use]
    pub fn kind(&self) -> &AdjectiveKind {
        &self.kind
    }

    #[must_use]
    pub fn getter(&self) -> Option<&Getter<N>> {
        self.getter.as_ref()
    }

    pub fn set_getter(&mut self, getter: Getter<N>) {
        self.getter = Some(getter);
    }

    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// The template given by the author, if any.
    #[must_use]
    pub fn explanation(&self) -> Option<&Explanation> {
        self.explanation.as_ref()
    }

    #[must_use]
    pub fn tactics(&self) -> &[Tactic] {
        &self.tactics
    }

    pub(crate) fn push_tactic(&mut self, tactic: Tactic) {
        self.tactics.push(tactic);
    }

    /// Auxiliary adjectives are not listed as propositions of the framework.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.kind != AdjectiveKind::Auxiliary
    }

    #[must_use]
    pub fn is_comparison(&self) -> bool {
        matches!(self.kind, AdjectiveKind::Comparison { .. })
    }

    /// The template used to explain this adjective.
    ///
    /// Adjectives without an author template are explained by their own
    /// definition: an implicit definition assumption for getter-backed
    /// adjectives, the comparison definition plus both base values for
    /// comparisons, the rank definition plus the group comparison for ranks.
    #[must_use]
    pub fn effective_explanation(&self) -> Cow<'_, Explanation> {
        if let Some(explanation) = &self.explanation {
            return Cow::Borrowed(explanation);
        }
        let explanation = match &self.kind {
            AdjectiveKind::Comparison { base, operator } => Explanation::composite([
                Assumption::comparison(&self.name, base, *operator).into(),
                Explanation::compared_possession(base),
            ]),
            AdjectiveKind::Rank {
                kind,
                comparison,
                group,
            } => {
                let group_comparison = match kind {
                    RankKind::Max => Explanation::group_comparison(comparison, group),
                    RankKind::Min => Explanation::negative_group_comparison(comparison, group),
                };
                Explanation::composite([
                    Assumption::rank(*kind, &self.name, comparison, group).into(),
                    group_comparison,
                ])
            }
            _ => Assumption::definition(&self.name, self.definition.clone()).into(),
        };
        Cow::Owned(explanation)
    }
}
