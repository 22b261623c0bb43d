//! Instantiated proof trees.

use crate::claim::Claim;

/// Kind of adjective an implication concludes about.
///
/// Tactics use it to decide which sub-proofs to rewrite without knowing the
/// adjectives themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginKind {
    Boolean,
    Pointer,
    Quantitative,
    NodesGroup,
    Comparison,
    Rank,
    Auxiliary,
}

/// The adjective an implication was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Origin {
    pub adjective: String,
    pub kind: OriginKind,
}

impl Origin {
    #[must_use]
    pub fn new(adjective: impl Into<String>, kind: OriginKind) -> Self {
        Self {
            adjective: adjective.into(),
            kind,
        }
    }
}

/// `premise → conclusion`, one "because" step of a proof.
#[derive(Debug, Clone, PartialEq)]
pub struct Implication {
    pub premise: Expr,
    pub conclusion: Claim,
    /// Explanation level the conclusion was produced at (1 = the asked adjective).
    pub depth: u32,
    pub origin: Origin,
}

/// Proof of the condition of a conditional explanation, followed by the selected branch.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalProof {
    /// Adjective whose explanation holds the conditional.
    pub owner: String,
    pub condition: Expr,
    pub branch: Option<Expr>,
}

/// One member of a group comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMember {
    /// Labels of the nodes this proof stands for. More than one after compaction.
    pub labels: Vec<String>,
    /// Base value of the member, used to rank comparisons by relevance.
    pub relevance: Option<f64>,
    pub proof: Expr,
}

/// Proof that a node compares in the same way against every member of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupProof {
    pub conclusion: Claim,
    /// Why the group has the members it has.
    pub membership: Option<Expr>,
    pub members: Vec<GroupMember>,
    /// Number of member comparisons dropped by a tactic.
    pub omitted: usize,
    pub depth: u32,
    pub origin: Origin,
}

/// A node of an instantiated proof tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Claim(Claim),
    /// Rendered assumption text, already shaped by the verbosity setting.
    Assumption(String),
    /// A branch that could not be expanded, with the reason.
    Failure(String),
    And(Vec<Expr>),
    Implies(Box<Implication>),
    Conditional(Box<ConditionalProof>),
    Group(Box<GroupProof>),
    /// An expression followed by a parenthesized note.
    Annotated(Box<Expr>, String),
}

impl From<Claim> for Expr {
    fn from(claim: Claim) -> Self {
        Expr::Claim(claim)
    }
}

impl Expr {
    /// Conjunction of `items`, flattening nested conjunctions.
    ///
    /// Returns `None` when nothing is left and the single item itself when only one is.
    #[must_use]
    pub fn and(items: Vec<Expr>) -> Option<Expr> {
        let mut flat = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Expr::And(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Expr::And(flat)),
        }
    }

    /// `premise → conclusion`, or the bare conclusion when there is no premise.
    #[must_use]
    pub fn implies(premise: Option<Expr>, conclusion: Claim, depth: u32, origin: Origin) -> Expr {
        match premise {
            Some(premise) => Expr::Implies(Box::new(Implication {
                premise,
                conclusion,
                depth,
                origin,
            })),
            None => Expr::Claim(conclusion),
        }
    }

    #[must_use]
    pub fn annotated(self, note: impl Into<String>) -> Expr {
        Expr::Annotated(Box::new(self), note.into())
    }

    /// The claim this expression establishes, if it establishes exactly one.
    #[must_use]
    pub fn conclusion(&self) -> Option<&Claim> {
        match self {
            Expr::Claim(claim) => Some(claim),
            Expr::Implies(implication) => Some(&implication.conclusion),
            Expr::Group(group) => Some(&group.conclusion),
            Expr::Annotated(inner, _) => inner.conclusion(),
            Expr::Assumption(_)
            | Expr::Failure(_)
            | Expr::And(_)
            | Expr::Conditional(_) => None,
        }
    }

    /// Every claim stated anywhere in the tree, in rendering order.
    #[must_use]
    pub fn claims(&self) -> Vec<&Claim> {
        let mut out = vec![];
        self.collect_claims(&mut out);
        out
    }

    fn collect_claims<'a>(&'a self, out: &mut Vec<&'a Claim>) {
        match self {
            Expr::Claim(claim) => out.push(claim),
            Expr::Assumption(_) | Expr::Failure(_) => {}
            Expr::And(items) => {
                for item in items {
                    item.collect_claims(out);
                }
            }
            Expr::Implies(implication) => {
                implication.premise.collect_claims(out);
                out.push(&implication.conclusion);
            }
            Expr::Conditional(conditional) => {
                conditional.condition.collect_claims(out);
                if let Some(branch) = &conditional.branch {
                    branch.collect_claims(out);
                }
            }
            Expr::Group(group) => {
                if let Some(membership) = &group.membership {
                    membership.collect_claims(out);
                }
                for member in &group.members {
                    member.proof.collect_claims(out);
                }
                out.push(&group.conclusion);
            }
            Expr::Annotated(inner, _) => inner.collect_claims(out),
        }
    }

    /// Number of failure leaves in the tree.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |expr| {
            if matches!(expr, Expr::Failure(_)) {
                count += 1;
            }
        });
        count
    }

    /// Calls `f` on every expression of the tree, parents before children.
    pub fn visit(&self, f: &mut dyn FnMut(&Expr)) {
        f(self);
        match self {
            Expr::Claim(_) | Expr::Assumption(_) | Expr::Failure(_) => {}
            Expr::And(items) => {
                for item in items {
                    item.visit(f);
                }
            }
            Expr::Implies(implication) => implication.premise.visit(f),
            Expr::Conditional(conditional) => {
                conditional.condition.visit(f);
                if let Some(branch) = &conditional.branch {
                    branch.visit(f);
                }
            }
            Expr::Group(group) => {
                if let Some(membership) = &group.membership {
                    membership.visit(f);
                }
                for member in &group.members {
                    member.proof.visit(f);
                }
            }
            Expr::Annotated(inner, _) => inner.visit(f),
        }
    }

    /// Copy of the tree with every occurrence of the node label `label` replaced by `placeholder`.
    ///
    /// Two proofs that differ only in which member of a group they talk about
    /// become equal once that member's label is masked.
    #[must_use]
    pub fn substitute_label(&self, label: &str, placeholder: &str) -> Expr {
        self.clone().transform_up(&mut |expr| match expr {
            Expr::Claim(claim) => Expr::Claim(claim.relabel(label, placeholder)),
            Expr::Implies(mut implication) => {
                implication.conclusion = implication.conclusion.relabel(label, placeholder);
                Expr::Implies(implication)
            }
            Expr::Group(mut group) => {
                group.conclusion = group.conclusion.relabel(label, placeholder);
                Expr::Group(group)
            }
            other => other,
        })
    }

    /// Removes empty conjunctions and collapses single-item ones, recursively.
    ///
    /// An implication left without a premise becomes its bare conclusion and a
    /// conditional left without both parts disappears.
    #[must_use]
    pub fn normalize(self) -> Expr {
        self.transform_up(&mut |expr| match expr {
            Expr::And(items) => {
                let items = items.into_iter().filter(|item| !item.is_empty()).collect();
                Expr::and(items).unwrap_or(Expr::And(vec![]))
            }
            Expr::Implies(implication) if implication.premise.is_empty() => {
                Expr::Claim(implication.conclusion)
            }
            Expr::Conditional(conditional) => {
                let ConditionalProof {
                    owner,
                    condition,
                    branch,
                } = *conditional;
                let branch = branch.filter(|branch| !branch.is_empty());
                if condition.is_empty() {
                    branch.unwrap_or(Expr::And(vec![]))
                } else {
                    Expr::Conditional(Box::new(ConditionalProof {
                        owner,
                        condition,
                        branch,
                    }))
                }
            }
            other => other,
        })
    }

    /// True for the empty conjunction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Expr::And(items) if items.is_empty())
    }
}
