//! Tactics: pure rewrites of an instantiated proof tree before rendering.

use std::{cmp::Ordering, fmt, str::FromStr};

use argex_logic::{
    expr::{Expr, GroupMember, OriginKind},
    rewrite::Rewrite,
};

use crate::error::ParseSettingError;

/// Which group comparisons [`Tactic::OnlyRelevantComparisons`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceMode {
    /// The `n` members with the highest base value.
    Top(usize),
    /// The `n` members with the lowest base value.
    Bottom(usize),
}

impl fmt::Display for RelevanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelevanceMode::Top(n) => write!(f, "top_{n}"),
            RelevanceMode::Bottom(n) => write!(f, "bottom_{n}"),
        }
    }
}

impl FromStr for RelevanceMode {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseSettingError {
            kind: "relevance mode",
            value: s.to_owned(),
            expected: "top_N, bottom_N with N > 0",
        };
        let (mode, n): (fn(usize) -> RelevanceMode, _) = if let Some(n) = s.strip_prefix("top_") {
            (RelevanceMode::Top, n)
        } else if let Some(n) = s.strip_prefix("bottom_") {
            (RelevanceMode::Bottom, n)
        } else {
            return Err(error());
        };
        match n.parse::<usize>() {
            Ok(n) if n > 0 => Ok(mode(n)),
            _ => Err(error()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tactic {
    /// Keeps only the most relevant member comparisons of every group comparison.
    OnlyRelevantComparisons(RelevanceMode),
    /// Replaces the justification of quantitative values with the bare value.
    SkipQuantitativeExplanations,
    /// Replaces every justified quantitative value with a fixed phrase.
    SubstituteQuantitativeExplanations(String),
    /// Collapses sibling sub-proofs that say the same thing.
    CompactSameExplanations,
    /// Drops the proof of the condition of conditional explanations, except
    /// in the explanations of the listed adjectives.
    SkipConditionStatement { except_on: Vec<String> },
}

impl Tactic {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Tactic::OnlyRelevantComparisons(_) => "only relevant comparisons",
            Tactic::SkipQuantitativeExplanations => "skip quantitative explanations",
            Tactic::SubstituteQuantitativeExplanations(_) => "substitute quantitative explanations",
            Tactic::CompactSameExplanations => "compact same explanations",
            Tactic::SkipConditionStatement { .. } => "skip condition statement",
        }
    }

    /// Adjective names the tactic refers to.
    #[must_use]
    pub fn references(&self) -> &[String] {
        match self {
            Tactic::SkipConditionStatement { except_on } => except_on,
            _ => &[],
        }
    }

    #[must_use]
    pub fn apply(&self, expr: Expr) -> Expr {
        let expr = match self {
            Tactic::OnlyRelevantComparisons(mode) => only_relevant(expr, *mode),
            Tactic::SkipQuantitativeExplanations => expr.rewrite(&mut |e| match e {
                Expr::Implies(implication)
                    if implication.origin.kind == OriginKind::Quantitative =>
                {
                    Rewrite::Replace(Expr::Claim(implication.conclusion))
                }
                other => Rewrite::Descend(other),
            }),
            Tactic::SubstituteQuantitativeExplanations(text) => match expr {
                // The asked value itself keeps its conclusion.
                Expr::Implies(mut implication)
                    if implication.origin.kind == OriginKind::Quantitative =>
                {
                    implication.premise = Expr::Assumption(text.clone());
                    Expr::Implies(implication)
                }
                expr => expr
                    .rewrite(&mut |e| match e {
                        Expr::Implies(implication)
                            if implication.origin.kind == OriginKind::Quantitative =>
                        {
                            Rewrite::Replace(Expr::Assumption(text.clone()))
                        }
                        other => Rewrite::Descend(other),
                    })
                    .transform_up(&mut |e| match e {
                        Expr::And(items) => Expr::And(dedup_assumptions(items)),
                        other => other,
                    }),
            },
            Tactic::CompactSameExplanations => compact(expr),
            Tactic::SkipConditionStatement { except_on } => expr.transform_up(&mut |e| match e {
                Expr::Conditional(conditional) if !except_on.contains(&conditional.owner) => {
                    conditional.branch.unwrap_or(Expr::And(vec![]))
                }
                other => other,
            }),
        };
        expr.normalize()
    }
}

fn compare_relevance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn only_relevant(expr: Expr, mode: RelevanceMode) -> Expr {
    expr.transform_up(&mut |e| match e {
        Expr::Group(mut group) => {
            let keep = match mode {
                RelevanceMode::Top(n) => {
                    group
                        .members
                        .sort_by(|a, b| compare_relevance(b.relevance, a.relevance));
                    n
                }
                RelevanceMode::Bottom(n) => {
                    // Members without a base value go last in both modes.
                    group.members.sort_by(|a, b| match (a.relevance, b.relevance) {
                        (Some(a), Some(b)) => a.total_cmp(&b),
                        (x, y) => compare_relevance(y, x),
                    });
                    n
                }
            };
            if group.members.len() > keep {
                group.omitted += group.members.len() - keep;
                group.members.truncate(keep);
            }
            Expr::Group(group)
        }
        other => other,
    })
}

fn dedup_assumptions(items: Vec<Expr>) -> Vec<Expr> {
    let mut out: Vec<Expr> = Vec::with_capacity(items.len());
    for item in items {
        if matches!(item, Expr::Assumption(_)) && out.contains(&item) {
            continue;
        }
        out.push(item);
    }
    out
}

fn compact(expr: Expr) -> Expr {
    const PLACEHOLDER: &str = "\u{0}";
    expr.transform_up(&mut |e| match e {
        Expr::And(items) => {
            let mut merged: Vec<(Expr, usize)> = vec![];
            for item in items {
                match merged.iter_mut().find(|(seen, _)| *seen == item) {
                    Some((_, count)) => *count += 1,
                    None => merged.push((item, 1)),
                }
            }
            Expr::And(
                merged
                    .into_iter()
                    .map(|(item, count)| {
                        if count > 1 {
                            item.annotated(format!("×{count}"))
                        } else {
                            item
                        }
                    })
                    .collect(),
            )
        }
        Expr::Group(mut group) => {
            let mut merged: Vec<(Expr, GroupMember)> = vec![];
            for member in group.members {
                let key = match member.labels.first() {
                    Some(label) => member.proof.substitute_label(label, PLACEHOLDER),
                    None => member.proof.clone(),
                };
                match merged.iter_mut().find(|(seen, _)| *seen == key) {
                    Some((_, kept)) => kept.labels.extend(member.labels),
                    None => merged.push((key, member)),
                }
            }
            group.members = merged.into_iter().map(|(_, member)| member).collect();
            Expr::Group(group)
        }
        other => other,
    })
}
