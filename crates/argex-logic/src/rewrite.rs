//! Structural rewriting of proof trees.

use crate::expr::{ConditionalProof, Expr, GroupMember, GroupProof};

/// Outcome of visiting one node during a top-down [`Expr::rewrite`].
#[derive(Debug)]
pub enum Rewrite {
    /// Use this expression as is; its children are not visited.
    Replace(Expr),
    /// Keep this expression and continue into its children.
    Descend(Expr),
}

impl Expr {
    /// Top-down rewrite: `f` sees each node before its children.
    #[must_use]
    pub fn rewrite<F>(self, f: &mut F) -> Expr
    where
        F: FnMut(Expr) -> Rewrite,
    {
        match f(self) {
            Rewrite::Replace(expr) => expr,
            Rewrite::Descend(expr) => expr.map_children(&mut |child| child.rewrite(f)),
        }
    }

    /// Bottom-up rewrite: `f` sees each node after its children were rewritten.
    #[must_use]
    pub fn transform_up<F>(self, f: &mut F) -> Expr
    where
        F: FnMut(Expr) -> Expr,
    {
        let expr = self.map_children(&mut |child| child.transform_up(f));
        f(expr)
    }

    /// Applies `f` to every direct sub-expression.
    #[must_use]
    pub fn map_children(self, f: &mut dyn FnMut(Expr) -> Expr) -> Expr {
        match self {
            Expr::Claim(_) | Expr::Assumption(_) | Expr::Failure(_) => self,
            Expr::And(items) => Expr::And(items.into_iter().map(&mut *f).collect()),
            Expr::Implies(mut implication) => {
                implication.premise = f(implication.premise);
                Expr::Implies(implication)
            }
            Expr::Conditional(conditional) => {
                let ConditionalProof {
                    owner,
                    condition,
                    branch,
                } = *conditional;
                Expr::Conditional(Box::new(ConditionalProof {
                    owner,
                    condition: f(condition),
                    branch: branch.map(&mut *f),
                }))
            }
            Expr::Group(group) => {
                let GroupProof {
                    conclusion,
                    membership,
                    members,
                    omitted,
                    depth,
                    origin,
                } = *group;
                let membership = membership.map(&mut *f);
                let members = members
                    .into_iter()
                    .map(|member| GroupMember {
                        proof: f(member.proof),
                        ..member
                    })
                    .collect();
                Expr::Group(Box::new(GroupProof {
                    conclusion,
                    membership,
                    members,
                    omitted,
                    depth,
                    origin,
                }))
            }
            Expr::Annotated(inner, note) => Expr::Annotated(Box::new(f(*inner)), note),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;

    #[test]
    fn test_rewrite_replace_stops_descent() {
        let expr = Expr::And(vec![
            Expr::Failure("inner".into()).annotated("x"),
            Expr::from(Claim::is("a", "leaf")),
        ]);
        let mut visited = 0;
        let out = expr.rewrite(&mut |e| {
            visited += 1;
            match e {
                Expr::Annotated(..) => Rewrite::Replace(Expr::Assumption("gone".into())),
                other => Rewrite::Descend(other),
            }
        });
        assert_eq!(visited, 3);
        assert_eq!(
            out,
            Expr::And(vec![
                Expr::Assumption("gone".into()),
                Expr::from(Claim::is("a", "leaf")),
            ])
        );
    }

    #[test]
    fn test_transform_up_sees_rewritten_children() {
        let expr = Expr::And(vec![Expr::And(vec![]), Expr::from(Claim::is("a", "leaf"))]);
        let out = expr.transform_up(&mut |e| match e {
            Expr::And(items) => Expr::And(items.into_iter().filter(|i| !i.is_empty()).collect()),
            other => other,
        });
        assert_eq!(out, Expr::And(vec![Expr::from(Claim::is("a", "leaf"))]));
    }
}
