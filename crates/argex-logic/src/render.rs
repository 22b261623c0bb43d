//! Text rendering of proof trees.
//!
//! Two grammars are supported:
//!
//! - [`PrintMode::Logic`]: propositional notation, `[A ∧ B → C]`, `¬(A)`.
//! - [`PrintMode::Verbal`]: sentences, `C (because A and B)`.

use std::fmt;

use crate::expr::{Expr, GroupMember, GroupProof, Implication};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PrintMode {
    #[display("verbal")]
    Verbal,
    #[default]
    #[display("logic")]
    Logic,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: PrintMode,
    /// Prefix every implication with the level it was produced at.
    pub print_depth: bool,
}

impl RenderOptions {
    #[must_use]
    pub fn new(mode: PrintMode) -> Self {
        Self {
            mode,
            print_depth: false,
        }
    }

    #[must_use]
    pub fn with_print_depth(mut self, print_depth: bool) -> Self {
        self.print_depth = print_depth;
        self
    }
}

/// Renders `expr` as text.
#[must_use]
pub fn render(expr: &Expr, options: RenderOptions) -> String {
    let mut out = String::new();
    let renderer = Renderer { options };
    // Writing into a `String` cannot fail.
    let _ = renderer.write(&mut out, expr);
    out
}

/// Adapter that renders an expression through `Display`.
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a> {
    expr: &'a Expr,
    options: RenderOptions,
}

impl<'a> Rendered<'a> {
    #[must_use]
    pub fn new(expr: &'a Expr, options: RenderOptions) -> Self {
        Self { expr, options }
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Renderer {
            options: self.options,
        }
        .write(f, self.expr)
    }
}

struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    fn write(&self, w: &mut dyn fmt::Write, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Claim(claim) => match self.options.mode {
                PrintMode::Logic => w.write_str(&claim.logic_text()),
                PrintMode::Verbal => w.write_str(&claim.verbal_text()),
            },
            Expr::Assumption(text) | Expr::Failure(text) => w.write_str(text),
            Expr::And(items) => self.write_and(w, &items.iter().collect::<Vec<_>>(), &[]),
            Expr::Implies(implication) => self.write_implication(w, implication),
            Expr::Conditional(conditional) => {
                let mut parts = vec![&conditional.condition];
                parts.extend(conditional.branch.as_ref());
                self.write_and(w, &parts, &[])
            }
            Expr::Group(group) => self.write_group(w, group),
            Expr::Annotated(inner, note) => {
                self.write(w, inner)?;
                write!(w, " ({note})")
            }
        }
    }

    fn write_and(&self, w: &mut dyn fmt::Write, items: &[&Expr], notes: &[String]) -> fmt::Result {
        let total = items.len() + notes.len();
        for (i, item) in items.iter().enumerate() {
            self.write_separator(w, i, total, " ∧ ")?;
            self.write(w, item)?;
        }
        for (i, note) in notes.iter().enumerate() {
            self.write_separator(w, items.len() + i, total, " ∧ ")?;
            w.write_str(note)?;
        }
        Ok(())
    }

    fn write_separator(&self, w: &mut dyn fmt::Write, i: usize, total: usize, logic: &str) -> fmt::Result {
        if i == 0 {
            return Ok(());
        }
        match self.options.mode {
            PrintMode::Logic => w.write_str(logic),
            PrintMode::Verbal if i + 1 == total => w.write_str(" and "),
            PrintMode::Verbal => w.write_str(", "),
        }
    }

    fn write_depth(&self, w: &mut dyn fmt::Write, depth: u32) -> fmt::Result {
        if !self.options.print_depth {
            return Ok(());
        }
        match self.options.mode {
            PrintMode::Logic => write!(w, "⟨{depth}⟩"),
            PrintMode::Verbal => write!(w, "(depth {depth}) "),
        }
    }

    fn write_implication(&self, w: &mut dyn fmt::Write, implication: &Implication) -> fmt::Result {
        let conclusion = Expr::Claim(implication.conclusion.clone());
        self.write_depth(w, implication.depth)?;
        match self.options.mode {
            PrintMode::Logic => {
                w.write_char('[')?;
                self.write(w, &implication.premise)?;
                w.write_str(" → ")?;
                self.write(w, &conclusion)?;
                w.write_char(']')
            }
            PrintMode::Verbal => {
                self.write(w, &conclusion)?;
                w.write_str(" (because ")?;
                self.write(w, &implication.premise)?;
                w.write_char(')')
            }
        }
    }

    fn write_group(&self, w: &mut dyn fmt::Write, group: &GroupProof) -> fmt::Result {
        let member_texts: Vec<Expr> = group.members.iter().map(member_expr).collect();
        let mut parts: Vec<&Expr> = group.membership.iter().collect();
        parts.extend(member_texts.iter());
        let notes: Vec<String> = match group.omitted {
            0 => vec![],
            1 => vec!["(1 other comparison omitted)".to_owned()],
            n => vec![format!("({n} other comparisons omitted)")],
        };
        let conclusion = Expr::Claim(group.conclusion.clone());
        if parts.is_empty() && notes.is_empty() {
            return self.write(w, &conclusion);
        }
        self.write_depth(w, group.depth)?;
        match self.options.mode {
            PrintMode::Logic => {
                w.write_char('[')?;
                self.write_and(w, &parts, &notes)?;
                w.write_str(" → ")?;
                self.write(w, &conclusion)?;
                w.write_char(']')
            }
            PrintMode::Verbal => {
                self.write(w, &conclusion)?;
                w.write_str(" (because ")?;
                self.write_and(w, &parts, &notes)?;
                w.write_char(')')
            }
        }
    }
}

fn member_expr(member: &GroupMember) -> Expr {
    match member.labels.split_first() {
        Some((_, rest)) if !rest.is_empty() => {
            member.proof.clone().annotated(format!("same for {}", rest.join(", ")))
        }
        _ => member.proof.clone(),
    }
}
