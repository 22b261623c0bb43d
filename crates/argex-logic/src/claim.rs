//! Atomic propositions about nodes.
//!
//! A [`Claim`] is the consequent of every step of a proof: "child1 is best",
//! "child1 has score = 3", "child1 is better than child2". Claims carry their
//! own truth (a false claim is stored negated) so that a proof always states
//! what actually holds.

/// How a group comparison quantifies over the members of the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// The relation holds against every member.
    Every,
    /// The relation holds against no member.
    NoneOf,
}

/// What a claim asserts about its subject.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `<subject> is <adjective>`
    Is { adjective: String },
    /// `<subject> has <adjective> = <value>`
    Has { adjective: String, value: String },
    /// `<subject> is <adjective> than <other>`
    Compared { adjective: String, other: String },
    /// `<subject> is <adjective> than every/no node in <group>`
    ComparedToGroup {
        adjective: String,
        group: String,
        quantifier: Quantifier,
    },
}

/// A (possibly negated) proposition about a subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    subject: String,
    predicate: Predicate,
    negated: bool,
}

/// Value shown for a claim whose adjective could not be expanded.
pub const UNRESOLVED_VALUE: &str = "?";

impl Claim {
    #[must_use]
    pub fn new(subject: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            negated: false,
        }
    }

    #[must_use]
    pub fn is(subject: impl Into<String>, adjective: impl Into<String>) -> Self {
        Self::new(
            subject,
            Predicate::Is {
                adjective: adjective.into(),
            },
        )
    }

    #[must_use]
    pub fn has(
        subject: impl Into<String>,
        adjective: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(
            subject,
            Predicate::Has {
                adjective: adjective.into(),
                value: value.into(),
            },
        )
    }

    #[must_use]
    pub fn compared(
        subject: impl Into<String>,
        adjective: impl Into<String>,
        other: impl Into<String>,
    ) -> Self {
        Self::new(
            subject,
            Predicate::Compared {
                adjective: adjective.into(),
                other: other.into(),
            },
        )
    }

    #[must_use]
    pub fn compared_to_group(
        subject: impl Into<String>,
        adjective: impl Into<String>,
        group: impl Into<String>,
        quantifier: Quantifier,
    ) -> Self {
        Self::new(
            subject,
            Predicate::ComparedToGroup {
                adjective: adjective.into(),
                group: group.into(),
                quantifier,
            },
        )
    }

    /// Placeholder claim for an adjective that was not expanded: `<subject> has <adjective> = ?`.
    #[must_use]
    pub fn unresolved(subject: impl Into<String>, adjective: impl Into<String>) -> Self {
        Self::has(subject, adjective, UNRESOLVED_VALUE)
    }

    /// Negates the claim when `truth` is false.
    #[must_use]
    pub fn with_truth(mut self, truth: bool) -> Self {
        self.negated = !truth;
        self
    }

    #[must_use]
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    #[must_use]
    pub fn adjective(&self) -> &str {
        match &self.predicate {
            Predicate::Is { adjective }
            | Predicate::Has { adjective, .. }
            | Predicate::Compared { adjective, .. }
            | Predicate::ComparedToGroup { adjective, .. } => adjective,
        }
    }

    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(&self.predicate, Predicate::Has { value, .. } if value == UNRESOLVED_VALUE)
    }

    /// Replaces every node label equal to `from` with `to`.
    #[must_use]
    pub fn relabel(&self, from: &str, to: &str) -> Self {
        let swap = |s: &String| if s == from { to.to_owned() } else { s.clone() };
        let predicate = match &self.predicate {
            Predicate::Is { adjective } => Predicate::Is {
                adjective: adjective.clone(),
            },
            Predicate::Has { adjective, value } => Predicate::Has {
                adjective: adjective.clone(),
                value: swap(value),
            },
            Predicate::Compared { adjective, other } => Predicate::Compared {
                adjective: adjective.clone(),
                other: swap(other),
            },
            Predicate::ComparedToGroup {
                adjective,
                group,
                quantifier,
            } => Predicate::ComparedToGroup {
                adjective: adjective.clone(),
                group: group.clone(),
                quantifier: *quantifier,
            },
        };
        Self {
            subject: swap(&self.subject),
            predicate,
            negated: self.negated,
        }
    }

    /// Symbolic form: the affirmative sentence, wrapped in `¬(...)` when negated.
    #[must_use]
    pub fn logic_text(&self) -> String {
        let text = self.sentence(false);
        if self.negated {
            format!("¬({text})")
        } else {
            text
        }
    }

    /// Natural-language form, with the negation folded into the sentence.
    #[must_use]
    pub fn verbal_text(&self) -> String {
        self.sentence(self.negated)
    }

    fn sentence(&self, negated: bool) -> String {
        let subject = &self.subject;
        match (&self.predicate, negated) {
            (Predicate::Is { adjective }, false) => format!("{subject} is {adjective}"),
            (Predicate::Is { adjective }, true) => format!("{subject} is not {adjective}"),
            (Predicate::Has { adjective, value }, false) => {
                format!("{subject} has {adjective} = {value}")
            }
            (Predicate::Has { adjective, value }, true) => {
                format!("{subject} does not have {adjective} = {value}")
            }
            (Predicate::Compared { adjective, other }, false) => {
                format!("{subject} is {adjective} than {other}")
            }
            (Predicate::Compared { adjective, other }, true) => {
                format!("{subject} is not {adjective} than {other}")
            }
            (
                Predicate::ComparedToGroup {
                    adjective,
                    group,
                    quantifier,
                },
                negated,
            ) => match (quantifier, negated) {
                (Quantifier::Every, false) => {
                    format!("{subject} is {adjective} than every node in {group}")
                }
                (Quantifier::Every, true) => {
                    format!("{subject} is not {adjective} than every node in {group}")
                }
                (Quantifier::NoneOf, false) => {
                    format!("{subject} is not {adjective} than any node in {group}")
                }
                (Quantifier::NoneOf, true) => {
                    format!("{subject} is {adjective} than some node in {group}")
                }
            },
        }
    }
}
