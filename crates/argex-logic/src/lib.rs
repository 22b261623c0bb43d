//! Proof trees for argumentative explanations.
//!
//! This crate holds the data model an explanation is built into, independent
//! of how the explanation was produced:
//!
//! - [`claim`] - atomic propositions about nodes (`child1 is best`,
//!   `child1 has score = 3`, `child1 is better than child2`)
//! - [`expr`] - proof trees combining claims with assumptions, conjunctions,
//!   implications, conditional proofs and group comparisons
//! - [`rewrite`] - top-down and bottom-up tree rewriting, used by tactics
//! - [`render`] - the two text grammars (verbal sentences and propositional logic)
//!
//! # Example
//!
//! ```rust
//! use argex_logic::{
//!     claim::Claim,
//!     expr::{Expr, Origin, OriginKind},
//!     render::{PrintMode, RenderOptions, render},
//! };
//!
//! let proof = Expr::implies(
//!     Some(Expr::Claim(Claim::is("leaf11", "leaf"))),
//!     Claim::has("leaf11", "score", "3"),
//!     1,
//!     Origin::new("score", OriginKind::Quantitative),
//! );
//! assert_eq!(
//!     render(&proof, RenderOptions::new(PrintMode::Logic)),
//!     "[leaf11 is leaf → leaf11 has score = 3]"
//! );
//! ```

pub mod claim;
pub mod expr;
pub mod render;
pub mod rewrite;
