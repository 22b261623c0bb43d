//! Argumentative explanations of decisions taken over a graph of nodes.
//!
//! A host domain (a game tree, a planner, ...) exposes its nodes through the
//! [`Node`](node::Node) trait and getter functions. An
//! [`ArgumentationFramework`](framework::ArgumentationFramework) names the
//! properties of those nodes as adjectives and attaches an explanation
//! template to each. The
//! [`ArgumentativeExplainer`](explainer::ArgumentativeExplainer) instantiates
//! the templates against a concrete node, up to a configurable depth, and
//! renders the resulting proof as logic formulas or sentences.
//!
//! - [`node`] - node contract, values and getters
//! - [`adjective`] - adjective kinds and their evaluation rules
//! - [`explanation`] - explanation templates and assumptions
//! - [`tactic`] - rewrites applied to finished proofs
//! - [`settings`] - explanation depth, verbosity and print mode
//! - [`framework`] - adjective registries with validation and evaluation
//! - [`explainer`] - framework selection, settings resolution and explanation
//! - [`error`] - error types

pub mod adjective;
pub mod error;
pub mod explainer;
pub mod explanation;
pub mod framework;
mod instantiate;
pub mod node;
mod query;
pub mod settings;
pub mod tactic;

pub use argex_logic::render::PrintMode;
