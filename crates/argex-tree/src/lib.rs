//! Minimax game trees and the frameworks that explain their decisions.
//!
//! - [`tree`] - game trees with back-propagated minimax scores
//! - [`frameworks`] - the `lowlevel` and `highlevel` argumentation frameworks

pub mod frameworks;
pub mod tree;

pub use self::{
    frameworks::{HIGHLEVEL, LOWLEVEL, highlevel, lowlevel, minimax_explainer},
    tree::{GameTree, TreeError, TreeNode, TreeSpec},
};
