//! Game trees searched with minimax.
//!
//! A [`GameTree`] is an arena built once from a [`TreeSpec`]; every node gets
//! its minimax score and back-propagating child at construction.
//! [`TreeNode`] is a cheap handle into the arena, used as the explained node.

use std::{collections::HashSet, fmt, rc::Rc};

use argex_engine::node::Node;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lowest static evaluation of a random leaf.
pub const MIN_RANDOM_EVALUATION: i32 = -10;
/// Highest static evaluation of a random leaf.
pub const MAX_RANDOM_EVALUATION: i32 = 10;

/// Serialized form of a tree: nested nodes, leaves carrying their static evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSpec>,
}

impl TreeSpec {
    #[must_use]
    pub fn leaf(label: impl Into<String>, evaluation: f64) -> Self {
        Self {
            label: label.into(),
            evaluation: Some(evaluation),
            children: vec![],
        }
    }

    #[must_use]
    pub fn internal(label: impl Into<String>, children: Vec<TreeSpec>) -> Self {
        Self {
            label: label.into(),
            evaluation: None,
            children,
        }
    }

    /// Complete tree of the given depth where every internal node has
    /// `branching` children and leaves are evaluated uniformly in
    /// `MIN_RANDOM_EVALUATION..=MAX_RANDOM_EVALUATION`.
    ///
    /// Labels spell the path from the root: `root`, `n1`, `n12`, ...
    #[must_use]
    pub fn random(seed: u64, depth: usize, branching: usize) -> Self {
        fn build(rng: &mut Pcg32, label: String, depth: usize, branching: usize) -> TreeSpec {
            if depth == 0 || branching == 0 {
                let evaluation = rng.random_range(MIN_RANDOM_EVALUATION..=MAX_RANDOM_EVALUATION);
                return TreeSpec::leaf(label, f64::from(evaluation));
            }
            let prefix = if label == "root" { "n" } else { label.as_str() };
            let children = (1..=branching)
                .map(|i| build(rng, format!("{prefix}{i}"), depth - 1, branching))
                .collect();
            TreeSpec::internal(label, children)
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        build(&mut rng, "root".to_owned(), depth, branching)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TreeError {
    #[display("node labels must not be empty")]
    EmptyLabel,
    #[display("label \"{label}\" is used by more than one node")]
    DuplicateLabel { label: String },
    #[display("leaf \"{label}\" has no evaluation")]
    MissingEvaluation { label: String },
}

#[derive(Debug)]
struct NodeData {
    label: String,
    evaluation: Option<f64>,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
    score: f64,
    score_child: Option<usize>,
}

/// A game tree with minimax scores. The root is the maximizing player's turn.
#[derive(Debug)]
pub struct GameTree {
    nodes: Vec<NodeData>,
}

impl GameTree {
    pub fn from_spec(spec: &TreeSpec) -> Result<Rc<Self>, TreeError> {
        let mut nodes: Vec<NodeData> = vec![];
        let mut labels = HashSet::new();
        let mut stack = vec![(spec, None, 0)];
        while let Some((spec, parent, depth)) = stack.pop() {
            if spec.label.is_empty() {
                return Err(TreeError::EmptyLabel);
            }
            if !labels.insert(spec.label.as_str()) {
                return Err(TreeError::DuplicateLabel {
                    label: spec.label.clone(),
                });
            }
            if spec.children.is_empty() && spec.evaluation.is_none() {
                return Err(TreeError::MissingEvaluation {
                    label: spec.label.clone(),
                });
            }
            let id = nodes.len();
            nodes.push(NodeData {
                label: spec.label.clone(),
                evaluation: spec.evaluation,
                parent,
                children: vec![],
                depth,
                score: spec.evaluation.unwrap_or_default(),
                score_child: None,
            });
            if let Some(parent) = parent {
                nodes[parent].children.push(id);
            }
            // Reversed so that children are numbered in spec order.
            for child in spec.children.iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }

        let mut tree = Self { nodes };
        tree.backpropagate();
        debug!(nodes = tree.nodes.len(), "built game tree");
        Ok(Rc::new(tree))
    }

    /// Random tree, see [`TreeSpec::random`].
    pub fn random(seed: u64, depth: usize, branching: usize) -> Result<Rc<Self>, TreeError> {
        Self::from_spec(&TreeSpec::random(seed, depth, branching))
    }

    /// Minimax from the leaves up. Children always have larger ids than
    /// their parent, so a reverse sweep sees every child before its parent.
    fn backpropagate(&mut self) {
        for id in (0..self.nodes.len()).rev() {
            let node = &self.nodes[id];
            if node.children.is_empty() {
                continue;
            }
            let maximizing = node.depth % 2 == 0;
            let mut best: Option<(usize, f64)> = None;
            for &child in &node.children {
                let score = self.nodes[child].score;
                let improves = match best {
                    None => true,
                    Some((_, current)) if maximizing => score > current,
                    Some((_, current)) => score < current,
                };
                if improves {
                    best = Some((child, score));
                }
            }
            if let Some((child, score)) = best {
                let node = &mut self.nodes[id];
                node.score = score;
                node.score_child = Some(child);
            }
        }
    }

    #[must_use]
    pub fn root(self: &Rc<Self>) -> TreeNode {
        TreeNode {
            tree: Rc::clone(self),
            id: 0,
        }
    }

    #[must_use]
    pub fn find(self: &Rc<Self>, label: &str) -> Option<TreeNode> {
        self.nodes
            .iter()
            .position(|node| node.label == label)
            .map(|id| self.node(id))
    }

    /// All nodes, in depth-first order.
    pub fn nodes(self: &Rc<Self>) -> impl Iterator<Item = TreeNode> + '_ {
        (0..self.nodes.len()).map(|id| self.node(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(self: &Rc<Self>, id: usize) -> TreeNode {
        TreeNode {
            tree: Rc::clone(self),
            id,
        }
    }

    /// Serialized form, with internal nodes carrying no evaluation.
    #[must_use]
    pub fn to_spec(self: &Rc<Self>) -> TreeSpec {
        fn build(node: &TreeNode) -> TreeSpec {
            TreeSpec {
                label: node.label().to_owned(),
                evaluation: node.data().evaluation,
                children: node.children().iter().map(build).collect(),
            }
        }
        build(&self.root())
    }
}

/// Handle to one node of a [`GameTree`].
#[derive(Debug, Clone)]
pub struct TreeNode {
    tree: Rc<GameTree>,
    id: usize,
}

impl TreeNode {
    fn data(&self) -> &NodeData {
        &self.tree.nodes[self.id]
    }

    fn at(&self, id: usize) -> TreeNode {
        TreeNode {
            tree: Rc::clone(&self.tree),
            id,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.data().label
    }

    /// Distance from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.data().depth
    }

    #[must_use]
    pub fn parent(&self) -> Option<TreeNode> {
        self.data().parent.map(|id| self.at(id))
    }

    #[must_use]
    pub fn children(&self) -> Vec<TreeNode> {
        self.data().children.iter().map(|&id| self.at(id)).collect()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    /// Whether the player choosing among this node's children is the maximizing one.
    #[must_use]
    pub fn is_maximizing_turn(&self) -> bool {
        self.depth() % 2 == 0
    }

    /// Minimax score: the static evaluation for leaves, the back-propagated one otherwise.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.data().score
    }

    /// The child whose score was back-propagated to this node.
    #[must_use]
    pub fn score_child(&self) -> Option<TreeNode> {
        self.data().score_child.map(|id| self.at(id))
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Node for TreeNode {
    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// root -> child1 (leaf11 = 3, leaf12 = 4), child2 (leaf21 = 2, leaf22 = 5)
    pub(crate) fn sample_spec() -> TreeSpec {
        TreeSpec::internal(
            "root",
            vec![
                TreeSpec::internal(
                    "child1",
                    vec![TreeSpec::leaf("leaf11", 3.0), TreeSpec::leaf("leaf12", 4.0)],
                ),
                TreeSpec::internal(
                    "child2",
                    vec![TreeSpec::leaf("leaf21", 2.0), TreeSpec::leaf("leaf22", 5.0)],
                ),
            ],
        )
    }

    pub(crate) fn sample_tree() -> Rc<GameTree> {
        GameTree::from_spec(&sample_spec()).unwrap()
    }

    #[test]
    fn test_minimax_backpropagation() {
        let tree = sample_tree();
        let root = tree.root();
        assert_eq!(root.score(), 3.0);
        assert_eq!(root.score_child().unwrap().label(), "child1");

        let child1 = tree.find("child1").unwrap();
        assert!(!child1.is_maximizing_turn());
        assert_eq!(child1.score(), 3.0);
        assert_eq!(child1.score_child().unwrap().label(), "leaf11");

        let child2 = tree.find("child2").unwrap();
        assert_eq!(child2.score(), 2.0);
        assert_eq!(child2.score_child().unwrap().label(), "leaf21");

        let leaf = tree.find("leaf22").unwrap();
        assert!(leaf.is_leaf());
        assert!(leaf.score_child().is_none());
        assert_eq!(leaf.parent().unwrap().label(), "child2");
    }

    #[test]
    fn test_ties_keep_the_first_child() {
        let spec = TreeSpec::internal(
            "root",
            vec![TreeSpec::leaf("a", 1.0), TreeSpec::leaf("b", 1.0)],
        );
        let tree = GameTree::from_spec(&spec).unwrap();
        assert_eq!(tree.root().score_child().unwrap().label(), "a");
    }

    #[test]
    fn test_invalid_specs() {
        let duplicate = TreeSpec::internal(
            "root",
            vec![TreeSpec::leaf("a", 1.0), TreeSpec::leaf("a", 2.0)],
        );
        assert!(matches!(
            GameTree::from_spec(&duplicate),
            Err(TreeError::DuplicateLabel { .. })
        ));
        let unevaluated = TreeSpec::internal("root", vec![TreeSpec::internal("a", vec![])]);
        assert!(matches!(
            GameTree::from_spec(&unevaluated),
            Err(TreeError::MissingEvaluation { .. })
        ));
        assert!(matches!(
            GameTree::from_spec(&TreeSpec::leaf("", 0.0)),
            Err(TreeError::EmptyLabel)
        ));
    }

    #[test]
    fn test_spec_json() {
        let spec: TreeSpec = serde_json::from_value(serde_json::json!({
            "label": "root",
            "children": [
                { "label": "a", "evaluation": 1 },
                { "label": "b", "evaluation": -2.5 },
            ],
        }))
        .unwrap();
        let tree = GameTree::from_spec(&spec).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.to_spec(), spec);
    }

    #[test]
    fn test_random_trees_are_reproducible() {
        let spec = TreeSpec::random(7, 3, 2);
        assert_eq!(spec, TreeSpec::random(7, 3, 2));
        let tree = GameTree::from_spec(&spec).unwrap();
        assert_eq!(tree.len(), 1 + 2 + 4 + 8);
        assert!(tree.find("n12").is_some());
        assert!(tree.find("n212").is_some());
        for node in tree.nodes().filter(TreeNode::is_leaf) {
            let score = node.score();
            assert!((-10.0..=10.0).contains(&score));
        }
    }

    #[test]
    fn test_node_identity() {
        let tree = sample_tree();
        let other = sample_tree();
        let a = tree.find("leaf11").unwrap();
        assert!(a.same_node(&tree.find("leaf11").unwrap()));
        assert!(!a.same_node(&other.find("leaf11").unwrap()));
        assert!(!a.same_node(&tree.find("leaf12").unwrap()));
    }
}
