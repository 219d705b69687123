//! Decision tree storage, traversal, and validation.
//!
//! Trees live in a flat arena of [`Node`]s indexed by [`NodeId`], with the
//! root fixed at id 0. A parallel array of parent back-references lets the
//! codec walk the tree bottom-up without recursion. Prediction, validation,
//! and depth measurement are all iterative as well.

pub mod node;

pub use node::{Node, SplitCondition};

use ndarray::{ArrayView1, ArrayView2};

use crate::codec::{self, DecodeError};
use crate::data::TrainingSet;
use crate::training::{self, FitOptions};
use crate::utils::Parallelism;

/// Canonical node identifier: an index into the tree's node arena.
pub type NodeId = u32;

/// Id of the root node in every tree.
pub(crate) const ROOT: NodeId = 0;

/// Sentinel parent id recorded for the root.
pub(crate) const NO_PARENT: NodeId = NodeId::MAX;

/// Structural defects detected by [`DecisionTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeValidationError {
    /// The arena holds no nodes at all.
    EmptyTree,
    /// A branch references a child outside the arena.
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    /// A branch references itself as a child.
    SelfLoop { node: NodeId },
    /// A node is reachable through two different paths.
    DuplicateVisit { node: NodeId },
    /// A node is its own ancestor.
    CycleDetected { node: NodeId },
    /// A node is not reachable from the root.
    UnreachableNode { node: NodeId },
    /// A node's recorded parent disagrees with the arena topology.
    ParentMismatch { node: NodeId, recorded: NodeId },
}

/// A fitted binary decision tree over numeric features.
///
/// Built by [`DecisionTree::fit`] or decoded from bytes with
/// [`DecisionTree::from_bytes`]. Classification walks threshold tests from
/// the root: values strictly below a branch's threshold descend to the
/// lesser child, everything else to the greater child.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    /// Parent of each node, `NO_PARENT` at the root. Drives the codec's
    /// bottom-up serialization walk.
    parents: Vec<NodeId>,
    n_features: usize,
    n_labels: u32,
}

impl DecisionTree {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Fit a tree with default options (sequential, silent).
    pub fn fit(data: &TrainingSet<'_>) -> Self {
        Self::fit_with(data, FitOptions::default())
    }

    /// Fit a tree with explicit execution options.
    ///
    /// Options never change the fitted tree, only how the work runs.
    pub fn fit_with(data: &TrainingSet<'_>, options: FitOptions) -> Self {
        training::grow_tree(data, &options)
    }

    /// Assemble a tree from an arena and matching parent array.
    pub(crate) fn from_raw_parts(
        nodes: Vec<Node>,
        parents: Vec<NodeId>,
        n_features: usize,
        n_labels: u32,
    ) -> Self {
        debug_assert_eq!(nodes.len(), parents.len(), "one parent entry per node");
        let tree = Self {
            nodes,
            parents,
            n_features,
            n_labels,
        };
        debug_assert!(tree.validate().is_ok());
        tree
    }

    /// Assemble a tree from an arena alone, deriving parent links.
    pub(crate) fn from_nodes(nodes: Vec<Node>, n_features: usize, n_labels: u32) -> Self {
        let mut parents = vec![NO_PARENT; nodes.len()];
        for (id, node) in nodes.iter().enumerate() {
            if let Node::Branch {
                lesser, greater, ..
            } = node
            {
                parents[*lesser as usize] = id as NodeId;
                parents[*greater as usize] = id as NodeId;
            }
        }
        Self::from_raw_parts(nodes, parents, n_features, n_labels)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of features each sample must provide.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of classes labels are drawn from.
    #[inline]
    pub fn n_labels(&self) -> u32 {
        self.n_labels
    }

    /// Total node count.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Leaf count.
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Branch count.
    pub fn n_branches(&self) -> usize {
        self.n_nodes() - self.n_leaves()
    }

    /// Node lookup. The root is node 0.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Recorded parent of a node, `NO_PARENT` at the root.
    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.parents[id as usize]
    }

    /// Longest root-to-leaf edge count, 0 for a single-leaf tree.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(NodeId, usize)> = vec![(ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Branch {
                    lesser, greater, ..
                } => {
                    stack.push((*greater, depth + 1));
                    stack.push((*lesser, depth + 1));
                }
            }
        }
        max_depth
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Classify a single sample slice.
    ///
    /// # Panics
    ///
    /// May panic if `sample` is shorter than [`Self::n_features`].
    #[inline]
    pub fn predict(&self, sample: &[f64]) -> u32 {
        debug_assert_eq!(
            sample.len(),
            self.n_features,
            "sample length must match feature count"
        );
        self.predict_row(ArrayView1::from(sample))
    }

    /// Classify one row of a feature matrix.
    pub fn predict_row(&self, sample: ArrayView1<'_, f64>) -> u32 {
        let mut id = ROOT;
        loop {
            match self.node(id) {
                Node::Leaf { label } => return *label,
                Node::Branch {
                    condition,
                    lesser,
                    greater,
                } => {
                    let value = sample[condition.feature as usize];
                    id = if condition.goes_lesser(value) {
                        *lesser
                    } else {
                        *greater
                    };
                }
            }
        }
    }

    /// Classify every row of a sample-major feature matrix into `predictions`.
    ///
    /// # Panics
    ///
    /// Panics if `predictions` is not exactly one slot per row.
    pub fn predict_into(
        &self,
        features: ArrayView2<'_, f64>,
        predictions: &mut [u32],
        parallelism: Parallelism,
    ) {
        assert_eq!(
            predictions.len(),
            features.nrows(),
            "one prediction slot per sample"
        );
        debug_assert_eq!(
            features.ncols(),
            self.n_features,
            "feature matrix width must match feature count"
        );
        let slots: Vec<(usize, &mut u32)> = predictions.iter_mut().enumerate().collect();
        parallelism.maybe_par_for_each(slots, |(row, slot)| {
            *slot = self.predict_row(features.row(row));
        });
    }

    /// Classify every row of a sample-major feature matrix.
    pub fn predict_batch(
        &self,
        features: ArrayView2<'_, f64>,
        parallelism: Parallelism,
    ) -> Vec<u32> {
        let mut predictions = vec![0; features.nrows()];
        self.predict_into(features, &mut predictions, parallelism);
        predictions
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check arena topology: every node reachable exactly once from the
    /// root, children in bounds, parent links consistent.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.nodes.len();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        // Iterative DFS with colors: 0 unvisited, 1 in progress, 2 done.
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(ROOT, 0)];
        while let Some((id, phase)) = stack.pop() {
            if phase == 1 {
                color[id as usize] = 2;
                continue;
            }
            match color[id as usize] {
                1 => return Err(TreeValidationError::CycleDetected { node: id }),
                2 => return Err(TreeValidationError::DuplicateVisit { node: id }),
                _ => {}
            }
            color[id as usize] = 1;
            stack.push((id, 1));

            if let Node::Branch {
                lesser, greater, ..
            } = self.node(id)
            {
                for (side, child) in [("lesser", *lesser), ("greater", *greater)] {
                    if child as usize >= n_nodes {
                        return Err(TreeValidationError::ChildOutOfBounds {
                            node: id,
                            side,
                            child,
                            n_nodes,
                        });
                    }
                    if child == id {
                        return Err(TreeValidationError::SelfLoop { node: id });
                    }
                }
                stack.push((*greater, 0));
                stack.push((*lesser, 0));
            }
        }

        for (id, &c) in color.iter().enumerate() {
            if c != 2 {
                return Err(TreeValidationError::UnreachableNode { node: id as NodeId });
            }
        }

        // Topology is sound; now the recorded parents must mirror it.
        if self.parents[ROOT as usize] != NO_PARENT {
            return Err(TreeValidationError::ParentMismatch {
                node: ROOT,
                recorded: self.parents[ROOT as usize],
            });
        }
        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Branch {
                lesser, greater, ..
            } = node
            {
                for child in [*lesser, *greater] {
                    if self.parents[child as usize] != id as NodeId {
                        return Err(TreeValidationError::ParentMismatch {
                            node: child,
                            recorded: self.parents[child as usize],
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Exact length in bytes of this tree's serialized form.
    pub fn serialized_size(&self) -> usize {
        codec::serialized_size(self)
    }

    /// Serialize into the two-tag binary format.
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::encode(self)
    }

    /// Reconstruct a tree serialized by [`Self::to_bytes`].
    ///
    /// The model shape is not stored in the bytes, so the caller supplies
    /// the feature and class counts the tree was fitted against.
    pub fn from_bytes(n_features: usize, n_labels: u32, bytes: &[u8]) -> Result<Self, DecodeError> {
        codec::decode(n_features, n_labels, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Leaf 0 below 3.0, then leaf 1 below 6.0, leaf 2 at or above it.
    fn three_leaf_tree() -> DecisionTree {
        let nodes = vec![
            Node::branch(SplitCondition::new(0, 3.0), 1, 2),
            Node::leaf(0),
            Node::branch(SplitCondition::new(0, 6.0), 3, 4),
            Node::leaf(1),
            Node::leaf(2),
        ];
        DecisionTree::from_nodes(nodes, 1, 3)
    }

    #[test]
    fn predict_walks_thresholds() {
        let tree = three_leaf_tree();
        assert_eq!(tree.predict(&[0.0]), 0);
        assert_eq!(tree.predict(&[2.9]), 0);
        assert_eq!(tree.predict(&[4.5]), 1);
        assert_eq!(tree.predict(&[8.0]), 2);
    }

    #[test]
    fn predict_boundary_goes_greater() {
        let tree = three_leaf_tree();
        assert_eq!(tree.predict(&[3.0]), 1); // == threshold goes greater
        assert_eq!(tree.predict(&[6.0]), 2);
    }

    #[test]
    fn predict_single_leaf() {
        let tree = DecisionTree::from_nodes(vec![Node::leaf(4)], 2, 5);
        assert_eq!(tree.predict(&[1.0, 2.0]), 4);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.n_leaves(), 1);
        assert_eq!(tree.n_branches(), 0);
    }

    #[test]
    fn counts_and_depth() {
        let tree = three_leaf_tree();
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.n_branches(), 2);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn predict_batch_matches_single() {
        let tree = three_leaf_tree();
        let features = ndarray::array![[0.5], [3.0], [5.9], [6.0], [9.0]];
        let batch = tree.predict_batch(features.view(), Parallelism::Sequential);
        let parallel = tree.predict_batch(features.view(), Parallelism::Parallel);
        let single: Vec<u32> = (0..features.nrows())
            .map(|row| tree.predict_row(features.row(row)))
            .collect();
        assert_eq!(batch, single);
        assert_eq!(parallel, single);
    }

    #[test]
    fn validate_accepts_well_formed_trees() {
        assert_eq!(three_leaf_tree().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_tree() {
        let tree = DecisionTree {
            nodes: vec![],
            parents: vec![],
            n_features: 1,
            n_labels: 1,
        };
        assert_eq!(tree.validate(), Err(TreeValidationError::EmptyTree));
    }

    #[test]
    fn validate_rejects_child_out_of_bounds() {
        let tree = DecisionTree {
            nodes: vec![Node::branch(SplitCondition::new(0, 1.0), 1, 9)],
            parents: vec![NO_PARENT],
            n_features: 1,
            n_labels: 2,
        };
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::ChildOutOfBounds {
                node: 0,
                side: "lesser",
                child: 1,
                n_nodes: 1,
            })
        );
    }

    #[test]
    fn validate_rejects_self_loop() {
        let tree = DecisionTree {
            nodes: vec![
                Node::branch(SplitCondition::new(0, 1.0), 0, 1),
                Node::leaf(0),
            ],
            parents: vec![NO_PARENT, 0],
            n_features: 1,
            n_labels: 1,
        };
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::SelfLoop { node: 0 })
        );
    }

    #[test]
    fn validate_rejects_shared_child() {
        // Both sides of the root point at the same leaf.
        let tree = DecisionTree {
            nodes: vec![
                Node::branch(SplitCondition::new(0, 1.0), 1, 1),
                Node::leaf(0),
                Node::leaf(1),
            ],
            parents: vec![NO_PARENT, 0, 0],
            n_features: 1,
            n_labels: 2,
        };
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::DuplicateVisit { node: 1 })
        );
    }

    #[test]
    fn validate_rejects_unreachable_node() {
        let tree = DecisionTree {
            nodes: vec![Node::leaf(0), Node::leaf(1)],
            parents: vec![NO_PARENT, NO_PARENT],
            n_features: 1,
            n_labels: 2,
        };
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::UnreachableNode { node: 1 })
        );
    }

    #[test]
    fn validate_rejects_parent_mismatch() {
        let tree = DecisionTree {
            nodes: vec![
                Node::branch(SplitCondition::new(0, 1.0), 1, 2),
                Node::leaf(0),
                Node::leaf(1),
            ],
            parents: vec![NO_PARENT, 0, NO_PARENT],
            n_features: 1,
            n_labels: 2,
        };
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::ParentMismatch {
                node: 2,
                recorded: NO_PARENT,
            })
        );
    }

    #[test]
    fn validate_rejects_cycle() {
        // Node 2's greater child points back at the root.
        let tree = DecisionTree {
            nodes: vec![
                Node::branch(SplitCondition::new(0, 1.0), 1, 2),
                Node::leaf(0),
                Node::branch(SplitCondition::new(0, 2.0), 3, 0),
                Node::leaf(1),
            ],
            parents: vec![2, 0, 0, 2],
            n_features: 1,
            n_labels: 2,
        };
        assert_eq!(
            tree.validate(),
            Err(TreeValidationError::CycleDetected { node: 0 })
        );
    }
}
