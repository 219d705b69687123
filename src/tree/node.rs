//! Tree node types.

use super::NodeId;

/// Threshold test attached to a branch node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCondition {
    /// Index of the feature the test reads.
    pub feature: u32,
    /// Samples with a feature value strictly below this go to the lesser child.
    pub threshold: f64,
}

impl SplitCondition {
    pub fn new(feature: u32, threshold: f64) -> Self {
        Self { feature, threshold }
    }

    /// Evaluate the test for one feature value.
    ///
    /// Returns `true` for the lesser child; equal values go greater.
    #[inline]
    pub fn goes_lesser(&self, feature_value: f64) -> bool {
        feature_value < self.threshold
    }
}

/// A node in a decision tree arena.
///
/// Branches always have both children, so a well-formed tree is full:
/// every node is either a leaf or has exactly two subtrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Internal node holding a threshold test.
    Branch {
        condition: SplitCondition,
        lesser: NodeId,
        greater: NodeId,
    },
    /// Terminal node holding a class label.
    Leaf { label: u32 },
}

impl Node {
    pub fn branch(condition: SplitCondition, lesser: NodeId, greater: NodeId) -> Self {
        Node::Branch {
            condition,
            lesser,
            greater,
        }
    }

    pub fn leaf(label: u32) -> Self {
        Node::Leaf { label }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Class label if this is a leaf.
    #[inline]
    pub fn label(&self) -> Option<u32> {
        match self {
            Node::Leaf { label } => Some(*label),
            Node::Branch { .. } => None,
        }
    }

    /// Threshold test if this is a branch.
    #[inline]
    pub fn condition(&self) -> Option<&SplitCondition> {
        match self {
            Node::Branch { condition, .. } => Some(condition),
            Node::Leaf { .. } => None,
        }
    }

    /// Child ids `(lesser, greater)` if this is a branch.
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self {
            Node::Branch {
                lesser, greater, ..
            } => Some((*lesser, *greater)),
            Node::Leaf { .. } => None,
        }
    }
}
