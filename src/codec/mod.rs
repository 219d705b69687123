//! Two-tag binary tree format.
//!
//! A fitted tree flattens to one record per node, children before parent
//! (post-order, lesser subtree first):
//!
//! ```text
//! Leaf record (5 bytes):
//! +------+----------------+
//! | 0xAA | label: i32 LE  |
//! +------+----------------+
//!
//! Branch record (17 bytes):
//! +------+------------------+--------------------+
//! | 0xBB | feature: u64 LE  | threshold: f64 LE  |
//! +------+------------------+--------------------+
//! ```
//!
//! There is no header, length prefix, or checksum: the stream is exactly
//! the concatenated records, little-endian on every platform, and its
//! length is known up front from the node counts ([`serialized_size`]).
//!
//! [`encode`] walks the tree through its parent back-references instead of
//! recursing: descend lesser children to a leaf, emit it, then climb,
//! jumping into each greater subtree on the way up and emitting a branch
//! record once both its subtrees are out. [`decode`] replays the records
//! against an explicit stack, popping two subtrees per branch record.
//! Malformed input is rejected with [`DecodeError`]; a decoded tree always
//! has its root at node id 0.

use thiserror::Error;

use crate::tree::{DecisionTree, NO_PARENT, Node, NodeId, ROOT, SplitCondition};

/// Record tag opening a leaf.
pub const LEAF_TAG: u8 = 0xAA;
/// Record tag opening a branch.
pub const BRANCH_TAG: u8 = 0xBB;

/// Bytes per leaf record: tag plus i32 label.
pub const LEAF_RECORD_SIZE: usize = 5;
/// Bytes per branch record: tag plus u64 feature plus f64 threshold.
pub const BRANCH_RECORD_SIZE: usize = 17;

/// Rejections produced by [`decode`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// A record opens with a byte that is neither tag.
    #[error("unknown record tag {tag:#04x} at offset {offset}")]
    UnknownTag { offset: usize, tag: u8 },

    /// The buffer ends inside a record.
    #[error("record at offset {offset} needs {needed} bytes but only {remaining} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A branch record arrived before both of its subtrees.
    #[error("branch record at offset {offset} has fewer than two decoded subtrees")]
    MissingSubtrees { offset: usize },

    /// A leaf label is outside `[0, n_labels)`.
    #[error("leaf label {label} at offset {offset} is out of range for {n_labels} classes")]
    LabelOutOfRange {
        offset: usize,
        label: i64,
        n_labels: u32,
    },

    /// A branch feature index is outside `[0, n_features)`.
    #[error("feature index {feature} at offset {offset} is out of range for {n_features} features")]
    FeatureOutOfRange {
        offset: usize,
        feature: u64,
        n_features: usize,
    },

    /// The records did not reduce to a single root.
    #[error("buffer decoded to {remaining} dangling subtrees instead of one root")]
    DanglingNodes { remaining: usize },
}

/// Exact length in bytes [`encode`] will produce for `tree`.
pub fn serialized_size(tree: &DecisionTree) -> usize {
    let leaves = tree.n_leaves();
    let branches = tree.n_nodes() - leaves;
    leaves * LEAF_RECORD_SIZE + branches * BRANCH_RECORD_SIZE
}

/// Serialize a tree into a fresh buffer of [`serialized_size`] bytes.
pub fn encode(tree: &DecisionTree) -> Vec<u8> {
    let mut buf = Vec::with_capacity(serialized_size(tree));

    // Start at the leftmost leaf, then climb. Coming back up from a
    // lesser child means the sibling subtree is still unwritten; coming
    // up from a greater child means the parent's record is due.
    let mut node = emit_lesser_chain(tree, ROOT, &mut buf);
    loop {
        let parent = tree.parent(node);
        if parent == NO_PARENT {
            break;
        }
        match tree.node(parent) {
            Node::Branch {
                condition,
                lesser,
                greater,
            } => {
                if node == *lesser {
                    node = emit_lesser_chain(tree, *greater, &mut buf);
                } else {
                    buf.push(BRANCH_TAG);
                    buf.extend_from_slice(&(condition.feature as u64).to_le_bytes());
                    buf.extend_from_slice(&condition.threshold.to_le_bytes());
                    node = parent;
                }
            }
            Node::Leaf { .. } => unreachable!("recorded parent is always a branch"),
        }
    }
    buf
}

/// Follow lesser children from `start` down to a leaf, emit that leaf's
/// record, and return its id.
fn emit_lesser_chain(tree: &DecisionTree, start: NodeId, buf: &mut Vec<u8>) -> NodeId {
    let mut node = start;
    loop {
        match tree.node(node) {
            Node::Branch { lesser, .. } => node = *lesser,
            Node::Leaf { label } => {
                buf.push(LEAF_TAG);
                buf.extend_from_slice(&(*label as i32).to_le_bytes());
                return node;
            }
        }
    }
}

/// Reconstruct a tree from `bytes` for a model of the given shape.
///
/// The wire format stores neither the feature count nor the class count,
/// so the caller supplies both; records referencing anything outside those
/// ranges are rejected. The decoded root always lands at node id 0.
pub fn decode(n_features: usize, n_labels: u32, bytes: &[u8]) -> Result<DecisionTree, DecodeError> {
    let mut nodes: Vec<Node> = Vec::with_capacity(bytes.len() / LEAF_RECORD_SIZE);
    let mut stack: Vec<NodeId> = Vec::new();
    let mut offset = 0usize;

    while offset < bytes.len() {
        match bytes[offset] {
            LEAF_TAG => {
                ensure_record(bytes, offset, LEAF_RECORD_SIZE)?;
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&bytes[offset + 1..offset + 5]);
                let label = i32::from_le_bytes(raw);
                if label < 0 || label as u32 >= n_labels {
                    return Err(DecodeError::LabelOutOfRange {
                        offset,
                        label: label as i64,
                        n_labels,
                    });
                }
                stack.push(nodes.len() as NodeId);
                nodes.push(Node::leaf(label as u32));
                offset += LEAF_RECORD_SIZE;
            }
            BRANCH_TAG => {
                ensure_record(bytes, offset, BRANCH_RECORD_SIZE)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes[offset + 1..offset + 9]);
                let feature = u64::from_le_bytes(raw);
                raw.copy_from_slice(&bytes[offset + 9..offset + 17]);
                let threshold = f64::from_le_bytes(raw);
                if feature >= n_features as u64 {
                    return Err(DecodeError::FeatureOutOfRange {
                        offset,
                        feature,
                        n_features,
                    });
                }
                // The greater subtree was emitted last, so it pops first.
                let greater = stack.pop().ok_or(DecodeError::MissingSubtrees { offset })?;
                let lesser = stack.pop().ok_or(DecodeError::MissingSubtrees { offset })?;
                stack.push(nodes.len() as NodeId);
                nodes.push(Node::branch(
                    SplitCondition::new(feature as u32, threshold),
                    lesser,
                    greater,
                ));
                offset += BRANCH_RECORD_SIZE;
            }
            tag => return Err(DecodeError::UnknownTag { offset, tag }),
        }
    }

    if stack.len() != 1 {
        return Err(DecodeError::DanglingNodes {
            remaining: stack.len(),
        });
    }
    Ok(DecisionTree::from_nodes(
        reroot(nodes),
        n_features,
        n_labels,
    ))
}

fn ensure_record(bytes: &[u8], offset: usize, needed: usize) -> Result<(), DecodeError> {
    let remaining = bytes.len() - offset;
    if remaining < needed {
        return Err(DecodeError::Truncated {
            offset,
            needed,
            remaining,
        });
    }
    Ok(())
}

/// Reverse a post-order arena so the root (pushed last) lands at id 0.
///
/// Children were always pushed before their parent, so reversing the
/// arena and mirroring every child id keeps all links intact.
fn reroot(nodes: Vec<Node>) -> Vec<Node> {
    let last = (nodes.len() - 1) as NodeId;
    nodes
        .into_iter()
        .rev()
        .map(|node| match node {
            Node::Branch {
                condition,
                lesser,
                greater,
            } => Node::Branch {
                condition,
                lesser: last - lesser,
                greater: last - greater,
            },
            leaf => leaf,
        })
        .collect()
}
