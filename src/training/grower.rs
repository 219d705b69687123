//! Work-list tree grower.
//!
//! The grower keeps a stack of pending (node, sample subset) tasks instead
//! of recursing, so fitting a pathologically deep tree uses constant call
//! stack. Children are allocated in the arena as soon as their parent's
//! split is recorded; the subsets they inherit preserve the original
//! sample order.

use crate::data::TrainingSet;
use crate::tree::{DecisionTree, NO_PARENT, Node, NodeId, SplitCondition};

use super::FitOptions;
use super::entropy::entropy_of_counts;
use super::logger::{TrainingLogger, Verbosity};
use super::splitter::find_best_split;

struct GrowTask {
    node: NodeId,
    rows: Vec<u32>,
    depth: usize,
}

pub(crate) fn grow_tree(data: &TrainingSet<'_>, options: &FitOptions) -> DecisionTree {
    let logger = TrainingLogger::new(options.verbosity);
    logger.info(&format!(
        "Fitting tree: {} samples, {} features, {} classes",
        data.n_samples(),
        data.n_features(),
        data.n_labels()
    ));

    let n_labels = data.n_labels() as usize;
    let mut nodes: Vec<Node> = vec![Node::leaf(0)];
    let mut parents: Vec<NodeId> = vec![NO_PARENT];
    let mut counts = vec![0usize; n_labels];
    let mut max_depth = 0usize;

    let all_rows: Vec<u32> = (0..data.n_samples() as u32).collect();
    let mut tasks = vec![GrowTask {
        node: 0,
        rows: all_rows,
        depth: 0,
    }];

    while let Some(task) = tasks.pop() {
        max_depth = max_depth.max(task.depth);

        counts.fill(0);
        for &row in &task.rows {
            counts[data.label(row as usize) as usize] += 1;
        }
        let parent_entropy = entropy_of_counts(&counts, task.rows.len());
        if parent_entropy <= 0.0 {
            // Pure subset: every row carries the same label.
            let label = data.label(task.rows[0] as usize);
            nodes[task.node as usize] = Node::leaf(label);
            if logger.verbosity() >= Verbosity::Debug {
                logger.debug(&format!(
                    "node {}: pure leaf label={} ({} samples)",
                    task.node,
                    label,
                    task.rows.len()
                ));
            }
            continue;
        }

        let best = find_best_split(data, &task.rows, parent_entropy, options.parallelism);
        if best.degenerate {
            // Every candidate left a partition empty, which happens when
            // all remaining feature vectors are identical. The node
            // becomes a leaf with the subset's majority label.
            let label = majority_label(&counts);
            nodes[task.node as usize] = Node::leaf(label);
            if logger.verbosity() >= Verbosity::Debug {
                logger.debug(&format!(
                    "node {}: unsplittable leaf label={} ({} samples)",
                    task.node,
                    label,
                    task.rows.len()
                ));
            }
            continue;
        }

        let (lesser_rows, greater_rows) =
            partition_rows(data, &task.rows, best.feature, best.threshold);
        let lesser = nodes.len() as NodeId;
        let greater = lesser + 1;
        nodes.push(Node::leaf(0));
        nodes.push(Node::leaf(0));
        parents.push(task.node);
        parents.push(task.node);
        nodes[task.node as usize] = Node::branch(
            SplitCondition::new(best.feature, best.threshold),
            lesser,
            greater,
        );
        if logger.verbosity() >= Verbosity::Debug {
            logger.debug(&format!(
                "node {}: split feature={} threshold={} gain={:.6} ({} -> {}/{})",
                task.node,
                best.feature,
                best.threshold,
                best.gain,
                task.rows.len(),
                lesser_rows.len(),
                greater_rows.len()
            ));
        }

        // Greater pushed first so the lesser subtree grows next,
        // depth-first with the lesser side leading.
        tasks.push(GrowTask {
            node: greater,
            rows: greater_rows,
            depth: task.depth + 1,
        });
        tasks.push(GrowTask {
            node: lesser,
            rows: lesser_rows,
            depth: task.depth + 1,
        });
    }

    let tree = DecisionTree::from_raw_parts(nodes, parents, data.n_features(), data.n_labels());
    logger.info(&format!(
        "Fitted tree: {} nodes ({} leaves), depth {}",
        tree.n_nodes(),
        tree.n_leaves(),
        max_depth
    ));
    tree
}

/// Most frequent label; the lowest label index wins count ties.
fn majority_label(counts: &[usize]) -> u32 {
    let mut best = 0usize;
    for (label, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = label;
        }
    }
    best as u32
}

/// Partition a subset by a threshold, preserving relative row order.
fn partition_rows(
    data: &TrainingSet<'_>,
    rows: &[u32],
    feature: u32,
    threshold: f64,
) -> (Vec<u32>, Vec<u32>) {
    let mut lesser = Vec::new();
    let mut greater = Vec::new();
    for &row in rows {
        if data.feature(row as usize, feature as usize) < threshold {
            lesser.push(row);
        } else {
            greater.push(row);
        }
    }
    (lesser, greater)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn majority_label_breaks_ties_low() {
        assert_eq!(majority_label(&[2, 5, 1]), 1);
        assert_eq!(majority_label(&[3, 3, 1]), 0);
        assert_eq!(majority_label(&[0, 2, 2]), 1);
    }

    #[test]
    fn partition_preserves_row_order() {
        let features = array![[5.0], [1.0], [4.0], [2.0]];
        let labels = [1, 0, 1, 0];
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        let (lesser, greater) = partition_rows(&data, &[0, 1, 2, 3], 0, 3.0);
        assert_eq!(lesser, vec![1, 3]);
        assert_eq!(greater, vec![0, 2]);
    }

    #[test]
    fn pure_data_grows_single_leaf() {
        let features = array![[1.0], [5.0], [9.0]];
        let labels = [2, 2, 2];
        let data = TrainingSet::new(features.view(), &labels, 3).unwrap();
        let tree = grow_tree(&data, &FitOptions::default());
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.node(0), &Node::leaf(2));
    }

    #[test]
    fn identical_rows_grow_majority_leaf() {
        let features = array![[1.0, 2.0], [1.0, 2.0], [1.0, 2.0]];
        let labels = [2, 0, 2];
        let data = TrainingSet::new(features.view(), &labels, 3).unwrap();
        let tree = grow_tree(&data, &FitOptions::default());
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.node(0), &Node::leaf(2));
    }

    #[test]
    fn identical_rows_majority_tie_takes_lowest_label() {
        let features = array![[1.0], [1.0]];
        let labels = [1, 0];
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        let tree = grow_tree(&data, &FitOptions::default());
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.node(0), &Node::leaf(0));
    }

    #[test]
    fn grown_trees_validate() {
        let features = array![[1.0], [2.0], [4.0], [5.0], [7.0], [8.0]];
        let labels = [0, 0, 1, 1, 2, 2];
        let data = TrainingSet::new(features.view(), &labels, 3).unwrap();
        let tree = grow_tree(&data, &FitOptions::default());
        assert_eq!(tree.validate(), Ok(()));
        assert_eq!(tree.n_nodes(), 2 * tree.n_leaves() - 1);
    }
}
