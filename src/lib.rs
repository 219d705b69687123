//! Minimal embeddable decision-tree classifier.
//!
//! Fits a binary decision tree over numeric features with integer class
//! labels, selecting splits by information gain, and persists fitted trees
//! in a compact two-tag binary format. Both fitting and the codec run
//! iteratively with explicit work lists, so tree depth never translates
//! into call-stack depth.
//!
//! # Key Types
//!
//! - [`DecisionTree`] - Fitted tree: prediction, validation, persistence
//! - [`TrainingSet`] - Validated borrowed view over samples and labels
//! - [`FitOptions`] - Parallelism and logging knobs for fitting
//! - [`codec`] - The two-tag wire format and its error taxonomy
//!
//! # Example
//!
//! ```
//! use ndarray::array;
//! use picodt::{DecisionTree, TrainingSet};
//!
//! let features = array![[1.0], [2.0], [7.0], [8.0]];
//! let labels = vec![0, 0, 1, 1];
//! let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
//!
//! let tree = DecisionTree::fit(&data);
//! assert_eq!(tree.predict(&[1.5]), 0);
//! assert_eq!(tree.predict(&[7.5]), 1);
//!
//! let bytes = tree.to_bytes();
//! let restored = DecisionTree::from_bytes(1, 2, &bytes).unwrap();
//! assert_eq!(restored.predict(&[7.5]), 1);
//! ```

pub mod codec;
pub mod data;
pub mod testing;
pub mod training;
pub mod tree;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use codec::DecodeError;
pub use data::{DataError, TrainingSet};
pub use training::{FitOptions, TrainingLogger, Verbosity};
pub use tree::{DecisionTree, Node, NodeId, SplitCondition, TreeValidationError};
pub use utils::{Parallelism, run_with_threads};
