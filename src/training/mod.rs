//! Tree fitting: entropy measures, split selection, and the work-list
//! grower.
//!
//! The entry points live on the tree itself: [`DecisionTree::fit`] and
//! [`DecisionTree::fit_with`]. This module carries the pieces behind them
//! plus standalone measures ([`entropy`], [`information_gain`]) for
//! inspecting datasets directly.
//!
//! [`DecisionTree::fit`]: crate::DecisionTree::fit
//! [`DecisionTree::fit_with`]: crate::DecisionTree::fit_with

pub mod entropy;
mod grower;
pub mod logger;
mod splitter;

pub use entropy::{entropy, information_gain, information_gain_ratio, split_information};
pub use logger::{TrainingLogger, Verbosity};

pub(crate) use grower::grow_tree;

use crate::utils::Parallelism;

/// Execution options for fitting.
///
/// These decide how the work runs, never what tree comes out: parallel
/// and sequential fits select identical splits.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitOptions {
    /// Whether per-feature candidate scans may use rayon.
    pub parallelism: Parallelism,
    /// How much progress gets logged.
    pub verbosity: Verbosity,
}
