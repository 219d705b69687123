//! Candidate threshold generation and best-split selection.

use std::cmp::Ordering;

use crate::data::TrainingSet;
use crate::utils::Parallelism;

use super::entropy::entropy_of_counts;

/// A scored threshold on one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SplitCandidate {
    pub feature: u32,
    pub threshold: f64,
    pub gain: f64,
    /// True when the threshold leaves one partition empty.
    pub degenerate: bool,
}

impl SplitCandidate {
    /// Whether this candidate displaces `best` in a scan.
    ///
    /// Equal gains go to the later-scanned candidate, except that a
    /// degenerate candidate never displaces a real one it merely ties.
    fn supersedes(&self, best: &SplitCandidate) -> bool {
        match self.gain.partial_cmp(&best.gain) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => !self.degenerate || best.degenerate,
            _ => false,
        }
    }
}

/// Midpoint thresholds for one feature over a sample subset.
///
/// The subset's feature values are sorted in descending order and each
/// adjacent pair collapses to its midpoint, yielding `rows.len() - 1`
/// candidates from highest to lowest. Duplicate values produce a midpoint
/// equal to the value itself; such thresholds score as degenerate or
/// redundant downstream and fall out of selection naturally.
pub(crate) fn midpoint_thresholds(
    data: &TrainingSet<'_>,
    rows: &[u32],
    feature: usize,
) -> Vec<f64> {
    debug_assert!(rows.len() >= 2, "midpoints need at least two samples");
    let mut values: Vec<f64> = rows
        .iter()
        .map(|&row| data.feature(row as usize, feature))
        .collect();
    values.sort_unstable_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    for j in 0..values.len() - 1 {
        values[j] = (values[j] + values[j + 1]) / 2.0;
    }
    values.pop();
    values
}

/// Score one threshold over the subset.
fn evaluate(
    data: &TrainingSet<'_>,
    rows: &[u32],
    parent_entropy: f64,
    feature: u32,
    threshold: f64,
    lesser_counts: &mut [usize],
    greater_counts: &mut [usize],
) -> SplitCandidate {
    lesser_counts.fill(0);
    greater_counts.fill(0);
    let mut lesser_total = 0usize;
    let mut greater_total = 0usize;

    for &row in rows {
        let row = row as usize;
        let label = data.label(row) as usize;
        if data.feature(row, feature as usize) < threshold {
            lesser_counts[label] += 1;
            lesser_total += 1;
        } else {
            greater_counts[label] += 1;
            greater_total += 1;
        }
    }

    if lesser_total == 0 || greater_total == 0 {
        return SplitCandidate {
            feature,
            threshold,
            gain: 0.0,
            degenerate: true,
        };
    }

    let lesser = entropy_of_counts(lesser_counts, lesser_total);
    let greater = entropy_of_counts(greater_counts, greater_total);
    SplitCandidate {
        feature,
        threshold,
        gain: parent_entropy - (lesser + greater) / 2.0,
        degenerate: false,
    }
}

/// Best candidate for one feature, scanning thresholds in midpoint order.
fn scan_feature(
    data: &TrainingSet<'_>,
    rows: &[u32],
    parent_entropy: f64,
    feature: u32,
) -> SplitCandidate {
    let thresholds = midpoint_thresholds(data, rows, feature as usize);
    let n_labels = data.n_labels() as usize;
    let mut lesser_counts = vec![0usize; n_labels];
    let mut greater_counts = vec![0usize; n_labels];

    let mut best = evaluate(
        data,
        rows,
        parent_entropy,
        feature,
        thresholds[0],
        &mut lesser_counts,
        &mut greater_counts,
    );
    for &threshold in &thresholds[1..] {
        let candidate = evaluate(
            data,
            rows,
            parent_entropy,
            feature,
            threshold,
            &mut lesser_counts,
            &mut greater_counts,
        );
        if candidate.supersedes(&best) {
            best = candidate;
        }
    }
    best
}

/// Best candidate across all features for a node's sample subset.
///
/// Features scan independently (in parallel when enabled) and reduce in
/// ascending feature order, which picks exactly the candidate a single
/// flat scan over (feature, threshold) pairs would pick.
pub(crate) fn find_best_split(
    data: &TrainingSet<'_>,
    rows: &[u32],
    parent_entropy: f64,
    parallelism: Parallelism,
) -> SplitCandidate {
    let n_features = data.n_features() as u32;
    let per_feature = parallelism.maybe_par_map(0..n_features, |feature| {
        scan_feature(data, rows, parent_entropy, feature)
    });

    let mut best = per_feature[0];
    for candidate in &per_feature[1..] {
        if candidate.supersedes(&best) {
            best = *candidate;
        }
    }
    best
}
