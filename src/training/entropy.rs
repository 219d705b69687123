//! Entropy and information-gain measures over label distributions.
//!
//! All measures are in bits. Splitting a set at a threshold partitions it
//! into a lesser side (feature strictly below) and a greater side; the
//! gain of a split is the parent entropy minus the plain average of the
//! two partition entropies.

use crate::data::TrainingSet;

/// Shannon entropy of a distribution given per-class counts.
///
/// Classes with zero count are skipped, so a pure or empty distribution
/// scores exactly 0.
pub(crate) fn entropy_of_counts(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut sum = 0.0;
    for &count in counts {
        if count == 0 {
            continue;
        }
        let p = count as f64 / total;
        sum += p * p.log2();
    }
    -sum
}

/// Shannon entropy of a label sequence.
///
/// ```
/// use picodt::training::entropy;
///
/// assert_eq!(entropy([0, 0, 0].iter().copied(), 1), 0.0);
/// assert_eq!(entropy([0, 0, 1, 1].iter().copied(), 2), 1.0);
/// ```
pub fn entropy<I>(labels: I, n_labels: u32) -> f64
where
    I: IntoIterator<Item = u32>,
{
    let mut counts = vec![0usize; n_labels as usize];
    let mut total = 0usize;
    for label in labels {
        counts[label as usize] += 1;
        total += 1;
    }
    entropy_of_counts(&counts, total)
}

/// Information gain of splitting the whole set at `threshold` on `feature`.
///
/// A threshold that leaves either partition empty scores 0: it carries no
/// information, whatever the entropy arithmetic would have produced.
pub fn information_gain(data: &TrainingSet<'_>, feature: usize, threshold: f64) -> f64 {
    let n_labels = data.n_labels() as usize;
    let mut parent_counts = vec![0usize; n_labels];
    let mut lesser_counts = vec![0usize; n_labels];
    let mut greater_counts = vec![0usize; n_labels];
    let mut lesser_total = 0usize;
    let mut greater_total = 0usize;

    for sample in 0..data.n_samples() {
        let label = data.label(sample) as usize;
        parent_counts[label] += 1;
        if data.feature(sample, feature) < threshold {
            lesser_counts[label] += 1;
            lesser_total += 1;
        } else {
            greater_counts[label] += 1;
            greater_total += 1;
        }
    }
    if lesser_total == 0 || greater_total == 0 {
        return 0.0;
    }

    let parent = entropy_of_counts(&parent_counts, data.n_samples());
    let lesser = entropy_of_counts(&lesser_counts, lesser_total);
    let greater = entropy_of_counts(&greater_counts, greater_total);
    parent - (lesser + greater) / 2.0
}

/// Entropy of the partition sizes themselves (the C4.5 denominator).
///
/// An empty partition contributes 0, so a degenerate split scores 0.
pub fn split_information(data: &TrainingSet<'_>, feature: usize, threshold: f64) -> f64 {
    let total = data.n_samples();
    let lesser = (0..total)
        .filter(|&sample| data.feature(sample, feature) < threshold)
        .count();
    let greater = total - lesser;

    let mut sum = 0.0;
    for count in [lesser, greater] {
        if count == 0 {
            continue;
        }
        let p = count as f64 / total as f64;
        sum += p * p.log2();
    }
    -sum
}

/// Information gain normalized by split information.
///
/// Returns 0 when the split information is 0 rather than dividing by it.
pub fn information_gain_ratio(data: &TrainingSet<'_>, feature: usize, threshold: f64) -> f64 {
    let split_info = split_information(data, feature, threshold);
    if split_info == 0.0 {
        return 0.0;
    }
    information_gain(data, feature, threshold) / split_info
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    fn two_band_set() -> (ndarray::Array2<f64>, Vec<u32>) {
        (array![[1.0], [2.0], [4.0], [5.0]], vec![0, 0, 1, 1])
    }

    #[test]
    fn entropy_of_pure_labels_is_zero() {
        assert_eq!(entropy([2, 2, 2, 2].iter().copied(), 3), 0.0);
    }

    #[test]
    fn entropy_of_balanced_labels() {
        assert_relative_eq!(entropy([0, 1].iter().copied(), 2), 1.0);
        assert_relative_eq!(entropy([0, 1, 2, 3].iter().copied(), 4), 2.0);
    }

    #[test]
    fn entropy_skips_absent_classes() {
        // Counting over 10 classes must not change the result.
        assert_relative_eq!(
            entropy([0, 0, 1, 1].iter().copied(), 10),
            1.0
        );
    }

    #[test]
    fn entropy_of_skewed_labels() {
        // H(1/4, 3/4) = 2 - 0.75 * log2(3)
        let expected = 2.0 - 0.75 * 3.0f64.log2();
        assert_relative_eq!(
            entropy([0, 1, 1, 1].iter().copied(), 2),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn gain_of_clean_separation() {
        let (features, labels) = two_band_set();
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        // Both partitions become pure: full parent entropy is gained.
        assert_relative_eq!(information_gain(&data, 0, 3.0), 1.0);
    }

    #[test]
    fn gain_of_useless_threshold_is_zero() {
        let (features, labels) = two_band_set();
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        assert_eq!(information_gain(&data, 0, 0.5), 0.0); // everything greater
        assert_eq!(information_gain(&data, 0, 9.0), 0.0); // everything lesser
    }

    #[test]
    fn gain_uses_unweighted_average() {
        // Lesser side {0}, greater side {0, 1, 1}:
        // gain = H(2/4, 2/4) - (0 + H(1/3, 2/3)) / 2
        let features = array![[1.0], [2.0], [3.0], [4.0]];
        let labels = [0, 0, 1, 1];
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        let greater = (3.0f64.log2() * 3.0 - 2.0) / 3.0;
        assert_relative_eq!(
            information_gain(&data, 0, 1.5),
            1.0 - greater / 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn split_information_of_even_partition() {
        let (features, labels) = two_band_set();
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        assert_relative_eq!(split_information(&data, 0, 3.0), 1.0);
    }

    #[test]
    fn split_information_of_empty_partition_is_zero() {
        let (features, labels) = two_band_set();
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        assert_eq!(split_information(&data, 0, 100.0), 0.0);
    }

    #[test]
    fn gain_ratio_normalizes_gain() {
        let (features, labels) = two_band_set();
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        assert_relative_eq!(information_gain_ratio(&data, 0, 3.0), 1.0);
        // Uneven 1/3 partition at threshold 1.5.
        let gain = information_gain(&data, 0, 1.5);
        let split_info = split_information(&data, 0, 1.5);
        assert_relative_eq!(
            information_gain_ratio(&data, 0, 1.5),
            gain / split_info,
            max_relative = 1e-12
        );
    }

    #[test]
    fn gain_ratio_of_degenerate_split_is_zero() {
        let (features, labels) = two_band_set();
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        assert_eq!(information_gain_ratio(&data, 0, 100.0), 0.0);
    }
}
