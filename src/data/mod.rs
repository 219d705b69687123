//! Training data views and boundary validation.

use ndarray::ArrayView2;
use thiserror::Error;

/// Rejections produced when assembling a [`TrainingSet`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("training set has no samples")]
    EmptySamples,

    #[error("training set has no features")]
    EmptyFeatures,

    #[error("class count must be at least 1")]
    NoClasses,

    #[error("label count {labels} does not match sample count {samples}")]
    LabelCountMismatch { labels: usize, samples: usize },

    #[error("label {label} at sample {sample} is out of range for {n_labels} classes")]
    LabelOutOfRange {
        sample: usize,
        label: u32,
        n_labels: u32,
    },
}

/// Borrowed, validated view over labeled training samples.
///
/// Features are sample-major: shape `[n_samples, n_features]`, one row per
/// sample. Labels are class indices in `[0, n_labels)`, parallel to the
/// rows. Feature values are assumed finite; missing-value handling is out
/// of scope for this crate.
#[derive(Debug, Clone, Copy)]
pub struct TrainingSet<'a> {
    features: ArrayView2<'a, f64>,
    labels: &'a [u32],
    n_labels: u32,
}

impl<'a> TrainingSet<'a> {
    /// Wrap a feature matrix and its labels, checking shape and ranges.
    pub fn new(
        features: ArrayView2<'a, f64>,
        labels: &'a [u32],
        n_labels: u32,
    ) -> Result<Self, DataError> {
        if features.nrows() == 0 {
            return Err(DataError::EmptySamples);
        }
        if features.ncols() == 0 {
            return Err(DataError::EmptyFeatures);
        }
        if n_labels == 0 {
            return Err(DataError::NoClasses);
        }
        if labels.len() != features.nrows() {
            return Err(DataError::LabelCountMismatch {
                labels: labels.len(),
                samples: features.nrows(),
            });
        }
        for (sample, &label) in labels.iter().enumerate() {
            if label >= n_labels {
                return Err(DataError::LabelOutOfRange {
                    sample,
                    label,
                    n_labels,
                });
            }
        }
        Ok(Self {
            features,
            labels,
            n_labels,
        })
    }

    // ===== Accessors =====

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    #[inline]
    pub fn n_labels(&self) -> u32 {
        self.n_labels
    }

    /// One feature value.
    #[inline]
    pub fn feature(&self, sample: usize, feature: usize) -> f64 {
        self.features[[sample, feature]]
    }

    /// One sample's label.
    #[inline]
    pub fn label(&self, sample: usize) -> u32 {
        self.labels[sample]
    }

    /// The whole feature matrix.
    #[inline]
    pub fn features(&self) -> ArrayView2<'a, f64> {
        self.features
    }

    /// All labels, row-parallel.
    #[inline]
    pub fn labels(&self) -> &'a [u32] {
        self.labels
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};

    use super::*;

    #[test]
    fn accepts_valid_data() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let labels = [0, 1];
        let data = TrainingSet::new(features.view(), &labels, 2).unwrap();
        assert_eq!(data.n_samples(), 2);
        assert_eq!(data.n_features(), 2);
        assert_eq!(data.n_labels(), 2);
        assert_eq!(data.feature(1, 0), 3.0);
        assert_eq!(data.label(1), 1);
    }

    #[test]
    fn rejects_empty_samples() {
        let features = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            TrainingSet::new(features.view(), &[], 2).unwrap_err(),
            DataError::EmptySamples
        );
    }

    #[test]
    fn rejects_empty_features() {
        let features = Array2::<f64>::zeros((2, 0));
        assert_eq!(
            TrainingSet::new(features.view(), &[0, 0], 2).unwrap_err(),
            DataError::EmptyFeatures
        );
    }

    #[test]
    fn rejects_zero_classes() {
        let features = array![[1.0]];
        assert_eq!(
            TrainingSet::new(features.view(), &[0], 0).unwrap_err(),
            DataError::NoClasses
        );
    }

    #[test]
    fn rejects_label_count_mismatch() {
        let features = array![[1.0], [2.0]];
        assert_eq!(
            TrainingSet::new(features.view(), &[0], 2).unwrap_err(),
            DataError::LabelCountMismatch {
                labels: 1,
                samples: 2,
            }
        );
    }

    #[test]
    fn rejects_label_out_of_range() {
        let features = array![[1.0], [2.0]];
        assert_eq!(
            TrainingSet::new(features.view(), &[0, 3], 3).unwrap_err(),
            DataError::LabelOutOfRange {
                sample: 1,
                label: 3,
                n_labels: 3,
            }
        );
    }
}
