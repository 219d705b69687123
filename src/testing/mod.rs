//! Shared fixtures and synthetic datasets for tests and benchmarks.

use ndarray::Array2;
use rand::prelude::*;

/// Six samples of one feature in three clean bands.
///
/// Values 1, 2 carry label 0, values 4, 5 carry label 1, values 7, 8
/// carry label 2, so thresholds near 3 and 6 separate the classes
/// perfectly.
pub fn three_band_dataset() -> (Array2<f64>, Vec<u32>, u32) {
	let features = Array2::from_shape_vec((6, 1), vec![1.0, 2.0, 4.0, 5.0, 7.0, 8.0])
		.expect("shape matches data length");
	let labels = vec![0, 0, 1, 1, 2, 2];
	(features, labels, 3)
}

/// Twenty-four samples of three features identifying twelve classes.
///
/// The first two features pick one of four blocks, the third feature
/// falls in one of three bands within the block. Every class keeps two
/// samples, so a correct fit classifies all rows exactly.
pub fn block_grid_dataset() -> (Array2<f64>, Vec<u32>, u32) {
	let f2_values = [1.0, 2.0, 4.0, 5.0, 7.0, 8.0];
	let mut values = Vec::with_capacity(24 * 3);
	let mut labels = Vec::with_capacity(24);
	let mut base = 0u32;
	for f0 in [0.0, 4.0] {
		for f1 in [0.0, 2.0] {
			for (i, &f2) in f2_values.iter().enumerate() {
				values.extend_from_slice(&[f0, f1, f2]);
				labels.push(base + i as u32 / 2);
			}
			base += 3;
		}
	}
	let features =
		Array2::from_shape_vec((24, 3), values).expect("shape matches data length");
	(features, labels, 12)
}

/// Uniform random features in `[0, 10)` with uniform random labels.
pub fn random_dataset(
	n_samples: usize,
	n_features: usize,
	n_labels: u32,
	seed: u64,
) -> (Array2<f64>, Vec<u32>, u32) {
	assert!(n_samples > 0, "n_samples must be positive");
	assert!(n_features > 0, "n_features must be positive");
	assert!(n_labels > 0, "n_labels must be positive");

	let mut rng = StdRng::seed_from_u64(seed);
	let mut values = Vec::with_capacity(n_samples * n_features);
	for _ in 0..n_samples * n_features {
		values.push(rng.r#gen::<f64>() * 10.0);
	}
	let labels = (0..n_samples).map(|_| rng.gen_range(0..n_labels)).collect();
	let features = Array2::from_shape_vec((n_samples, n_features), values)
		.expect("shape matches generated length");
	(features, labels, n_labels)
}
