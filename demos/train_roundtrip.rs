//! Fits a tree on a small grid dataset, round-trips it through the
//! binary format, and shows both copies agreeing.
//!
//! Run with `cargo run --example train_roundtrip`.

use std::error::Error;

use ndarray::Array2;

use picodt::{DecisionTree, FitOptions, TrainingSet, Verbosity};

fn main() -> Result<(), Box<dyn Error>> {
    // Two samples per class: the first two features pick one of four
    // blocks, the third falls in one of three bands within the block.
    let mut values = Vec::new();
    let mut labels = Vec::new();
    let mut base = 0u32;
    for f0 in [0.0, 4.0] {
        for f1 in [0.0, 2.0] {
            for (i, f2) in [1.0, 2.0, 4.0, 5.0, 7.0, 8.0].into_iter().enumerate() {
                values.extend_from_slice(&[f0, f1, f2]);
                labels.push(base + i as u32 / 2);
            }
            base += 3;
        }
    }
    let features = Array2::from_shape_vec((24, 3), values)?;
    let data = TrainingSet::new(features.view(), &labels, 12)?;

    let tree = DecisionTree::fit_with(
        &data,
        FitOptions {
            verbosity: Verbosity::Info,
            ..FitOptions::default()
        },
    );

    println!();
    for row in 0..data.n_samples() {
        let sample = features.row(row).to_vec();
        println!(
            "dt({}, {}, {}) = {}",
            sample[0],
            sample[1],
            sample[2],
            tree.predict(&sample)
        );
    }
    println!();
    for sample in [
        [0.0, 0.0, 9.0],
        [0.0, 0.0, 10.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 4.5],
        [0.0, 0.0, 3.0],
        [0.0, 0.0, 2.9],
        [0.0, 0.0, 3.1],
    ] {
        println!(
            "dt({}, {}, {}) = {}",
            sample[0],
            sample[1],
            sample[2],
            tree.predict(&sample)
        );
    }

    let bytes = tree.to_bytes();
    println!("\n{} serialized bytes:", bytes.len());
    let hex: Vec<String> = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
    println!("{}", hex.join(" "));

    let restored = DecisionTree::from_bytes(data.n_features(), data.n_labels(), &bytes)?;
    println!("\nrestored copy agrees on all training rows:");
    for row in 0..data.n_samples() {
        let sample = features.row(row).to_vec();
        let predicted = restored.predict(&sample);
        assert_eq!(predicted, tree.predict(&sample));
        println!(
            "dt({}, {}, {}) = {}",
            sample[0], sample[1], sample[2], predicted
        );
    }
    Ok(())
}
