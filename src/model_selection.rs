//! Reproducible train/test splitting.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::DataError;

/// The four sequences produced by [`train_test_split`].
#[derive(Debug, Clone, PartialEq)]
pub struct Split<P, L> {
    pub train_points: Vec<P>,
    pub test_points: Vec<P>,
    pub train_labels: Vec<L>,
    pub test_labels: Vec<L>,
}

impl<P, L> Split<P, L> {
    pub fn n_train(&self) -> usize {
        self.train_points.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_points.len()
    }
}

/// Shuffles `0..n_samples` with a generator seeded from `seed`.
fn shuffle_indices(n_samples: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices
}

/// Randomly partitions points and labels into train and test sets.
///
/// `test_size` is the fraction of samples placed in the test set and must lie
/// strictly between 0 and 1; the test set gets `round(n * test_size)` samples.
/// The same `seed` always produces the same split.
pub fn train_test_split<P, L>(
    points: &[P],
    labels: &[L],
    test_size: f64,
    seed: u64,
) -> Result<Split<P, L>, DataError>
where
    P: Clone,
    L: Clone,
{
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DataError::InvalidSplit(format!(
            "test_size must be between 0 and 1, got {test_size}"
        )));
    }
    if points.len() != labels.len() {
        return Err(DataError::LengthMismatch { left: points.len(), right: labels.len() });
    }

    let n_samples = points.len();
    let n_test = (n_samples as f64 * test_size).round() as usize;
    let n_train = n_samples - n_test;
    if n_test == 0 || n_train == 0 {
        return Err(DataError::InvalidSplit(format!(
            "split would result in empty train or test set (n_train={n_train}, n_test={n_test})"
        )));
    }

    let indices = shuffle_indices(n_samples, seed);
    let (train_idx, test_idx) = indices.split_at(n_train);
    let pick_points = |idx: &[usize]| idx.iter().map(|&i| points[i].clone()).collect::<Vec<_>>();
    let pick_labels = |idx: &[usize]| idx.iter().map(|&i| labels[i].clone()).collect::<Vec<_>>();

    Ok(Split {
        train_points: pick_points(train_idx),
        test_points: pick_points(test_idx),
        train_labels: pick_labels(train_idx),
        test_labels: pick_labels(test_idx),
    })
}
