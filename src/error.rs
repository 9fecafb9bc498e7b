//! Error types for the classifier and its data collaborators.

use thiserror::Error;

/// Usage errors raised by [`KnnClassifier`](crate::knn::KnnClassifier).
///
/// These are programmer errors rather than transient failures, so nothing
/// in the crate retries on them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnnError {
    /// A hyperparameter is outside its valid range (e.g. `k == 0`).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Point/label counts disagree, or a point has the wrong number of features.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// `k` is larger than the number of stored training points.
    #[error("insufficient data: k = {k} but only {available} training points are stored")]
    InsufficientData { k: usize, available: usize },

    /// Prediction was requested before `fit`.
    #[error("classifier has not been fitted; call fit() first")]
    NotFitted,
}

impl KnnError {
    pub(crate) fn dimension_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        KnnError::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Errors from loading, splitting and scoring datasets.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset is empty")]
    Empty,

    #[error("row {row} has {actual} feature columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("could not parse feature value {value:?} in row {row}")]
    InvalidFeature { row: usize, value: String },

    #[error("feature index {index} out of range for {n_features} features")]
    FeatureIndex { index: usize, n_features: usize },

    #[error("sequences must have the same length, got {left} and {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("invalid split: {0}")]
    InvalidSplit(String),
}

/// Errors from building a decision boundary plot.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("{what}: expected {expected} values, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("grid prediction failed: {0}")]
    Classifier(#[from] KnnError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = KnnError::InsufficientData { k: 5, available: 3 };
        assert!(err.to_string().contains("k = 5"));
        assert!(err.to_string().contains("3 training points"));

        let err = KnnError::dimension_mismatch("2 features", "3 features");
        assert_eq!(
            err.to_string(),
            "dimension mismatch: expected 2 features, got 3 features"
        );

        let err = DataError::LengthMismatch { left: 4, right: 2 };
        assert!(err.to_string().contains("4 and 2"));
    }
}
