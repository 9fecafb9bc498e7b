//! Data structures shared by the classifier, the dataset loader and the plotting helpers.

/// Represents a single data point, with features and a label.
///
/// - `F`: The type of the features (e.g., `f64`, `f32`).
/// - `L`: The type of the label (e.g., `usize`, `String`, an enum).
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint<F, L> {
    pub features: Vec<F>,
    pub label: L,
}

impl<F, L> DataPoint<F, L> {
    pub fn new(features: Vec<F>, label: L) -> Self {
        DataPoint { features, label }
    }

    /// Number of features carried by this point.
    pub fn dimensionality(&self) -> usize {
        self.features.len()
    }
}

/// Pairs an ordered point sequence with its label sequence, index by index.
///
/// Callers are expected to have checked that both sequences have the same length.
pub fn zip_points<F, L>(points: Vec<Vec<F>>, labels: Vec<L>) -> Vec<DataPoint<F, L>> {
    points
        .into_iter()
        .zip(labels)
        .map(|(features, label)| DataPoint::new(features, label))
        .collect()
}
