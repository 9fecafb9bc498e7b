//! k-nearest-neighbors classification from first principles.
//!
//! The core is [`knn::KnnClassifier`]: it stores a training set, and for each
//! query ranks every stored point by distance, keeps the `k` nearest and
//! returns the majority label. The remaining modules supply what the Iris
//! walkthrough needs around it: a dataset loader, a seeded train/test split,
//! classification metrics and a decision boundary plot.
pub mod common_types;
pub mod config;
pub mod dataset;
pub mod error;
pub mod knn;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod plot;
#[cfg(feature = "python")]
mod python;

pub use common_types::DataPoint;
pub use error::{DataError, KnnError, PlotError};
pub use knn::{KnnClassifier, KnnDistance};
