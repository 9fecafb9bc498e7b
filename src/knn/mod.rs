//! k-nearest-neighbors classification: distance metrics, neighbor selection and voting.

pub mod classifier;
pub mod distance;
pub mod heap_utils;
pub mod vote;

pub use classifier::KnnClassifier;
pub use distance::KnnDistance;
pub use heap_utils::Neighbor;
