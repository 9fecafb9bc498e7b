//! Brute-force k-nearest-neighbors classifier.

use std::collections::HashSet;
use std::hash::Hash;

use log::{debug, warn};
use num_traits::{AsPrimitive, Float};
use rayon::prelude::*;

use super::distance::KnnDistance;
use super::heap_utils::{KBestNeighbors, Neighbor};
use super::vote::majority_vote;
use crate::common_types::{zip_points, DataPoint};
use crate::error::KnnError;

/// The K-Nearest Neighbors Classifier.
///
/// Stores its training set on [`fit`](Self::fit) and answers each query by
/// scanning every stored point, keeping the `k` nearest and taking a majority
/// vote over their labels.
///
/// Both tie-breaks are deterministic:
/// - equal distances: the point stored earlier is nearer;
/// - equal vote counts: the label whose first neighbor is nearest wins.
#[derive(Debug, Clone)]
pub struct KnnClassifier<F, L> {
    k: usize,
    distance_metric: KnnDistance,
    training_data: Vec<DataPoint<F, L>>,
    /// Dimensionality of the stored points; `None` until the first successful fit.
    n_features: Option<usize>,
}

impl<F, L> KnnClassifier<F, L> {
    /// Creates an unfitted Euclidean classifier.
    ///
    /// Fails with [`KnnError::InvalidConfiguration`] when `k == 0`.
    pub fn new(k: usize) -> Result<Self, KnnError> {
        Self::with_distance(k, KnnDistance::Euclidean)
    }

    pub fn with_distance(k: usize, distance_metric: KnnDistance) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidConfiguration(
                "k must be a positive integer, got 0".to_string(),
            ));
        }
        if let KnnDistance::Minkowski { p } = distance_metric {
            if p == 0 || p > i32::MAX as u32 {
                return Err(KnnError::InvalidConfiguration(format!(
                    "Minkowski order p must be between 1 and {}, got {}",
                    i32::MAX,
                    p
                )));
            }
        }
        Ok(Self {
            k,
            distance_metric,
            training_data: Vec::new(),
            n_features: None,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn distance_metric(&self) -> KnnDistance {
        self.distance_metric
    }

    pub fn is_fitted(&self) -> bool {
        self.n_features.is_some()
    }

    /// Number of stored training points (0 before fit).
    pub fn n_samples(&self) -> usize {
        self.training_data.len()
    }

    pub fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    /// The stored training set, in fit order.
    pub fn training_data(&self) -> &[DataPoint<F, L>] {
        &self.training_data
    }
}

impl<F, L> KnnClassifier<F, L>
where
    F: Float + AsPrimitive<f64>,
    L: Clone + Eq + Hash,
{
    /// Trains the classifier by storing `points` and `labels`, replacing any previous training set.
    ///
    /// Fails with [`KnnError::DimensionMismatch`] if the sequences differ in
    /// length, are empty, or if the points do not all share one non-zero
    /// dimensionality. On failure the previous training set is kept.
    pub fn fit(&mut self, points: Vec<Vec<F>>, labels: Vec<L>) -> Result<(), KnnError> {
        if points.len() != labels.len() {
            return Err(KnnError::dimension_mismatch(
                format!("{} labels (one per point)", points.len()),
                format!("{} labels", labels.len()),
            ));
        }

        let n_features = match points.first() {
            Some(p) => p.len(),
            None => return Err(KnnError::dimension_mismatch("at least 1 training point", "0")),
        };
        if n_features == 0 {
            return Err(KnnError::dimension_mismatch("at least 1 feature per point", "0 features"));
        }
        if let Some((row, p)) = points.iter().enumerate().find(|(_, p)| p.len() != n_features) {
            return Err(KnnError::dimension_mismatch(
                format!("{} features", n_features),
                format!("{} features in training point {}", p.len(), row),
            ));
        }

        self.training_data = zip_points(points, labels);
        self.n_features = Some(n_features);

        debug!(
            "fitted k-NN (k = {}, metric = {:?}) on {} points with {} features",
            self.k,
            self.distance_metric,
            self.training_data.len(),
            n_features
        );
        if self.k > self.training_data.len() {
            warn!(
                "k = {} exceeds the {} stored training points; predictions will fail until refit",
                self.k,
                self.training_data.len()
            );
        }
        Ok(())
    }

    fn check_query(&self, query: &[F]) -> Result<(), KnnError> {
        let n_features = self.n_features.ok_or(KnnError::NotFitted)?;
        if query.len() != n_features {
            return Err(KnnError::dimension_mismatch(
                format!("{} features", n_features),
                format!("{} features in query", query.len()),
            ));
        }
        if self.k > self.training_data.len() {
            return Err(KnnError::InsufficientData {
                k: self.k,
                available: self.training_data.len(),
            });
        }
        if query.iter().any(|v| v.is_nan()) {
            warn!("query contains NaN features; every distance will be NaN");
        }
        Ok(())
    }

    /// Returns the `k` nearest stored points, nearest first, ties broken by storage order.
    pub fn kneighbors(&self, query: &[F]) -> Result<Vec<Neighbor<&L>>, KnnError> {
        self.check_query(query)?;

        let mut best = KBestNeighbors::new(self.k);
        for (index, train_sample) in self.training_data.iter().enumerate() {
            let distance = self.distance_metric.compute(query, &train_sample.features);
            best.add(distance, index, &train_sample.label);
        }
        Ok(best.into_sorted_neighbors())
    }

    /// Predicts the label of a single query point.
    pub fn predict_one(&self, query: &[F]) -> Result<L, KnnError> {
        let neighbors = self.kneighbors(query)?;
        majority_vote(neighbors.iter().map(|n| n.data))
            .cloned()
            .ok_or(KnnError::InsufficientData { k: self.k, available: 0 })
    }

    /// Predicts labels for a batch of queries, preserving their order.
    ///
    /// Stops at the first query that fails.
    pub fn predict(&self, queries: &[Vec<F>]) -> Result<Vec<L>, KnnError> {
        if !self.is_fitted() {
            return Err(KnnError::NotFitted);
        }
        debug!("predicting {} queries sequentially", queries.len());
        queries.iter().map(|q| self.predict_one(q)).collect()
    }

    /// Labels seen in the training set, in first-seen order.
    pub fn classes(&self) -> Vec<L> {
        let mut seen = HashSet::new();
        self.training_data
            .iter()
            .filter(|dp| seen.insert(&dp.label))
            .map(|dp| dp.label.clone())
            .collect()
    }
}

impl<F, L> KnnClassifier<F, L>
where
    F: Float + AsPrimitive<f64> + Send + Sync,
    L: Clone + Eq + Hash + Send + Sync,
{
    /// Same as [`predict`](Self::predict), with queries spread over the rayon thread pool.
    ///
    /// The training set is only read, so no locking is involved; `fit` needs
    /// `&mut self` and therefore cannot overlap a running prediction.
    pub fn par_predict(&self, queries: &[Vec<F>]) -> Result<Vec<L>, KnnError> {
        if !self.is_fitted() {
            return Err(KnnError::NotFitted);
        }
        debug!("predicting {} queries in parallel", queries.len());
        queries.par_iter().map(|q| self.predict_one(q)).collect()
    }
}
