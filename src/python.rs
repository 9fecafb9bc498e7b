//! Python bindings, built with `--features python`.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::KnnError;
use crate::knn::distance::{cosine_distance, euclidean_distance};
use crate::knn::{KnnClassifier, KnnDistance};

impl From<KnnError> for PyErr {
    fn from(err: KnnError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

fn check_same_length(a: &[f64], b: &[f64]) -> PyResult<()> {
    if a.len() != b.len() {
        return Err(PyValueError::new_err("Input vectors must have the same length."));
    }
    Ok(())
}

/// Calculates the Euclidean distance between two vectors of f64.
#[pyfunction]
fn euclidean_distance_py(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    check_same_length(&a, &b)?;
    Ok(euclidean_distance(&a, &b))
}

/// Calculates the Cosine distance between two vectors of f64.
#[pyfunction]
fn cosine_distance_py(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    check_same_length(&a, &b)?;
    Ok(cosine_distance(&a, &b))
}

/// Metric selector exposed to Python. The Minkowski order is passed to the
/// classifier constructor as `p`.
#[pyclass(name = "Metric")]
#[derive(Clone, Copy, Debug, PartialEq)]
enum PyMetric {
    Euclidean,
    Manhattan,
    Minkowski,
    Cosine,
}

impl PyMetric {
    fn with_order(self, p: u32) -> KnnDistance {
        match self {
            PyMetric::Euclidean => KnnDistance::Euclidean,
            PyMetric::Manhattan => KnnDistance::Manhattan,
            PyMetric::Minkowski => KnnDistance::Minkowski { p },
            PyMetric::Cosine => KnnDistance::Cosine,
        }
    }
}

#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    classifier: KnnClassifier<f64, String>,
}

#[pymethods]
impl PyKnnClassifier {
    #[new]
    #[pyo3(signature = (k, metric = PyMetric::Euclidean, p = 3))]
    fn new(k: usize, metric: PyMetric, p: u32) -> PyResult<Self> {
        Ok(PyKnnClassifier {
            classifier: KnnClassifier::with_distance(k, metric.with_order(p))?,
        })
    }

    /// Stores `points` and their `labels`, replacing earlier training data.
    fn fit(&mut self, points: Vec<Vec<f64>>, labels: Vec<String>) -> PyResult<()> {
        self.classifier.fit(points, labels)?;
        Ok(())
    }

    fn predict_one(&self, query: Vec<f64>) -> PyResult<String> {
        Ok(self.classifier.predict_one(&query)?)
    }

    /// Predicts a batch of queries; the GIL is released while the rayon pool works.
    fn predict(&self, py: Python<'_>, queries: Vec<Vec<f64>>) -> PyResult<Vec<String>> {
        let predictions = py.allow_threads(|| self.classifier.par_predict(&queries))?;
        Ok(predictions)
    }

    #[getter]
    fn k(&self) -> usize {
        self.classifier.k()
    }

    #[getter]
    fn n_samples(&self) -> usize {
        self.classifier.n_samples()
    }
}

#[pymodule]
fn knn_classifier(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(euclidean_distance_py, m)?)?;
    m.add_function(wrap_pyfunction!(cosine_distance_py, m)?)?;
    m.add_class::<PyMetric>()?;
    m.add_class::<PyKnnClassifier>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_with_order() {
        assert_eq!(PyMetric::Euclidean.with_order(7), KnnDistance::Euclidean);
        assert_eq!(PyMetric::Minkowski.with_order(4), KnnDistance::Minkowski { p: 4 });
    }

    #[test]
    fn test_constructor_surfaces_invalid_configuration() {
        assert!(PyKnnClassifier::new(0, PyMetric::Euclidean, 3).is_err());
        assert!(PyKnnClassifier::new(3, PyMetric::Minkowski, 0).is_err());
        assert!(PyKnnClassifier::new(3, PyMetric::Minkowski, u32::MAX).is_err());
        assert_eq!(PyKnnClassifier::new(3, PyMetric::Minkowski, 400).unwrap().k(), 3);
    }

    #[test]
    fn test_knn_error_becomes_value_error() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let err: PyErr = KnnError::NotFitted.into();
            assert!(err.is_instance_of::<PyValueError>(py));
            assert_eq!(err.value_bound(py).to_string(), KnnError::NotFitted.to_string());
        });
    }

    #[test]
    fn test_predict_releases_gil_and_matches_predict_one() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let mut classifier = PyKnnClassifier::new(1, PyMetric::Euclidean, 3).unwrap();
            assert!(classifier.predict(py, vec![vec![0.0, 0.0]]).is_err());

            classifier
                .fit(
                    vec![vec![0.0, 0.0], vec![5.0, 5.0]],
                    vec!["low".to_string(), "high".to_string()],
                )
                .unwrap();
            let queries = vec![vec![0.5, 0.5], vec![4.0, 6.0]];
            let batch = classifier.predict(py, queries.clone()).unwrap();
            assert_eq!(batch, vec!["low".to_string(), "high".to_string()]);
            assert_eq!(classifier.predict_one(queries[1].clone()).unwrap(), batch[1]);
            assert_eq!(classifier.n_samples(), 2);
        });
    }
}
