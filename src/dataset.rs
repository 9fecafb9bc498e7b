//! Labeled numeric datasets and the embedded Iris dataset.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::DataError;

/// Fisher's Iris dataset: 150 flowers, 4 measurements in cm, 3 species.
const IRIS_CSV: &str = include_str!("../data/iris.csv");

/// Feature matrix with one class id per row.
///
/// Class ids index into `target_names`; they are assigned in the order the
/// label strings first appear in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub points: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
}

impl Dataset {
    /// Reads a CSV with a header row, numeric feature columns and a final label column.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.len() < 2 {
            return Err(DataError::Empty);
        }
        let n_features = headers.len() - 1;
        let feature_names: Vec<String> =
            headers.iter().take(n_features).map(str::to_string).collect();

        let mut points = Vec::new();
        let mut labels = Vec::new();
        let mut target_names: Vec<String> = Vec::new();
        let mut class_ids: HashMap<String, usize> = HashMap::new();

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(DataError::RaggedRow {
                    row,
                    expected: n_features,
                    actual: record.len().saturating_sub(1),
                });
            }

            let features = record
                .iter()
                .take(n_features)
                .map(|value| {
                    value.parse::<f64>().map_err(|_| DataError::InvalidFeature {
                        row,
                        value: value.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;

            let name = &record[n_features];
            let class_id = match class_ids.get(name) {
                Some(&id) => id,
                None => {
                    let id = target_names.len();
                    class_ids.insert(name.to_string(), id);
                    target_names.push(name.to_string());
                    id
                }
            };

            points.push(features);
            labels.push(class_id);
        }

        if points.is_empty() {
            return Err(DataError::Empty);
        }

        debug!(
            "loaded {} rows, {} features, {} classes",
            points.len(),
            n_features,
            target_names.len()
        );
        Ok(Dataset { points, labels, feature_names, target_names })
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn n_classes(&self) -> usize {
        self.target_names.len()
    }

    /// Projects every point onto the given feature columns, in the given order.
    pub fn select_features(&self, indices: &[usize]) -> Result<Dataset, DataError> {
        let n_features = self.n_features();
        if let Some(&index) = indices.iter().find(|&&i| i >= n_features) {
            return Err(DataError::FeatureIndex { index, n_features });
        }

        Ok(Dataset {
            points: self
                .points
                .iter()
                .map(|p| indices.iter().map(|&i| p[i]).collect())
                .collect(),
            labels: self.labels.clone(),
            feature_names: indices.iter().map(|&i| self.feature_names[i].clone()).collect(),
            target_names: self.target_names.clone(),
        })
    }
}

/// Loads the Iris dataset bundled with the crate.
///
/// Classes: 0 = setosa, 1 = versicolor, 2 = virginica.
pub fn load_iris() -> Result<Dataset, DataError> {
    Dataset::from_csv_reader(IRIS_CSV.as_bytes())
}
