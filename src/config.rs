//! Settings for the Iris demo pipeline.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::knn::KnnDistance;

/// Everything the demo needs besides the data itself.
///
/// Missing fields in a JSON file take their default values.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of neighbors consulted per prediction.
    pub k: usize,
    pub distance: KnnDistance,
    /// Fraction of the dataset held out for testing.
    pub test_size: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    /// Feature columns used for the 2D decision boundary plot.
    pub plot_features: [usize; 2],
    /// Spacing between grid points of the plot, in feature units (cm).
    pub grid_step: f64,
    /// Extra room around the data on each side of the plot.
    pub grid_margin: f64,
    /// Where to write the plot as HTML; no file is written when unset.
    pub output_html: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            k: 3,
            distance: KnnDistance::Euclidean,
            test_size: 0.2,
            seed: 42,
            plot_features: [2, 3],
            grid_step: 0.02,
            grid_margin: 1.0,
            output_html: None,
        }
    }
}

impl DemoConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
        let config: DemoConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            bail!("k must be a positive integer");
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            bail!("test_size must be between 0 and 1, got {}", self.test_size);
        }
        if !(self.grid_step > 0.0) {
            bail!("grid_step must be positive, got {}", self.grid_step);
        }
        if !(self.grid_margin >= 0.0) {
            bail!("grid_margin must be non-negative, got {}", self.grid_margin);
        }
        // Bounds depend on the dataset and are checked when the features are selected.
        let [a, b] = self.plot_features;
        if a == b {
            bail!("plot_features must be two distinct indices, got {:?}", self.plot_features);
        }
        Ok(())
    }
}
