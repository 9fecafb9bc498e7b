//! The Iris walkthrough: load, split, fit, predict, report, plot.
//!
//! Each stage receives the data it works on as arguments; nothing is shared
//! through module-level state.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use plotly::Plot;

use crate::config::DemoConfig;
use crate::dataset::{load_iris, Dataset};
use crate::knn::KnnClassifier;
use crate::metrics::{accuracy, classification_report, confusion_matrix, correctness, ClassificationReport};
use crate::model_selection::{train_test_split, Split};
use crate::plot::{decision_boundary_plot, BoundaryPlotData, MeshGrid};

/// Scores of one classifier on one held-out set.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub confusion: Vec<Vec<usize>>,
}

/// Outcome of [`run`].
pub struct RunSummary {
    pub n_train: usize,
    pub n_test: usize,
    /// Held-out scores using every feature.
    pub evaluation: Evaluation,
    /// Held-out accuracy of the classifier restricted to the two plotted features.
    pub boundary_accuracy: f64,
    pub plot: Plot,
}

impl fmt::Debug for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunSummary")
            .field("n_train", &self.n_train)
            .field("n_test", &self.n_test)
            .field("evaluation", &self.evaluation)
            .field("boundary_accuracy", &self.boundary_accuracy)
            .finish_non_exhaustive()
    }
}

/// Scores `predicted` against `truth`.
pub fn evaluate(predicted: &[usize], truth: &[usize], target_names: &[String]) -> Result<Evaluation> {
    Ok(Evaluation {
        accuracy: accuracy(predicted, truth)?,
        report: classification_report(predicted, truth, target_names)?,
        confusion: confusion_matrix(predicted, truth)?,
    })
}

/// Fits a classifier from `config` on the training half of `split` and predicts its test half.
pub fn fit_and_predict(
    config: &DemoConfig,
    split: &Split<Vec<f64>, usize>,
) -> Result<(KnnClassifier<f64, usize>, Vec<usize>)> {
    let mut classifier = KnnClassifier::with_distance(config.k, config.distance)?;
    classifier.fit(split.train_points.clone(), split.train_labels.clone())?;
    let predictions = classifier.par_predict(&split.test_points)?;
    Ok((classifier, predictions))
}

/// Runs the walkthrough on the bundled Iris dataset.
pub fn run(config: &DemoConfig) -> Result<RunSummary> {
    let iris = load_iris().context("Failed to load the Iris dataset")?;
    run_on(&iris, config)
}

/// Runs the walkthrough on any dataset.
pub fn run_on(dataset: &Dataset, config: &DemoConfig) -> Result<RunSummary> {
    config.validate()?;

    let split = train_test_split(&dataset.points, &dataset.labels, config.test_size, config.seed)?;
    info!(
        "split {} samples into {} train / {} test (seed {})",
        dataset.len(),
        split.n_train(),
        split.n_test(),
        config.seed
    );

    let (_, predictions) = fit_and_predict(config, &split)?;
    let evaluation = evaluate(&predictions, &split.test_labels, &dataset.target_names)?;
    info!("k = {}: test accuracy {:.3}", config.k, evaluation.accuracy);

    // Same seed and sample count, so the 2D split holds out the same rows.
    let projected = dataset
        .select_features(&config.plot_features)
        .context("Failed to select plot features")?;
    let split_2d = train_test_split(&projected.points, &projected.labels, config.test_size, config.seed)?;
    let (classifier_2d, predictions_2d) = fit_and_predict(config, &split_2d)?;
    let test_correct = correctness(&predictions_2d, &split_2d.test_labels)?;
    let boundary_accuracy = accuracy(&predictions_2d, &split_2d.test_labels)?;
    info!(
        "2D classifier on {:?}: test accuracy {:.3}",
        projected.feature_names, boundary_accuracy
    );

    let grid = MeshGrid::around(&projected.points, config.grid_step, config.grid_margin)?;
    let title = format!("k-NN decision boundary (k = {})", config.k);
    let plot = decision_boundary_plot(
        &classifier_2d,
        &grid,
        BoundaryPlotData {
            train_points: &split_2d.train_points,
            train_labels: &split_2d.train_labels,
            test_points: &split_2d.test_points,
            test_correct: &test_correct,
            target_names: &projected.target_names,
            feature_names: [projected.feature_names[0].as_str(), projected.feature_names[1].as_str()],
            title: &title,
        },
    )?;

    if let Some(path) = &config.output_html {
        write_plot_html(&plot, path)?;
    }

    Ok(RunSummary {
        n_train: split.n_train(),
        n_test: split.n_test(),
        evaluation,
        boundary_accuracy,
        plot,
    })
}

/// Writes `plot` as a standalone HTML page.
pub fn write_plot_html<P: AsRef<Path>>(plot: &Plot, path: P) -> Result<()> {
    std::fs::write(&path, plot.to_html())
        .with_context(|| format!("Failed to write plot: {}", path.as_ref().display()))?;
    info!("decision boundary plot written to {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_dataset() -> Dataset {
        let mut points = Vec::new();
        let mut labels = Vec::new();
        for i in 0..10 {
            let offset = i as f64 * 0.1;
            points.push(vec![offset, offset, 0.0, 0.0]);
            labels.push(0);
            points.push(vec![5.0 + offset, 5.0 + offset, 1.0, 1.0]);
            labels.push(1);
        }
        Dataset {
            points,
            labels,
            feature_names: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            target_names: vec!["low".into(), "high".into()],
        }
    }

    #[test]
    fn test_run_on_separable_data_is_perfect() {
        let config = DemoConfig { k: 1, grid_step: 0.5, plot_features: [0, 1], ..DemoConfig::default() };
        let summary = run_on(&toy_dataset(), &config).unwrap();
        assert_eq!(summary.n_train + summary.n_test, 20);
        assert_eq!(summary.n_test, 4);
        assert_eq!(summary.evaluation.accuracy, 1.0);
        assert_eq!(summary.boundary_accuracy, 1.0);
        assert_eq!(summary.evaluation.report.classes.len(), 2);
    }

    #[test]
    fn test_run_on_rejects_invalid_config() {
        let config = DemoConfig { k: 0, ..DemoConfig::default() };
        assert!(run_on(&toy_dataset(), &config).is_err());
    }

    #[test]
    fn test_k_larger_than_training_set_surfaces_classifier_error() {
        let config = DemoConfig { k: 50, grid_step: 0.5, ..DemoConfig::default() };
        let err = run_on(&toy_dataset(), &config).unwrap_err();
        assert!(err.to_string().contains("insufficient data"), "{}", err);
    }

    #[test]
    fn test_run_on_plots_any_feature_of_a_wider_dataset() {
        let mut dataset = toy_dataset();
        for (point, &label) in dataset.points.iter_mut().zip(&dataset.labels) {
            point.push(label as f64 * 10.0);
        }
        dataset.feature_names.push("e".into());

        let config = DemoConfig { k: 1, grid_step: 0.5, plot_features: [0, 4], ..DemoConfig::default() };
        let summary = run_on(&dataset, &config).unwrap();
        assert_eq!(summary.boundary_accuracy, 1.0);
    }

    #[test]
    fn test_run_on_rejects_plot_feature_out_of_range() {
        let config = DemoConfig { grid_step: 0.5, plot_features: [0, 4], ..DemoConfig::default() };
        let err = run_on(&toy_dataset(), &config).unwrap_err();
        assert!(err.to_string().contains("Failed to select plot features"), "{}", err);
    }

    #[test]
    fn test_evaluate() {
        let names = vec!["x".to_string(), "y".to_string()];
        let evaluation = evaluate(&[0, 1, 1], &[0, 1, 0], &names).unwrap();
        assert!((evaluation.accuracy - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(evaluation.confusion, vec![vec![1, 1], vec![0, 1]]);
    }
}
