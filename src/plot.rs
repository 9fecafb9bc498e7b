//! 2D decision boundary plots.
//!
//! Everything the plot shows is passed in explicitly: the fitted classifier,
//! the grid it is evaluated on, and the train/test points with their
//! correctness flags.

use itertools_num::linspace;
use log::debug;
use plotly::common::{Marker, MarkerSymbol, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Contour, Plot, Scatter};

use crate::error::PlotError;
use crate::knn::KnnClassifier;

/// Evenly spaced 2D grid of synthetic query points.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// Upper bound on `rows * columns`; every grid point is one classifier query.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Number of samples `[min, min + step, ...]` not past `max`.
fn axis_len(min: f64, max: f64, step: f64) -> f64 {
    ((max - min) / step).floor() + 1.0
}

fn axis_values(min: f64, step: f64, n: usize) -> Vec<f64> {
    let end = min + (n - 1) as f64 * step;
    linspace::<f64>(min, end, n).collect()
}

impl MeshGrid {
    /// Grid covering the bounding box of `points`, widened by `margin` on every side.
    ///
    /// Every point must have exactly two features.
    pub fn around(points: &[Vec<f64>], step: f64, margin: f64) -> Result<Self, PlotError> {
        if !(step > 0.0) || !step.is_finite() {
            return Err(PlotError::InvalidGrid(format!("step must be positive, got {step}")));
        }
        if !(margin >= 0.0) || !margin.is_finite() {
            return Err(PlotError::InvalidGrid(format!("margin must be non-negative, got {margin}")));
        }
        if points.is_empty() {
            return Err(PlotError::InvalidGrid("no points to cover".to_string()));
        }
        if let Some(p) = points.iter().find(|p| p.len() != 2) {
            return Err(PlotError::InvalidGrid(format!(
                "decision boundaries need 2 features, got a point with {}",
                p.len()
            )));
        }

        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in points {
            x_min = x_min.min(p[0]);
            x_max = x_max.max(p[0]);
            y_min = y_min.min(p[1]);
            y_max = y_max.max(p[1]);
        }
        if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
            return Err(PlotError::InvalidGrid("points must have finite coordinates".to_string()));
        }

        let (x_lo, y_lo) = (x_min - margin, y_min - margin);
        let nx = axis_len(x_lo, x_max + margin, step);
        let ny = axis_len(y_lo, y_max + margin, step);
        if !(nx * ny <= MAX_GRID_POINTS as f64) {
            return Err(PlotError::InvalidGrid(format!(
                "step {step} gives a {ny}x{nx} grid, more than {MAX_GRID_POINTS} points"
            )));
        }

        Ok(MeshGrid {
            xs: axis_values(x_lo, step, nx as usize),
            ys: axis_values(y_lo, step, ny as usize),
        })
    }

    /// `(rows, columns)`, i.e. `(ys.len(), xs.len())`.
    pub fn shape(&self) -> (usize, usize) {
        (self.ys.len(), self.xs.len())
    }

    /// All grid points, row by row (y outer, x inner).
    pub fn points(&self) -> Vec<Vec<f64>> {
        self.ys
            .iter()
            .flat_map(|&y| self.xs.iter().map(move |&x| vec![x, y]))
            .collect()
    }
}

/// Predicts every grid point and reshapes the result into `rows x columns`.
pub fn grid_predictions(
    classifier: &KnnClassifier<f64, usize>,
    grid: &MeshGrid,
) -> Result<Vec<Vec<usize>>, PlotError> {
    let (rows, cols) = grid.shape();
    if rows == 0 || cols == 0 {
        return Err(PlotError::InvalidGrid("grid has no points".to_string()));
    }
    debug!("evaluating classifier on a {}x{} grid", rows, cols);
    let flat = classifier.par_predict(&grid.points())?;
    Ok(flat.chunks(cols).map(<[usize]>::to_vec).collect())
}

/// Inputs for [`decision_boundary_plot`] besides the classifier and the grid.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryPlotData<'a> {
    pub train_points: &'a [Vec<f64>],
    pub train_labels: &'a [usize],
    pub test_points: &'a [Vec<f64>],
    pub test_correct: &'a [bool],
    pub target_names: &'a [String],
    pub feature_names: [&'a str; 2],
    pub title: &'a str,
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), PlotError> {
    if expected != actual {
        return Err(PlotError::LengthMismatch { what, expected, actual });
    }
    Ok(())
}

fn coords(points: &[&Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p[0], p[1])).unzip()
}

/// Renders the classifier's predictions on `grid` as filled contours, with
/// training points drawn per class and test points marked correct or misclassified.
pub fn decision_boundary_plot(
    classifier: &KnnClassifier<f64, usize>,
    grid: &MeshGrid,
    data: BoundaryPlotData<'_>,
) -> Result<Plot, PlotError> {
    check_len("training labels", data.train_points.len(), data.train_labels.len())?;
    check_len("test correctness flags", data.test_points.len(), data.test_correct.len())?;

    let z: Vec<Vec<f64>> = grid_predictions(classifier, grid)?
        .into_iter()
        .map(|row| row.into_iter().map(|c| c as f64).collect())
        .collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Contour::new(grid.xs.clone(), grid.ys.clone(), z)
            .name("decision regions")
            .opacity(0.4)
            .show_scale(false),
    );

    for (class, name) in data.target_names.iter().enumerate() {
        let members: Vec<&Vec<f64>> = data
            .train_points
            .iter()
            .zip(data.train_labels)
            .filter(|(_, l)| **l == class)
            .map(|(p, _)| p)
            .collect();
        if members.is_empty() {
            continue;
        }
        let (x, y) = coords(&members);
        plot.add_trace(
            Scatter::new(x, y)
                .name(&format!("train: {}", name))
                .mode(Mode::Markers)
                .marker(Marker::new().size(7)),
        );
    }

    let (correct, wrong): (Vec<_>, Vec<_>) = data
        .test_points
        .iter()
        .zip(data.test_correct)
        .partition(|(_, ok)| **ok);
    let correct: Vec<&Vec<f64>> = correct.into_iter().map(|(p, _)| p).collect();
    let wrong: Vec<&Vec<f64>> = wrong.into_iter().map(|(p, _)| p).collect();

    let (x, y) = coords(&correct);
    plot.add_trace(
        Scatter::new(x, y)
            .name("test: correct")
            .mode(Mode::Markers)
            .marker(Marker::new().size(10).symbol(MarkerSymbol::CircleOpen).color("black")),
    );
    let (x, y) = coords(&wrong);
    plot.add_trace(
        Scatter::new(x, y)
            .name("test: misclassified")
            .mode(Mode::Markers)
            .marker(Marker::new().size(11).symbol(MarkerSymbol::X).color("red")),
    );

    plot.set_layout(
        Layout::new()
            .title(data.title)
            .x_axis(Axis::new().title(data.feature_names[0]))
            .y_axis(Axis::new().title(data.feature_names[1])),
    );

    Ok(plot)
}
