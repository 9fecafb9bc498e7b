//! Classification metrics: accuracy, confusion matrix and per-class report.
//!
//! Labels are class ids (`0..n_classes`), matching [`Dataset`](crate::dataset::Dataset).

use std::fmt;

use crate::error::DataError;

fn check_inputs<L>(predicted: &[L], truth: &[L]) -> Result<(), DataError> {
    if predicted.len() != truth.len() {
        return Err(DataError::LengthMismatch { left: predicted.len(), right: truth.len() });
    }
    if truth.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(())
}

/// Fraction of predictions equal to the true label, in `[0, 1]`.
pub fn accuracy<L: PartialEq>(predicted: &[L], truth: &[L]) -> Result<f64, DataError> {
    check_inputs(predicted, truth)?;
    let correct = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
    Ok(correct as f64 / truth.len() as f64)
}

/// Per-sample correctness flags, as consumed by the decision boundary plot.
pub fn correctness<L: PartialEq>(predicted: &[L], truth: &[L]) -> Result<Vec<bool>, DataError> {
    check_inputs(predicted, truth)?;
    Ok(predicted.iter().zip(truth).map(|(p, t)| p == t).collect())
}

/// Counts of (true class, predicted class) pairs.
///
/// `matrix[t][p]` is the number of samples of class `t` predicted as `p`. The
/// matrix is square with side `max(label) + 1`.
pub fn confusion_matrix(predicted: &[usize], truth: &[usize]) -> Result<Vec<Vec<usize>>, DataError> {
    check_inputs(predicted, truth)?;
    let n_classes = truth.iter().chain(predicted).max().map_or(0, |&m| m + 1);
    let mut matrix = vec![vec![0usize; n_classes]; n_classes];
    for (&t, &p) in truth.iter().zip(predicted) {
        matrix[t][p] += 1;
    }
    Ok(matrix)
}

/// Precision, recall and F1 for one class (or an average over classes).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics plus overall accuracy and macro/weighted averages.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    // Zero division reports 0.0.
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Weighted sum of the per-class scores; `weight` values should sum to 1.
fn average(
    classes: &[ClassMetrics],
    name: &str,
    support: usize,
    weight: impl Fn(&ClassMetrics) -> f64,
) -> ClassMetrics {
    let (mut precision, mut recall, mut f1) = (0.0, 0.0, 0.0);
    for m in classes {
        let w = weight(m);
        precision += m.precision * w;
        recall += m.recall * w;
        f1 += m.f1 * w;
    }
    ClassMetrics { name: name.to_string(), precision, recall, f1, support }
}

fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// Builds the per-class report.
///
/// Class `i` is named `target_names[i]`, falling back to its id when no name is given.
pub fn classification_report(
    predicted: &[usize],
    truth: &[usize],
    target_names: &[String],
) -> Result<ClassificationReport, DataError> {
    let matrix = confusion_matrix(predicted, truth)?;
    let n_classes = matrix.len().max(target_names.len());
    let total = truth.len();

    let classes: Vec<ClassMetrics> = (0..n_classes)
        .map(|c| {
            let tp = matrix.get(c).and_then(|row| row.get(c)).copied().unwrap_or(0);
            let predicted_as_c: usize = matrix.iter().filter_map(|row| row.get(c)).sum();
            let support: usize = matrix.get(c).map_or(0, |row| row.iter().sum());
            let precision = ratio(tp, predicted_as_c);
            let recall = ratio(tp, support);
            ClassMetrics {
                name: target_names.get(c).cloned().unwrap_or_else(|| c.to_string()),
                precision,
                recall,
                f1: f1_score(precision, recall),
                support,
            }
        })
        .collect();

    let macro_avg = average(&classes, "macro avg", total, |_| 1.0 / n_classes as f64);
    let weighted_avg = average(&classes, "weighted avg", total, |m| m.support as f64 / total as f64);

    Ok(ClassificationReport {
        accuracy: accuracy(predicted, truth)?,
        classes,
        macro_avg,
        weighted_avg,
    })
}

fn write_row(f: &mut fmt::Formatter<'_>, m: &ClassMetrics, width: usize) -> fmt::Result {
    writeln!(
        f,
        "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        m.name, m.precision, m.recall, m.f1, m.support
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|m| m.name.len())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);

        writeln!(f, "{:>width$} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for m in &self.classes {
            write_row(f, m, width)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        write_row(f, &self.macro_avg, width)?;
        write_row(f, &self.weighted_avg, width)
    }
}
