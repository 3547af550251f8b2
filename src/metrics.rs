use crate::dataset::Label;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{actual} actual labels but {predicted} predictions")]
pub struct LengthMismatch {
    pub actual: usize,
    pub predicted: usize,
}

/// Outcome of comparing predictions against the held-out labels.
///
/// A rate whose class never occurs in the actual labels is `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// True positive rate.
    pub sensitivity: f64,
    /// True negative rate.
    pub specificity: f64,
    pub correct: usize,
    pub incorrect: usize,
}

pub fn evaluate(actual: &[Label], predicted: &[Label]) -> Result<Evaluation, LengthMismatch> {
    if actual.len() != predicted.len() {
        return Err(LengthMismatch {
            actual: actual.len(),
            predicted: predicted.len(),
        });
    }

    let mut total_positives = 0;
    let mut total_negatives = 0;
    let mut true_positives = 0;
    let mut true_negatives = 0;

    for (&p, &a) in predicted.iter().zip(actual) {
        if a == 1 {
            total_positives += 1;
        } else {
            total_negatives += 1;
        }
        if p == a {
            if a == 1 {
                true_positives += 1;
            } else {
                true_negatives += 1;
            }
        }
    }

    let correct = true_positives + true_negatives;
    Ok(Evaluation {
        sensitivity: rate(true_positives, total_positives),
        specificity: rate(true_negatives, total_negatives),
        correct,
        incorrect: actual.len() - correct,
    })
}

fn rate(hits: usize, total: usize) -> f64 {
    if total == 0 {
        f64::NAN
    } else {
        hits as f64 / total as f64
    }
}

impl Evaluation {
    /// Whether either rate is undefined because a class was missing.
    pub fn is_degenerate(&self) -> bool {
        self.sensitivity.is_nan() || self.specificity.is_nan()
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Correct: {}", self.correct)?;
        writeln!(f, "Incorrect: {}", self.incorrect)?;
        writeln!(f, "True Positive Rate: {:.2}%", 100.0 * self.sensitivity)?;
        write!(f, "True Negative Rate: {:.2}%", 100.0 * self.specificity)
    }
}
