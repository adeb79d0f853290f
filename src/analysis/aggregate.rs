//! Averages over a record set.

use serde::Serialize;

/// Summary averages; `None` means "not available".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Averages {
    /// Mean change between consecutive weights (positive = loss).
    pub avg_loss: Option<f64>,
    /// Mean calorie intake.
    pub avg_calories: Option<f64>,
}

/// Mean of the consecutive differences `w[i-1] - w[i]`.
///
/// This telescopes to `(first - last) / (n - 1)`. Fewer than two weights
/// gives `None`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_loss(weights: &[f64]) -> Option<f64> {
    if weights.len() < 2 {
        return None;
    }
    let total: f64 = weights.windows(2).map(|pair| pair[0] - pair[1]).sum();
    Some(total / (weights.len() - 1) as f64)
}

/// Arithmetic mean of the calorie values; empty gives `None`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_calories(calories: &[f64]) -> Option<f64> {
    if calories.is_empty() {
        return None;
    }
    Some(calories.iter().sum::<f64>() / calories.len() as f64)
}

/// Both averages at once.
#[must_use]
pub fn compute_averages(weights: &[f64], calories: &[f64]) -> Averages {
    Averages {
        avg_loss: average_loss(weights),
        avg_calories: average_calories(calories),
    }
}
