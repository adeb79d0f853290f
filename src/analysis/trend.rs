//! Weight trend line.
//!
//! Least-squares fit of weight against point index (0, 1, 2, ...), the way a
//! category-axis chart lays points out evenly regardless of date gaps.

use std::collections::BTreeMap;

use serde::Serialize;

/// One chart point with its fitted trend value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint<K> {
    /// Sort key (usually the date).
    pub key: K,
    /// Recorded weight.
    pub weight: f64,
    /// Trend line value at this point.
    pub trend: f64,
}

/// Sort points ascending by key and drop duplicate keys.
///
/// For a duplicated key the value supplied last wins.
#[must_use]
pub fn prepare_series<K: Ord>(points: impl IntoIterator<Item = (K, f64)>) -> Vec<(K, f64)> {
    points
        .into_iter()
        .collect::<BTreeMap<K, f64>>()
        .into_iter()
        .collect()
}

/// Trend value for each weight, same length and order.
///
/// - no points: empty
/// - one point: that weight
/// - otherwise: `slope = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)`,
///   `intercept = (Σy − slope·Σx) / n`, with `x` the index
///
/// A zero denominator returns the weights unchanged.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
pub fn compute_trend(weights: &[f64]) -> Vec<f64> {
    match weights.len() {
        0 => return Vec::new(),
        1 => return weights.to_vec(),
        _ => {}
    }

    let n = weights.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in weights.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return weights.to_vec();
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    (0..weights.len())
        .map(|i| intercept + slope * i as f64)
        .collect()
}

/// De-duplicate, sort, and pair each point with its trend value.
#[must_use]
pub fn trend_series<K: Ord>(points: impl IntoIterator<Item = (K, f64)>) -> Vec<TrendPoint<K>> {
    let series = prepare_series(points);
    let weights: Vec<f64> = series.iter().map(|(_, w)| *w).collect();
    let trend = compute_trend(&weights);

    series
        .into_iter()
        .zip(trend)
        .map(|((key, weight), trend)| TrendPoint { key, weight, trend })
        .collect()
}
