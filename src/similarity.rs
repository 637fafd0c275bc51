//! Similarity and distance measures over sparse vectors.
//!
//! Every measure walks the keys of the first vector and only uses keys that
//! the second vector also holds; keys unique to one side never enter a cross
//! term. Pearson and cosine normalise by terms taken over each vector's
//! *entire* key set, not just the shared keys, so two users who agree on a
//! small overlap but rated many other items get a damped score.
//!
//! Functions are generic over the key type so the same code scores rating
//! vectors (`ItemId` keys) and tf-idf genre vectors (`String` keys).
//!
//! Only Pearson, cosine and Euclidean are reachable through [`Metric`]; the
//! remaining distances are available for callers that want to experiment.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::core::average;
use crate::error::{PredictionError, Result};

/// Value pairs for keys present in both vectors.
#[inline]
fn shared<'a, K: Eq + Hash>(
    a: &'a HashMap<K, f64>,
    b: &'a HashMap<K, f64>,
) -> impl Iterator<Item = (f64, f64)> + 'a {
    a.iter().filter_map(move |(k, &x)| b.get(k).map(|&y| (x, y)))
}

/// L2 norm over all values of a sparse vector.
#[inline]
pub fn norm<K>(a: &HashMap<K, f64>) -> f64 {
    a.values().map(|&x| x * x).sum::<f64>().sqrt()
}

/// Pearson correlation with externally supplied means.
///
/// The cross term uses shared keys only, while each sum of squares spans the
/// whole vector. A zero denominator (a flat vector on either side) yields a
/// neutral `0.0` instead of an error.
pub fn pearson_correlation<K: Eq + Hash>(
    a: &HashMap<K, f64>,
    b: &HashMap<K, f64>,
    mean_a: f64,
    mean_b: f64,
) -> f64 {
    let numer: f64 = shared(a, b).map(|(x, y)| (x - mean_a) * (y - mean_b)).sum();
    let ss_a: f64 = a.values().map(|&x| (x - mean_a).powi(2)).sum();
    let ss_b: f64 = b.values().map(|&y| (y - mean_b).powi(2)).sum();
    let denom = ss_a * ss_b;
    if denom == 0.0 {
        return 0.0;
    }
    numer / denom.sqrt()
}

/// Cosine similarity: shared-key dot product over the product of full norms.
///
/// # Errors
///
/// [`PredictionError::DegenerateVector`] when either vector has zero norm.
pub fn cosine_similarity<K: Eq + Hash>(a: &HashMap<K, f64>, b: &HashMap<K, f64>) -> Result<f64> {
    let dot: f64 = shared(a, b).map(|(x, y)| x * y).sum();
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return Err(PredictionError::DegenerateVector);
    }
    Ok(dot / denom)
}

/// Euclidean distance over shared keys; `0.0` when nothing is shared.
pub fn euclidean_distance<K: Eq + Hash>(a: &HashMap<K, f64>, b: &HashMap<K, f64>) -> f64 {
    squared_euclidean_distance(a, b).sqrt()
}

pub fn squared_euclidean_distance<K: Eq + Hash>(a: &HashMap<K, f64>, b: &HashMap<K, f64>) -> f64 {
    shared(a, b).map(|(x, y)| (x - y).powi(2)).sum()
}

pub fn manhattan_distance<K: Eq + Hash>(a: &HashMap<K, f64>, b: &HashMap<K, f64>) -> f64 {
    shared(a, b).map(|(x, y)| (x - y).abs()).sum()
}

/// Bray-Curtis dissimilarity `Σ|a-b| / Σ|a+b|` over shared keys.
///
/// # Errors
///
/// [`PredictionError::DegenerateVector`] when `Σ|a+b|` is zero, which includes
/// the no-shared-keys case.
pub fn bray_curtis_distance<K: Eq + Hash>(a: &HashMap<K, f64>, b: &HashMap<K, f64>) -> Result<f64> {
    let (numer, denom) = shared(a, b).fold((0.0, 0.0), |(n, d), (x, y)| {
        (n + (x - y).abs(), d + (x + y).abs())
    });
    if denom == 0.0 {
        return Err(PredictionError::DegenerateVector);
    }
    Ok(numer / denom)
}

/// Canberra distance `Σ |a-b| / (|a|+|b|)` over shared keys.
///
/// # Errors
///
/// [`PredictionError::DegenerateVector`] when both values of a shared key are
/// zero.
pub fn canberra_distance<K: Eq + Hash>(a: &HashMap<K, f64>, b: &HashMap<K, f64>) -> Result<f64> {
    shared(a, b).try_fold(0.0, |acc, (x, y)| {
        let denom = x.abs() + y.abs();
        if denom == 0.0 {
            return Err(PredictionError::DegenerateVector);
        }
        Ok(acc + (x - y).abs() / denom)
    })
}

/// Measure used to compare two vectors in a given feature space.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Metric {
    #[default]
    Pearson,
    Cosine,
    Euclidean,
}

impl Metric {
    /// Scores `a` against `b`. Pearson uses each vector's own average, so it
    /// fails with [`PredictionError::DataInsufficient`] on an empty vector.
    pub fn score<K: Eq + Hash>(self, a: &HashMap<K, f64>, b: &HashMap<K, f64>) -> Result<f64> {
        match self {
            Metric::Pearson => {
                let mean_a = average(a)?;
                let mean_b = average(b)?;
                Ok(pearson_correlation(a, b, mean_a, mean_b))
            }
            Metric::Cosine => cosine_similarity(a, b),
            Metric::Euclidean => Ok(euclidean_distance(a, b)),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Metric::Pearson => "pearson",
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
        };
        f.write_str(name)
    }
}
