//! Prediction engine: neighbour deviations weighted by similarity.
//!
//! For a target item, every neighbour who rated it contributes its deviation
//! from its own mean, weighted by its similarity to the primary user:
//!
//! ```text
//! prediction = avg(primary) + Σ (r_n[item] - avg(n)) · w_n / Σ |w_n|
//! ```
//!
//! The weight comes from the selected [`Mode`]. Euclidean mode feeds the raw
//! distance in as the weight, so farther neighbours pull harder; this is the
//! historical behaviour and is kept so RMSE figures stay comparable.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::core::{average, Catalog, ItemId, RatingVector};
use crate::error::{PredictionError, Result};
use crate::genre::{genre_frequencies, GenreCorpus, GenreCounts, GenreWeighting};
use crate::similarity::{cosine_similarity, euclidean_distance, pearson_correlation, Metric};

/// How neighbours are weighted against the primary user.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Pearson,
    Cosine,
    Euclidean,
    /// Compare genre tf-idf profiles instead of ratings, scored with the
    /// inner metric.
    GenreWeighted(Metric),
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Pearson => f.write_str("pearson"),
            Mode::Cosine => f.write_str("cosine"),
            Mode::Euclidean => f.write_str("euclidean"),
            Mode::GenreWeighted(inner) => write!(f, "genre({})", inner),
        }
    }
}

/// Per-request weighting state, resolved once from the [`Mode`].
enum Weigher {
    Pearson,
    Cosine,
    Euclidean,
    Genre {
        metric: Metric,
        primary_counts: GenreCounts,
        corpus: GenreCorpus,
    },
}

/// Predicts ratings from a neighbour population.
#[derive(Clone, Copy, Debug, Default)]
pub struct Predictor {
    genre_weighting: GenreWeighting,
}

impl Predictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genre_weighting(mut self, genre_weighting: GenreWeighting) -> Self {
        self.genre_weighting = genre_weighting;
        self
    }

    pub fn genre_weighting(&self) -> GenreWeighting {
        self.genre_weighting
    }

    /// Predicts the primary user's rating of `target_item`.
    ///
    /// `population` holds the neighbours' full rating vectors; those that did
    /// not rate `target_item` are skipped but still count towards the genre
    /// corpus.
    ///
    /// # Errors
    ///
    /// - [`PredictionError::DataInsufficient`] if `primary` is empty.
    /// - [`PredictionError::NoOverlap`] if the accumulated `Σ|w|` is zero.
    /// - Any error raised by the weight computation itself.
    pub fn predict(
        &self,
        target_item: ItemId,
        catalog: &Catalog,
        primary: &RatingVector,
        population: &[&RatingVector],
        primary_avg: f64,
        mode: Mode,
    ) -> Result<f64> {
        if primary.is_empty() {
            return Err(PredictionError::DataInsufficient);
        }

        let weigher = match mode {
            Mode::Pearson => Weigher::Pearson,
            Mode::Cosine => Weigher::Cosine,
            Mode::Euclidean => Weigher::Euclidean,
            Mode::GenreWeighted(metric) => Weigher::Genre {
                metric,
                primary_counts: genre_frequencies(primary, catalog),
                corpus: GenreCorpus::from_population(population, catalog),
            },
        };

        let mut numer = 0.0;
        let mut denom = 0.0;
        let mut contributors = 0usize;
        for &other in population {
            let Some(&other_rating) = other.get(&target_item) else {
                continue;
            };
            let other_avg = average(other)?;
            let deviation = other_rating - other_avg;

            let weight = match &weigher {
                Weigher::Pearson => pearson_correlation(primary, other, primary_avg, other_avg),
                Weigher::Cosine => cosine_similarity(primary, other)?,
                Weigher::Euclidean => euclidean_distance(primary, other),
                Weigher::Genre {
                    metric,
                    primary_counts,
                    corpus,
                } => self.genre_weighting.weight(
                    primary,
                    primary_counts,
                    other,
                    catalog,
                    corpus,
                    *metric,
                )?,
            };
            trace!("item {}: deviation={:.4} weight={:.4}", target_item, deviation, weight);

            numer += deviation * weight;
            denom += weight.abs();
            contributors += 1;
        }

        if denom == 0.0 {
            return Err(PredictionError::NoOverlap { item: target_item });
        }

        let prediction = primary_avg + numer / denom;
        debug!(
            "Predicted item {} under {} from {} neighbours: {:.4}",
            target_item, mode, contributors, prediction
        );
        Ok(prediction)
    }
}
