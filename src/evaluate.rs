//! Leave-one-out cross-validation of the prediction modes.
//!
//! Protocol, for each user kept by the sampler (ascending user id):
//!
//! 1. Hide one rated item `m` from the user's vector.
//! 2. Average the visible ratings and collect every *other* user who rated
//!    `m`, with their full vectors.
//! 3. Predict `m` under Pearson, cosine, Euclidean and genre weighting.
//! 4. Add `(truth - prediction)²` to that mode's running sum.
//!
//! Every held-out item counts as one sample for every mode. A mode whose
//! prediction fails for that sample has the sample removed from its count
//! only; the other modes keep theirs. The run itself never aborts.
//!
//! With `parallel` enabled, the unit of work is one user's leave-one-out pass.
//! The rating table and catalog are only read, so workers share them by
//! reference.

use log::{debug, info};
use rayon::prelude::*;

use crate::core::{average, Catalog, ItemId, RatingTable, UserId};
use crate::error::Result;
use crate::predict::{Mode, Predictor};
use crate::sampling::{BernoulliUserSampler, UserSampler};
use crate::similarity::Metric;

/// Running squared error of one mode.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ModeScore {
    pub sum_squared_error: f64,
    pub samples: usize,
    pub failures: usize,
}

impl ModeScore {
    /// Samples that produced a prediction.
    pub fn count(&self) -> usize {
        self.samples - self.failures
    }

    /// Root-mean-squared error, `None` when no sample produced a prediction.
    pub fn rmse(&self) -> Option<f64> {
        match self.count() {
            0 => None,
            n => Some((self.sum_squared_error / n as f64).sqrt()),
        }
    }

    fn record(&mut self, truth: f64, outcome: Result<f64>) {
        self.samples += 1;
        match outcome {
            Ok(prediction) => self.sum_squared_error += (truth - prediction).powi(2),
            Err(_) => self.failures += 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sum_squared_error: self.sum_squared_error + other.sum_squared_error,
            samples: self.samples + other.samples,
            failures: self.failures + other.failures,
        }
    }
}

/// Scores in evaluation order: Pearson, cosine, Euclidean, genre.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct ModeScores([ModeScore; 4]);

impl ModeScores {
    fn merge(self, other: Self) -> Self {
        let mut merged = self.0;
        for (slot, score) in merged.iter_mut().zip(other.0) {
            *slot = slot.merge(score);
        }
        Self(merged)
    }
}

/// Outcome of a cross-validation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RmseReport {
    pub pearson: ModeScore,
    pub cosine: ModeScore,
    pub euclidean: ModeScore,
    pub genre: ModeScore,
    /// Users that took part in the run.
    pub users: usize,
}

impl RmseReport {
    /// RMSE per mode in reporting order: (cosine, Pearson, Euclidean, genre).
    pub fn as_tuple(&self) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
        (
            self.cosine.rmse(),
            self.pearson.rmse(),
            self.euclidean.rmse(),
            self.genre.rmse(),
        )
    }
}

/// Leave-one-out evaluator; see the module docs for the protocol.
///
/// Built with [`crate::builder::CrossValidationBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct CrossValidator {
    sample_ratio: f64,
    seed: Option<u64>,
    genre_metric: Metric,
    predictor: Predictor,
    parallel: bool,
}

impl CrossValidator {
    pub(crate) fn new(
        sample_ratio: f64,
        seed: Option<u64>,
        genre_metric: Metric,
        predictor: Predictor,
        parallel: bool,
    ) -> Self {
        Self {
            sample_ratio,
            seed,
            genre_metric,
            predictor,
            parallel,
        }
    }

    pub fn sample_ratio(&self) -> f64 {
        self.sample_ratio
    }

    /// Modes in evaluation order.
    pub fn modes(&self) -> [Mode; 4] {
        [
            Mode::Pearson,
            Mode::Cosine,
            Mode::Euclidean,
            Mode::GenreWeighted(self.genre_metric),
        ]
    }

    /// Runs the protocol over `table`, looking genres up in `catalog`.
    pub fn evaluate(&self, table: &RatingTable, catalog: &Catalog) -> RmseReport {
        info!(
            "Cross-validating {} users ({} ratings) at sample ratio {:.2}",
            table.nusers(),
            table.nratings(),
            self.sample_ratio
        );

        let mut sampler = BernoulliUserSampler::new(self.sample_ratio, self.seed);
        let kept: Vec<UserId> = table
            .user_ids()
            .into_iter()
            .filter(|&user| sampler.should_keep(table.ratings(user).map_or(0, |r| r.len())))
            .collect();
        debug!("Sampled {} of {} users", kept.len(), table.nusers());

        let scores = if self.parallel {
            kept.par_iter()
                .map(|&user| self.score_user(table, catalog, user))
                .reduce(ModeScores::default, ModeScores::merge)
        } else {
            kept.iter()
                .map(|&user| self.score_user(table, catalog, user))
                .fold(ModeScores::default(), ModeScores::merge)
        };

        let [pearson, cosine, euclidean, genre] = scores.0;
        let report = RmseReport {
            pearson,
            cosine,
            euclidean,
            genre,
            users: kept.len(),
        };
        info!(
            "Cross-validation done: cosine={:?} pearson={:?} euclidean={:?} genre={:?}",
            cosine.rmse(),
            pearson.rmse(),
            euclidean.rmse(),
            genre.rmse()
        );
        report
    }

    /// Leave-one-out pass over every item one user rated.
    fn score_user(&self, table: &RatingTable, catalog: &Catalog, user: UserId) -> ModeScores {
        let mut scores = ModeScores::default();
        let Some(ratings) = table.ratings(user) else {
            return scores;
        };
        let modes = self.modes();

        let mut items: Vec<ItemId> = ratings.keys().copied().collect();
        items.sort_unstable();

        for item in items {
            let truth = ratings[&item];
            let mut visible = ratings.clone();
            visible.remove(&item);
            let visible_avg = average(&visible);
            let population = table.neighbors_of(user, item);

            for (score, mode) in scores.0.iter_mut().zip(modes) {
                let outcome = visible_avg.clone().and_then(|avg| {
                    self.predictor
                        .predict(item, catalog, &visible, &population, avg, mode)
                });
                if let Err(err) = &outcome {
                    debug!("user {} item {} mode {}: {}", user, item, mode, err);
                }
                score.record(truth, outcome);
            }
        }
        scores
    }
}
