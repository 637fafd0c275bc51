use crate::error::RecommendError;
use crate::evaluate::CrossValidator;
use crate::genre::GenreWeighting;
use crate::predict::Predictor;
use crate::similarity::Metric;

use log::{debug, info};

/// Default share of users taking part in a cross-validation run.
pub const DEFAULT_SAMPLE_RATIO: f64 = 0.1;

/// Configures a [`CrossValidator`].
///
/// ```
/// use ratingspace::builder::CrossValidationBuilder;
/// use ratingspace::similarity::Metric;
///
/// let validator = CrossValidationBuilder::new()
///     .with_sample_ratio(0.25)
///     .with_seed(7)
///     .with_genre_metric(Metric::Pearson)
///     .build()
///     .unwrap();
/// assert_eq!(validator.sample_ratio(), 0.25);
/// ```
#[derive(Clone, Debug)]
pub struct CrossValidationBuilder {
    sample_ratio: f64,
    seed: Option<u64>,

    // Inner metric of the genre-weighted mode. Cosine by default: it is
    // what the genre column of existing RMSE reports was computed with.
    genre_metric: Metric,
    genre_weighting: GenreWeighting,

    parallel: bool,
}

impl Default for CrossValidationBuilder {
    fn default() -> Self {
        debug!("Creating CrossValidationBuilder with default parameters");
        Self {
            sample_ratio: DEFAULT_SAMPLE_RATIO,
            seed: None,
            genre_metric: Metric::Cosine,
            genre_weighting: GenreWeighting::default(),
            parallel: false,
        }
    }
}

impl CrossValidationBuilder {
    pub fn new() -> Self {
        info!("Initializing new CrossValidationBuilder");
        Self::default()
    }

    /// Probability with which each eligible user is included, in (0, 1].
    pub fn with_sample_ratio(mut self, sample_ratio: f64) -> Self {
        info!("Setting sample ratio: {}", sample_ratio);
        self.sample_ratio = sample_ratio;
        self
    }

    /// Sample ratio given as a whole percentage, as the CLI takes it.
    pub fn with_sample_percent(self, percent: u32) -> Self {
        self.with_sample_ratio(f64::from(percent) / 100.0)
    }

    /// Fix the sampling seed for reproducible user selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        info!("Setting sampling seed: {}", seed);
        self.seed = Some(seed);
        self
    }

    pub fn with_genre_metric(mut self, metric: Metric) -> Self {
        info!("Setting genre-weighted inner metric: {}", metric);
        self.genre_metric = metric;
        self
    }

    pub fn with_genre_weighting(mut self, genre_weighting: GenreWeighting) -> Self {
        info!("Setting genre weighting: {:?}", genre_weighting);
        self.genre_weighting = genre_weighting;
        self
    }

    /// Score sampled users on the rayon pool. Sampling decisions are still
    /// drawn sequentially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        info!("Setting parallel evaluation: {}", parallel);
        self.parallel = parallel;
        self
    }

    pub fn build(self) -> Result<CrossValidator, RecommendError> {
        if !(self.sample_ratio > 0.0 && self.sample_ratio <= 1.0) {
            return Err(RecommendError::InvalidSampleRatio(self.sample_ratio));
        }
        debug!(
            "Build configuration: ratio={}, seed={:?}, genre_metric={}, weighting={:?}, parallel={}",
            self.sample_ratio, self.seed, self.genre_metric, self.genre_weighting, self.parallel
        );
        Ok(CrossValidator::new(
            self.sample_ratio,
            self.seed,
            self.genre_metric,
            Predictor::new().with_genre_weighting(self.genre_weighting),
            self.parallel,
        ))
    }
}
