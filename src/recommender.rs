//! Serving path: predict a user's ratings for a list of items on disk.
//!
//! Each item is predicted against a freshly loaded rating table, so the
//! sequence returned by [`Recommender::predict_many`] is lazy, single pass,
//! and does no work for items that are never pulled. Failures are reported
//! per item; an under-specified request (for instance a user whose only
//! rating is the one being asked about) fails that item and nothing else.

use std::collections::HashSet;
use std::fmt;

use log::{debug, info};

use crate::builder::CrossValidationBuilder;
use crate::core::{average, round_to_half_star, Catalog, CatalogEntry, ItemId, RatingTable, UserId};
use crate::data::Dataset;
use crate::error::{DataError, RecommendError};
use crate::evaluate::RmseReport;
use crate::predict::{Mode, Predictor};

/// One predicted rating together with its catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub item: ItemId,
    pub entry: CatalogEntry,
    pub rating: f64,
}

impl Prediction {
    /// Rating rounded to the nearest half star, for display.
    pub fn stars(&self) -> f64 {
        round_to_half_star(self.rating)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | Predicted rating: {} stars", self.entry, self.stars())
    }
}

/// Predicts `item` for `user` from an in-memory table.
pub fn predict_from_table(
    predictor: &Predictor,
    table: &RatingTable,
    catalog: &Catalog,
    user: UserId,
    item: ItemId,
    mode: Mode,
) -> Result<f64, RecommendError> {
    let primary = table.ratings(user).ok_or(DataError::UnknownUser(user))?;
    let primary_avg = average(primary)?;
    let population = table.neighbors_of(user, item);
    debug!(
        "user {} item {}: {} ratings, {} neighbours",
        user,
        item,
        primary.len(),
        population.len()
    );
    Ok(predictor.predict(item, catalog, primary, &population, primary_avg, mode)?)
}

/// Predicts ratings from a [`Dataset`] under a fixed [`Mode`].
#[derive(Clone, Debug)]
pub struct Recommender {
    dataset: Dataset,
    mode: Mode,
    predictor: Predictor,
}

impl Recommender {
    pub fn new(dataset: Dataset, mode: Mode) -> Self {
        info!("Recommender over {:?} with mode {}", dataset.variant(), mode);
        Self {
            dataset,
            mode,
            predictor: Predictor::new(),
        }
    }

    pub fn with_predictor(mut self, predictor: Predictor) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Lazily predicts `user`'s rating for each of `items`, in order.
    ///
    /// The catalog is loaded up front (whole for genre weighting, which needs
    /// the genres of every item a neighbour rated, otherwise only `items`).
    /// The rating table is reloaded for every item.
    pub fn predict_many<'a>(
        &'a self,
        user: UserId,
        items: &'a [ItemId],
    ) -> Result<impl Iterator<Item = Result<Prediction, RecommendError>> + 'a, RecommendError> {
        let filter: Option<HashSet<ItemId>> = match self.mode {
            Mode::GenreWeighted(_) => None,
            _ => Some(items.iter().copied().collect()),
        };
        let catalog = self.dataset.load_catalog(filter.as_ref())?;

        Ok(items
            .iter()
            .map(move |&item| self.predict_one(&catalog, user, item)))
    }

    fn predict_one(
        &self,
        catalog: &Catalog,
        user: UserId,
        item: ItemId,
    ) -> Result<Prediction, RecommendError> {
        let entry = catalog
            .get(item)
            .cloned()
            .ok_or(DataError::UnknownItem(item))?;
        let table = self.dataset.load_ratings()?;
        let rating = predict_from_table(&self.predictor, &table, catalog, user, item, self.mode)?;
        Ok(Prediction {
            item,
            entry,
            rating,
        })
    }
}

/// Loads a dataset and runs the cross-validation configured by `builder`.
pub fn evaluate_dataset(
    dataset: &Dataset,
    builder: CrossValidationBuilder,
) -> Result<RmseReport, RecommendError> {
    let validator = builder.build()?;
    let table = dataset.load_ratings()?;
    let catalog = dataset.load_catalog(None)?;
    Ok(validator.evaluate(&table, &catalog))
}
