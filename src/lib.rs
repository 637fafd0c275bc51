//! # ratingspace
//!
//! User-based collaborative filtering over MovieLens rating tables.
//!
//! A user's rating for an item is predicted from the ratings of the other
//! users who rated it, each weighted by how similar they are to the user.
//! Similarity is taken either on the rating vectors themselves (Pearson,
//! cosine, Euclidean) or on tf-idf profiles of the genres of the items each
//! user rated. A leave-one-out harness scores every mode by RMSE.
//!
//! Modules, leaves first:
//!
//! - [`similarity`]: shared-key similarity and distance measures.
//! - [`genre`]: genre corpus, tf-idf policies and genre weights.
//! - [`predict`]: the prediction engine and [`predict::Mode`].
//! - [`sampling`], [`builder`], [`evaluate`]: cross-validation.
//! - [`data`], [`recommender`]: CSV access and the serving path.
//!
//! ```
//! use ratingspace::core::{average, Catalog, RatingTable};
//! use ratingspace::predict::{Mode, Predictor};
//!
//! let table = RatingTable::from_triplets(vec![
//!     (1, 1, 5.0), (1, 2, 3.0),
//!     (2, 1, 4.0), (2, 2, 2.0), (2, 3, 4.0),
//!     (3, 1, 2.0), (3, 2, 4.0), (3, 3, 2.0),
//! ]);
//! let primary = table.ratings(1).unwrap();
//! let population = table.neighbors_of(1, 3);
//!
//! let rating = Predictor::new()
//!     .predict(3, &Catalog::new(), primary, &population, average(primary).unwrap(), Mode::Pearson)
//!     .unwrap();
//! assert!(rating > 4.0);
//! ```

pub mod builder;
pub mod core;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod genre;
pub mod predict;
pub mod recommender;
pub mod sampling;
pub mod similarity;

#[cfg(test)]
mod tests;
