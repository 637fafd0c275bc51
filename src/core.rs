//! Rating vectors, the rating table and the movie catalog.
//!
//! This module holds the in-memory data model every other component reads:
//!
//! - [`RatingVector`]: one user's sparse item → rating mapping.
//! - [`RatingTable`]: all users' rating vectors plus the inverted
//!   item → raters index, built once per request and shared read-only.
//! - [`Catalog`]: item → title and de-duplicated genre labels.
//!
//! # Examples
//!
//! Build a table from `(user, item, rating)` triplets and assemble the
//! neighbour population for an item:
//!
//! ```
//! use ratingspace::core::RatingTable;
//!
//! let table = RatingTable::from_triplets(vec![
//!     (1, 10, 4.0), (1, 11, 3.0),
//!     (2, 10, 5.0), (2, 12, 2.5),
//!     (3, 11, 1.0),
//! ]);
//!
//! let population = table.neighbors_of(1, 10);
//! assert_eq!(population.len(), 1);
//! assert_eq!(population[0][&10], 5.0);
//! ```
//!
//! # Invariants
//!
//! - Each user appears in the raters set of every item in their vector.
//! - Neighbour populations never contain the requesting user.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{PredictionError, Result};

/// Internal MovieLens item identifier.
pub type ItemId = u32;
/// MovieLens user identifier.
pub type UserId = u32;
/// Sparse item → rating mapping for a single user.
pub type RatingVector = HashMap<ItemId, f64>;

/// Arithmetic mean of a vector's values.
///
/// Fails with [`PredictionError::DataInsufficient`] when the vector is empty.
#[inline]
pub fn average<K>(vector: &HashMap<K, f64>) -> Result<f64> {
    if vector.is_empty() {
        return Err(PredictionError::DataInsufficient);
    }
    Ok(vector.values().sum::<f64>() / vector.len() as f64)
}

/// Round a predicted score to the nearest half star, ties to even.
///
/// ```
/// use ratingspace::core::round_to_half_star;
/// assert_eq!(round_to_half_star(3.74), 3.5);
/// assert_eq!(round_to_half_star(3.75), 4.0);
/// assert_eq!(round_to_half_star(1.25), 1.0);
/// ```
#[inline]
pub fn round_to_half_star(score: f64) -> f64 {
    (score * 2.0).round_ties_even() / 2.0
}

/// Title and genre labels of one catalog item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    pub genres: Vec<String>,
}

impl CatalogEntry {
    /// Creates an entry, dropping repeated genre labels while keeping the
    /// order of first occurrence.
    pub fn new<S: Into<String>>(title: impl Into<String>, genres: impl IntoIterator<Item = S>) -> Self {
        let mut seen = HashSet::new();
        let genres = genres
            .into_iter()
            .map(Into::into)
            .filter(|g: &String| seen.insert(g.clone()))
            .collect();
        Self {
            title: title.into(),
            genres,
        }
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Read-only item → [`CatalogEntry`] mapping.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: HashMap<ItemId, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item: ItemId) -> Option<&CatalogEntry> {
        self.entries.get(&item)
    }

    /// Genres of `item`; empty for items the catalog does not know.
    #[inline]
    pub fn genres(&self, item: ItemId) -> &[String] {
        self.entries
            .get(&item)
            .map(|e| e.genres.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.entries.contains_key(&item)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &CatalogEntry)> {
        self.entries.iter()
    }
}

impl FromIterator<(ItemId, CatalogEntry)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (ItemId, CatalogEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Every user's ratings plus the inverted item → raters index.
///
/// Built once from the ratings source and then only read. Both the serving
/// path and the evaluator take it by shared reference, so it can be handed to
/// rayon workers without locking.
#[derive(Clone, Debug, Default)]
pub struct RatingTable {
    users: HashMap<UserId, RatingVector>,
    raters: HashMap<ItemId, HashSet<UserId>>,
}

impl RatingTable {
    /// Builds the table from `(user, item, rating)` triplets. A repeated
    /// `(user, item)` pair keeps the last rating.
    pub fn from_triplets<I>(triplets: I) -> Self
    where
        I: IntoIterator<Item = (UserId, ItemId, f64)>,
    {
        let mut users: HashMap<UserId, RatingVector> = HashMap::new();
        let mut raters: HashMap<ItemId, HashSet<UserId>> = HashMap::new();
        for (user, item, rating) in triplets {
            users.entry(user).or_default().insert(item, rating);
            raters.entry(item).or_default().insert(user);
        }
        Self { users, raters }
    }

    pub fn ratings(&self, user: UserId) -> Option<&RatingVector> {
        self.users.get(&user)
    }

    /// Users who rated `item`, if anyone did.
    pub fn raters(&self, item: ItemId) -> Option<&HashSet<UserId>> {
        self.raters.get(&item)
    }

    /// User ids in ascending order.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Full rating vectors of every user other than `user` who rated `item`,
    /// ordered by user id.
    pub fn neighbors_of(&self, user: UserId, item: ItemId) -> Vec<&RatingVector> {
        let Some(raters) = self.raters.get(&item) else {
            return Vec::new();
        };
        let mut ids: Vec<UserId> = raters.iter().copied().filter(|&u| u != user).collect();
        ids.sort_unstable();
        ids.iter().filter_map(|u| self.users.get(u)).collect()
    }

    pub fn nusers(&self) -> usize {
        self.users.len()
    }

    pub fn nitems(&self) -> usize {
        self.raters.len()
    }

    pub fn nratings(&self) -> usize {
        self.users.values().map(|v| v.len()).sum()
    }
}
