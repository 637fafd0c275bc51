//! CSV access to MovieLens dataset directories.
//!
//! Layout expected under the dataset root:
//!
//! ```text
//! ml-latest-small/ratings.csv   userId,movieId,rating,timestamp
//! ml-latest-small/movies.csv    movieId,title,genres
//! ml-latest-small/links.csv     movieId,imdbId,tmdbId
//! ml-latest/...                 same files, full dataset
//! ```
//!
//! The `read_*` functions take any [`Read`] so they can be fed from memory;
//! [`Dataset`] opens the files and delegates to them.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{Catalog, CatalogEntry, ItemId, RatingTable, UserId};
use crate::error::DataError;

const GENRE_SEPARATOR: char = '|';
const IMDB_ID_WIDTH: usize = 7;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DatasetVariant {
    #[default]
    Small,
    Full,
}

impl DatasetVariant {
    pub fn dir_name(self) -> &'static str {
        match self {
            DatasetVariant::Small => "ml-latest-small",
            DatasetVariant::Full => "ml-latest",
        }
    }
}

/// Kind of identifier the caller supplies for items.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum IdKind {
    #[default]
    MovieLens,
    Imdb,
    Tmdb,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: ItemId,
    rating: f64,
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: ItemId,
    title: String,
    genres: String,
}

#[derive(Debug, Deserialize)]
struct LinkRecord {
    #[serde(rename = "movieId")]
    movie_id: ItemId,
    #[serde(rename = "imdbId")]
    imdb_id: String,
    #[serde(rename = "tmdbId")]
    tmdb_id: Option<String>,
}

/// Reads a ratings table with a `userId,movieId,rating,...` header.
pub fn read_ratings<R: Read>(reader: R) -> Result<RatingTable, DataError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let triplets = rdr
        .deserialize::<RatingRecord>()
        .map(|rec| rec.map(|r| (r.user_id, r.movie_id, r.rating)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RatingTable::from_triplets(triplets))
}

/// Reads a `movieId,title,genres` table, keeping only the items in `filter`
/// when one is given.
pub fn read_catalog<R: Read>(
    reader: R,
    filter: Option<&HashSet<ItemId>>,
) -> Result<Catalog, DataError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();
    for rec in rdr.deserialize::<MovieRecord>() {
        let rec = rec?;
        if filter.is_some_and(|f| !f.contains(&rec.movie_id)) {
            continue;
        }
        let entry = CatalogEntry::new(rec.title, rec.genres.split(GENRE_SEPARATOR));
        entries.push((rec.movie_id, entry));
    }
    Ok(entries.into_iter().collect())
}

/// Translates external ids into item ids using a `movieId,imdbId,tmdbId`
/// table. Matches are returned in table order; unmatched ids are dropped.
///
/// IMDb ids are compared after left-padding with zeros to seven digits.
/// MovieLens ids need no table and are only parsed.
pub fn read_external_ids<R: Read, S: AsRef<str>>(
    reader: R,
    ids: &[S],
    kind: IdKind,
) -> Result<Vec<ItemId>, DataError> {
    if kind == IdKind::MovieLens {
        return parse_item_ids(ids);
    }

    let wanted: HashSet<String> = ids
        .iter()
        .map(|id| {
            let id = id.as_ref().trim();
            match kind {
                IdKind::Imdb => format!("{:0>width$}", id, width = IMDB_ID_WIDTH),
                _ => id.to_string(),
            }
        })
        .collect();

    let mut rdr = csv::Reader::from_reader(reader);
    let mut items = Vec::new();
    for rec in rdr.deserialize::<LinkRecord>() {
        let rec = rec?;
        let external = match kind {
            IdKind::Imdb => Some(rec.imdb_id),
            _ => rec.tmdb_id,
        };
        if external.is_some_and(|e| wanted.contains(&e)) {
            items.push(rec.movie_id);
        }
    }
    Ok(items)
}

/// Parses MovieLens item ids given as text.
pub fn parse_item_ids<S: AsRef<str>>(ids: &[S]) -> Result<Vec<ItemId>, DataError> {
    ids.iter()
        .map(|id| {
            let id = id.as_ref().trim();
            id.parse::<ItemId>()
                .map_err(|_| DataError::InvalidExternalId(id.to_string()))
        })
        .collect()
}

/// A MovieLens dataset directory on disk.
#[derive(Clone, Debug)]
pub struct Dataset {
    root: PathBuf,
    variant: DatasetVariant,
}

impl Dataset {
    pub fn new(root: impl Into<PathBuf>, variant: DatasetVariant) -> Self {
        Self {
            root: root.into(),
            variant,
        }
    }

    pub fn variant(&self) -> DatasetVariant {
        self.variant
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(self.variant.dir_name()).join(file)
    }

    pub fn ratings_path(&self) -> PathBuf {
        self.path("ratings.csv")
    }

    pub fn movies_path(&self) -> PathBuf {
        self.path("movies.csv")
    }

    pub fn links_path(&self) -> PathBuf {
        self.path("links.csv")
    }

    pub fn load_ratings(&self) -> Result<RatingTable, DataError> {
        let table = read_ratings(open(&self.ratings_path())?)?;
        debug!(
            "Loaded {} ratings from {} users over {} items",
            table.nratings(),
            table.nusers(),
            table.nitems()
        );
        Ok(table)
    }

    /// Loads the catalog, restricted to `filter` when given.
    pub fn load_catalog(&self, filter: Option<&HashSet<ItemId>>) -> Result<Catalog, DataError> {
        let catalog = read_catalog(open(&self.movies_path())?, filter)?;
        info!("Loaded {} catalog entries", catalog.len());
        Ok(catalog)
    }

    pub fn map_external_ids<S: AsRef<str>>(
        &self,
        ids: &[S],
        kind: IdKind,
    ) -> Result<Vec<ItemId>, DataError> {
        if kind == IdKind::MovieLens {
            return parse_item_ids(ids);
        }
        read_external_ids(open(&self.links_path())?, ids, kind)
    }
}

fn open(path: &Path) -> Result<File, DataError> {
    debug!("Opening {}", path.display());
    Ok(File::open(path)?)
}
