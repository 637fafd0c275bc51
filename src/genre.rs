//! Genre tf-idf weighting between two users.
//!
//! The scheme is borrowed from information retrieval: each *user* is a
//! document and each genre label on the items they rated is a term. Document
//! frequencies come from a [`GenreCorpus`] built over the neighbour population
//! of the item being predicted, so the corpus is scoped to one prediction and
//! rebuilt for the next.
//!
//! Term frequency policies:
//! - `Raw`: `count / Σcounts`
//! - `Logarithmic` (default): `ln(1 + count)`
//! - `Boolean`: `1` if the genre occurs, else `0`
//! - `Augmented`: `0.5 + 0.5 · count / max_count`
//!
//! Inverse document frequency is `ln((1 + n) / df)` with smoothing (default)
//! or `ln(n / df)` without, and `0` for a genre no user in the corpus has
//! encountered.
//!
//! Both tf-idf vectors are keyed by the genres on the *primary* user's rated
//! items only. The other user's vector is therefore a projection onto the
//! primary user's vocabulary and `weight(a, b)` is in general not equal to
//! `weight(b, a)`. The prediction engine still aggregates these weights as if
//! they were symmetric; this mirrors the long-standing behaviour and is kept
//! for comparable RMSE figures.

use std::collections::{HashMap, HashSet};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::core::{Catalog, RatingVector};
use crate::error::Result;
use crate::similarity::Metric;

/// Number of occurrences of each genre across one user's rated items.
pub type GenreCounts = HashMap<String, usize>;

/// Counts genre occurrences over the items in `ratings`.
pub fn genre_frequencies(ratings: &RatingVector, catalog: &Catalog) -> GenreCounts {
    let mut counts = GenreCounts::new();
    for &item in ratings.keys() {
        for genre in catalog.genres(item) {
            *counts.entry(genre.clone()).or_insert(0) += 1;
        }
    }
    counts
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TermFrequency {
    Raw,
    #[default]
    Logarithmic,
    Boolean,
    Augmented,
}

impl TermFrequency {
    /// Term frequency of `genre` in a user's genre profile. A genre missing
    /// from the profile counts as zero occurrences.
    pub fn compute(self, counts: &GenreCounts, genre: &str) -> f64 {
        let count = counts.get(genre).copied().unwrap_or(0) as f64;
        match self {
            TermFrequency::Raw => {
                let total: usize = counts.values().sum();
                if total == 0 {
                    0.0
                } else {
                    count / total as f64
                }
            }
            TermFrequency::Logarithmic => count.ln_1p(),
            TermFrequency::Boolean => {
                if counts.contains_key(genre) {
                    1.0
                } else {
                    0.0
                }
            }
            TermFrequency::Augmented => {
                let max = counts.values().copied().max().unwrap_or(0);
                if max == 0 {
                    0.5
                } else {
                    0.5 + 0.5 * count / max as f64
                }
            }
        }
    }
}

/// Document frequencies of genres over a neighbour population.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenreCorpus {
    doc_freq: HashMap<String, usize>,
    n: usize,
}

impl GenreCorpus {
    pub fn new(doc_freq: HashMap<String, usize>, n: usize) -> Self {
        Self { doc_freq, n }
    }

    /// Counts, for each genre, how many users in `population` rated at least
    /// one item carrying it. `n` is the population size.
    pub fn from_population(population: &[&RatingVector], catalog: &Catalog) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for ratings in population {
            let mut seen: HashSet<&str> = HashSet::new();
            for &item in ratings.keys() {
                for genre in catalog.genres(item) {
                    if seen.insert(genre.as_str()) {
                        *doc_freq.entry(genre.clone()).or_insert(0) += 1;
                    }
                }
            }
        }
        trace!(
            "Genre corpus: {} genres over {} users",
            doc_freq.len(),
            population.len()
        );
        Self {
            doc_freq,
            n: population.len(),
        }
    }

    pub fn document_frequency(&self, genre: &str) -> Option<usize> {
        self.doc_freq.get(genre).copied()
    }

    /// Number of users the corpus was built from.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.doc_freq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_freq.is_empty()
    }
}

/// Inverse document frequency of `genre`; `0.0` when no user in the corpus
/// has it.
pub fn inverse_document_frequency(genre: &str, corpus: &GenreCorpus, smooth: bool) -> f64 {
    let Some(df) = corpus.document_frequency(genre) else {
        return 0.0;
    };
    let n = corpus.n() as f64;
    if smooth {
        ((1.0 + n) / df as f64).ln()
    } else {
        (n / df as f64).ln()
    }
}

/// Term-frequency and idf policy for genre weighting.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreWeighting {
    pub tf: TermFrequency,
    pub smooth: bool,
}

impl Default for GenreWeighting {
    fn default() -> Self {
        Self {
            tf: TermFrequency::Logarithmic,
            smooth: true,
        }
    }
}

impl GenreWeighting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term_frequency(mut self, tf: TermFrequency) -> Self {
        self.tf = tf;
        self
    }

    pub fn with_smoothing(mut self, smooth: bool) -> Self {
        self.smooth = smooth;
        self
    }

    #[inline]
    pub fn tf_idf(&self, counts: &GenreCounts, genre: &str, corpus: &GenreCorpus) -> f64 {
        self.tf.compute(counts, genre) * inverse_document_frequency(genre, corpus, self.smooth)
    }

    /// Similarity between the genre profiles of `primary` and `other`.
    ///
    /// `primary_counts` must be `genre_frequencies(primary, catalog)`; it is
    /// taken precomputed because one primary user is compared against a whole
    /// population.
    pub fn weight(
        &self,
        primary: &RatingVector,
        primary_counts: &GenreCounts,
        other: &RatingVector,
        catalog: &Catalog,
        corpus: &GenreCorpus,
        metric: Metric,
    ) -> Result<f64> {
        let other_counts = genre_frequencies(other, catalog);

        let mut primary_vector: HashMap<&str, f64> = HashMap::new();
        let mut other_vector: HashMap<&str, f64> = HashMap::new();
        for &item in primary.keys() {
            for genre in catalog.genres(item) {
                let genre = genre.as_str();
                if primary_vector.contains_key(genre) {
                    continue;
                }
                primary_vector.insert(genre, self.tf_idf(primary_counts, genre, corpus));
                other_vector.insert(genre, self.tf_idf(&other_counts, genre, corpus));
            }
        }

        metric.score(&primary_vector, &other_vector)
    }
}
