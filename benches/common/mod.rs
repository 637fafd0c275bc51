use ratingspace::core::{Catalog, CatalogEntry, RatingTable};

use rand::prelude::*;

const GENRES: [&str; 8] = [
    "Action", "Adventure", "Comedy", "Crime", "Drama", "Fantasy", "Romance", "Thriller",
];

/// Synthetic MovieLens-like table: each user rates `per_user` distinct items
/// on the half-star scale.
pub fn synthetic_table(nusers: u32, nitems: u32, per_user: usize, seed: u64) -> RatingTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut triplets = Vec::with_capacity(nusers as usize * per_user);
    for user in 1..=nusers {
        let items = rand::seq::index::sample(&mut rng, nitems as usize, per_user);
        for item in items {
            let rating = rng.random_range(1..=10u32) as f64 / 2.0;
            triplets.push((user, item as u32 + 1, rating));
        }
    }
    RatingTable::from_triplets(triplets)
}

/// One to three genres per item.
pub fn synthetic_catalog(nitems: u32, seed: u64) -> Catalog {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=nitems)
        .map(|item| {
            let n = rng.random_range(1..=3);
            let genres: Vec<&str> = GENRES.choose_multiple(&mut rng, n).copied().collect();
            (item, CatalogEntry::new(format!("Movie {item}"), genres))
        })
        .collect()
}
