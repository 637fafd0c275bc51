use std::collections::HashMap;

use approx::assert_relative_eq;

use crate::core::{Catalog, CatalogEntry};
use crate::genre::{
    genre_frequencies, inverse_document_frequency, GenreCorpus, GenreCounts, GenreWeighting,
    TermFrequency,
};
use crate::similarity::Metric;
use crate::tests::init;
use crate::tests::test_data::{movie_catalog, vector};

fn counts(pairs: &[(&str, usize)]) -> GenreCounts {
    pairs.iter().map(|&(g, c)| (g.to_string(), c)).collect()
}

fn three_genre_catalog() -> Catalog {
    vec![
        (1, CatalogEntry::new("One", ["Drama"])),
        (2, CatalogEntry::new("Two", ["Comedy"])),
        (3, CatalogEntry::new("Three", ["Horror"])),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_genre_frequencies_count_every_item() {
    let catalog = movie_catalog();
    // items 1, 2, 5 all carry Children; Adventure appears on 1 and 2
    let ratings = vector(&[(1, 4.0), (2, 3.0), (5, 5.0)]);
    let freq = genre_frequencies(&ratings, &catalog);
    assert_eq!(freq["Children"], 3);
    assert_eq!(freq["Adventure"], 2);
    assert_eq!(freq["Drama"], 1);
    assert!(!freq.contains_key("Thriller"));
}

#[test]
fn test_unknown_items_have_no_genres() {
    let catalog = movie_catalog();
    let ratings = vector(&[(42, 4.0)]);
    assert!(genre_frequencies(&ratings, &catalog).is_empty());
}

#[test]
fn test_corpus_counts_users_not_movies() {
    let catalog = movie_catalog();
    let a = vector(&[(1, 4.0), (2, 3.0)]); // Children twice
    let b = vector(&[(5, 2.0)]); // Children once
    let c = vector(&[(3, 1.0), (4, 2.0)]); // Thriller twice
    let corpus = GenreCorpus::from_population(&[&a, &b, &c], &catalog);

    assert_eq!(corpus.n(), 3);
    assert_eq!(corpus.document_frequency("Children"), Some(2));
    assert_eq!(corpus.document_frequency("Thriller"), Some(1));
    assert_eq!(corpus.document_frequency("Adventure"), Some(1));
    assert_eq!(corpus.document_frequency("Horror"), None);
}

#[test]
fn test_term_frequency_policies() {
    let c = counts(&[("Drama", 3), ("Comedy", 1)]);

    assert_relative_eq!(TermFrequency::Raw.compute(&c, "Drama"), 0.75);
    assert_relative_eq!(TermFrequency::Raw.compute(&c, "Horror"), 0.0);

    assert_relative_eq!(TermFrequency::Logarithmic.compute(&c, "Drama"), 4.0_f64.ln());
    assert_relative_eq!(TermFrequency::Logarithmic.compute(&c, "Horror"), 0.0);

    assert_eq!(TermFrequency::Boolean.compute(&c, "Comedy"), 1.0);
    assert_eq!(TermFrequency::Boolean.compute(&c, "Horror"), 0.0);

    assert_relative_eq!(TermFrequency::Augmented.compute(&c, "Drama"), 1.0);
    assert_relative_eq!(TermFrequency::Augmented.compute(&c, "Comedy"), 0.5 + 0.5 / 3.0);
    assert_relative_eq!(TermFrequency::Augmented.compute(&c, "Horror"), 0.5);
}

#[test]
fn test_term_frequency_on_empty_profile() {
    let empty = GenreCounts::new();
    assert_eq!(TermFrequency::Raw.compute(&empty, "Drama"), 0.0);
    assert_eq!(TermFrequency::Augmented.compute(&empty, "Drama"), 0.5);
    assert_eq!(TermFrequency::Logarithmic.compute(&empty, "Drama"), 0.0);
}

#[test]
fn test_inverse_document_frequency() {
    let corpus = GenreCorpus::new(
        HashMap::from([("Drama".to_string(), 1), ("Comedy".to_string(), 3)]),
        3,
    );
    assert_relative_eq!(inverse_document_frequency("Drama", &corpus, true), 4.0_f64.ln());
    assert_relative_eq!(inverse_document_frequency("Drama", &corpus, false), 3.0_f64.ln());
    assert_relative_eq!(
        inverse_document_frequency("Comedy", &corpus, true),
        (4.0_f64 / 3.0).ln()
    );
    // present in every document: unsmoothed idf vanishes
    assert_eq!(inverse_document_frequency("Comedy", &corpus, false), 0.0);
}

#[test]
fn test_idf_absent_genre_is_zero() {
    let corpus = GenreCorpus::new(HashMap::new(), 10);
    assert_eq!(inverse_document_frequency("Western", &corpus, true), 0.0);
    assert_eq!(inverse_document_frequency("Western", &corpus, false), 0.0);
}

#[test]
fn test_genre_weight_is_keyed_by_primary_user() {
    init();
    let catalog = three_genre_catalog();
    let a = vector(&[(1, 4.0), (2, 3.0)]); // Drama, Comedy
    let b = vector(&[(1, 5.0), (3, 2.0)]); // Drama, Horror
    let c = vector(&[(2, 1.0)]); // Comedy
    // df: Drama 2, Comedy 2, Horror 1; n = 3
    let corpus = GenreCorpus::from_population(&[&a, &b, &c], &catalog);
    let weighting = GenreWeighting::default();

    let a_counts = genre_frequencies(&a, &catalog);
    let b_counts = genre_frequencies(&b, &catalog);

    let ab = weighting
        .weight(&a, &a_counts, &b, &catalog, &corpus, Metric::Cosine)
        .unwrap();
    let ba = weighting
        .weight(&b, &b_counts, &a, &catalog, &corpus, Metric::Cosine)
        .unwrap();

    // a = {D: x, C: x}, b' = {D: x, C: 0}  =>  1/sqrt(2)
    assert_relative_eq!(ab, 1.0 / 2.0_f64.sqrt(), epsilon = 1e-12);
    // b = {D: x, H: 2x}, a' = {D: x, H: 0}  =>  1/sqrt(5)
    assert_relative_eq!(ba, 1.0 / 5.0_f64.sqrt(), epsilon = 1e-12);
}

#[test]
fn test_genre_weight_euclidean() {
    let catalog = three_genre_catalog();
    let a = vector(&[(1, 4.0), (2, 3.0)]);
    let b = vector(&[(1, 5.0), (3, 2.0)]);
    let c = vector(&[(2, 1.0)]);
    let corpus = GenreCorpus::from_population(&[&a, &b, &c], &catalog);
    let a_counts = genre_frequencies(&a, &catalog);

    let x = 2.0_f64.ln() * 2.0_f64.ln();
    let d = GenreWeighting::default()
        .weight(&a, &a_counts, &b, &catalog, &corpus, Metric::Euclidean)
        .unwrap();
    // only Comedy differs: x vs 0
    assert_relative_eq!(d, x, epsilon = 1e-12);
}

#[test]
fn test_genre_weighting_builder() {
    let w = GenreWeighting::new()
        .with_term_frequency(TermFrequency::Augmented)
        .with_smoothing(false);
    assert_eq!(w.tf, TermFrequency::Augmented);
    assert!(!w.smooth);
    assert_eq!(GenreWeighting::default().tf, TermFrequency::Logarithmic);
    assert!(GenreWeighting::default().smooth);
}

#[test]
fn test_tf_idf_product() {
    let corpus = GenreCorpus::new(HashMap::from([("Drama".to_string(), 1)]), 3);
    let c = counts(&[("Drama", 2)]);
    let w = GenreWeighting::default();
    assert_relative_eq!(w.tf_idf(&c, "Drama", &corpus), 3.0_f64.ln() * 4.0_f64.ln());
}
