use approx::{assert_relative_eq, relative_eq};
use log::debug;

use crate::builder::CrossValidationBuilder;
use crate::core::{average, Catalog, RatingTable};
use crate::predict::{Mode, Predictor};
use crate::similarity::Metric;
use crate::tests::init;
use crate::tests::test_data::{dense_table, movie_catalog};

fn full_run() -> CrossValidationBuilder {
    CrossValidationBuilder::new().with_sample_ratio(1.0)
}

#[test]
fn test_dense_table_full_ratio_is_deterministic() {
    init();
    let table = dense_table();
    let catalog = movie_catalog();
    let validator = full_run().build().unwrap();

    let first = validator.evaluate(&table, &catalog);
    let second = validator.evaluate(&table, &catalog);
    debug!("dense report: {:?}", first);

    assert_eq!(first, second);
    assert_eq!(first.users, 5);
    for score in [first.pearson, first.cosine, first.euclidean, first.genre] {
        assert_eq!(score.samples, 30);
        assert!(score.rmse().is_some_and(|r| r.is_finite() && r >= 0.0));
    }
}

#[test]
fn test_rmse_matches_direct_leave_one_out() {
    let table = dense_table();
    let catalog = movie_catalog();
    let report = full_run().build().unwrap().evaluate(&table, &catalog);

    let predictor = Predictor::new();
    let mut sum = 0.0;
    let mut count = 0usize;
    for user in table.user_ids() {
        let ratings = table.ratings(user).unwrap();
        for (&item, &truth) in ratings {
            let mut visible = ratings.clone();
            visible.remove(&item);
            let avg = average(&visible).unwrap();
            let population = table.neighbors_of(user, item);
            if let Ok(p) = predictor.predict(item, &catalog, &visible, &population, avg, Mode::Cosine) {
                sum += (truth - p).powi(2);
                count += 1;
            }
        }
    }

    assert_eq!(report.cosine.count(), count);
    assert_relative_eq!(
        report.cosine.rmse().unwrap(),
        (sum / count as f64).sqrt(),
        epsilon = 1e-9
    );
}

#[test]
fn test_single_rating_users_are_skipped() {
    let mut triplets: Vec<(u32, u32, f64)> = Vec::new();
    for user in 1..=5 {
        for item in 1..=6 {
            triplets.push((user, item, ((user * item) % 5 + 1) as f64));
        }
    }
    // user 9 can never be held out, whatever the ratio
    triplets.push((9, 1, 4.0));
    let table = RatingTable::from_triplets(triplets);

    let report = full_run().build().unwrap().evaluate(&table, &movie_catalog());
    assert_eq!(report.users, 5);
    assert_eq!(report.pearson.samples, 30);
    assert_eq!(report.genre.samples, 30);
}

#[test]
fn test_failures_only_shrink_their_own_mode() {
    init();
    // user 2 rated everything 0: no cosine norm for any population holding
    // them, and a flat vector under Pearson when they are held out
    let table = RatingTable::from_triplets(vec![
        (1, 1, 4.0),
        (1, 2, 2.0),
        (1, 3, 5.0),
        (2, 1, 0.0),
        (2, 2, 0.0),
        (2, 3, 0.0),
        (3, 1, 3.0),
        (3, 2, 1.0),
        (3, 3, 4.0),
    ]);
    let report = full_run()
        .build()
        .unwrap()
        .evaluate(&table, &Catalog::new());

    assert_eq!(report.users, 3);

    assert_eq!(report.cosine.samples, 9);
    assert_eq!(report.cosine.count(), 0);
    assert_eq!(report.cosine.rmse(), None);

    assert_eq!(report.pearson.samples, 9);
    assert_eq!(report.pearson.failures, 3);
    assert!(report.pearson.rmse().is_some());

    assert_eq!(report.euclidean.failures, 0);
    assert!(report.euclidean.rmse().is_some());

    // no catalog, no genre profile
    assert_eq!(report.genre.count(), 0);

    let (cosine, pearson, euclidean, genre) = report.as_tuple();
    assert!(cosine.is_none() && genre.is_none());
    assert_eq!(pearson, report.pearson.rmse());
    assert_eq!(euclidean, report.euclidean.rmse());
}

#[test]
fn test_parallel_matches_sequential() {
    let table = dense_table();
    let catalog = movie_catalog();
    let sequential = full_run().build().unwrap().evaluate(&table, &catalog);
    let parallel = full_run()
        .with_parallel(true)
        .build()
        .unwrap()
        .evaluate(&table, &catalog);

    assert_eq!(sequential.users, parallel.users);
    for (s, p) in [
        (sequential.pearson, parallel.pearson),
        (sequential.cosine, parallel.cosine),
        (sequential.euclidean, parallel.euclidean),
        (sequential.genre, parallel.genre),
    ] {
        assert_eq!(s.samples, p.samples);
        assert_eq!(s.failures, p.failures);
        assert!(relative_eq!(
            s.sum_squared_error,
            p.sum_squared_error,
            epsilon = 1e-9
        ));
    }
}

#[test]
fn test_seeded_sampling_is_reproducible() {
    let mut triplets = Vec::new();
    for user in 1..=60u32 {
        for item in 1..=4u32 {
            triplets.push((user, item, ((user + 2 * item) % 5) as f64 + 1.0));
        }
    }
    let table = RatingTable::from_triplets(triplets);
    let catalog = Catalog::new();

    let builder = CrossValidationBuilder::new().with_sample_ratio(0.3).with_seed(11);
    let a = builder.clone().build().unwrap().evaluate(&table, &catalog);
    let b = builder.build().unwrap().evaluate(&table, &catalog);

    assert_eq!(a, b);
    assert!(a.users < 60);
    assert_eq!(a.pearson.samples, a.users * 4);
}

#[test]
fn test_genre_metric_defaults_to_cosine() {
    let validator = CrossValidationBuilder::new().build().unwrap();
    assert_eq!(
        validator.modes(),
        [
            Mode::Pearson,
            Mode::Cosine,
            Mode::Euclidean,
            Mode::GenreWeighted(Metric::Cosine)
        ]
    );
}
