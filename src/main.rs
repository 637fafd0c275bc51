//! ratingspace CLI: predict MovieLens ratings or cross-validate the modes.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgGroup, CommandFactory, Parser};
use log::error;

use ratingspace::builder::CrossValidationBuilder;
use ratingspace::core::UserId;
use ratingspace::data::{Dataset, DatasetVariant, IdKind};
use ratingspace::predict::Mode;
use ratingspace::recommender::{evaluate_dataset, Recommender};
use ratingspace::similarity::Metric;

#[derive(Parser)]
#[command(name = "ratingspace")]
#[command(
    about = "Given a User ID from the MovieLens database, predict the user's scores for specified movies."
)]
#[command(version)]
#[command(group(ArgGroup::new("distance").args(["pearson", "cosine", "euclidean"])))]
#[command(group(ArgGroup::new("id_kind").args(["tmdb", "imdb", "movielens"])))]
struct Cli {
    /// The user ID from ratings.csv to predict ratings for
    #[arg(value_name = "USER_ID")]
    user_id: Option<UserId>,

    /// Movies to predict the ratings of
    #[arg(value_name = "MOVIES")]
    ids: Vec<String>,

    /// Use tf-idf over genres as the weighting for collaborative filtering
    #[arg(short, long)]
    genres: bool,

    /// Use the full dataset rather than the small dataset
    #[arg(short, long)]
    full: bool,

    /// IDs are TMDb IDs
    #[arg(short, long)]
    tmdb: bool,

    /// IDs are IMDb IDs
    #[arg(short, long)]
    imdb: bool,

    /// IDs are MovieLens IDs (default)
    #[arg(short, long)]
    movielens: bool,

    /// Run cross-validation over PERCENT of the users, selected randomly
    #[arg(short, long, value_name = "PERCENT", num_args = 0..=1, default_missing_value = "10")]
    rmse: Option<u32>,

    /// Use Pearson correlation (default)
    #[arg(short, long)]
    pearson: bool,

    /// Use cosine similarity instead of Pearson correlation
    #[arg(short, long)]
    cosine: bool,

    /// Use Euclidean distance instead of Pearson correlation
    #[arg(short, long)]
    euclidean: bool,

    /// Directory holding ml-latest-small/ and ml-latest/
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Seed for the cross-validation user sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Score cross-validation users in parallel
    #[arg(long)]
    parallel: bool,
}

impl Cli {
    fn metric(&self) -> Metric {
        if self.cosine {
            Metric::Cosine
        } else if self.euclidean {
            Metric::Euclidean
        } else {
            Metric::Pearson
        }
    }

    fn mode(&self) -> Mode {
        match (self.genres, self.metric()) {
            (true, metric) => Mode::GenreWeighted(metric),
            (false, Metric::Pearson) => Mode::Pearson,
            (false, Metric::Cosine) => Mode::Cosine,
            (false, Metric::Euclidean) => Mode::Euclidean,
        }
    }

    fn id_kind(&self) -> IdKind {
        if self.imdb {
            IdKind::Imdb
        } else if self.tmdb {
            IdKind::Tmdb
        } else {
            IdKind::MovieLens
        }
    }

    fn dataset(&self) -> Dataset {
        let variant = if self.full {
            DatasetVariant::Full
        } else {
            DatasetVariant::Small
        };
        Dataset::new(self.data_dir.clone(), variant)
    }
}

fn fmt_rmse(rmse: Option<f64>) -> String {
    rmse.map_or_else(|| "n/a".to_string(), |v| format!("{:.6}", v))
}

fn run_rmse(cli: &Cli, percent: u32) -> ExitCode {
    if !(1..100).contains(&percent) {
        Cli::command()
            .error(
                ErrorKind::ValueValidation,
                "cross-validation percent needs to be between 0 and 100.",
            )
            .exit();
    }

    let mut builder = CrossValidationBuilder::new()
        .with_sample_percent(percent)
        .with_parallel(cli.parallel);
    if let Some(seed) = cli.seed {
        builder = builder.with_seed(seed);
    }

    match evaluate_dataset(&cli.dataset(), builder) {
        Ok(report) => {
            let (cosine, pearson, euclidean, genre) = report.as_tuple();
            println!(" Cosine RMSE:        Pearson RMSE:       Euclidean RMSE:       Genre RMSE:");
            println!(
                "({}, {}, {}, {})",
                fmt_rmse(cosine),
                fmt_rmse(pearson),
                fmt_rmse(euclidean),
                fmt_rmse(genre)
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("cross-validation failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_predict(cli: &Cli) -> ExitCode {
    let Some(user) = cli.user_id else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "user-id required when not performing cross-validation routine.",
            )
            .exit();
    };
    if cli.ids.is_empty() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "movies required when not performing cross-validation routine.",
            )
            .exit();
    }

    let dataset = cli.dataset();
    let items = match dataset.map_external_ids(&cli.ids, cli.id_kind()) {
        Ok(items) => items,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let recommender = Recommender::new(dataset, cli.mode());
    let predictions = match recommender.predict_many(user, &items) {
        Ok(predictions) => predictions,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut status = ExitCode::SUCCESS;
    for (item, prediction) in items.iter().zip(predictions) {
        match prediction {
            Ok(p) => println!("{}", p),
            Err(e) => {
                error!("prediction for item {} failed: {}", item, e);
                eprintln!("{} | Prediction failed: {}", item, e);
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.rmse {
        Some(percent) => run_rmse(&cli, percent),
        None => run_predict(&cli),
    }
}
