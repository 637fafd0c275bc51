//! Error types for prediction, evaluation and data access.
//!
//! Prediction failures are kept separate from data failures: the serving path
//! reports both for the offending item, while the cross-validation loop only
//! ever absorbs [`PredictionError`] for a single (user, item, mode) sample.

use thiserror::Error;

use crate::core::{ItemId, UserId};

/// Result type for the prediction engine and similarity library
pub type Result<T> = std::result::Result<T, PredictionError>;

/// Numeric failures of the weighting and aggregation steps
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredictionError {
    /// A rating (or genre) vector is empty, so its average is undefined
    #[error("Insufficient data: cannot average an empty vector")]
    DataInsufficient,

    /// Every neighbour contributed a zero weight for the target item
    #[error("No overlap: zero total similarity weight for item {item}")]
    NoOverlap {
        /// Item being predicted
        item: ItemId,
    },

    /// A similarity denominator vanished (zero norm or zero-sum terms)
    #[error("Degenerate vector: similarity denominator is zero")]
    DegenerateVector,
}

/// Failures while reading or resolving the source tables
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying file could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The requested user has no ratings in the table
    #[error("Unknown user: {0}")]
    UnknownUser(UserId),

    /// The requested item is not in the catalog
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// An identifier could not be parsed for the selected id kind
    #[error("Invalid external id: {0}")]
    InvalidExternalId(String),
}

/// Top-level error for the serving path and the evaluation entry points
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Data access failure
    #[error(transparent)]
    Data(#[from] DataError),

    /// Prediction failure for a single item
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    /// Sample ratio outside (0, 1]
    #[error("Invalid sample ratio {0}: expected a value in (0, 1]")]
    InvalidSampleRatio(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overlap_message() {
        let err = PredictionError::NoOverlap { item: 42 };
        assert_eq!(
            err.to_string(),
            "No overlap: zero total similarity weight for item 42"
        );
    }

    #[test]
    fn test_prediction_error_is_transparent() {
        let err: RecommendError = PredictionError::DataInsufficient.into();
        assert_eq!(
            err.to_string(),
            "Insufficient data: cannot average an empty vector"
        );
    }

    #[test]
    fn test_unknown_user_wraps() {
        let err: RecommendError = DataError::UnknownUser(7).into();
        assert!(matches!(err, RecommendError::Data(DataError::UnknownUser(7))));
        assert_eq!(err.to_string(), "Unknown user: 7");
    }

    #[test]
    fn test_invalid_sample_ratio_message() {
        let err = RecommendError::InvalidSampleRatio(1.5);
        assert_eq!(
            err.to_string(),
            "Invalid sample ratio 1.5: expected a value in (0, 1]"
        );
    }
}
