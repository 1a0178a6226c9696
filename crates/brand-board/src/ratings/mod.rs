//! Five-dimension brand ratings keyed on (brand, voter).

pub mod domain;
pub mod input;
pub mod repository;
pub mod service;

pub use domain::{
    Rating, RatingId, RatingReceipt, RatingScores, UpsertOutcome, ValidatedRating, VoterId,
};
pub use input::{resolve_voter, validate_rating, RatingSubmission, RatingValidationError};
pub use repository::RatingRepository;
pub use service::{RatingError, RatingService};
