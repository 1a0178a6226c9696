use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{Rating, RatingReceipt, VoterId};
use super::repository::RatingRepository;
use super::input::{validate_rating, RatingSubmission, RatingValidationError};
use crate::brands::{BrandId, BrandRepository};
use crate::error::ApiError;
use crate::store::RepositoryError;

/// Validates rating submissions and stores at most one rating per voter and brand.
pub struct RatingService<S> {
    store: Arc<S>,
}

impl<S> RatingService<S>
where
    S: BrandRepository + RatingRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn rate(
        &self,
        brand_id: BrandId,
        voter: &VoterId,
        submission: &RatingSubmission,
    ) -> Result<RatingReceipt, RatingError> {
        let validated = validate_rating(submission)?;

        if self.store.fetch_brand(brand_id)?.is_none() {
            return Err(RatingError::BrandNotFound(brand_id));
        }

        let (rating, action) = self
            .store
            .upsert_rating(brand_id, voter, validated.scores, validated.comment)
            .map_err(|err| match err {
                // The brand can vanish between the existence check and the write.
                RepositoryError::NotFound => RatingError::BrandNotFound(brand_id),
                other => other.into(),
            })?;

        info!(brand_id = %brand_id, voter = %voter, ?action, "rating stored");
        Ok(RatingReceipt { rating, action })
    }

    pub fn ratings_for(&self, brand_id: BrandId) -> Result<Vec<Rating>, RatingError> {
        if self.store.fetch_brand(brand_id)?.is_none() {
            return Err(RatingError::BrandNotFound(brand_id));
        }
        let ratings = self.store.ratings_for_brand(brand_id)?;
        debug!(brand_id = %brand_id, count = ratings.len(), "loaded brand ratings");
        Ok(ratings)
    }
}

/// Error raised by the rating service.
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error(transparent)]
    Invalid(#[from] RatingValidationError),
    #[error("brand not found")]
    BrandNotFound(BrandId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<RatingError> for ApiError {
    fn from(value: RatingError) -> Self {
        match value {
            RatingError::Invalid(err) => ApiError::Validation(err.to_string()),
            RatingError::BrandNotFound(_) => ApiError::not_found("brand not found"),
            RatingError::Repository(err) => err.into(),
        }
    }
}
