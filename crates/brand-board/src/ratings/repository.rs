use super::domain::{Rating, RatingScores, UpsertOutcome, VoterId};
use crate::brands::BrandId;
use crate::store::RepositoryError;

/// Storage abstraction for the `brand_ratings` table.
pub trait RatingRepository: Send + Sync {
    /// Insert, or overwrite the scores and comment of the existing row for
    /// (brand, voter), as one atomic operation.
    fn upsert_rating(
        &self,
        brand_id: BrandId,
        voter: &VoterId,
        scores: RatingScores,
        comment: Option<String>,
    ) -> Result<(Rating, UpsertOutcome), RepositoryError>;
    fn ratings_for_brand(&self, brand_id: BrandId) -> Result<Vec<Rating>, RepositoryError>;
    fn all_ratings(&self) -> Result<Vec<Rating>, RepositoryError>;
}
