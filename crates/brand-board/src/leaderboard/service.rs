use std::sync::Arc;

use tracing::{debug, warn};

use super::aggregator::{aggregate, LeaderboardRow};
use crate::brands::{BrandFilter, BrandRepository};
use crate::normalizer::{self, DisplayBrand};
use crate::ratings::RatingRepository;
use crate::store::RepositoryError;

/// Read-side projection over brands and ratings. Nothing is cached.
pub struct LeaderboardService<S> {
    store: Arc<S>,
}

impl<S> LeaderboardService<S>
where
    S: BrandRepository + RatingRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn rows(&self) -> Result<Vec<LeaderboardRow>, RepositoryError> {
        let brands = self.store.list_brands(BrandFilter::ActiveOnly)?;
        let ratings = self.store.all_ratings()?;
        let rows = aggregate(&brands, &ratings);
        debug!(rows = rows.len(), ratings = ratings.len(), "leaderboard computed");
        Ok(rows)
    }

    /// Leaderboard rows reshaped into display cards, in leaderboard order.
    pub fn display(&self) -> Result<Vec<DisplayBrand>, RepositoryError> {
        let mut cards = Vec::new();
        for row in self.rows()? {
            let card = serde_json::to_value(&row)
                .map_err(|err| err.to_string())
                .and_then(|value| normalizer::normalize(&value).map_err(|err| err.to_string()));
            match card {
                Ok(card) => cards.push(card),
                Err(err) => warn!(brand_id = %row.brand_id, error = %err, "skipping leaderboard row"),
            }
        }
        Ok(cards)
    }
}
