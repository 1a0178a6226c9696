//! Per-brand averages over every stored rating, recomputed on each read.
//!
//! Mirrors the `brand_leaderboard` view in `migrations/`: active brands left
//! joined with their ratings, sub-score means coalesced to zero.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::brands::{Brand, BrandId};
use crate::ratings::Rating;

/// One leaderboard line. Averages are 0 for brands nobody has rated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub brand_id: BrandId,
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub website_url: Option<String>,
    pub categories: Vec<String>,
    pub rank: i32,
    pub avg_potency: f64,
    pub avg_flavor: f64,
    pub avg_effects: f64,
    pub avg_value: f64,
    pub avg_overall: f64,
    pub total_ratings: u64,
}

#[derive(Default)]
struct Totals {
    sums: [u64; 5],
    count: u64,
}

impl Totals {
    fn add(&mut self, rating: &Rating) {
        for (sum, score) in self.sums.iter_mut().zip(rating.scores.as_array()) {
            *sum += u64::from(score);
        }
        self.count += 1;
    }

    fn mean(&self, index: usize) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sums[index] as f64 / self.count as f64
        }
    }
}

/// Build leaderboard rows for the active brands, best overall first.
///
/// Ties on the overall mean fall back to rating count (more first), then
/// directory rank, then brand id, so the order never depends on storage order.
pub fn aggregate(brands: &[Brand], ratings: &[Rating]) -> Vec<LeaderboardRow> {
    let mut totals: HashMap<BrandId, Totals> = HashMap::new();
    for rating in ratings {
        totals.entry(rating.brand_id).or_default().add(rating);
    }

    let empty = Totals::default();
    let mut rows: Vec<LeaderboardRow> = brands
        .iter()
        .filter(|brand| brand.is_active)
        .map(|brand| {
            let totals = totals.get(&brand.id).unwrap_or(&empty);
            LeaderboardRow {
                brand_id: brand.id,
                name: brand.name.clone(),
                description: brand.description.clone(),
                logo_url: brand.logo_url.clone(),
                website_url: brand.website_url.clone(),
                categories: brand.categories.clone(),
                rank: brand.rank,
                avg_potency: totals.mean(0),
                avg_flavor: totals.mean(1),
                avg_effects: totals.mean(2),
                avg_value: totals.mean(3),
                avg_overall: totals.mean(4),
                total_ratings: totals.count,
            }
        })
        .collect();

    rows.sort_by(leaderboard_order);
    rows
}

fn leaderboard_order(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.avg_overall
        .total_cmp(&a.avg_overall)
        .then_with(|| b.total_ratings.cmp(&a.total_ratings))
        .then_with(|| a.rank.cmp(&b.rank))
        .then_with(|| a.brand_id.cmp(&b.brand_id))
}
