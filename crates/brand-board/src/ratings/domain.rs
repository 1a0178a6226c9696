use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brands::BrandId;

/// Lowest and highest accepted sub-score.
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingId(pub i64);

/// Best-effort voter identity derived from the client address. Not authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(pub String);

impl VoterId {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five rated dimensions, each within `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScores {
    #[serde(rename = "potency_rating")]
    pub potency: u8,
    #[serde(rename = "flavor_rating")]
    pub flavor: u8,
    #[serde(rename = "effects_rating")]
    pub effects: u8,
    #[serde(rename = "value_rating")]
    pub value: u8,
    #[serde(rename = "overall_rating")]
    pub overall: u8,
}

impl RatingScores {
    pub fn as_array(&self) -> [u8; 5] {
        [
            self.potency,
            self.flavor,
            self.effects,
            self.value,
            self.overall,
        ]
    }
}

/// Normalized submission ready for the upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRating {
    pub scores: RatingScores,
    pub comment: Option<String>,
}

/// Row of the `brand_ratings` table. One per (brand, voter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: RatingId,
    pub brand_id: BrandId,
    pub user_ip: VoterId,
    #[serde(flatten)]
    pub scores: RatingScores,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether an upsert created a row or overwrote the voter's earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingReceipt {
    #[serde(flatten)]
    pub rating: Rating,
    pub action: UpsertOutcome,
}
