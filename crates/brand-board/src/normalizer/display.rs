use serde::{Deserialize, Serialize};

/// Five rating dimensions as shown on a card, each within `0.0..=10.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub potency: f64,
    pub flavor: f64,
    pub effects: f64,
    pub value: f64,
    pub overall: f64,
}

/// The one canonical record the display layer consumes, whatever shape the
/// source row had.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayBrand {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub website: String,
    pub categories: Vec<String>,
    pub featured: bool,
    pub is_active: bool,
    pub rank: Option<i64>,
    pub scores: ScoreCard,
    pub total_ratings: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDimension {
    Potency,
    Flavor,
    Effects,
    Value,
    Overall,
}

impl ScoreDimension {
    pub const ALL: [ScoreDimension; 5] = [
        ScoreDimension::Potency,
        ScoreDimension::Flavor,
        ScoreDimension::Effects,
        ScoreDimension::Value,
        ScoreDimension::Overall,
    ];

    /// Candidate field names in priority order: bare, averaged, rating-suffixed.
    pub fn candidates(self) -> [&'static str; 3] {
        match self {
            ScoreDimension::Potency => ["potency", "avg_potency", "potency_rating"],
            ScoreDimension::Flavor => ["flavor", "avg_flavor", "flavor_rating"],
            ScoreDimension::Effects => ["effects", "avg_effects", "effects_rating"],
            ScoreDimension::Value => ["value", "avg_value", "value_rating"],
            ScoreDimension::Overall => ["overall", "avg_overall", "overall_rating"],
        }
    }
}

impl ScoreCard {
    pub(crate) fn set(&mut self, dimension: ScoreDimension, score: f64) {
        match dimension {
            ScoreDimension::Potency => self.potency = score,
            ScoreDimension::Flavor => self.flavor = score,
            ScoreDimension::Effects => self.effects = score,
            ScoreDimension::Value => self.value = score,
            ScoreDimension::Overall => self.overall = score,
        }
    }
}
