use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::brands::{BrandId, BrandSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandListId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListItemId(pub i64);

/// Admin-curated list of brands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandList {
    pub id: BrandListId,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A brand's slot in a list with its pulse counters. Unique per (list, brand).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandListItem {
    pub id: ListItemId,
    pub list_id: BrandListId,
    pub brand_id: BrandId,
    pub position: i32,
    pub upvotes: u64,
    pub downvotes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBrandList {
    #[serde(default)]
    #[validate(length(min = 1, max = 160, message = "title must be 1-160 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NewListItem {
    #[serde(alias = "brandId")]
    pub brand_id: BrandId,
    #[serde(default)]
    pub position: Option<i32>,
}

/// List item joined with the brand it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListItemView {
    #[serde(flatten)]
    pub item: BrandListItem,
    pub brand: Option<BrandSummary>,
}

/// List with its items in position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandListView {
    #[serde(flatten)]
    pub list: BrandList,
    pub items: Vec<ListItemView>,
}
