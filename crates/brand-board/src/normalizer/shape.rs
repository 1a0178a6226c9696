//! Tagged decode of the historical brand record shapes.
//!
//! Three generations of brand data reach the display layer: rows of the
//! relational `brands` table, documents from the legacy document store, and
//! rows of the leaderboard view. Each gets its own field table and adapter;
//! `SourceShape::detect` picks one from the fields present.

use serde_json::{Map, Value};

use super::display::{DisplayBrand, ScoreCard, ScoreDimension};
use crate::brands::FEATURED_TAG;

const LEADERBOARD_MARKERS: [&str; 8] = [
    "brand_id",
    "total_ratings",
    "totalRatings",
    "avg_potency",
    "avg_flavor",
    "avg_effects",
    "avg_value",
    "avg_overall",
];

const LEGACY_MARKERS: [&str; 7] = [
    "_id",
    "imageUrl",
    "image",
    "productTypes",
    "products",
    "websiteUrl",
    "logoUrl",
];

const COUNT_FIELDS: [&str; 5] = [
    "total_ratings",
    "totalRatings",
    "rating_count",
    "ratings_count",
    "count",
];

const NAME_FIELDS: [&str; 3] = ["name", "brand_name", "brandName"];
const ACTIVE_FIELDS: [&str; 3] = ["is_active", "isActive", "active"];
const FEATURED_FLAGS: [&str; 2] = ["featured", "isFeatured"];

/// Which generation a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    Leaderboard,
    Relational,
    LegacyDocument,
}

impl SourceShape {
    pub fn detect(record: &Map<String, Value>) -> Self {
        if LEADERBOARD_MARKERS.iter().any(|key| record.contains_key(*key)) {
            SourceShape::Leaderboard
        } else if LEGACY_MARKERS.iter().any(|key| record.contains_key(*key)) {
            SourceShape::LegacyDocument
        } else {
            SourceShape::Relational
        }
    }

    pub fn adapt(self, record: &Map<String, Value>) -> DisplayBrand {
        match self {
            SourceShape::Leaderboard => from_leaderboard(record),
            SourceShape::Relational => from_relational(record),
            SourceShape::LegacyDocument => from_legacy_document(record),
        }
    }
}

/// Per-shape field names, most authoritative first.
struct ShapeFields {
    id: &'static [&'static str],
    image: &'static [&'static str],
    website: &'static [&'static str],
    tags: &'static [&'static str],
}

const LEADERBOARD_FIELDS: ShapeFields = ShapeFields {
    id: &["brand_id", "id"],
    image: &["logo_url", "image_url", "logoUrl", "imageUrl", "logo", "image"],
    website: &["website_url", "websiteUrl", "website", "url"],
    tags: &["categories", "product_types", "productTypes", "products", "tags"],
};

const RELATIONAL_FIELDS: ShapeFields = ShapeFields {
    id: &["id"],
    image: &["logo_url", "image_url", "logo", "logoUrl", "imageUrl", "image"],
    website: &["website_url", "website", "websiteUrl", "url"],
    tags: &["categories", "product_types", "productTypes", "products", "tags"],
};

const LEGACY_FIELDS: ShapeFields = ShapeFields {
    id: &["_id", "id"],
    image: &["imageUrl", "image", "logoUrl", "logo", "logo_url", "image_url"],
    website: &["website", "websiteUrl", "url", "website_url"],
    tags: &["productTypes", "products", "categories", "product_types", "tags"],
};

fn from_leaderboard(record: &Map<String, Value>) -> DisplayBrand {
    assemble(record, &LEADERBOARD_FIELDS)
}

fn from_relational(record: &Map<String, Value>) -> DisplayBrand {
    assemble(record, &RELATIONAL_FIELDS)
}

fn from_legacy_document(record: &Map<String, Value>) -> DisplayBrand {
    assemble(record, &LEGACY_FIELDS)
}

fn assemble(record: &Map<String, Value>, fields: &ShapeFields) -> DisplayBrand {
    let tags = resolve_tags(record, fields.tags);
    let featured = tags
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(FEATURED_TAG))
        || FEATURED_FLAGS
            .iter()
            .any(|key| record.get(*key).and_then(Value::as_bool) == Some(true));
    let categories = tags
        .into_iter()
        .filter(|tag| !tag.eq_ignore_ascii_case(FEATURED_TAG))
        .collect();

    let mut scores = ScoreCard::default();
    for dimension in ScoreDimension::ALL {
        scores.set(dimension, resolve_score(record, &dimension.candidates()));
    }

    DisplayBrand {
        id: resolve_id(record, fields.id),
        name: first_text(record, &NAME_FIELDS).unwrap_or_default(),
        description: first_text(record, &["description"]).unwrap_or_default(),
        image: first_text(record, fields.image).unwrap_or_default(),
        website: first_text(record, fields.website).unwrap_or_default(),
        categories,
        featured,
        is_active: first_bool(record, &ACTIVE_FIELDS).unwrap_or(true),
        rank: record
            .get("rank")
            .and_then(number_of)
            .filter(|rank| rank.fract() == 0.0)
            .map(|rank| rank as i64),
        scores,
        total_ratings: resolve_count(record),
    }
}

fn resolve_id(record: &Map<String, Value>, candidates: &[&str]) -> String {
    candidates
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Value::Number(number) => Some(number.to_string()),
            Value::Object(inner) => inner
                .get("$oid")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .unwrap_or_default()
}

/// First non-empty string among the candidates.
fn first_text(record: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|key| record.get(*key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn first_bool(record: &Map<String, Value>, candidates: &[&str]) -> Option<bool> {
    candidates
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| match value {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Value::Number(number) => number.as_i64().map(|n| n != 0),
            _ => None,
        })
}

/// An array field wins; otherwise the first string field is comma-split.
fn resolve_tags(record: &Map<String, Value>, candidates: &[&str]) -> Vec<String> {
    let array = candidates
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(Value::as_array);
    if let Some(items) = array {
        return items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
    }

    candidates
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(Value::as_str)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// First parseable candidate, clamped into `0..=10`; 0 when none parse.
fn resolve_score(record: &Map<String, Value>, candidates: &[&str]) -> f64 {
    candidates
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(number_of)
        .map(|score| score.clamp(0.0, 10.0))
        .unwrap_or(0.0)
}

fn resolve_count(record: &Map<String, Value>) -> u64 {
    COUNT_FIELDS
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(number_of)
        .map(|count| count.round().max(0.0) as u64)
        .unwrap_or(0)
}

pub(crate) fn number_of(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&'static str]) -> Vec<&'static str> {
        let mut names = names.to_vec();
        names.sort_unstable();
        names
    }

    #[test]
    fn every_shape_knows_every_image_and_tag_name() {
        for fields in [&LEADERBOARD_FIELDS, &RELATIONAL_FIELDS] {
            assert_eq!(sorted(fields.image), sorted(LEGACY_FIELDS.image));
            assert_eq!(sorted(fields.tags), sorted(LEGACY_FIELDS.tags));
            assert_eq!(sorted(fields.website), sorted(LEGACY_FIELDS.website));
        }
    }
}
