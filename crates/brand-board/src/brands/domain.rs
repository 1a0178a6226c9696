use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Synthetic category tag marking a brand as featured on the landing page.
pub const FEATURED_TAG: &str = "featured";

/// Identifier wrapper for directory entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(pub i64);

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directory entry as stored in the `brands` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub description: String,
    pub logo_url: String,
    #[serde(skip)]
    pub logo_key: Option<String>,
    pub website_url: Option<String>,
    pub categories: Vec<String>,
    pub rank: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Brand {
    pub fn is_featured(&self) -> bool {
        has_featured_tag(&self.categories)
    }

    pub fn summary(&self) -> BrandSummary {
        BrandSummary {
            id: self.id,
            name: self.name.clone(),
            logo_url: self.logo_url.clone(),
            website_url: self.website_url.clone(),
        }
    }
}

/// Compact brand reference nested inside list items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandSummary {
    pub id: BrandId,
    pub name: String,
    pub logo_url: String,
    pub website_url: Option<String>,
}

/// Validated fields for a brand that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandDraft {
    pub name: String,
    pub description: String,
    pub website_url: Option<String>,
    pub categories: Vec<String>,
    pub is_active: bool,
}

/// Row handed to the repository once logo and rank are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBrand {
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub logo_key: Option<String>,
    pub website_url: Option<String>,
    pub categories: Vec<String>,
    pub rank: i32,
    pub is_active: bool,
}

/// Partial edit; absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website_url: Option<Option<String>>,
    pub categories: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub featured: Option<bool>,
}

impl BrandPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn apply(self, brand: &mut Brand) {
        if let Some(name) = self.name {
            brand.name = name;
        }
        if let Some(description) = self.description {
            brand.description = description;
        }
        if let Some(website_url) = self.website_url {
            brand.website_url = website_url;
        }
        if let Some(categories) = self.categories {
            let keep_featured = brand.is_featured();
            brand.categories = categories;
            if self.featured.is_none() {
                set_featured(&mut brand.categories, keep_featured);
            }
        }
        if let Some(featured) = self.featured {
            set_featured(&mut brand.categories, featured);
        }
        if let Some(is_active) = self.is_active {
            brand.is_active = is_active;
        }
    }
}

/// One entry of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandOrder {
    pub id: BrandId,
    pub rank: i32,
}

/// Which brands a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrandFilter {
    ActiveOnly,
    All,
}

pub fn has_featured_tag(categories: &[String]) -> bool {
    categories
        .iter()
        .any(|tag| tag.trim().eq_ignore_ascii_case(FEATURED_TAG))
}

pub fn set_featured(categories: &mut Vec<String>, featured: bool) {
    categories.retain(|tag| !tag.trim().eq_ignore_ascii_case(FEATURED_TAG));
    if featured {
        categories.push(FEATURED_TAG.to_string());
    }
}

/// Split a free-form tag field, trimming whitespace and dropping empties and duplicates.
pub fn parse_categories(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(values) = serde_json::from_str::<Vec<String>>(trimmed) {
            return dedupe_tags(values);
        }
    }
    dedupe_tags(trimmed.split(',').map(str::to_string))
}

fn dedupe_tags<I: IntoIterator<Item = String>>(tags: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|seen| seen.eq_ignore_ascii_case(tag)) {
            continue;
        }
        out.push(tag.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand(categories: &[&str]) -> Brand {
        let now = Utc::now();
        Brand {
            id: BrandId(1),
            name: "Green Leaf".to_string(),
            description: "Small batch flower".to_string(),
            logo_url: "/media/brand-1-logo.png".to_string(),
            logo_key: Some("brand-1-logo.png".to_string()),
            website_url: None,
            categories: categories.iter().map(|tag| tag.to_string()).collect(),
            rank: 1,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parses_comma_and_json_categories() {
        assert_eq!(
            parse_categories(" Flower, , Edibles ,flower"),
            vec!["Flower".to_string(), "Edibles".to_string()]
        );
        assert_eq!(
            parse_categories(r#"["Vapes", "Concentrates"]"#),
            vec!["Vapes".to_string(), "Concentrates".to_string()]
        );
    }

    #[test]
    fn featured_flag_is_a_tag() {
        let mut tags = vec!["Flower".to_string()];
        set_featured(&mut tags, true);
        assert!(has_featured_tag(&tags));
        set_featured(&mut tags, false);
        assert_eq!(tags, vec!["Flower".to_string()]);
    }

    #[test]
    fn patch_keeps_featured_when_categories_replaced() {
        let mut stored = brand(&["Flower", "featured"]);
        BrandPatch {
            categories: Some(vec!["Edibles".to_string()]),
            ..BrandPatch::default()
        }
        .apply(&mut stored);
        assert!(stored.is_featured());
        assert!(stored.categories.contains(&"Edibles".to_string()));
    }

    #[test]
    fn patch_can_clear_featured_and_website() {
        let mut stored = brand(&["featured"]);
        stored.website_url = Some("https://greenleaf.example".to_string());
        BrandPatch {
            featured: Some(false),
            website_url: Some(None),
            ..BrandPatch::default()
        }
        .apply(&mut stored);
        assert!(!stored.is_featured());
        assert!(stored.website_url.is_none());
    }
}
