use std::collections::HashMap;

use super::domain::{parse_categories, set_featured, BrandDraft, BrandPatch};
use crate::media::ImageUpload;

const NAME_LIMIT: usize = 120;
const DESCRIPTION_LIMIT: usize = 4000;

const WEBSITE_FIELDS: [&str; 3] = ["website_url", "websiteUrl", "website"];
const CATEGORY_FIELDS: [&str; 4] = ["categories", "product_types", "productTypes", "tags"];
const ACTIVE_FIELDS: [&str; 3] = ["is_active", "isActive", "active"];

/// Text fields and optional image collected from a brand multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandForm {
    fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BrandFormError(pub String);

impl BrandForm {
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    fn first(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .find_map(|name| self.fields.get(*name))
            .map(String::as_str)
    }

    /// Fields for a new brand. The name is mandatory.
    pub fn draft(&self) -> Result<BrandDraft, BrandFormError> {
        let name = match self.first(&["name"]).map(str::trim) {
            Some(name) if !name.is_empty() => checked_name(name)?,
            _ => return Err(BrandFormError("brand name is required".to_string())),
        };
        let description = checked_description(self.first(&["description"]).unwrap_or(""))?;
        let website_url = match self.first(&WEBSITE_FIELDS) {
            Some(raw) => checked_website(raw)?,
            None => None,
        };
        let mut categories = self
            .first(&CATEGORY_FIELDS)
            .map(parse_categories)
            .unwrap_or_default();
        if let Some(featured) = self.first(&["featured"]) {
            set_featured(&mut categories, parse_flag("featured", featured)?);
        }
        let is_active = match self.first(&ACTIVE_FIELDS) {
            Some(raw) => parse_flag("is_active", raw)?,
            None => true,
        };

        Ok(BrandDraft {
            name,
            description,
            website_url,
            categories,
            is_active,
        })
    }

    /// Fields for an edit; only the fields present in the form change.
    pub fn patch(&self) -> Result<BrandPatch, BrandFormError> {
        let name = match self.first(&["name"]) {
            Some(raw) if raw.trim().is_empty() => {
                return Err(BrandFormError("brand name cannot be blank".to_string()))
            }
            Some(raw) => Some(checked_name(raw.trim())?),
            None => None,
        };
        let description = self
            .first(&["description"])
            .map(checked_description)
            .transpose()?;
        let website_url = self
            .first(&WEBSITE_FIELDS)
            .map(checked_website)
            .transpose()?;
        let categories = self.first(&CATEGORY_FIELDS).map(parse_categories);
        let is_active = self
            .first(&ACTIVE_FIELDS)
            .map(|raw| parse_flag("is_active", raw))
            .transpose()?;
        let featured = self
            .first(&["featured"])
            .map(|raw| parse_flag("featured", raw))
            .transpose()?;

        Ok(BrandPatch {
            name,
            description,
            website_url,
            categories,
            is_active,
            featured,
        })
    }
}

fn checked_name(name: &str) -> Result<String, BrandFormError> {
    if name.chars().count() > NAME_LIMIT {
        return Err(BrandFormError(format!(
            "brand name must be at most {NAME_LIMIT} characters"
        )));
    }
    Ok(name.to_string())
}

fn checked_description(raw: &str) -> Result<String, BrandFormError> {
    let description = raw.trim();
    if description.chars().count() > DESCRIPTION_LIMIT {
        return Err(BrandFormError(format!(
            "description must be at most {DESCRIPTION_LIMIT} characters"
        )));
    }
    Ok(description.to_string())
}

fn checked_website(raw: &str) -> Result<Option<String>, BrandFormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Ok(Some(trimmed.to_string()))
    } else if !trimmed.contains(char::is_whitespace) && trimmed.contains('.') {
        Ok(Some(format!("https://{trimmed}")))
    } else {
        Err(BrandFormError(format!("'{trimmed}' is not a valid website")))
    }
}

fn parse_flag(field: &str, raw: &str) -> Result<bool, BrandFormError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(BrandFormError(format!(
            "{field} must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_requires_name() {
        let form = BrandForm::default().with_field("description", "no name");
        assert_eq!(
            form.draft().unwrap_err(),
            BrandFormError("brand name is required".to_string())
        );
    }

    #[test]
    fn draft_reads_aliases_and_flags() {
        let form = BrandForm::default()
            .with_field("name", "  Sunset Farms ")
            .with_field("websiteUrl", "sunsetfarms.example")
            .with_field("productTypes", "Flower, Pre-rolls")
            .with_field("featured", "true")
            .with_field("isActive", "0");
        let draft = form.draft().expect("valid draft");
        assert_eq!(draft.name, "Sunset Farms");
        assert_eq!(
            draft.website_url.as_deref(),
            Some("https://sunsetfarms.example")
        );
        assert_eq!(
            draft.categories,
            vec![
                "Flower".to_string(),
                "Pre-rolls".to_string(),
                "featured".to_string()
            ]
        );
        assert!(!draft.is_active);
    }

    #[test]
    fn patch_only_carries_present_fields() {
        let patch = BrandForm::default()
            .with_field("description", "Updated")
            .patch()
            .expect("valid patch");
        assert_eq!(patch.description.as_deref(), Some("Updated"));
        assert!(patch.name.is_none());
        assert!(patch.categories.is_none());
        assert!(patch.website_url.is_none());
    }

    #[test]
    fn patch_clears_blank_website() {
        let patch = BrandForm::default()
            .with_field("website", "  ")
            .patch()
            .expect("valid patch");
        assert_eq!(patch.website_url, Some(None));
    }

    #[test]
    fn rejects_bad_flags_and_websites() {
        assert!(BrandForm::default()
            .with_field("name", "A")
            .with_field("featured", "maybe")
            .draft()
            .is_err());
        assert!(BrandForm::default()
            .with_field("name", "A")
            .with_field("website", "not a site")
            .draft()
            .is_err());
    }
}
