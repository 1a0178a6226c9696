use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which public form produced the lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    BrandPitch,
    ResourceDownload,
}

impl ContactKind {
    pub fn label(self) -> &'static str {
        match self {
            ContactKind::BrandPitch => "brand_pitch",
            ContactKind::ResourceDownload => "resource_download",
        }
    }
}

/// Review state set by staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Pending,
    Reviewed,
    Approved,
    Rejected,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 4] = [
        ContactStatus::Pending,
        ContactStatus::Reviewed,
        ContactStatus::Approved,
        ContactStatus::Rejected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContactStatus::Pending => "pending",
            ContactStatus::Reviewed => "reviewed",
            ContactStatus::Approved => "approved",
            ContactStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw))
    }
}

/// Stored lead from the contact or resource-download forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: ContactId,
    pub kind: ContactKind,
    pub name: String,
    pub email: String,
    pub brand_name: Option<String>,
    pub message: Option<String>,
    pub website: Option<String>,
    pub resource: Option<String>,
    pub status: ContactStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/contact`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default, alias = "brandName")]
    #[validate(length(min = 1, max = 160, message = "brand name is required"))]
    pub brand_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "message is required"))]
    pub message: String,
    #[serde(default)]
    pub website: Option<String>,
}

/// Body of `POST /api/contact/resource`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResourceRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "resource is required"))]
    pub resource: String,
    #[serde(default, alias = "brandName")]
    pub brand_name: Option<String>,
}

/// Row handed to the repository; status always starts at pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub kind: ContactKind,
    pub name: String,
    pub email: String,
    pub brand_name: Option<String>,
    pub message: Option<String>,
    pub website: Option<String>,
    pub resource: Option<String>,
}

/// Staff edit of a submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "adminNotes", alias = "notes")]
    pub admin_notes: Option<String>,
}

/// Acknowledgement returned to the public form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactAck {
    pub id: ContactId,
    pub message: &'static str,
}

pub(crate) fn clean(value: &str) -> String {
    value.trim().to_string()
}

pub(crate) fn clean_optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|text| !text.is_empty()).map(str::to_string)
}
