use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub i64);

/// Newsletter subscriber. Email is unique and stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[serde(default)]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 120, message = "name must be at most 120 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 80, message = "source must be at most 80 characters"))]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: String,
    pub name: Option<String>,
    pub source: Option<String>,
}

/// Whether a subscribe call created a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subscription {
    Created,
    Existing,
}
