//! Outbound notification hook for new leads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Payload handed to a notifier when a lead arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub template: String,
    pub recipient: Option<String>,
    pub subject: String,
    pub details: BTreeMap<String, String>,
}

impl Notification {
    pub fn new(template: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            recipient: None,
            subject: subject.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn to(mut self, recipient: Option<String>) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn detail(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.details.insert(key.to_string(), value);
        }
        self
    }
}

/// Outbound transport (e-mail, chat webhook, ...). Failures never reach the caller
/// that triggered the notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            template = %notification.template,
            recipient = notification.recipient.as_deref().unwrap_or("-"),
            subject = %notification.subject,
            fields = notification.details.len(),
            "notification dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_details_are_dropped() {
        let notification = Notification::new("contact", "New inquiry")
            .detail("email", "grower@example.com")
            .detail("company", "  ");

        assert_eq!(notification.details.len(), 1);
        assert_eq!(notification.details["email"], "grower@example.com");
    }

    #[test]
    fn log_notifier_accepts_everything() {
        let notification = Notification::new("contact", "New inquiry").to(Some("ops@example.com".into()));
        assert!(LogNotifier.notify(notification).is_ok());
    }
}
