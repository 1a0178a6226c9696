use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

use super::domain::{
    clean, clean_optional, ContactId, ContactKind, ContactRequest, ContactStatus,
    ContactSubmission, ContactUpdate, NewContact, ResourceRequest,
};
use super::repository::ContactRepository;
use crate::background;
use crate::error::ApiError;
use crate::notify::{Notification, Notifier};
use crate::store::RepositoryError;

const EXPORT_HEADER: [&str; 11] = [
    "id",
    "kind",
    "status",
    "name",
    "email",
    "brand_name",
    "website",
    "resource",
    "message",
    "admin_notes",
    "created_at",
];

/// Public lead intake plus the staff review queue.
pub struct ContactService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    notify_email: Option<String>,
}

impl<S, N> ContactService<S, N>
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, notify_email: Option<String>) -> Self {
        Self {
            store,
            notifier,
            notify_email,
        }
    }

    /// Fields are trimmed before validation, so blank input is rejected.
    pub fn submit(&self, request: ContactRequest) -> Result<ContactSubmission, ContactError> {
        let request = ContactRequest {
            name: clean(&request.name),
            email: request.email.trim().to_ascii_lowercase(),
            brand_name: clean(&request.brand_name),
            message: clean(&request.message),
            website: clean_optional(request.website.as_deref()),
        };
        request.validate()?;
        let contact = self.store.insert_contact(NewContact {
            kind: ContactKind::BrandPitch,
            name: request.name,
            email: request.email,
            brand_name: Some(request.brand_name),
            message: Some(request.message),
            website: request.website,
            resource: None,
        })?;
        info!(contact_id = %contact.id, kind = contact.kind.label(), "contact submission stored");
        self.announce(&contact);
        Ok(contact)
    }

    pub fn request_resource(
        &self,
        request: ResourceRequest,
    ) -> Result<ContactSubmission, ContactError> {
        let request = ResourceRequest {
            name: clean(&request.name),
            email: request.email.trim().to_ascii_lowercase(),
            resource: clean(&request.resource),
            brand_name: clean_optional(request.brand_name.as_deref()),
        };
        request.validate()?;
        let contact = self.store.insert_contact(NewContact {
            kind: ContactKind::ResourceDownload,
            name: request.name,
            email: request.email,
            brand_name: request.brand_name,
            message: None,
            website: None,
            resource: Some(request.resource),
        })?;
        info!(contact_id = %contact.id, kind = contact.kind.label(), "resource request stored");
        self.announce(&contact);
        Ok(contact)
    }

    pub fn list(&self, status: Option<&str>) -> Result<Vec<ContactSubmission>, ContactError> {
        let status = match status.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(parse_status(raw)?),
            None => None,
        };
        let contacts = self.store.list_contacts(status)?;
        debug!(count = contacts.len(), "loaded contact submissions");
        Ok(contacts)
    }

    pub fn get(&self, id: ContactId) -> Result<ContactSubmission, ContactError> {
        self.store
            .fetch_contact(id)?
            .ok_or(ContactError::NotFound(id))
    }

    pub fn update(
        &self,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<ContactSubmission, ContactError> {
        let mut contact = self.get(id)?;
        if let Some(raw) = update.status.as_deref() {
            contact.status = parse_status(raw)?;
        }
        if let Some(notes) = update.admin_notes.as_deref() {
            contact.admin_notes = clean_optional(Some(notes));
        }
        contact.updated_at = Utc::now();

        let contact = self.store.update_contact(contact).map_err(|err| match err {
            RepositoryError::NotFound => ContactError::NotFound(id),
            other => other.into(),
        })?;
        info!(contact_id = %id, status = contact.status.label(), "contact submission updated");
        Ok(contact)
    }

    pub fn delete(&self, id: ContactId) -> Result<ContactSubmission, ContactError> {
        let removed = self.store.delete_contact(id).map_err(|err| match err {
            RepositoryError::NotFound => ContactError::NotFound(id),
            other => other.into(),
        })?;
        info!(contact_id = %id, "contact submission deleted");
        Ok(removed)
    }

    /// Every submission as CSV, newest first.
    pub fn export_csv(&self) -> Result<String, ContactError> {
        let contacts = self.store.list_contacts(None)?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;
        for contact in &contacts {
            let id = contact.id.to_string();
            let created_at = contact.created_at.to_rfc3339();
            writer.write_record([
                id.as_str(),
                contact.kind.label(),
                contact.status.label(),
                contact.name.as_str(),
                contact.email.as_str(),
                contact.brand_name.as_deref().unwrap_or_default(),
                contact.website.as_deref().unwrap_or_default(),
                contact.resource.as_deref().unwrap_or_default(),
                contact.message.as_deref().unwrap_or_default(),
                contact.admin_notes.as_deref().unwrap_or_default(),
                created_at.as_str(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ContactError::Export(err.to_string()))?;
        let body = String::from_utf8(bytes).map_err(|err| ContactError::Export(err.to_string()))?;
        debug!(rows = contacts.len(), "contact export rendered");
        Ok(body)
    }

    fn announce(&self, contact: &ContactSubmission) {
        let subject = match contact.kind {
            ContactKind::BrandPitch => format!(
                "New brand inquiry from {}",
                contact.brand_name.as_deref().unwrap_or(contact.name.as_str())
            ),
            ContactKind::ResourceDownload => format!(
                "Resource requested: {}",
                contact.resource.as_deref().unwrap_or("unknown")
            ),
        };
        let notification = Notification::new(contact.kind.label(), subject)
            .to(self.notify_email.clone())
            .detail("contact_id", contact.id.to_string())
            .detail("name", contact.name.clone())
            .detail("email", contact.email.clone())
            .detail("brand_name", contact.brand_name.clone().unwrap_or_default())
            .detail("website", contact.website.clone().unwrap_or_default())
            .detail("resource", contact.resource.clone().unwrap_or_default());
        let notifier = self.notifier.clone();
        background::detach("notify-lead", move || notifier.notify(notification));
    }
}

fn parse_status(raw: &str) -> Result<ContactStatus, ContactError> {
    ContactStatus::parse(raw).ok_or_else(|| ContactError::InvalidStatus(raw.trim().to_string()))
}

/// Error raised by the contact service.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("status must be one of pending, reviewed, approved, rejected (got '{0}')")]
    InvalidStatus(String),
    #[error("contact submission {0} not found")]
    NotFound(ContactId),
    #[error(transparent)]
    Invalid(#[from] validator::ValidationErrors),
    #[error("failed to render export: {0}")]
    Export(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ContactError> for ApiError {
    fn from(value: ContactError) -> Self {
        match value {
            ContactError::InvalidStatus(_) => ApiError::Validation(value.to_string()),
            ContactError::NotFound(_) => ApiError::NotFound(value.to_string()),
            ContactError::Invalid(errors) => errors.into(),
            ContactError::Export(_) | ContactError::Csv(_) => ApiError::dependency(value),
            ContactError::Repository(err) => err.into(),
        }
    }
}
