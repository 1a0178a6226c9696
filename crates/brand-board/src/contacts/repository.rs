use super::domain::{ContactId, ContactStatus, ContactSubmission, NewContact};
use crate::store::RepositoryError;

/// Storage abstraction for the `contact_submissions` table.
pub trait ContactRepository: Send + Sync {
    fn insert_contact(&self, contact: NewContact) -> Result<ContactSubmission, RepositoryError>;
    fn fetch_contact(&self, id: ContactId) -> Result<Option<ContactSubmission>, RepositoryError>;
    /// Newest first, optionally restricted to one status.
    fn list_contacts(
        &self,
        status: Option<ContactStatus>,
    ) -> Result<Vec<ContactSubmission>, RepositoryError>;
    fn update_contact(
        &self,
        contact: ContactSubmission,
    ) -> Result<ContactSubmission, RepositoryError>;
    fn delete_contact(&self, id: ContactId) -> Result<ContactSubmission, RepositoryError>;
}
