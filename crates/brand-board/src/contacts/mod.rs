//! Lead intake from the public site and the staff review queue.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    ContactAck, ContactId, ContactKind, ContactRequest, ContactStatus, ContactSubmission,
    ContactUpdate, NewContact, ResourceRequest,
};
pub use repository::ContactRepository;
pub use router::contact_router;
pub use service::{ContactError, ContactService};
