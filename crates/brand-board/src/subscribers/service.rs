use std::sync::Arc;

use tracing::info;
use validator::Validate;

use super::domain::{NewSubscriber, SubscribeRequest, Subscriber, Subscription};
use super::repository::SubscriberRepository;
use crate::error::ApiError;
use crate::store::RepositoryError;

pub struct SubscriberService<S> {
    store: Arc<S>,
}

impl<S> SubscriberService<S>
where
    S: SubscriberRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn subscribe(
        &self,
        request: SubscribeRequest,
    ) -> Result<(Subscriber, Subscription), SubscribeError> {
        let request = SubscribeRequest {
            email: request.email.trim().to_ascii_lowercase(),
            ..request
        };
        request.validate()?;

        let (subscriber, outcome) = self.store.insert_subscriber_if_absent(NewSubscriber {
            email: request.email,
            name: trimmed(request.name),
            source: trimmed(request.source),
        })?;
        info!(subscriber_id = subscriber.id.0, ?outcome, "newsletter subscription");
        Ok((subscriber, outcome))
    }

    pub fn list(&self) -> Result<Vec<Subscriber>, SubscribeError> {
        Ok(self.store.list_subscribers()?)
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error(transparent)]
    Invalid(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<SubscribeError> for ApiError {
    fn from(value: SubscribeError) -> Self {
        match value {
            SubscribeError::Invalid(errors) => errors.into(),
            SubscribeError::Repository(err) => err.into(),
        }
    }
}
