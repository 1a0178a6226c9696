use super::domain::{NewSubscriber, Subscriber, Subscription};
use crate::store::RepositoryError;

/// Storage abstraction for the `subscribers` table.
pub trait SubscriberRepository: Send + Sync {
    /// Insert unless the (already lower-cased) email exists; the existing row is
    /// returned untouched in that case.
    fn insert_subscriber_if_absent(
        &self,
        subscriber: NewSubscriber,
    ) -> Result<(Subscriber, Subscription), RepositoryError>;
    fn list_subscribers(&self) -> Result<Vec<Subscriber>, RepositoryError>;
}
