//! Newsletter subscriptions.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{NewSubscriber, SubscribeRequest, Subscriber, SubscriberId, Subscription};
pub use repository::SubscriberRepository;
pub use router::subscriber_router;
pub use service::{SubscribeError, SubscriberService};
