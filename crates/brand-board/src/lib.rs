//! Brand directory, leaderboard, and lead intake services.
//!
//! Each feature module owns its domain types, a repository trait describing the
//! datastore seam, a service holding the business rules, and an axum router.
//! `store::memory` backs every repository trait in-process.

pub mod accounts;
pub(crate) mod background;
pub mod brands;
pub mod config;
pub mod contacts;
pub mod error;
pub mod leaderboard;
pub mod lists;
pub mod media;
pub mod normalizer;
pub mod notify;
pub mod ratings;
pub mod store;
pub mod subscribers;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
