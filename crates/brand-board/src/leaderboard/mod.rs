//! Public leaderboard: aggregated ratings, rating submission, and curated lists.

pub mod aggregator;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregator::{aggregate, LeaderboardRow};
pub use router::{leaderboard_router, LeaderboardState};
pub use service::LeaderboardService;
