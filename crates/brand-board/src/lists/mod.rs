//! Curated brand lists with independent up/down pulse counters.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{
    BrandList, BrandListId, BrandListItem, BrandListView, ListItemId, ListItemView, NewBrandList,
    NewListItem, VoteDirection,
};
pub use repository::ListRepository;
pub use service::{ListError, ListService};
