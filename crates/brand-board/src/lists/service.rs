use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use validator::Validate;

use super::domain::{
    BrandList, BrandListId, BrandListItem, BrandListView, ListItemId, ListItemView, NewBrandList,
    NewListItem, VoteDirection,
};
use super::repository::ListRepository;
use crate::brands::{BrandFilter, BrandRepository};
use crate::error::ApiError;
use crate::store::RepositoryError;

/// Curated lists and their anonymous up/down pulse votes.
pub struct ListService<S> {
    store: Arc<S>,
}

impl<S> ListService<S>
where
    S: BrandRepository + ListRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Active lists with nested items and brand summaries.
    pub fn active_lists(&self) -> Result<Vec<BrandListView>, ListError> {
        let brands: HashMap<_, _> = self
            .store
            .list_brands(BrandFilter::All)?
            .into_iter()
            .map(|brand| (brand.id, brand.summary()))
            .collect();

        let mut views = Vec::new();
        for list in self.store.lists(true)? {
            let items = self
                .store
                .list_items(list.id)?
                .into_iter()
                .map(|item| ListItemView {
                    brand: brands.get(&item.brand_id).cloned(),
                    item,
                })
                .collect();
            views.push(BrandListView { list, items });
        }
        debug!(lists = views.len(), "loaded brand lists");
        Ok(views)
    }

    pub fn create_list(&self, request: NewBrandList) -> Result<BrandList, ListError> {
        request.validate()?;
        let list = self.store.insert_list(NewBrandList {
            title: request.title.trim().to_string(),
            description: request
                .description
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
            is_active: request.is_active,
        })?;
        info!(list_id = list.id.0, "brand list created");
        Ok(list)
    }

    pub fn add_item(
        &self,
        list_id: BrandListId,
        request: NewListItem,
    ) -> Result<BrandListItem, ListError> {
        if self.store.fetch_list(list_id)?.is_none() {
            return Err(ListError::ListNotFound);
        }
        if self.store.fetch_brand(request.brand_id)?.is_none() {
            return Err(ListError::BrandNotFound);
        }
        let item = self
            .store
            .insert_list_item(list_id, request.brand_id, request.position)
            .map_err(|err| match err {
                RepositoryError::Conflict(_) => ListError::DuplicateBrand,
                other => other.into(),
            })?;
        info!(list_id = list_id.0, item_id = item.id.0, "brand added to list");
        Ok(item)
    }

    /// Unauthenticated and not deduplicated: every call moves the counter by one.
    pub fn vote(
        &self,
        list_id: BrandListId,
        item_id: ListItemId,
        direction: &str,
    ) -> Result<BrandListItem, ListError> {
        let direction = VoteDirection::parse(direction).ok_or(ListError::InvalidVote)?;
        let item = self
            .store
            .increment_vote(list_id, item_id, direction)
            .map_err(|err| match err {
                RepositoryError::NotFound => ListError::ItemNotFound,
                other => other.into(),
            })?;
        debug!(list_id = list_id.0, item_id = item_id.0, ?direction, "list vote recorded");
        Ok(item)
    }
}

/// Error raised by the list service.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("vote must be \"up\" or \"down\"")]
    InvalidVote,
    #[error("list not found")]
    ListNotFound,
    #[error("brand not found")]
    BrandNotFound,
    #[error("item not found in this list")]
    ItemNotFound,
    #[error("brand is already in this list")]
    DuplicateBrand,
    #[error(transparent)]
    Invalid(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ListError> for ApiError {
    fn from(value: ListError) -> Self {
        match value {
            ListError::InvalidVote | ListError::DuplicateBrand => {
                ApiError::Validation(value.to_string())
            }
            ListError::ListNotFound | ListError::BrandNotFound | ListError::ItemNotFound => {
                ApiError::NotFound(value.to_string())
            }
            ListError::Invalid(errors) => errors.into(),
            ListError::Repository(err) => err.into(),
        }
    }
}
