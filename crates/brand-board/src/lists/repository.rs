use super::domain::{
    BrandList, BrandListId, BrandListItem, ListItemId, NewBrandList, VoteDirection,
};
use crate::brands::BrandId;
use crate::store::RepositoryError;

/// Storage abstraction for `brand_lists` and `brand_list_items`.
pub trait ListRepository: Send + Sync {
    fn insert_list(&self, list: NewBrandList) -> Result<BrandList, RepositoryError>;
    fn fetch_list(&self, id: BrandListId) -> Result<Option<BrandList>, RepositoryError>;
    fn lists(&self, active_only: bool) -> Result<Vec<BrandList>, RepositoryError>;
    /// Items of one list sorted by position, then id.
    fn list_items(&self, list_id: BrandListId) -> Result<Vec<BrandListItem>, RepositoryError>;
    /// `Conflict` when the brand is already in the list. A missing position
    /// appends after the current last item.
    fn insert_list_item(
        &self,
        list_id: BrandListId,
        brand_id: BrandId,
        position: Option<i32>,
    ) -> Result<BrandListItem, RepositoryError>;
    /// Atomically add one to the chosen counter. `NotFound` when the item is
    /// not part of the list.
    fn increment_vote(
        &self,
        list_id: BrandListId,
        item_id: ListItemId,
        direction: VoteDirection,
    ) -> Result<BrandListItem, RepositoryError>;
}
