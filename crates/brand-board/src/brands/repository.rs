use super::domain::{Brand, BrandFilter, BrandId, BrandOrder, NewBrand};
use crate::store::RepositoryError;

/// Storage abstraction for the `brands` table.
///
/// Deleting a brand must also remove its ratings and list items, mirroring the
/// `ON DELETE CASCADE` foreign keys of the relational schema.
pub trait BrandRepository: Send + Sync {
    fn insert_brand(&self, brand: NewBrand) -> Result<Brand, RepositoryError>;
    fn update_brand(&self, brand: Brand) -> Result<Brand, RepositoryError>;
    fn fetch_brand(&self, id: BrandId) -> Result<Option<Brand>, RepositoryError>;
    /// Brands sorted by rank, then id.
    fn list_brands(&self, filter: BrandFilter) -> Result<Vec<Brand>, RepositoryError>;
    fn max_rank(&self) -> Result<Option<i32>, RepositoryError>;
    fn delete_brand(&self, id: BrandId) -> Result<Brand, RepositoryError>;
    /// Applies every rank or none; unknown ids yield `NotFound`.
    fn reorder_brands(&self, orders: &[BrandOrder]) -> Result<usize, RepositoryError>;
}
