use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Brand, BrandDraft, BrandFilter, BrandId, BrandOrder, BrandPatch, NewBrand};
use super::form::BrandFormError;
use super::repository::BrandRepository;
use crate::background::detach;
use crate::error::ApiError;
use crate::media::{ImageStore, ImageUpload, StorageError, StoredImage};
use crate::normalizer::{self, DisplayBrand};
use crate::store::RepositoryError;

/// Admin and public operations over directory entries.
pub struct BrandService<S, M> {
    store: Arc<S>,
    images: Arc<M>,
}

impl<S, M> BrandService<S, M>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    pub fn new(store: Arc<S>, images: Arc<M>) -> Self {
        Self { store, images }
    }

    pub fn list(&self, filter: BrandFilter) -> Result<Vec<Brand>, BrandServiceError> {
        Ok(self.store.list_brands(filter)?)
    }

    pub fn get(&self, id: BrandId) -> Result<Brand, BrandServiceError> {
        self.store
            .fetch_brand(id)?
            .ok_or(BrandServiceError::NotFound(id))
    }

    /// Active brands carrying the featured tag, in display shape.
    pub fn featured(&self) -> Result<Vec<DisplayBrand>, BrandServiceError> {
        let brands = self.store.list_brands(BrandFilter::ActiveOnly)?;
        let mut cards = Vec::new();
        for brand in brands.iter().filter(|brand| brand.is_featured()) {
            match serde_json::to_value(brand)
                .map_err(|err| err.to_string())
                .and_then(|value| normalizer::normalize(&value).map_err(|err| err.to_string()))
            {
                Ok(card) => cards.push(card),
                Err(err) => warn!(brand_id = %brand.id, error = %err, "skipping featured brand"),
            }
        }
        Ok(cards)
    }

    /// Create a brand. An image is mandatory and the brand lands after every
    /// existing rank.
    pub fn create(
        &self,
        draft: BrandDraft,
        image: Option<ImageUpload>,
    ) -> Result<Brand, BrandServiceError> {
        let image = image.ok_or(BrandServiceError::MissingImage)?;
        image.validate()?;

        // Admin creation is human-paced, so read-then-write on rank is acceptable.
        let rank = self.store.max_rank()?.map_or(1, |max| max + 1);
        let stored = self.images.put(&image)?;

        let record = NewBrand {
            name: draft.name,
            description: draft.description,
            logo_url: stored.public_url.clone(),
            logo_key: Some(stored.key.clone()),
            website_url: draft.website_url,
            categories: draft.categories,
            rank,
            is_active: draft.is_active,
        };

        match self.store.insert_brand(record) {
            Ok(brand) => {
                info!(brand_id = %brand.id, rank = brand.rank, "brand created");
                Ok(brand)
            }
            Err(err) => {
                self.discard_image(stored.key);
                Err(err.into())
            }
        }
    }

    /// Apply an edit, optionally swapping the logo. The replaced logo is
    /// removed in the background once the new row is stored.
    pub fn update(
        &self,
        id: BrandId,
        patch: BrandPatch,
        image: Option<ImageUpload>,
    ) -> Result<Brand, BrandServiceError> {
        let mut brand = self.get(id)?;

        let uploaded: Option<StoredImage> = match image {
            Some(image) => {
                image.validate()?;
                Some(self.images.put(&image)?)
            }
            None => None,
        };

        let previous_key = brand.logo_key.clone();
        if let Some(stored) = &uploaded {
            brand.logo_url = stored.public_url.clone();
            brand.logo_key = Some(stored.key.clone());
        }
        patch.apply(&mut brand);
        brand.updated_at = Utc::now();

        match self.store.update_brand(brand) {
            Ok(updated) => {
                if uploaded.is_some() {
                    if let Some(key) = previous_key {
                        self.discard_image(key);
                    }
                }
                info!(brand_id = %updated.id, "brand updated");
                Ok(updated)
            }
            Err(err) => {
                if let Some(stored) = uploaded {
                    self.discard_image(stored.key);
                }
                Err(match err {
                    RepositoryError::NotFound => BrandServiceError::NotFound(id),
                    other => other.into(),
                })
            }
        }
    }

    /// Hard delete. Ratings and list items go with the brand.
    pub fn delete(&self, id: BrandId) -> Result<Brand, BrandServiceError> {
        let removed = self.store.delete_brand(id).map_err(|err| match err {
            RepositoryError::NotFound => BrandServiceError::NotFound(id),
            other => other.into(),
        })?;
        if let Some(key) = removed.logo_key.clone() {
            self.discard_image(key);
        }
        info!(brand_id = %id, "brand deleted");
        Ok(removed)
    }

    pub fn reorder(&self, orders: &[BrandOrder]) -> Result<usize, BrandServiceError> {
        let updated = self.store.reorder_brands(orders)?;
        info!(updated, "brands reordered");
        Ok(updated)
    }

    fn discard_image(&self, key: String) {
        let images = self.images.clone();
        detach("delete-brand-image", move || images.delete(&key));
    }
}

/// Error raised by the brand service.
#[derive(Debug, thiserror::Error)]
pub enum BrandServiceError {
    #[error("image file is required")]
    MissingImage,
    #[error("brand {0} not found")]
    NotFound(BrandId),
    #[error(transparent)]
    Form(#[from] BrandFormError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<BrandServiceError> for ApiError {
    fn from(value: BrandServiceError) -> Self {
        match value {
            BrandServiceError::MissingImage | BrandServiceError::Form(_) => {
                ApiError::Validation(value.to_string())
            }
            BrandServiceError::NotFound(_) => ApiError::not_found("brand not found"),
            BrandServiceError::Repository(err) => err.into(),
            BrandServiceError::Storage(err) => err.into(),
        }
    }
}
