//! Directory entries: public listing, admin create/edit/reorder/delete with logo upload.

pub mod domain;
pub mod form;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{
    Brand, BrandDraft, BrandFilter, BrandId, BrandOrder, BrandPatch, BrandSummary, NewBrand,
    FEATURED_TAG,
};
pub use form::{BrandForm, BrandFormError};
pub use repository::BrandRepository;
pub use router::brand_router;
pub use service::{BrandService, BrandServiceError};
