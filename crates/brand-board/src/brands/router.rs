use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::{BrandFilter, BrandId, BrandOrder};
use super::form::BrandForm;
use super::repository::BrandRepository;
use super::service::{BrandService, BrandServiceError};
use crate::accounts::AuthSession;
use crate::error::ApiError;
use crate::media::{ImageStore, ImageUpload, MAX_IMAGE_BYTES};

const IMAGE_FIELDS: [&str; 2] = ["image", "logo"];

/// Router exposing the public directory and the admin brand endpoints.
pub fn brand_router<S, M>(service: Arc<BrandService<S, M>>) -> Router
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    Router::new()
        .route(
            "/api/brands",
            get(list_handler::<S, M>).post(create_handler::<S, M>),
        )
        .route("/api/brands/featured", get(featured_handler::<S, M>))
        .route("/api/brands/all", get(list_all_handler::<S, M>))
        .route("/api/brands/reorder", put(reorder_handler::<S, M>))
        .route(
            "/api/brands/:brand_id",
            get(get_handler::<S, M>)
                .put(update_handler::<S, M>)
                .delete(delete_handler::<S, M>),
        )
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024))
        .with_state(service)
}

pub(crate) async fn list_handler<S, M>(
    State(service): State<Arc<BrandService<S, M>>>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    Ok(Json(service.list(BrandFilter::ActiveOnly)?))
}

pub(crate) async fn list_all_handler<S, M>(
    State(service): State<Arc<BrandService<S, M>>>,
    session: AuthSession,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    session.require_staff()?;
    Ok(Json(service.list(BrandFilter::All)?))
}

pub(crate) async fn featured_handler<S, M>(
    State(service): State<Arc<BrandService<S, M>>>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    Ok(Json(service.featured()?))
}

pub(crate) async fn get_handler<S, M>(
    State(service): State<Arc<BrandService<S, M>>>,
    Path(brand_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    Ok(Json(service.get(BrandId(brand_id))?))
}

pub(crate) async fn create_handler<S, M>(
    State(service): State<Arc<BrandService<S, M>>>,
    session: AuthSession,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    session.require_staff()?;
    let mut form = read_brand_form(multipart).await?;
    let draft = form.draft().map_err(BrandServiceError::from)?;
    let brand = service.create(draft, form.image.take())?;
    Ok((StatusCode::CREATED, Json(brand)))
}

pub(crate) async fn update_handler<S, M>(
    State(service): State<Arc<BrandService<S, M>>>,
    session: AuthSession,
    Path(brand_id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    session.require_staff()?;
    let mut form = read_brand_form(multipart).await?;
    let patch = form.patch().map_err(BrandServiceError::from)?;
    let brand = service.update(BrandId(brand_id), patch, form.image.take())?;
    Ok(Json(brand))
}

pub(crate) async fn delete_handler<S, M>(
    State(service): State<Arc<BrandService<S, M>>>,
    session: AuthSession,
    Path(brand_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    session.require_admin()?;
    let removed = service.delete(BrandId(brand_id))?;
    Ok(Json(json!({
        "message": "brand deleted",
        "id": removed.id,
    })))
}

pub(crate) async fn reorder_handler<S, M>(
    State(service): State<Arc<BrandService<S, M>>>,
    session: AuthSession,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
    S: BrandRepository + 'static,
    M: ImageStore + 'static,
{
    session.require_staff()?;
    let orders = parse_brand_orders(&body)?;
    let updated = service.reorder(&orders)?;
    Ok(Json(json!({
        "message": "brands reordered",
        "updated": updated,
    })))
}

/// `{"brandOrders": [{"id": 1, "rank": 2}, ...]}`; anything but an array is rejected.
pub(crate) fn parse_brand_orders(body: &Value) -> Result<Vec<BrandOrder>, ApiError> {
    let entries = body
        .get("brandOrders")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::validation("brandOrders must be an array"))?;

    entries
        .iter()
        .map(|entry| {
            serde_json::from_value::<BrandOrder>(entry.clone()).map_err(|_| {
                ApiError::validation("each brand order needs an integer id and rank")
            })
        })
        .collect()
}

async fn read_brand_form(mut multipart: Multipart) -> Result<BrandForm, ApiError> {
    let mut form = BrandForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if IMAGE_FIELDS.contains(&name.as_str()) {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            if !bytes.is_empty() {
                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else if !name.is_empty() {
            let value = field.text().await?;
            form.insert(name, value);
        }
    }
    Ok(form)
}
