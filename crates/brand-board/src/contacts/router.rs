use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ContactAck, ContactId, ContactRequest, ContactUpdate, ResourceRequest};
use super::repository::ContactRepository;
use super::service::ContactService;
use crate::accounts::AuthSession;
use crate::error::ApiError;
use crate::notify::Notifier;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContactQuery {
    #[serde(default)]
    status: Option<String>,
}

/// Public lead forms and the staff review queue.
pub fn contact_router<S, N>(service: Arc<ContactService<S, N>>) -> Router
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route(
            "/api/contact",
            post(submit_handler::<S, N>).get(list_handler::<S, N>),
        )
        .route("/api/contact/resource", post(resource_handler::<S, N>))
        .route("/api/contact/export", get(export_handler::<S, N>))
        .route(
            "/api/contact/:contact_id",
            get(get_handler::<S, N>)
                .put(update_handler::<S, N>)
                .delete(delete_handler::<S, N>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<S, N>(
    State(service): State<Arc<ContactService<S, N>>>,
    Json(request): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    let contact = service.submit(request)?;
    let ack = ContactAck {
        id: contact.id,
        message: "Thanks for reaching out. We will be in touch soon.",
    };
    Ok((StatusCode::CREATED, Json(ack)))
}

pub(crate) async fn resource_handler<S, N>(
    State(service): State<Arc<ContactService<S, N>>>,
    Json(request): Json<ResourceRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    let contact = service.request_resource(request)?;
    let ack = ContactAck {
        id: contact.id,
        message: "Your resource request has been received.",
    };
    Ok((StatusCode::CREATED, Json(ack)))
}

pub(crate) async fn list_handler<S, N>(
    State(service): State<Arc<ContactService<S, N>>>,
    session: AuthSession,
    Query(query): Query<ContactQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    session.require_staff()?;
    Ok(Json(service.list(query.status.as_deref())?))
}

pub(crate) async fn export_handler<S, N>(
    State(service): State<Arc<ContactService<S, N>>>,
    session: AuthSession,
) -> Result<impl IntoResponse, ApiError>
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    session.require_admin()?;
    let body = service.export_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"contacts.csv\"",
            ),
        ],
        body,
    ))
}

pub(crate) async fn get_handler<S, N>(
    State(service): State<Arc<ContactService<S, N>>>,
    session: AuthSession,
    Path(contact_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    session.require_staff()?;
    Ok(Json(service.get(ContactId(contact_id))?))
}

pub(crate) async fn update_handler<S, N>(
    State(service): State<Arc<ContactService<S, N>>>,
    session: AuthSession,
    Path(contact_id): Path<i64>,
    Json(update): Json<ContactUpdate>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    session.require_staff()?;
    Ok(Json(service.update(ContactId(contact_id), update)?))
}

pub(crate) async fn delete_handler<S, N>(
    State(service): State<Arc<ContactService<S, N>>>,
    session: AuthSession,
    Path(contact_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ContactRepository + 'static,
    N: Notifier + 'static,
{
    session.require_admin()?;
    let removed = service.delete(ContactId(contact_id))?;
    Ok(Json(json!({ "message": "contact deleted", "id": removed.id })))
}
