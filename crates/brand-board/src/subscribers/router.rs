use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{SubscribeRequest, Subscription};
use super::repository::SubscriberRepository;
use super::service::SubscriberService;
use crate::accounts::AuthSession;
use crate::error::ApiError;

pub fn subscriber_router<S>(service: Arc<SubscriberService<S>>) -> Router
where
    S: SubscriberRepository + 'static,
{
    Router::new()
        .route("/api/subscribe", post(subscribe_handler::<S>))
        .route("/api/admin/subscribers", get(list_handler::<S>))
        .with_state(service)
}

pub(crate) async fn subscribe_handler<S>(
    State(service): State<Arc<SubscriberService<S>>>,
    Json(request): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: SubscriberRepository + 'static,
{
    let (subscriber, outcome) = service.subscribe(request)?;
    let (status, message) = match outcome {
        Subscription::Created => (StatusCode::CREATED, "subscribed"),
        Subscription::Existing => (StatusCode::OK, "already subscribed"),
    };
    Ok((
        status,
        Json(json!({ "message": message, "subscriber": subscriber })),
    ))
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<SubscriberService<S>>>,
    session: AuthSession,
) -> Result<impl IntoResponse, ApiError>
where
    S: SubscriberRepository + 'static,
{
    session.require_admin()?;
    Ok(Json(service.list()?))
}
