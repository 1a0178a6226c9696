use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{
    AdminUserUpdate, CreateUserRequest, LoginRequest, ProfileUpdate, RegisterRequest, UserId,
};
use super::repository::UserRepository;
use super::service::AccountService;
use super::session::AuthSession;
use crate::background::run_blocking;
use crate::error::ApiError;

/// Auth endpoints plus admin account management.
pub fn account_router<S>(service: Arc<AccountService<S>>) -> Router
where
    S: UserRepository + 'static,
{
    Router::new()
        .route("/api/auth/register", post(register_handler::<S>))
        .route("/api/auth/login", post(login_handler::<S>))
        .route(
            "/api/auth/profile",
            get(profile_handler::<S>).put(update_profile_handler::<S>),
        )
        .route(
            "/api/admin/users",
            get(list_users_handler::<S>).post(create_user_handler::<S>),
        )
        .route(
            "/api/admin/users/:user_id",
            get(get_user_handler::<S>)
                .put(update_user_handler::<S>)
                .delete(delete_user_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    let grant = run_blocking("register", move || service.register(request)).await??;
    Ok((StatusCode::CREATED, Json(grant)))
}

pub(crate) async fn login_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    let grant = run_blocking("login", move || service.login(request)).await??;
    Ok(Json(grant))
}

pub(crate) async fn profile_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    session: AuthSession,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    Ok(Json(service.profile(&session)?))
}

pub(crate) async fn update_profile_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    session: AuthSession,
    Json(update): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    let user = run_blocking("update profile", move || {
        service.update_profile(&session, update)
    })
    .await??;
    Ok(Json(user))
}

pub(crate) async fn list_users_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    session: AuthSession,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    session.require_admin()?;
    Ok(Json(service.list_users()?))
}

pub(crate) async fn create_user_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    session: AuthSession,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    session.require_admin()?;
    let user = run_blocking("create user", move || service.create_user(request)).await??;
    Ok((StatusCode::CREATED, Json(user)))
}

pub(crate) async fn get_user_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    session: AuthSession,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    session.require_admin()?;
    Ok(Json(service.get_user(UserId(user_id))?))
}

pub(crate) async fn update_user_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    session: AuthSession,
    Path(user_id): Path<i64>,
    Json(update): Json<AdminUserUpdate>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    session.require_admin()?;
    let user = run_blocking("update user", move || {
        service.update_user(UserId(user_id), update)
    })
    .await??;
    Ok(Json(user))
}

pub(crate) async fn delete_user_handler<S>(
    State(service): State<Arc<AccountService<S>>>,
    session: AuthSession,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserRepository + 'static,
{
    session.require_admin()?;
    let removed = service.delete_user(&session, UserId(user_id))?;
    Ok(Json(json!({
        "message": "user deleted",
        "id": removed.id,
    })))
}
