use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::auth::TokenAuthority;
use super::domain::{Role, UserId};
use super::repository::UserRepository;
use crate::error::ApiError;
use crate::store::RepositoryError;

/// Authenticated caller resolved from the `Authorization: Bearer` header.
///
/// The `TokenAuthority` is read from request extensions, so any router
/// wrapped in `Extension(Arc<TokenAuthority>)` can use this extractor. When an
/// `Extension(Arc<dyn SessionDirectory>)` is present too, the account is looked
/// up on every request and its stored role replaces the one in the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl AuthSession {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Editor => Err(ApiError::Forbidden("admin access required".to_string())),
        }
    }

    /// Admins and editors may both manage content.
    pub fn require_staff(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Admin | Role::Editor => Ok(()),
        }
    }
}

/// Current role of an account, read from storage rather than from the token.
pub trait SessionDirectory: Send + Sync {
    fn current_role(&self, id: UserId) -> Result<Option<Role>, RepositoryError>;
}

impl<T> SessionDirectory for T
where
    T: UserRepository,
{
    fn current_role(&self, id: UserId) -> Result<Option<Role>, RepositoryError> {
        Ok(self.fetch_user(id)?.map(|user| user.role))
    }
}

pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authority = parts
            .extensions
            .get::<Arc<TokenAuthority>>()
            .cloned()
            .ok_or_else(|| ApiError::dependency("token authority is not configured"))?;

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        let claims = authority
            .verify(token)
            .map_err(|err| ApiError::Unauthorized(err.to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|err| ApiError::Unauthorized(err.to_string()))?;

        let role = match parts.extensions.get::<Arc<dyn SessionDirectory>>() {
            Some(directory) => directory
                .current_role(user_id)?
                .ok_or_else(|| ApiError::Unauthorized("account no longer exists".to_string()))?,
            None => claims.role,
        };

        Ok(AuthSession {
            user_id,
            email: claims.email,
            role,
        })
    }
}
