use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use super::auth::{PasswordError, PasswordHasher, TokenAuthority, TokenError};
use super::domain::{
    display_name, normalize_email, AdminUserUpdate, AuthGrant, CreateUserRequest, LoginRequest,
    NewUser, ProfileUpdate, RegisterRequest, Role, User, UserId,
};
use super::repository::UserRepository;
use super::session::AuthSession;
use crate::error::ApiError;
use crate::store::RepositoryError;

/// Login, registration, profile, and account administration.
pub struct AccountService<S> {
    store: Arc<S>,
    tokens: Arc<TokenAuthority>,
    passwords: PasswordHasher,
}

impl<S> AccountService<S>
where
    S: UserRepository + 'static,
{
    pub fn new(store: Arc<S>, tokens: Arc<TokenAuthority>, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens,
            passwords,
        }
    }

    pub fn token_authority(&self) -> Arc<TokenAuthority> {
        self.tokens.clone()
    }

    /// Public sign-up only bootstraps the first admin; later accounts come from an admin.
    pub fn register(&self, request: RegisterRequest) -> Result<AuthGrant, AccountError> {
        request.validate()?;
        let email = normalize_email(&request.email);
        let candidate = NewUser {
            name: display_name(request.name.as_deref(), &email),
            password_hash: self.passwords.hash(&request.password)?,
            email,
            role: Role::Admin,
        };

        let user = self
            .store
            .insert_first_admin(candidate)?
            .ok_or(AccountError::RegistrationClosed)?;
        info!(user_id = %user.id, "first admin registered");
        self.grant(user)
    }

    pub fn login(&self, request: LoginRequest) -> Result<AuthGrant, AccountError> {
        request.validate()?;
        let email = normalize_email(&request.email);
        let user = self
            .store
            .find_user_by_email(&email)?
            .filter(|user| self.passwords.verify(&request.password, &user.password_hash))
            .ok_or(AccountError::InvalidCredentials)?;
        info!(user_id = %user.id, "login succeeded");
        self.grant(user)
    }

    /// Current account; a token whose account was deleted no longer resolves.
    pub fn profile(&self, session: &AuthSession) -> Result<User, AccountError> {
        self.store
            .fetch_user(session.user_id)?
            .ok_or(AccountError::AccountGone)
    }

    pub fn update_profile(
        &self,
        session: &AuthSession,
        update: ProfileUpdate,
    ) -> Result<User, AccountError> {
        update.validate()?;
        let mut user = self.profile(session)?;

        if let Some(new_password) = update.new_password.as_deref() {
            let current = update
                .current_password
                .as_deref()
                .ok_or(AccountError::CurrentPasswordRequired)?;
            if !self.passwords.verify(current, &user.password_hash) {
                return Err(AccountError::InvalidCredentials);
            }
            user.password_hash = self.passwords.hash(new_password)?;
        }
        if let Some(name) = update.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            user.email = normalize_email(&email);
        }

        user.updated_at = Utc::now();
        self.save(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>, AccountError> {
        Ok(self.store.list_users()?)
    }

    pub fn get_user(&self, id: UserId) -> Result<User, AccountError> {
        self.store
            .fetch_user(id)?
            .ok_or(AccountError::UserNotFound(id))
    }

    pub fn create_user(&self, request: CreateUserRequest) -> Result<User, AccountError> {
        request.validate()?;
        let email = normalize_email(&request.email);
        let user = self.insert(NewUser {
            name: display_name(request.name.as_deref(), &email),
            password_hash: self.passwords.hash(&request.password)?,
            email,
            role: request.role.unwrap_or(Role::Editor),
        })?;
        info!(user_id = %user.id, role = user.role.label(), "account created by admin");
        Ok(user)
    }

    pub fn update_user(&self, id: UserId, update: AdminUserUpdate) -> Result<User, AccountError> {
        update.validate()?;
        let mut user = self.get_user(id)?;
        if let Some(name) = update.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            user.email = normalize_email(&email);
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(password) = update.password.as_deref() {
            user.password_hash = self.passwords.hash(password)?;
        }
        user.updated_at = Utc::now();
        self.save(user)
    }

    /// Accounts cannot delete themselves.
    pub fn delete_user(&self, actor: &AuthSession, id: UserId) -> Result<User, AccountError> {
        if actor.user_id == id {
            return Err(AccountError::SelfDeletion);
        }
        let removed = self.store.delete_user(id).map_err(|err| match err {
            RepositoryError::NotFound => AccountError::UserNotFound(id),
            other => other.into(),
        })?;
        info!(user_id = %id, actor = %actor.user_id, "account deleted");
        Ok(removed)
    }

    /// Make sure a configured admin exists, creating it when missing.
    pub fn ensure_admin(&self, email: &str, password: &str) -> Result<User, AccountError> {
        let email = normalize_email(email);
        if let Some(existing) = self.store.find_user_by_email(&email)? {
            return Ok(existing);
        }
        let user = self.insert(NewUser {
            name: display_name(None, &email),
            password_hash: self.passwords.hash(password)?,
            email,
            role: Role::Admin,
        })?;
        info!(user_id = %user.id, "bootstrap admin created");
        Ok(user)
    }

    fn insert(&self, user: NewUser) -> Result<User, AccountError> {
        self.store.insert_user(user).map_err(|err| match err {
            RepositoryError::Conflict(_) => AccountError::EmailTaken,
            other => other.into(),
        })
    }

    fn save(&self, user: User) -> Result<User, AccountError> {
        let id = user.id;
        self.store.update_user(user).map_err(|err| match err {
            RepositoryError::Conflict(_) => AccountError::EmailTaken,
            RepositoryError::NotFound => AccountError::UserNotFound(id),
            other => other.into(),
        })
    }

    fn grant(&self, user: User) -> Result<AuthGrant, AccountError> {
        let issued = self.tokens.issue(&user)?;
        Ok(AuthGrant {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account no longer exists")]
    AccountGone,
    #[error("current password is required to set a new password")]
    CurrentPasswordRequired,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error("you cannot delete your own account")]
    SelfDeletion,
    #[error("registration is closed; ask an admin for an account")]
    RegistrationClosed,
    #[error(transparent)]
    Invalid(#[from] validator::ValidationErrors),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AccountError> for ApiError {
    fn from(value: AccountError) -> Self {
        match value {
            AccountError::InvalidCredentials | AccountError::AccountGone => {
                ApiError::Unauthorized(value.to_string())
            }
            AccountError::CurrentPasswordRequired
            | AccountError::EmailTaken
            | AccountError::SelfDeletion => ApiError::Validation(value.to_string()),
            AccountError::RegistrationClosed => ApiError::Forbidden(value.to_string()),
            AccountError::UserNotFound(_) => ApiError::not_found("user not found"),
            AccountError::Invalid(errors) => errors.into(),
            AccountError::Token(_) | AccountError::Password(_) => ApiError::dependency(value),
            AccountError::Repository(err) => err.into(),
        }
    }
}
