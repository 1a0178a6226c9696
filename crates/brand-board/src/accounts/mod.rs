//! Dashboard accounts: bearer-token login, registration, profile, and admin user management.

pub mod auth;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;


pub use auth::{Claims, PasswordHasher, TokenAuthority, TokenError};
pub use domain::{
    AdminUserUpdate, AuthGrant, CreateUserRequest, LoginRequest, NewUser, ProfileUpdate,
    RegisterRequest, Role, User, UserId,
};
pub use repository::UserRepository;
pub use router::account_router;
pub use service::{AccountError, AccountService};
pub use session::{AuthSession, SessionDirectory};
