use super::domain::{NewUser, User, UserId};
use crate::store::RepositoryError;

/// Storage abstraction for dashboard accounts. Emails are unique.
pub trait UserRepository: Send + Sync {
    fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn update_user(&self, user: User) -> Result<User, RepositoryError>;
    fn fetch_user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
    fn delete_user(&self, id: UserId) -> Result<User, RepositoryError>;
    /// Insert `user` as an admin only while no account exists yet; `None` once any does.
    fn insert_first_admin(&self, user: NewUser) -> Result<Option<User>, RepositoryError>;
}
