mod implementation;

use anyhow::Error;
use async_trait::async_trait;
use mockall::automock;

use crate::models::{
    api_token::{ApiToken, NewApiToken},
    user::{NewUser, User, UserChanges},
};

pub use implementation::Implementation;

/// Used in the application to access the database
pub type Repo = &'static dyn Repository;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Email already exists.")]
    DuplicateEmail,
    #[error(transparent)]
    Internal(#[from] Error),
}

/// Creates a testable interface for the database pool.
#[automock]
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    async fn create_token(&self, new_token: NewApiToken) -> Result<ApiToken, RepositoryError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError>;
    /// Returns whether a token record was removed.
    async fn delete_token(&self, token_id: String) -> Result<bool, RepositoryError>;
    /// Returns whether a user was removed. Token records go with it.
    async fn delete_user(&self, user_id: i32) -> Result<bool, RepositoryError>;
    async fn token_by_token_id(&self, token_id: String)
        -> Result<Option<ApiToken>, RepositoryError>;
    async fn update_user(
        &self,
        user_id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError>;
    async fn user_by_email(&self, email: String) -> Result<Option<User>, RepositoryError>;
    async fn user_by_id(&self, user_id: i32) -> Result<Option<User>, RepositoryError>;
    async fn users(&self, offset: i64, limit: i64) -> Result<Vec<User>, RepositoryError>;
}

pub fn implementation(database_url: &str) -> Result<Repo, Error> {
    let implementation = Implementation::new(database_url)?;
    let repository = Box::new(implementation);

    Ok(Box::leak(repository))
}
