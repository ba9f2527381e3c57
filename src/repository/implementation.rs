use anyhow::{anyhow, Error};
use async_trait::async_trait;
use chrono::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl, SelectableHelper};

use crate::database::{new_pool, run_migrations, DbConn, DbPool};
use crate::models::{
    api_token::{ApiToken, NewApiToken},
    user::{NewUser, User, UserChanges},
};
use crate::repository::{Repository, RepositoryError};
use crate::schema::{api_token, user};
use crate::util::spawn_blocking_with_tracing;

pub struct Implementation {
    pool: DbPool,
}

impl Implementation {
    pub fn new(database_url: &str) -> Result<Self, Error> {
        let pool = new_pool(database_url)?;
        run_migrations(&pool)?;

        Ok(Implementation { pool })
    }
}

fn conn(pool: &DbPool) -> Result<DbConn, Error> {
    pool.get().map_err(|e| anyhow!("Database error: {:?}", e))
}

fn write_error(e: DieselError, context: &str) -> RepositoryError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RepositoryError::DuplicateEmail
        }
        e => anyhow!("Internal server error when {}: {}", context, e).into(),
    }
}

#[async_trait]
impl Repository for Implementation {
    #[tracing::instrument(skip(self, new_token), fields(user_id = new_token.user_id))]
    async fn create_token(&self, new_token: NewApiToken) -> Result<ApiToken, RepositoryError> {
        let pool = self.pool.clone();

        spawn_blocking_with_tracing(move || -> Result<ApiToken, RepositoryError> {
            let mut conn = conn(&pool)?;

            diesel::insert_into(api_token::table)
                .values(&new_token)
                .returning(ApiToken::as_returning())
                .get_result(&mut conn)
                .map_err(|e| anyhow!("Error creating api token: {}", e).into())
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }

    #[tracing::instrument(skip(self, new_user))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let pool = self.pool.clone();

        spawn_blocking_with_tracing(move || -> Result<User, RepositoryError> {
            let mut conn = conn(&pool)?;

            diesel::insert_into(user::table)
                .values(&new_user)
                .returning(User::as_returning())
                .get_result(&mut conn)
                .map_err(|e| write_error(e, "creating user"))
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }

    #[tracing::instrument(skip(self, token_id))]
    async fn delete_token(&self, token_id: String) -> Result<bool, RepositoryError> {
        let pool = self.pool.clone();

        spawn_blocking_with_tracing(move || -> Result<bool, RepositoryError> {
            let mut conn = conn(&pool)?;

            diesel::delete(api_token::table.filter(api_token::token_id.eq(token_id)))
                .execute(&mut conn)
                .map(|rows| rows > 0)
                .map_err(|e| anyhow!("Error deleting api token: {}", e).into())
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }

    #[tracing::instrument(skip(self))]
    async fn delete_user(&self, user_id: i32) -> Result<bool, RepositoryError> {
        let pool = self.pool.clone();

        spawn_blocking_with_tracing(move || -> Result<bool, RepositoryError> {
            let mut conn = conn(&pool)?;

            diesel::delete(user::table.filter(user::id.eq(user_id)))
                .execute(&mut conn)
                .map(|rows| rows > 0)
                .map_err(|e| anyhow!("Error deleting user: {}", e).into())
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }

    #[tracing::instrument(skip(self, token_id))]
    async fn token_by_token_id(
        &self,
        token_id: String,
    ) -> Result<Option<ApiToken>, RepositoryError> {
        let pool = self.pool.clone();

        spawn_blocking_with_tracing(move || -> Result<Option<ApiToken>, RepositoryError> {
            let mut conn = conn(&pool)?;

            api_token::table
                .filter(api_token::token_id.eq(token_id))
                .select(ApiToken::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| anyhow!("Error when looking up api token: {}", e).into())
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update_user(
        &self,
        user_id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let pool = self.pool.clone();
        let changes = UserChanges {
            updated_at: Some(Utc::now().naive_utc()),
            ..changes
        };

        spawn_blocking_with_tracing(move || -> Result<Option<User>, RepositoryError> {
            let mut conn = conn(&pool)?;

            diesel::update(user::table.filter(user::id.eq(user_id)))
                .set(&changes)
                .returning(User::as_returning())
                .get_result(&mut conn)
                .optional()
                .map_err(|e| write_error(e, "updating user"))
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }

    #[tracing::instrument(skip(self, email))]
    async fn user_by_email(&self, email: String) -> Result<Option<User>, RepositoryError> {
        let pool = self.pool.clone();

        spawn_blocking_with_tracing(move || -> Result<Option<User>, RepositoryError> {
            let mut conn = conn(&pool)?;

            User::by_email(email)
                .select(User::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| anyhow!("Error when looking up user record: {}", e).into())
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }

    #[tracing::instrument(skip(self))]
    async fn user_by_id(&self, user_id: i32) -> Result<Option<User>, RepositoryError> {
        let pool = self.pool.clone();

        spawn_blocking_with_tracing(move || -> Result<Option<User>, RepositoryError> {
            let mut conn = conn(&pool)?;

            User::by_id(user_id)
                .select(User::as_select())
                .first(&mut conn)
                .optional()
                .map_err(|e| anyhow!("Error when looking up user record: {}", e).into())
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }

    #[tracing::instrument(skip(self))]
    async fn users(&self, offset: i64, limit: i64) -> Result<Vec<User>, RepositoryError> {
        let pool = self.pool.clone();

        spawn_blocking_with_tracing(move || -> Result<Vec<User>, RepositoryError> {
            let mut conn = conn(&pool)?;

            User::page(offset, limit)
                .select(User::as_select())
                .load(&mut conn)
                .map_err(|e| anyhow!("Internal server error when getting users: {}", e).into())
        })
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))?
    }
}
