use chrono::NaiveDateTime;
use diesel::{prelude::*, sqlite::Sqlite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::rfc3339;
use crate::schema::user;

/// A stored user row. Carries the password hash, so it is never serialized
/// directly; responses go through [`UserResponse`].
#[derive(Clone, Debug, Identifiable, PartialEq, Queryable, Selectable)]
#[diesel(table_name = user)]
#[diesel(check_for_backend(Sqlite))]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Column updates for a partial edit; `None` leaves the column untouched.
#[derive(AsChangeset, Clone, Debug, Default, PartialEq)]
#[diesel(table_name = user)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Admin")]
    pub name: String,
    #[schema(example = "admin@admin.admin")]
    pub email: String,
    #[serde(with = "rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: NaiveDateTime,
    #[serde(with = "rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

type BoxedQuery<'a> = user::BoxedQuery<'a, Sqlite, user::SqlType>;

impl User {
    // Composable queries
    pub fn by_email(user_email: String) -> BoxedQuery<'static> {
        user::table.filter(user::email.eq(user_email)).into_boxed()
    }

    pub fn by_id(user_id: i32) -> BoxedQuery<'static> {
        user::table.filter(user::id.eq(user_id)).into_boxed()
    }

    pub fn page(offset: i64, limit: i64) -> BoxedQuery<'static> {
        user::table
            .order(user::id.asc())
            .offset(offset)
            .limit(limit)
            .into_boxed()
    }
}
