use chrono::{NaiveDateTime, Utc};
use diesel::{prelude::*, sqlite::Sqlite};

use crate::models::user::User;
use crate::schema::api_token;

/// Server-side record of an issued bearer token. A token is only honoured
/// while its record exists and is unexpired.
#[derive(Associations, Clone, Debug, Identifiable, PartialEq, Queryable, Selectable)]
#[diesel(belongs_to(User))]
#[diesel(table_name = api_token)]
#[diesel(check_for_backend(Sqlite))]
pub struct ApiToken {
    pub id: i32,
    pub user_id: i32,
    pub token_id: String,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Insertable, PartialEq)]
#[diesel(table_name = api_token)]
pub struct NewApiToken {
    pub user_id: i32,
    pub token_id: String,
    pub expires_at: NaiveDateTime,
}

impl ApiToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().naive_utc()
    }
}
