use bcrypt::hash;
use lazy_static::lazy_static;
use rstest::fixture;
use serde_json::{json, Value};

use crate::models::user::User;
use crate::test_fixtures::tests::time;

pub const TEST_EMAIL: &str = "test_acct@test.local";
pub const TEST_PASSWORD: &str = "testing87_*Password";

lazy_static! {
    static ref TEST_PASSWORD_HASH: String = hash(TEST_PASSWORD, 4).unwrap();
}

#[fixture]
pub fn user() -> User {
    User {
        id: 1,
        name: "Test User".into(),
        email: TEST_EMAIL.into(),
        password_hash: TEST_PASSWORD_HASH.clone(),
        created_at: time(),
        updated_at: time(),
    }
}

pub fn register_body() -> Value {
    json!({
        "name": "Test User",
        "email": TEST_EMAIL,
        "password": TEST_PASSWORD,
        "password_confirmation": TEST_PASSWORD
    })
}
