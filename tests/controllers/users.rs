use reqwest::StatusCode;
use serde_json::{json, Value};

use userdesk::error::ValidationErrorBody;

use crate::common::test_app::{register_params, spawn_app, TestApp};

async fn create(app: &TestApp, token: &str, email: &str) -> i64 {
    let response = app.post_user(token, &register_params(email)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn users_require_token() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .api_client
        .get(&format!("{}/v1/users", app.address))
        .send()
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_pages() {
    // Arrange
    let app = spawn_app().await;
    let (_id, token) = app.login_test_user().await;
    for i in 0..3 {
        create(&app, &token, &format!("user{}@test.local", i)).await;
    }

    // Act
    let response = app.get_users(&token, "?page=2&per_page=2").await;
    let status = response.status();
    let body: Value = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 2);
    let emails: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, ["user1@test.local", "user2@test.local"]);
}

#[tokio::test]
async fn list_users_past_last_page() {
    // Arrange
    let app = spawn_app().await;
    let (_id, token) = app.login_test_user().await;

    // Act
    let response = app
        .get_users(&token, "?page=9223372036854775807&per_page=100")
        .await;
    let status = response.status();
    let body: Value = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["per_page"], 100);
    assert!(body["page"].as_i64().unwrap() > 1);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_and_show_user() {
    // Arrange
    let app = spawn_app().await;
    let (_id, token) = app.login_test_user().await;
    let id = create(&app, &token, "new@test.local").await;

    // Act
    let response = app.get_user(&token, id).await;
    let status = response.status();
    let body: Value = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "new@test.local");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn show_missing_user() {
    // Arrange
    let app = spawn_app().await;
    let (_id, token) = app.login_test_user().await;

    // Act
    let response = app.get_user(&token, 999).await;

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_user() {
    // Arrange
    let app = spawn_app().await;
    let (_id, token) = app.login_test_user().await;
    let id = create(&app, &token, "new@test.local").await;

    // Act
    let response = app
        .put_user(&token, id, &json!({"name": "Renamed", "email": "renamed@test.local"}))
        .await;
    let status = response.status();
    let body: Value = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["email"], "renamed@test.local");
}

#[tokio::test]
async fn update_user_to_taken_email() {
    // Arrange
    let app = spawn_app().await;
    let (_id, token) = app.login_test_user().await;
    let id = create(&app, &token, "new@test.local").await;
    create(&app, &token, "other@test.local").await;

    // Act
    let response = app
        .put_user(&token, id, &json!({"email": "other@test.local"}))
        .await;
    let status = response.status();
    let body: ValidationErrorBody = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.errors.messages("email").is_some());
}

#[tokio::test]
async fn update_password_allows_login() {
    // Arrange
    let app = spawn_app().await;
    let (_id, token) = app.login_test_user().await;
    let id = create(&app, &token, "new@test.local").await;

    // Act
    let response = app
        .put_user(
            &token,
            id,
            &json!({"password": "changed-password", "password_confirmation": "changed-password"}),
        )
        .await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let login = app
        .post_login(&json!({"email": "new@test.local", "password": "changed-password"}))
        .await;
    assert_eq!(login.status(), StatusCode::OK);
}

#[tokio::test]
async fn delete_user() {
    // Arrange
    let app = spawn_app().await;
    let (_id, token) = app.login_test_user().await;
    let id = create(&app, &token, "new@test.local").await;

    // Act
    let response = app.delete_user(&token, id).await;

    // Assert
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        app.get_user(&token, id).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.delete_user(&token, id).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn deleting_yourself_revokes_token() {
    // Arrange
    let app = spawn_app().await;
    let (id, token) = app.login_test_user().await;

    // Act
    let response = app.delete_user(&token, id).await;

    // Assert
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        app.get_users(&token, "").await.status(),
        StatusCode::UNAUTHORIZED
    );
}
