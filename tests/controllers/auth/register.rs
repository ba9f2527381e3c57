use reqwest::StatusCode;
use serde_json::{json, Value};

use userdesk::error::ValidationErrorBody;
use userdesk::repository::Repository;

use crate::common::test_app::{register_params, spawn_app, TEST_EMAIL, TEST_PASSWORD};

#[tokio::test]
async fn register_success() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_register(&register_params(TEST_EMAIL)).await;
    let status = response.status();
    let body: Value = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], TEST_EMAIL);
    assert_eq!(body["name"], "Test User");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let stored = app
        .repo
        .user_by_email(TEST_EMAIL.into())
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash, TEST_PASSWORD);
}

#[tokio::test]
async fn register_duplicate_email() {
    // Arrange
    let app = spawn_app().await;
    app.post_register(&register_params(TEST_EMAIL)).await;

    // Act
    let response = app.post_register(&register_params(TEST_EMAIL)).await;
    let status = response.status();
    let body: ValidationErrorBody = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body.errors.messages("email").unwrap(),
        ["The email has already been taken.".to_string()]
    );
}

#[tokio::test]
async fn register_reports_every_field() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .post_register(&json!({"email": "not-an-email", "password": "123"}))
        .await;
    let status = response.status();
    let body: ValidationErrorBody = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.message, "Validation failed.");
    assert!(body.errors.messages("name").is_some());
    assert!(body.errors.messages("email").is_some());
    assert!(body.errors.messages("password").is_some());
    assert!(body.errors.messages("password_confirmation").is_some());
}

#[tokio::test]
async fn register_malformed_json() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .api_client
        .post(&format!("{}/v1/register", app.address))
        .header("Content-Type", "application/json")
        .body("{\"email\":")
        .send()
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn register_wrong_types() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .post_register(&json!({
            "name": 12345,
            "email": TEST_EMAIL,
            "password": TEST_PASSWORD,
            "password_confirmation": TEST_PASSWORD,
        }))
        .await;
    let status = response.status();
    let body: ValidationErrorBody = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body.errors.messages("name").unwrap(),
        ["The name must be a string.".to_string()]
    );
    assert!(app.repo.user_by_email(TEST_EMAIL.into()).await.unwrap().is_none());
}
