use reqwest::StatusCode;
use serde_json::Value;

use crate::common::test_app::spawn_app;

#[tokio::test]
async fn openapi_document() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.get_openapi().await;
    let status = response.status();
    let body: Value = response.json().await.unwrap();

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert!(body["openapi"].as_str().unwrap().starts_with("3."));
    assert!(body["paths"]["/v1/register"]["post"].is_object());
    assert!(body["paths"]["/v1/users"]["get"].is_object());
}
