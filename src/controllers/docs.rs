use actix_web::{get, HttpResponse};
use utoipa::OpenApi;

use crate::openapi::ApiDoc;

#[get("/docs/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
