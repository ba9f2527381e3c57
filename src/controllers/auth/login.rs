use actix_web::{post, web, web::Data, HttpResponse, Result};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::guard::Guard;
use crate::auth::password::Password;
use crate::error::ApiError;

/// Absent fields read as empty and simply fail the credential check.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginParams {
    #[serde(default)]
    #[schema(example = "admin@admin.admin")]
    pub email: String,
    #[serde(default)]
    #[schema(value_type = String, example = "123456")]
    pub password: Password,
}

#[utoipa::path(
    post,
    path = "/v1/login",
    tag = "Login",
    request_body = LoginParams,
    responses(
        (status = 200, description = "Get token", body = crate::auth::guard::BearerToken),
        (status = 400, description = "authentication failed", body = crate::util::ApiResponse)
    )
)]
#[post("/login")]
#[tracing::instrument(skip(params, guard))]
pub async fn login(
    params: web::Json<LoginParams>,
    guard: Data<Guard>,
) -> Result<HttpResponse, ApiError> {
    let token = guard.attempt(&params.email, &params.password).await?;

    Ok(HttpResponse::Ok().json(token))
}
