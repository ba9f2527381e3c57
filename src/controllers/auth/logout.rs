use actix_web::{post, web::Data, HttpResponse, Result};

use crate::auth::authenticated_user::AuthenticatedUser;
use crate::auth::guard::Guard;
use crate::error::ApiError;

#[utoipa::path(
    post,
    path = "/v1/logout",
    tag = "Login",
    responses(
        (status = 204, description = "Token revoked"),
        (status = 401, description = "Missing or invalid token", body = crate::util::ApiResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/logout")]
#[tracing::instrument(skip(guard))]
pub async fn logout(user: AuthenticatedUser, guard: Data<Guard>) -> Result<HttpResponse, ApiError> {
    guard.revoke(&user).await?;

    Ok(HttpResponse::NoContent().finish())
}
