use actix_web::{dev, http::header::HeaderValue, web::Data, FromRequest, HttpRequest};
use anyhow::anyhow;
use futures::future::{err, LocalBoxFuture};
use futures::FutureExt;

use crate::auth::guard::Guard;
use crate::error::ApiError;

pub use crate::auth::guard::AuthenticatedUser;

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    #[tracing::instrument(skip(req, _payload))]
    fn from_request(req: &HttpRequest, _payload: &mut dev::Payload) -> Self::Future {
        let token = match bearer_token(req.headers().get("Authorization")) {
            Ok(token) => token,
            Err(e) => return err(e).boxed_local(),
        };

        let guard = match req.app_data::<Data<Guard>>() {
            Some(guard) => guard.clone(),
            None => return err(ApiError::Internal(anyhow!("Guard is not configured"))).boxed_local(),
        };

        async move { guard.authenticate(&token).await }.boxed_local()
    }
}

fn bearer_token(auth_header: Option<&HeaderValue>) -> Result<String, ApiError> {
    let value = auth_header
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::Unauthorized("Invalid token".to_string())),
    }
}
