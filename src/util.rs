use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use tokio::task::{spawn_blocking, JoinHandle};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    #[schema(example = "Invalid email or password.")]
    pub message: String,
}

/// Helper methods for api JSON responses that return no data.
impl ApiResponse {
    pub fn bad_request(message: String) -> HttpResponse {
        HttpResponse::BadRequest().json(Self { message })
    }

    pub fn internal_server_error() -> HttpResponse {
        HttpResponse::InternalServerError().json(Self {
            message: "Internal server error".to_string(),
        })
    }

    pub fn not_found(message: String) -> HttpResponse {
        HttpResponse::NotFound().json(Self { message })
    }

    pub fn unauthorized(message: String) -> HttpResponse {
        HttpResponse::Unauthorized().json(Self { message })
    }
}

/// Long-running calls to blocking functions need to be spawned on Actix's
/// blocking thread pool or the main event loop will be blocked.
/// This includes all calls to the database, as Diesel has a synchronous API.
pub fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    spawn_blocking(move || current_span.in_scope(f))
}
