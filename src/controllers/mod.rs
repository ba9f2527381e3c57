use actix_web::web::ServiceConfig;

pub mod auth;
pub mod docs;
pub mod params;
pub mod users;

/// Everything served under `/v1`.
pub fn v1_routes(cfg: &mut ServiceConfig) {
    cfg.configure(auth::auth_routes);
    cfg.configure(users::user_routes);
    cfg.service(docs::openapi_json);
}
