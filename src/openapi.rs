use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::guard::BearerToken;
use crate::controllers::auth::{login::LoginParams, register::RegisterParams};
use crate::controllers::users::{UpdateUserParams, UserPage};
use crate::error::{ValidationErrorBody, ValidationErrorSet};
use crate::models::user::UserResponse;
use crate::util::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    info(title = "userdesk", description = "User administration API"),
    tags(
        (name = "Login", description = "Bearer token issue and revocation"),
        (name = "Register", description = "Self sign-up"),
        (name = "Users", description = "User CRUD, token required")
    ),
    paths(
        crate::controllers::auth::login::login,
        crate::controllers::auth::logout::logout,
        crate::controllers::auth::register::register,
        crate::controllers::users::list_users,
        crate::controllers::users::new_user,
        crate::controllers::users::show_user,
        crate::controllers::users::edit_user,
        crate::controllers::users::delete_user
    ),
    components(schemas(
        ApiResponse,
        BearerToken,
        LoginParams,
        RegisterParams,
        UpdateUserParams,
        UserPage,
        UserResponse,
        ValidationErrorBody,
        ValidationErrorSet
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by POST /v1/login"))
                        .build(),
                ),
            );
        }
    }
}
