use actix_web::{delete, get, post, put, web, web::Data, HttpResponse, Result};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::auth::authenticated_user::AuthenticatedUser;
use crate::auth::password::Password;
use crate::controllers::auth::register::create_user;
use crate::controllers::auth::validate_password::check_password;
use crate::controllers::params::JsonFields;
use crate::error::{ApiError, ValidationErrorSet, EMAIL_TAKEN};
use crate::models::user::{UserChanges, UserResponse};
use crate::repository::Repo;
use crate::util::spawn_blocking_with_tracing;

const DEFAULT_PER_PAGE: i64 = 20;
const MAX_PER_PAGE: i64 = 100;
// Keeps `(page - 1) * per_page` within i64.
const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;
const USER_NOT_FOUND: &str = "User not found.";

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users);
    cfg.service(new_user);
    cfg.service(show_user);
    cfg.service(edit_user);
    cfg.service(delete_user);
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<i64>,
    /// Page size, at most 100
    pub per_page: Option<i64>,
}

impl PageParams {
    /// Clamped `(page, per_page)`.
    pub fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);

        (page, per_page)
    }

    /// Rows to skip for the resolved page.
    pub fn offset(page: i64, per_page: i64) -> i64 {
        (page - 1) * per_page
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserPage {
    pub data: Vec<UserResponse>,
    pub page: i64,
    pub per_page: i64,
}

/// Only the supplied fields change. A new password needs its confirmation.
#[derive(Debug, Default, Validate, ToSchema)]
pub struct UpdateUserParams {
    #[validate(length(
        min = 1,
        max = 255,
        message = "The name must be between 1 and 255 characters."
    ))]
    pub name: Option<String>,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: Option<String>,
    #[schema(value_type = Option<String>)]
    pub password: Option<Password>,
    #[schema(value_type = Option<String>)]
    pub password_confirmation: Option<Password>,
}

impl UpdateUserParams {
    /// Reads the params out of a JSON body, along with the fields that had
    /// the wrong type.
    pub fn from_json(body: Value) -> Result<(Self, ValidationErrorSet), ApiError> {
        let mut fields = JsonFields::new(body)?;
        let params = UpdateUserParams {
            name: fields.string("name"),
            email: fields.string("email"),
            password: fields.string("password"),
            password_confirmation: fields.string("password_confirmation"),
        };

        Ok((params, fields.into_errors()))
    }

    pub fn validation_errors(&self) -> ValidationErrorSet {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrorSet::new(),
            Err(e) => e.into(),
        };

        check_password(
            &mut errors,
            self.password.as_ref(),
            self.password_confirmation.as_ref(),
        );

        errors
    }
}

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    params(PageParams),
    responses(
        (status = 200, description = "A page of users", body = UserPage),
        (status = 401, description = "Missing or invalid token", body = crate::util::ApiResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/users")]
#[tracing::instrument(skip(repo, _user))]
pub async fn list_users(
    query: web::Query<PageParams>,
    repo: Data<Repo>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let (page, per_page) = query.resolve();
    let users = repo
        .users(PageParams::offset(page, per_page), per_page)
        .await?;

    Ok(HttpResponse::Ok().json(UserPage {
        data: users.into_iter().map(UserResponse::from).collect(),
        page,
        per_page,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Users",
    request_body = crate::controllers::auth::register::RegisterParams,
    responses(
        (status = 201, description = "Newly created user.", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = crate::util::ApiResponse),
        (status = 422, description = "Validation errors.", body = crate::error::ValidationErrorBody)
    ),
    security(("bearer_auth" = []))
)]
#[post("/users")]
#[tracing::instrument(skip(body, repo, _user))]
pub async fn new_user(
    body: web::Json<Value>,
    repo: Data<Repo>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user = create_user(body.into_inner(), *repo.get_ref()).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = crate::util::ApiResponse),
        (status = 404, description = "No such user", body = crate::util::ApiResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/users/{id}")]
#[tracing::instrument(skip(repo, _user))]
pub async fn show_user(
    path: web::Path<i32>,
    repo: Data<Repo>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user = repo
        .user_by_id(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserParams,
    responses(
        (status = 200, description = "The updated user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = crate::util::ApiResponse),
        (status = 404, description = "No such user", body = crate::util::ApiResponse),
        (status = 422, description = "Validation errors.", body = crate::error::ValidationErrorBody)
    ),
    security(("bearer_auth" = []))
)]
#[put("/users/{id}")]
#[tracing::instrument(skip(body, repo, _user))]
pub async fn edit_user(
    path: web::Path<i32>,
    body: web::Json<Value>,
    repo: Data<Repo>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let existing = repo
        .user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

    let (params, mut errors) = UpdateUserParams::from_json(body.into_inner())?;
    errors.merge_unreported(params.validation_errors());
    if let Some(email) = params.email.as_ref() {
        if errors.messages("email").is_none() {
            if let Some(owner) = repo.user_by_email(email.clone()).await? {
                if owner.id != id {
                    errors.add("email", EMAIL_TAKEN);
                }
            }
        }
    }
    errors.into_result()?;

    let password_hash = match params.password {
        Some(password) => Some(
            spawn_blocking_with_tracing(move || password.hash())
                .await
                .map_err(|e| anyhow!("Blocking task failed: {}", e))??,
        ),
        None => None,
    };

    let changes = UserChanges {
        name: params.name,
        email: params.email,
        password_hash,
        updated_at: None,
    };
    if changes.is_empty() {
        return Ok(HttpResponse::Ok().json(UserResponse::from(existing)));
    }

    let user = repo
        .update_user(id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::util::ApiResponse),
        (status = 404, description = "No such user", body = crate::util::ApiResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/users/{id}")]
#[tracing::instrument(skip(repo, _user))]
pub async fn delete_user(
    path: web::Path<i32>,
    repo: Data<Repo>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    if !repo.delete_user(id).await? {
        return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
    }

    tracing::info!(user_id = id, "User deleted");

    Ok(HttpResponse::NoContent().finish())
}
