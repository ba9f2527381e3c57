use actix_web::{post, web, web::Data, HttpResponse, Result};
use anyhow::anyhow;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::password::Password;
use crate::controllers::auth::validate_password::{check_password, PASSWORD_REQUIRED};
use crate::controllers::params::JsonFields;
use crate::error::{ApiError, ValidationErrorSet, EMAIL_TAKEN};
use crate::models::user::{NewUser, User, UserResponse};
use crate::repository::Repo;
use crate::util::spawn_blocking_with_tracing;

/// The user fields plus a password confirmation. Every field is optional so
/// that a missing or mistyped field becomes a field error, not a parse error.
#[derive(Debug, Default, Validate, ToSchema)]
pub struct RegisterParams {
    #[validate(
        required(message = "The name field is required."),
        length(min = 1, max = 255, message = "The name must be between 1 and 255 characters.")
    )]
    #[schema(example = "Admin")]
    pub name: Option<String>,
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email must be a valid email address.")
    )]
    #[schema(example = "admin@admin.admin")]
    pub email: Option<String>,
    #[schema(value_type = String, example = "123456")]
    pub password: Option<Password>,
    #[schema(value_type = String, example = "123456")]
    pub password_confirmation: Option<Password>,
}

impl RegisterParams {
    /// Reads the params out of a JSON body, along with the fields that had
    /// the wrong type.
    pub fn from_json(body: Value) -> Result<(Self, ValidationErrorSet), ApiError> {
        let mut fields = JsonFields::new(body)?;
        let params = RegisterParams {
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

        match self.password.as_ref() {
            Some(password) => {
                check_password(&mut errors, Some(password), self.password_confirmation.as_ref())
            }
            None => errors.add("password", PASSWORD_REQUIRED),
        }

        errors
    }
}

#[utoipa::path(
    post,
    path = "/v1/register",
    tag = "Register",
    request_body = RegisterParams,
    responses(
        (status = 200, description = "Newly created user.", body = UserResponse),
        (status = 400, description = "Malformed body.", body = crate::util::ApiResponse),
        (status = 422, description = "Validation errors.", body = crate::error::ValidationErrorBody)
    )
)]
#[post("/register")]
#[tracing::instrument(skip(body, repo))]
pub async fn register(body: web::Json<Value>, repo: Data<Repo>) -> Result<HttpResponse, ApiError> {
    let user = create_user(body.into_inner(), *repo.get_ref()).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Validates the body, checks the email is free, and stores the user with
/// a hashed password.
pub async fn create_user(body: Value, repo: Repo) -> Result<User, ApiError> {
    let (params, mut errors) = RegisterParams::from_json(body)?;
    errors.merge_unreported(params.validation_errors());

    if let Some(email) = params.email.as_ref() {
        if errors.messages("email").is_none() && repo.user_by_email(email.clone()).await?.is_some()
        {
            errors.add("email", EMAIL_TAKEN);
        }
    }

    let (Some(name), Some(email), Some(password)) = (params.name, params.email, params.password)
    else {
        return Err(ApiError::Validation(errors));
    };
    errors.into_result()?;

    let password_hash = spawn_blocking_with_tracing(move || password.hash())
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))??;

    let user = repo
        .create_user(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, "User created");

    Ok(user)
}
