use std::collections::BTreeMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::repository::RepositoryError;
use crate::util::ApiResponse;

pub const BAD_CREDS: &str = "Invalid email or password.";
pub const EMAIL_TAKEN: &str = "The email has already been taken.";
const VALIDATION_FAILED: &str = "Validation failed.";

/// Field name to the human readable messages for every rule it failed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrorSet(BTreeMap<String, Vec<String>>);

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Merges the failures of a `validator` pass into the set.
    pub fn extend_from(&mut self, errors: &ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("{} validation failed on {}.", error.code, field),
                };
                self.add(&field, message);
            }
        }
    }

    /// Takes the failures of `other` for fields this set has not reported yet.
    pub fn merge_unreported(&mut self, other: ValidationErrorSet) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_insert(messages);
        }
    }

    /// `Ok` when nothing failed, otherwise the set as a validation error.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

impl From<ValidationErrors> for ValidationErrorSet {
    fn from(errors: ValidationErrors) -> Self {
        let mut set = Self::new();
        set.extend_from(&errors);
        set
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorBody {
    #[schema(example = "Validation failed.")]
    pub message: String,
    pub errors: ValidationErrorSet,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed.")]
    Validation(ValidationErrorSet),
    #[error("Invalid email or password.")]
    Authentication,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Authentication | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(errors) => {
                HttpResponse::UnprocessableEntity().json(ValidationErrorBody {
                    message: VALIDATION_FAILED.to_string(),
                    errors: errors.clone(),
                })
            }
            ApiError::Authentication => ApiResponse::bad_request(BAD_CREDS.to_string()),
            ApiError::BadRequest(message) => ApiResponse::bad_request(message.clone()),
            ApiError::Unauthorized(message) => ApiResponse::unauthorized(message.clone()),
            ApiError::NotFound(message) => ApiResponse::not_found(message.clone()),
            ApiError::Internal(e) => {
                tracing::error!(
                    target = module_path!(),
                    error = e.to_string(),
                    "Request failed"
                );
                ApiResponse::internal_server_error()
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateEmail => {
                let mut errors = ValidationErrorSet::new();
                errors.add("email", EMAIL_TAKEN);
                ApiError::Validation(errors)
            }
            RepositoryError::Internal(e) => ApiError::Internal(e),
        }
    }
}
