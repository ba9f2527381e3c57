use secrecy::ExposeSecret;
use validator::ValidationError;

use crate::auth::password::Password;
use crate::error::ValidationErrorSet;

pub const PASSWORD_CONFIRMATION_MISMATCH: &str = "The password confirmation does not match.";
pub const PASSWORD_CONFIRMATION_REQUIRED: &str = "The password confirmation field is required.";
pub const PASSWORD_REQUIRED: &str = "The password field is required.";
pub const PASSWORD_TOO_LONG: &str = "The password must not be greater than 72 bytes.";
pub const PASSWORD_TOO_SHORT: &str = "The password must be at least 6 characters.";

// bcrypt ignores anything past 72 bytes
const MAX_PASSWORD_LENGTH: usize = 72;
const MIN_PASSWORD_LENGTH: usize = 6;

#[tracing::instrument(skip(password))]
pub fn validate_password(password: &Password) -> Result<(), ValidationError> {
    let secret = password.expose_secret();

    if secret.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(password_error("password_too_short", PASSWORD_TOO_SHORT));
    }

    if secret.len() > MAX_PASSWORD_LENGTH {
        return Err(password_error("password_too_long", PASSWORD_TOO_LONG));
    }

    Ok(())
}

/// Records password rule failures, and the confirmation check, into `errors`.
/// Does nothing when no password was supplied.
pub fn check_password(
    errors: &mut ValidationErrorSet,
    password: Option<&Password>,
    confirmation: Option<&Password>,
) {
    let Some(password) = password else {
        return;
    };

    if let Err(e) = validate_password(password) {
        let message = e
            .message
            .map(|m| m.to_string())
            .unwrap_or_else(|| e.code.to_string());
        errors.add("password", message);
    }

    match confirmation {
        Some(confirmation) if confirmation == password => (),
        Some(_) => errors.add("password_confirmation", PASSWORD_CONFIRMATION_MISMATCH),
        None => errors.add("password_confirmation", PASSWORD_CONFIRMATION_REQUIRED),
    }
}

fn password_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}
