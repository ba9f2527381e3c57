pub mod api_token;
pub mod rfc3339;
pub mod user;
