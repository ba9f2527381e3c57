use anyhow::{anyhow, Error};
use bcrypt::{hash, verify, DEFAULT_COST};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt::Debug;

/// A plaintext password as received from a client. Never serialized and
/// redacted in debug output.
#[derive(Deserialize)]
pub struct Password(SecretString);

impl Password {
    pub fn hash(&self) -> Result<String, Error> {
        hash(self.expose_secret(), DEFAULT_COST).map_err(|_| anyhow!("Could not hash password."))
    }

    pub fn new(secret: String) -> Self {
        Self(SecretString::new(secret))
    }

    pub fn is_empty(&self) -> bool {
        self.expose_secret().is_empty()
    }

    /// Checks the password against a bcrypt hash. A malformed hash never matches.
    pub fn verify(&self, password_hash: &str) -> bool {
        verify(self.expose_secret(), password_hash).unwrap_or(false)
    }
}

impl Clone for Password {
    fn clone(&self) -> Self {
        Self::new(self.expose_secret().clone())
    }
}

impl Default for Password {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Eq for Password {}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl ExposeSecret<String> for Password {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}
