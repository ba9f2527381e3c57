use anyhow::{anyhow, Error};
use dotenv::dotenv;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60 * 24;
const MIN_TOKEN_TTL_SECS: i64 = 60;
const MAX_TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 365;

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub auth: AuthConfig,
    pub database_url: String,
    pub server: ServerConfig,
    pub telemetry: Option<TelemetryConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of an issued bearer token.
    pub token_ttl_secs: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub allow_localhost_cors: bool,
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TelemetryConfig {
    pub api_key: String,
    pub receiver_url: String,
}

impl Settings {
    pub fn new() -> Result<Self, Error> {
        dotenv().ok();

        let telemetry = match env::var("TELEMETRY_RECEIVER_URL") {
            Ok(receiver_url) => Some(TelemetryConfig {
                api_key: env::var("TELEMETRY_API_KEY").unwrap_or_default(),
                receiver_url,
            }),
            Err(_) => None,
        };

        Ok(Settings {
            auth: AuthConfig {
                jwt_secret: required("JWT_SECRET")?,
                token_ttl_secs: token_ttl(optional("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?)?,
            },
            database_url: required("DATABASE_URL")?,
            server: ServerConfig {
                allow_localhost_cors: optional("ALLOW_LOCALHOST_CORS", false)?,
                host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
                port: optional("SERVER_PORT", DEFAULT_PORT)?,
            },
            telemetry,
        })
    }
}

fn required(key: &str) -> Result<String, Error> {
    env::var(key).map_err(|_| anyhow!("{} environment variable not found", key))
}

fn optional<T: FromStr>(key: &str, default: T) -> Result<T, Error> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| anyhow!("failed to parse {} from '{}'", key, value)),
        Err(_) => Ok(default),
    }
}

fn token_ttl(secs: i64) -> Result<i64, Error> {
    if (MIN_TOKEN_TTL_SECS..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        Ok(secs)
    } else {
        Err(anyhow!(
            "TOKEN_TTL_SECS must be between {} and {}, got {}",
            MIN_TOKEN_TTL_SECS,
            MAX_TOKEN_TTL_SECS,
            secs
        ))
    }
}
