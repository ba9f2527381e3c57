use chrono::{NaiveDateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claim {
    pub sub: String,
    /// Id of the api token record backing this token.
    pub jti: String,
    pub iat: u64,
    pub exp: u64,
}

pub fn create_token(
    user_id: i32,
    token_id: &str,
    expires_at: NaiveDateTime,
    private_key: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        &Claim {
            sub: user_id.to_string(),
            jti: token_id.to_string(),
            iat: Utc::now().timestamp().max(0) as u64,
            exp: expires_at.and_utc().timestamp().max(0) as u64,
        },
        &EncodingKey::from_secret(private_key.as_bytes()),
    )
}

pub fn decode_token(token: &str, private_key: &str) -> Result<Claim, jsonwebtoken::errors::Error> {
    decode::<Claim>(
        token,
        &DecodingKey::from_secret(private_key.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
