use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::model::Claims;

const IDENTITY_TOKEN_EXPIRY_SECONDS: i64 = 8 * 60 * 60; // one working day

/// Issue an identity token for `email`. Used by the identity provider bridge and tests.
pub fn issue_identity_token(
    email: &str,
    name: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: email.to_string(),
        name: name.to_string(),
        exp: now + IDENTITY_TOKEN_EXPIRY_SECONDS as usize,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate and decode an identity token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
