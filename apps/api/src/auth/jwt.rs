use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::DbId;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's database id.
    pub sub: DbId,
    /// Staff accounts may use the admin routes.
    pub staff: bool,
    pub exp: i64,
    pub iat: i64,
}

pub fn generate_token(
    user_id: DbId,
    staff: bool,
    secret: &str,
    expiry_mins: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        staff,
        exp: now + expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Checks signature and expiry, returning the embedded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    #[test]
    fn test_generate_and_validate_token() {
        let token = generate_token(42, true, SECRET, 15).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, 42);
        assert!(claims.staff);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_fails() {
        // Well past the default 60s leeway.
        let token = generate_token(1, false, SECRET, -10).unwrap();
        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_different_secret_fails() {
        let token = generate_token(1, false, SECRET, 15).unwrap();
        assert!(validate_token(&token, "another-secret").is_err());
    }
}
