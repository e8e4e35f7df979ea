//! HS256 access tokens.
//!
//! A token is issued once a user exchanges a confirmation code. There is no
//! refresh flow: a client whose token expired repeats signup to get a new
//! code. The `sub` claim is the only one authorization relies on; the role
//! is re-read from the database on every request.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use marquee_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::env_or;

pub type JwtError = jsonwebtoken::errors::Error;

/// Access tokens live one day unless `JWT_ACCESS_EXPIRY_MINS` says otherwise.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 24 * 60;

/// Payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// Role at issue time, informational only.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    /// Random token id, useful when correlating logs.
    pub jti: String,
}

impl Claims {
    fn new(user_id: DbId, role: &str, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            sub: user_id,
            role: role.to_owned(),
            exp: (issued_at + ttl).timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared by signing and verification.
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `1440`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or blank.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        Self {
            secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
        }
    }

    fn ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }
}

/// Sign an access token for `user_id`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, role, config.ttl());
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 60,
        }
    }

    #[test]
    fn round_trip_keeps_subject_and_lifetime() {
        let cfg = config("test-secret-that-is-long-enough-for-hmac");
        let token = generate_access_token(7, "moderator", &cfg).unwrap();

        let claims = validate_token(&token, &cfg).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, "moderator");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.jti.len(), 36);
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = config("test-secret-that-is-long-enough-for-hmac");
        // Beyond the 60 second default leeway.
        let claims = Claims::new(1, "user", Duration::minutes(-10));
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(cfg.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &cfg).is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = generate_access_token(1, "user", &config("secret-one")).unwrap();
        assert!(validate_token(&token, &config("secret-two")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate_token("not.a.jwt", &config("whatever")).is_err());
    }
}
