//! HS256 bearer tokens carrying the requester identity.
//!
//! Tokens are minted by the identity provider that shares `JWT_SECRET`; this
//! service only validates them. [`generate_access_token`] exists for
//! operational tooling and tests.

use curio_core::models::Requester;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    #[serde(default)]
    pub is_superuser: bool,
    /// Expiration time (UTC Unix timestamp)
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp)
    pub iat: i64,
}

impl Claims {
    pub fn requester(&self) -> Requester {
        Requester {
            id: self.sub,
            is_superuser: self.is_superuser,
        }
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes (eight days)
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60 * 24 * 8;

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry_mins: DEFAULT_ACCESS_EXPIRY_MINS,
        }
    }
}

/// Generate an HS256 access token for `requester`.
pub fn generate_access_token(
    requester: &Requester,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: requester.id,
        is_superuser: requester.is_superuser,
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::new("test-secret-that-is-long-enough-for-hmac")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let requester = Requester::superuser(Uuid::new_v4());
        let token = generate_access_token(&requester, &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.requester(), requester);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        // Well past the default 60 second leeway
        let claims = Claims {
            sub: Uuid::new_v4(),
            is_superuser: false,
            exp: now - 300,
            iat: now - 600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let token =
            generate_access_token(&Requester::user(Uuid::new_v4()), &JwtConfig::new("alpha"))
                .unwrap();
        assert!(validate_token(&token, &JwtConfig::new("bravo")).is_err());
    }

    #[test]
    fn test_missing_superuser_claim_defaults_to_regular_user() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let sub = Uuid::new_v4();
        let payload = serde_json::json!({ "sub": sub, "exp": now + 600, "iat": now });
        let token = encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.requester(), Requester::user(sub));
    }
}
