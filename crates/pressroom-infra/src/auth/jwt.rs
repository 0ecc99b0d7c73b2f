//! HS256 identity tokens.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pressroom_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const DEFAULT_ISSUER: &str = "pressroom-api";
const DEFAULT_EXPIRATION_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// Load from `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    /// Falling back to the built-in secret is logged, loudly under
    /// `RUST_ENV=production`.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SECRET.to_string());

        if secret == DEFAULT_SECRET {
            let production = std::env::var("RUST_ENV")
                .map(|v| matches!(v.as_str(), "production" | "prod"))
                .unwrap_or(false);
            if production {
                tracing::error!("JWT_SECRET is not set; tokens are signed with the default secret");
            } else {
                tracing::warn!("JWT_SECRET is not set; using the development secret");
            }
        }

        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_EXPIRATION_HOURS),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
        }
    }
}

/// Registered claims plus the identity a protected request needs.
#[derive(Debug, Serialize, Deserialize)]
struct IdentityClaims {
    sub: Uuid,
    username: String,
    email: String,
    iss: String,
    iat: i64,
    exp: i64,
}

impl From<IdentityClaims> for TokenClaims {
    fn from(claims: IdentityClaims) -> Self {
        TokenClaims {
            user_id: claims.sub,
            username: claims.username,
            email: claims.email,
            exp: claims.exp,
        }
    }
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: TimeDelta,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            lifetime: TimeDelta::hours(config.expiration_hours),
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(
        &self,
        user_id: Uuid,
        username: &str,
        email: &str,
    ) -> Result<String, AuthError> {
        let issued_at = Utc::now();
        let claims = IdentityClaims {
            sub: user_id,
            username: username.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.into())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }

    fn expiration_seconds(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(issuer: &str, expiration_hours: i64) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_token_carries_identity() {
        let tokens = service("pressroom-test", 1);
        let user_id = Uuid::new_v4();

        let token = tokens
            .generate_token(user_id, "ada", "ada@example.com")
            .unwrap();
        let claims = tokens.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let tokens = service("pressroom-test", 1);

        assert!(matches!(
            tokens.validate_token("not.a.jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let token = service("someone-else", 1)
            .generate_token(Uuid::new_v4(), "bob", "bob@example.com")
            .unwrap();

        assert!(service("pressroom-test", 1).validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let tokens = service("pressroom-test", -2);
        let token = tokens
            .generate_token(Uuid::new_v4(), "old", "old@example.com")
            .unwrap();

        assert!(matches!(
            tokens.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_expiration_seconds() {
        assert_eq!(service("pressroom-test", 24).expiration_seconds(), 86_400);
    }
}
