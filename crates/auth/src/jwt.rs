//! HS256 token encoding/decoding on top of `jsonwebtoken`.
//!
//! Time-window checks are delegated to [`crate::claims::validate_claims`] so
//! they stay deterministic and unit-testable; `jsonwebtoken` is only asked to
//! verify the signature.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token signature or shape invalid: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Validates bearer tokens into claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// Symmetric HS256 codec, shared by the login endpoint (encode) and the
/// request middleware (validate).
pub struct Hs256JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256JwtCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn encode(&self, claims: &JwtClaims) -> Result<String, JwtError> {
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?;
        Ok(token)
    }
}

impl JwtValidator for Hs256JwtCodec {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is enforced against our own RFC3339 claims below.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use farmgate_core::UserId;

    use crate::Role;

    fn claims(expires_in: Duration) -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: UserId::new(),
            username: "agronomist".to_string(),
            roles: vec![Role::new("admin")],
            issued_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn round_trips_valid_token() {
        let codec = Hs256JwtCodec::new("test-secret");
        let claims = claims(Duration::minutes(10));
        let token = codec.encode(&claims).unwrap();

        let decoded = codec.validate(&token, Utc::now()).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_wrong_secret() {
        let codec = Hs256JwtCodec::new("test-secret");
        let other = Hs256JwtCodec::new("other-secret");
        let token = codec.encode(&claims(Duration::minutes(10))).unwrap();

        assert!(matches!(
            other.validate(&token, Utc::now()),
            Err(JwtError::Decode(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let codec = Hs256JwtCodec::new("test-secret");
        let claims = claims(Duration::minutes(10));
        let token = codec.encode(&claims).unwrap();

        let later = claims.expires_at + Duration::seconds(1);
        assert!(matches!(
            codec.validate(&token, later),
            Err(JwtError::Claims(TokenValidationError::Expired))
        ));
    }
}
