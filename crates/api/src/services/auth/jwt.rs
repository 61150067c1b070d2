//! JWT signing and verification.
//!
//! Access tokens are HS256-signed with the configured secret and carry a
//! fixed expiry. There is no refresh flow and no server-side revocation;
//! logout is a client-side discard.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use driftwear_core::UserId;

use super::AuthError;

/// Tokens live for seven days from issue.
const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Claims carried by an access token.
///
/// Only the user ID is trusted from the token; role checks load the user
/// from the database so a demoted admin loses access immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user's ID.
    pub sub: UserId,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// HS256 signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Derive the key pair from the configured secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign a fresh access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenCreation` if signing fails.
    pub fn sign(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::TokenCreation)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for expired tokens and
    /// `AuthError::InvalidToken` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Pull the token out of an `Authorization` header value.
#[must_use]
pub fn extract_bearer(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new(b"test-secret-key-at-least-32-bytes-long!")
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let keys = keys();
        let token = keys.sign(UserId::from(42)).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, UserId::from(42));
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let keys = keys();
        let token = keys.sign(UserId::from(1)).unwrap();

        // Flip a character in the payload section
        let mut tampered: Vec<char> = token.chars().collect();
        let mid = tampered.len() / 2;
        tampered[mid] = if tampered[mid] == 'a' { 'b' } else { 'a' };
        let tampered: String = tampered.into_iter().collect();

        assert!(matches!(
            keys.verify(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = keys().sign(UserId::from(1)).unwrap();
        let other = JwtKeys::new(b"a-completely-different-32-byte-secret!!");

        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: UserId::from(1),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-at-least-32-bytes-long!"),
        )
        .unwrap();

        assert!(matches!(keys.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer("bearer abc"), None);
        assert_eq!(extract_bearer("abc.def.ghi"), None);
    }
}
