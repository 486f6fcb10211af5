/// Session tokens (JWT, HS256)
///
/// A successful login or signup issues one token carrying the user ID. The
/// API server stores it in an HttpOnly cookie; clients may also send it as
/// `Authorization: Bearer <token>`.
///
/// # Token Structure
///
/// ```json
/// {
///   "sub": 42,             // User ID
///   "iss": "tasklist",     // Issuer
///   "iat": 1704067200,     // Issued at
///   "nbf": 1704067200,     // Not before
///   "exp": 1704153600      // Expiration
/// }
/// ```
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use tasklist_shared::auth::jwt::{create_session_token, validate_session_token, SessionClaims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "an-example-secret-that-is-at-least-32-bytes";
/// let token = create_session_token(&SessionClaims::new(42, Duration::hours(24)), secret)?;
///
/// let claims = validate_session_token(&token, secret)?;
/// assert_eq!(claims.sub, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim written into and required from every token
pub const ISSUER: &str = "tasklist";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, issuer or structure did not check out
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: i64,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not valid before (Unix timestamp)
    pub nbf: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `user_id` valid for `ttl` from now
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Signs claims into a compact JWT
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Verifies signature, issuer, `exp` and `nbf`, returning the claims
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_round_trip() {
        let claims = SessionClaims::new(7, Duration::hours(1));
        let token = create_session_token(&claims, SECRET).unwrap();

        let decoded = validate_session_token(&token, SECRET).unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.iss, ISSUER);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_session_token(&SessionClaims::new(7, Duration::hours(1)), SECRET).unwrap();
        let result = validate_session_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_expired_rejected() {
        let claims = SessionClaims::new(7, Duration::hours(-2));
        let token = create_session_token(&claims, SECRET).unwrap();
        assert!(matches!(
            validate_session_token(&token, SECRET),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = SessionClaims::new(7, Duration::hours(1));
        claims.iss = "someone-else".to_string();
        let token = create_session_token(&claims, SECRET).unwrap();
        assert!(validate_session_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_session_token("not.a.jwt", SECRET).is_err());
    }
}
