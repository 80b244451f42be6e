//! Signed, time-limited access tokens (HS256 JWT).

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    decode, decode_header, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::error::TokenError;
use super::user::{Role, User};

/// Default validity window of an issued token.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::from_secs(10 * 60);

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Verified token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (login name)
    pub sub: String,
    pub role: Role,
    /// Expiration time (unix seconds)
    pub exp: u64,
    /// Issued at (unix seconds)
    pub iat: u64,
}

/// Issues and verifies tokens with a symmetric secret.
pub struct JwtManager {
    secret: String,
    token_duration: Duration,
    validation: Validation,
}

impl JwtManager {
    pub fn new(secret: impl Into<String>, token_duration: Duration) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            secret: secret.into(),
            token_duration,
            validation,
        }
    }

    /// Sign a token for `user`, valid for the configured duration.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = get_current_timestamp();
        let claims = Claims {
            sub: user.username.clone(),
            role: user.role,
            exp: now + self.token_duration.as_secs(),
            iat: now,
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims with this manager's secret.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(
            &Header::new(ALGORITHM),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Check signature, algorithm and expiry, and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let header = decode_header(token).map_err(|e| TokenError::InvalidToken(e.to_string()))?;
        if header.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm);
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm,
            _ => TokenError::InvalidToken(e.to_string()),
        })?;

        Ok(data.claims)
    }
}
