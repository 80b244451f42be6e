//! Error types for authentication and authorization.

use std::error::Error;
use std::fmt;

use crate::store::StoreError;

/// Why a token failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, unsigned or wrongly signed token.
    InvalidToken(String),
    /// Signed with an algorithm other than the expected HMAC one.
    UnsupportedAlgorithm,
    /// The `exp` claim is in the past.
    Expired,
    /// Signing a new token failed.
    Encoding(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::InvalidToken(msg) => write!(f, "invalid token: {}", msg),
            TokenError::UnsupportedAlgorithm => write!(f, "unexpected signing method"),
            TokenError::Expired => write!(f, "token has expired"),
            TokenError::Encoding(msg) => write!(f, "cannot sign token: {}", msg),
        }
    }
}

impl Error for TokenError {}

/// Error type for login and per-call authorization.
#[derive(Debug)]
pub enum AuthError {
    /// No token, or the token did not verify.
    Unauthenticated(String),
    /// Valid token, but its role may not call this method.
    PermissionDenied(String),
    /// Unknown user or wrong password.
    InvalidCredentials,
    /// Password hashing failed.
    Hashing(String),
    /// Token signing failed.
    Token(TokenError),
    /// Credential store failure.
    Store(StoreError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unauthenticated(msg) => write!(f, "unauthenticated: {}", msg),
            AuthError::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            AuthError::InvalidCredentials => write!(f, "invalid username or password"),
            AuthError::Hashing(msg) => write!(f, "password hashing failed: {}", msg),
            AuthError::Token(e) => write!(f, "token error: {}", e),
            AuthError::Store(e) => write!(f, "credential store error: {}", e),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AuthError::Token(e) => Some(e),
            AuthError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Token(err)
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Store(err)
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AuthError::Hashing(err.to_string())
    }
}
