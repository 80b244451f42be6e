//! Error taxonomy at the RPC boundary.

use std::error::Error;
use std::fmt;

use tonic::{Code, Status};

use crate::auth::AuthError;
use crate::cancel::Interrupted;
use crate::store::StoreError;

/// Every failure a caller can observe. Converted into a `tonic::Status`
/// with the matching code; nothing else crosses the RPC boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed id, oversize payload, unknown upload target.
    InvalidArgument(String),
    /// Duplicate id on save.
    AlreadyExists(String),
    /// Lookup miss.
    NotFound(String),
    /// Missing, invalid or expired token.
    Unauthenticated(String),
    /// Valid token, insufficient role.
    PermissionDenied(String),
    /// Caller cancelled mid-operation.
    Canceled(String),
    /// Caller's deadline passed mid-operation.
    DeadlineExceeded(String),
    /// Unexpected store or service failure.
    Internal(String),
    /// Stream transport failure.
    Unknown(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            ServiceError::AlreadyExists(msg) => write!(f, "already exists: {}", msg),
            ServiceError::NotFound(msg) => write!(f, "not found: {}", msg),
            ServiceError::Unauthenticated(msg) => write!(f, "unauthenticated: {}", msg),
            ServiceError::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            ServiceError::Canceled(msg) => write!(f, "canceled: {}", msg),
            ServiceError::DeadlineExceeded(msg) => write!(f, "deadline exceeded: {}", msg),
            ServiceError::Internal(msg) => write!(f, "internal: {}", msg),
            ServiceError::Unknown(msg) => write!(f, "unknown: {}", msg),
        }
    }
}

impl Error for ServiceError {}

impl ServiceError {
    /// Map this error to a gRPC status code.
    pub fn code(&self) -> Code {
        match self {
            ServiceError::InvalidArgument(_) => Code::InvalidArgument,
            ServiceError::AlreadyExists(_) => Code::AlreadyExists,
            ServiceError::NotFound(_) => Code::NotFound,
            ServiceError::Unauthenticated(_) => Code::Unauthenticated,
            ServiceError::PermissionDenied(_) => Code::PermissionDenied,
            ServiceError::Canceled(_) => Code::Cancelled,
            ServiceError::DeadlineExceeded(_) => Code::DeadlineExceeded,
            ServiceError::Internal(_) => Code::Internal,
            ServiceError::Unknown(_) => Code::Unknown,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::InvalidArgument(msg)
            | ServiceError::AlreadyExists(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::Unauthenticated(msg)
            | ServiceError::PermissionDenied(msg)
            | ServiceError::Canceled(msg)
            | ServiceError::DeadlineExceeded(msg)
            | ServiceError::Internal(msg)
            | ServiceError::Unknown(msg) => msg,
        }
    }

    /// Classify a store error, prefixing the message with what was attempted.
    pub fn from_store(context: &str, err: StoreError) -> Self {
        let msg = format!("{}: {}", context, err);
        match err {
            StoreError::AlreadyExists(_) => ServiceError::AlreadyExists(msg),
            StoreError::NotFound(_) => ServiceError::NotFound(msg),
            StoreError::Interrupted(reason) => reason.into(),
            StoreError::Aborted(_) => ServiceError::Unknown(msg),
            StoreError::LockPoisoned(_) | StoreError::Io(_) | StoreError::Overflow(_) => {
                ServiceError::Internal(msg)
            }
        }
    }
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        let code = err.code();
        match err {
            ServiceError::InvalidArgument(msg)
            | ServiceError::AlreadyExists(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::Unauthenticated(msg)
            | ServiceError::PermissionDenied(msg)
            | ServiceError::Canceled(msg)
            | ServiceError::DeadlineExceeded(msg)
            | ServiceError::Internal(msg)
            | ServiceError::Unknown(msg) => Status::new(code, msg),
        }
    }
}

impl From<Interrupted> for ServiceError {
    fn from(reason: Interrupted) -> Self {
        match reason {
            Interrupted::Canceled => ServiceError::Canceled(reason.to_string()),
            Interrupted::DeadlineExceeded => ServiceError::DeadlineExceeded(reason.to_string()),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated(msg) => ServiceError::Unauthenticated(msg),
            AuthError::PermissionDenied(msg) => ServiceError::PermissionDenied(msg),
            AuthError::InvalidCredentials => ServiceError::NotFound(err.to_string()),
            AuthError::Hashing(_) | AuthError::Token(_) | AuthError::Store(_) => {
                ServiceError::Internal(err.to_string())
            }
        }
    }
}
