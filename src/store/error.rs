use std::fmt;

use crate::cancel::Interrupted;

/// Error type for the catalog, rating and attachment stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with this id is already stored.
    AlreadyExists(String),
    /// No record with this id.
    NotFound(String),
    /// The backing lock was poisoned (a writer panicked while holding it).
    LockPoisoned(&'static str),
    /// The caller's cancellation signal fired mid-operation.
    Interrupted(Interrupted),
    /// A search visitor rejected a record; the scan stopped.
    Aborted(String),
    /// Blob persistence failed.
    Io(String),
    /// A counter for this record is already at its maximum.
    Overflow(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::AlreadyExists(id) => write!(f, "record already exists: {}", id),
            StoreError::NotFound(id) => write!(f, "record not found: {}", id),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Interrupted(reason) => write!(f, "{}", reason),
            StoreError::Aborted(msg) => write!(f, "scan aborted: {}", msg),
            StoreError::Io(msg) => write!(f, "storage io error: {}", msg),
            StoreError::Overflow(id) => write!(f, "counter overflow for record: {}", id),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Interrupted(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<Interrupted> for StoreError {
    fn from(reason: Interrupted) -> Self {
        StoreError::Interrupted(reason)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}
