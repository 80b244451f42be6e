use std::error::Error;
use std::fmt;

use tonic::Status;

/// Error type for client-side calls.
#[derive(Debug)]
pub enum ClientError {
    /// Connecting to the server failed.
    Transport(tonic::transport::Error),
    /// The server answered with a non-OK status.
    Rpc(Status),
    /// The server's response broke the protocol (e.g. a missing field).
    Protocol(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "transport error: {}", e),
            ClientError::Rpc(status) => {
                write!(f, "rpc failed ({:?}): {}", status.code(), status.message())
            }
            ClientError::Protocol(msg) => write!(f, "protocol error: {}", msg),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientError::Transport(e) => Some(e),
            ClientError::Rpc(status) => Some(status),
            ClientError::Protocol(_) => None,
        }
    }
}

impl From<tonic::transport::Error> for ClientError {
    fn from(err: tonic::transport::Error) -> Self {
        ClientError::Transport(err)
    }
}

impl From<Status> for ClientError {
    fn from(status: Status) -> Self {
        ClientError::Rpc(status)
    }
}

impl ClientError {
    /// The gRPC code, if the server produced this error.
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            ClientError::Rpc(status) => Some(status.code()),
            _ => None,
        }
    }
}
