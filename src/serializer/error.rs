use std::error::Error;
use std::fmt;

/// Error type for serializing device records.
#[derive(Debug)]
pub enum SerializerError {
    Json(serde_json::Error),
    Decode(prost::DecodeError),
    Snapshot(bitcode::Error),
    Io(std::io::Error),
}

impl fmt::Display for SerializerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializerError::Json(e) => write!(f, "json: {}", e),
            SerializerError::Decode(e) => write!(f, "protobuf decode: {}", e),
            SerializerError::Snapshot(e) => write!(f, "snapshot: {}", e),
            SerializerError::Io(e) => write!(f, "io: {}", e),
        }
    }
}

impl Error for SerializerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SerializerError::Json(e) => Some(e),
            SerializerError::Decode(e) => Some(e),
            SerializerError::Snapshot(e) => Some(e),
            SerializerError::Io(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for SerializerError {
    fn from(err: serde_json::Error) -> Self {
        SerializerError::Json(err)
    }
}

impl From<prost::DecodeError> for SerializerError {
    fn from(err: prost::DecodeError) -> Self {
        SerializerError::Decode(err)
    }
}

impl From<bitcode::Error> for SerializerError {
    fn from(err: bitcode::Error) -> Self {
        SerializerError::Snapshot(err)
    }
}

impl From<std::io::Error> for SerializerError {
    fn from(err: std::io::Error) -> Self {
        SerializerError::Io(err)
    }
}
