//! gRPC wire types and generated service plumbing.
//!
//! Uses tonic for the server/client and prost for message serialization
//! (standard protobuf wire format, no `.proto` file). The service traits,
//! servers and clients are generated by `build.rs`.
//!
//! ## RPCs
//!
//! `devicebook.DeviceService`:
//! - `CreateRecord`: unary.
//! - `SearchRecords`: server streaming, one response per matching device.
//! - `UploadAttachment`: client streaming: one `info` message, then chunks.
//! - `RateRecord`: bidirectional, one response per rating.
//!
//! `devicebook.AuthService`:
//! - `Login`: unary, returns an access token.

use crate::device::{Device, Filter};

// ---------------------------------------------------------------------------
// Method paths
// ---------------------------------------------------------------------------

/// Full method paths, as seen by interceptors.
pub mod methods {
    pub const CREATE_RECORD: &str = "/devicebook.DeviceService/CreateRecord";
    pub const SEARCH_RECORDS: &str = "/devicebook.DeviceService/SearchRecords";
    pub const UPLOAD_ATTACHMENT: &str = "/devicebook.DeviceService/UploadAttachment";
    pub const RATE_RECORD: &str = "/devicebook.DeviceService/RateRecord";
    pub const LOGIN: &str = "/devicebook.AuthService/Login";
}

// ---------------------------------------------------------------------------
// Message types (prost, standard protobuf wire format)
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateRecordRequest {
    #[prost(message, optional, tag = "1")]
    pub device: Option<Device>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateRecordResponse {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SearchRecordsRequest {
    #[prost(message, optional, tag = "1")]
    pub filter: Option<Filter>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SearchRecordsResponse {
    #[prost(message, optional, tag = "1")]
    pub device: Option<Device>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UploadAttachmentRequest {
    #[prost(oneof = "upload_attachment_request::Data", tags = "1, 2")]
    pub data: Option<upload_attachment_request::Data>,
}

pub mod upload_attachment_request {
    use super::AttachmentInfo;

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "1")]
        Info(AttachmentInfo),
        #[prost(bytes = "vec", tag = "2")]
        ChunkData(Vec<u8>),
    }
}

impl UploadAttachmentRequest {
    pub fn info(device_id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            data: Some(upload_attachment_request::Data::Info(AttachmentInfo {
                device_id: device_id.into(),
                content_type: content_type.into(),
            })),
        }
    }

    pub fn chunk(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(upload_attachment_request::Data::ChunkData(bytes.into())),
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct AttachmentInfo {
    #[prost(string, tag = "1")]
    pub device_id: String,
    #[prost(string, tag = "2")]
    pub content_type: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UploadAttachmentResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(uint32, tag = "2")]
    pub size: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RateRecordRequest {
    #[prost(string, tag = "1")]
    pub device_id: String,
    #[prost(double, tag = "2")]
    pub score: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RateRecordResponse {
    #[prost(string, tag = "1")]
    pub device_id: String,
    #[prost(uint32, tag = "2")]
    pub rated_count: u32,
    #[prost(double, tag = "3")]
    pub average_score: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginRequest {
    #[prost(string, tag = "1")]
    pub username: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginResponse {
    #[prost(string, tag = "1")]
    pub access_token: String,
}

// ---------------------------------------------------------------------------
// Generated service traits + servers/clients
// ---------------------------------------------------------------------------

include!(concat!(env!("OUT_DIR"), "/devicebook.DeviceService.rs"));
include!(concat!(env!("OUT_DIR"), "/devicebook.AuthService.rs"));

pub use auth_service_client::AuthServiceClient;
pub use auth_service_server::{AuthService, AuthServiceServer};
pub use device_service_client::DeviceServiceClient;
pub use device_service_server::{DeviceService, DeviceServiceServer};
