//! Service: the gRPC handlers for the device catalog and login.
//!
//! `DeviceServer` wraps the three stores behind `devicebook.DeviceService`;
//! `AuthServer` wraps the credential store and token service behind
//! `devicebook.AuthService`. Authorization happens before either is reached
//! (see [`crate::auth::AuthLayer`]).
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use devicebook::service::{DeviceServer, grpc::DeviceServiceServer};
//! use devicebook::store::{InMemoryDeviceStore, InMemoryAttachmentStore, InMemoryRatingStore};
//!
//! let server = DeviceServer::new(
//!     Arc::new(InMemoryDeviceStore::new()),
//!     Arc::new(InMemoryAttachmentStore::new()),
//!     Arc::new(InMemoryRatingStore::new()),
//! );
//!
//! tonic::transport::Server::builder()
//!     .add_service(DeviceServiceServer::new(server))
//!     .serve(addr)
//!     .await?;
//! ```

mod auth;
mod device;
mod error;
pub mod grpc;

pub use auth::AuthServer;
pub use device::{DeviceServer, MAX_ATTACHMENT_SIZE};
pub use error::ServiceError;
