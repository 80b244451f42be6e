//! Client side: login, token caching and typed device calls.
//!
//! ```ignore
//! use std::time::Duration;
//! use devicebook::client::{AuthClient, ClientAuthInterceptor, DeviceClient};
//! use devicebook::service::grpc::methods;
//!
//! let channel = tonic::transport::Endpoint::from_static("http://127.0.0.1:8080")
//!     .connect()
//!     .await?;
//!
//! let login = AuthClient::new(channel.clone(), "admin1", "secret_admin");
//! let auth = ClientAuthInterceptor::start(
//!     login,
//!     [methods::CREATE_RECORD, methods::UPLOAD_ATTACHMENT, methods::RATE_RECORD],
//!     Duration::from_secs(30),
//! )
//! .await?;
//!
//! let mut devices = DeviceClient::new(channel, &auth);
//! let id = devices.create_device(device).await?;
//! ```

mod device;
mod error;
mod interceptor;
mod token;

pub use device::{DeviceClient, CHUNK_SIZE};
pub use error::ClientError;
pub use interceptor::{
    ClientAuth, ClientAuthInterceptor, ClientAuthLayer, RefreshSchedule, RETRY_INTERVAL,
};
pub use token::{AuthClient, TokenSource};
