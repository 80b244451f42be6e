pub mod auth;
pub mod cancel;
pub mod client;
pub mod device;
pub mod serializer;
pub mod server;
pub mod service;
pub mod store;

pub use cancel::{CallContext, Interrupted};
pub use device::{Device, Filter, Memory, MemoryUnit};
pub use server::{ServerConfig, Stores};
pub use service::ServiceError;
pub use store::{DeviceStore, InMemoryDeviceStore, StoreError};
