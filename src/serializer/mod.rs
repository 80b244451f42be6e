//! Serializer: device records to and from JSON, protobuf bytes and
//! bitcode snapshots.
//!
//! JSON goes through serde, the binary file format is the protobuf wire
//! encoding (the same bytes a `CreateRecord` request carries), and snapshots
//! of a whole record set use bitcode.

mod error;

use std::fs;
use std::path::Path;

use prost::Message;

use crate::device::Device;

pub use error::SerializerError;

/// Pretty-printed JSON for one device.
pub fn device_to_json(device: &Device) -> Result<String, SerializerError> {
    Ok(serde_json::to_string_pretty(device)?)
}

pub fn device_from_json(json: &str) -> Result<Device, SerializerError> {
    Ok(serde_json::from_str(json)?)
}

pub fn write_json_file(path: impl AsRef<Path>, device: &Device) -> Result<(), SerializerError> {
    fs::write(path, device_to_json(device)?)?;
    Ok(())
}

pub fn read_json_file(path: impl AsRef<Path>) -> Result<Device, SerializerError> {
    device_from_json(&fs::read_to_string(path)?)
}

/// Write `device` in protobuf wire encoding.
pub fn write_binary_file(path: impl AsRef<Path>, device: &Device) -> Result<(), SerializerError> {
    fs::write(path, device.encode_to_vec())?;
    Ok(())
}

pub fn read_binary_file(path: impl AsRef<Path>) -> Result<Device, SerializerError> {
    let bytes = fs::read(path)?;
    Ok(Device::decode(bytes.as_slice())?)
}

/// Compact snapshot of a whole record set.
pub fn snapshot_to_bytes(devices: &[Device]) -> Result<Vec<u8>, SerializerError> {
    Ok(bitcode::serialize(devices)?)
}

pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<Vec<Device>, SerializerError> {
    Ok(bitcode::deserialize(bytes)?)
}
