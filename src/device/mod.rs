//! Device records: the catalog's entity type and its nested specification.
//!
//! Every type here is a plain `prost` message (standard protobuf wire format,
//! no `.proto` file) that also derives serde, so the same value travels over
//! gRPC, into JSON files, and into bitcode snapshots without conversion.
//!
//! Enum-typed fields are stored as `i32` on the wire; prost generates typed
//! accessors (`ram.unit()`, `storage.driver()`, ...) for them.

mod filter;
mod memory;

pub use filter::Filter;
pub use memory::{Memory, MemoryUnit};

use serde::{Deserialize, Serialize};

/// A catalog record.
///
/// The `id` is a UUID string. It is either supplied by the caller or assigned
/// when the record is created.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Device {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub brand: String,
    #[prost(string, tag = "3")]
    pub name: String,
    #[prost(message, optional, tag = "4")]
    pub cpu: Option<Cpu>,
    #[prost(message, optional, tag = "5")]
    pub ram: Option<Memory>,
    #[prost(message, repeated, tag = "6")]
    pub gpus: Vec<Gpu>,
    #[prost(message, repeated, tag = "7")]
    pub storages: Vec<Storage>,
    #[prost(message, optional, tag = "8")]
    pub screen: Option<Screen>,
    #[prost(message, optional, tag = "9")]
    pub keyboard: Option<Keyboard>,
    #[prost(double, tag = "10")]
    pub weight_kg: f64,
    #[prost(double, tag = "11")]
    pub price_usd: f64,
    #[prost(uint32, tag = "12")]
    pub release_year: u32,
    /// Last update, unix seconds.
    #[prost(int64, tag = "13")]
    pub updated_at: i64,
}

impl Device {
    pub fn cpu_cores(&self) -> u32 {
        self.cpu.as_ref().map(|c| c.cores).unwrap_or_default()
    }

    pub fn cpu_min_ghz(&self) -> f64 {
        self.cpu.as_ref().map(|c| c.min_ghz).unwrap_or_default()
    }

    /// RAM size in bits, 0 when unset.
    pub fn ram_bits(&self) -> u64 {
        self.ram.as_ref().map(Memory::to_bits).unwrap_or_default()
    }
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Cpu {
    #[prost(string, tag = "1")]
    pub brand: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(uint32, tag = "3")]
    pub cores: u32,
    #[prost(uint32, tag = "4")]
    pub threads: u32,
    #[prost(double, tag = "5")]
    pub min_ghz: f64,
    #[prost(double, tag = "6")]
    pub max_ghz: f64,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Gpu {
    #[prost(string, tag = "1")]
    pub brand: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(double, tag = "3")]
    pub min_ghz: f64,
    #[prost(double, tag = "4")]
    pub max_ghz: f64,
    #[prost(message, optional, tag = "5")]
    pub memory: Option<Memory>,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Storage {
    #[prost(enumeration = "StorageDriver", tag = "1")]
    pub driver: i32,
    #[prost(message, optional, tag = "2")]
    pub memory: Option<Memory>,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum StorageDriver {
    Unknown = 0,
    Hdd = 1,
    Ssd = 2,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Screen {
    #[prost(float, tag = "1")]
    pub size_inch: f32,
    #[prost(message, optional, tag = "2")]
    pub resolution: Option<Resolution>,
    #[prost(enumeration = "Panel", tag = "3")]
    pub panel: i32,
    #[prost(bool, tag = "4")]
    pub multitouch: bool,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Resolution {
    #[prost(uint32, tag = "1")]
    pub width: u32,
    #[prost(uint32, tag = "2")]
    pub height: u32,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum Panel {
    Unknown = 0,
    Ips = 1,
    Oled = 2,
}

#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Keyboard {
    #[prost(enumeration = "KeyboardLayout", tag = "1")]
    pub layout: i32,
    #[prost(bool, tag = "2")]
    pub backlit: bool,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum KeyboardLayout {
    Unknown = 0,
    Qwerty = 1,
    Qwertz = 2,
    Azerty = 3,
}
