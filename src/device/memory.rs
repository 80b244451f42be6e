use serde::{Deserialize, Serialize};

/// A size with a unit, e.g. 16 GiB of RAM or 512 GiB of SSD.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Memory {
    #[prost(uint64, tag = "1")]
    pub value: u64,
    #[prost(enumeration = "MemoryUnit", tag = "2")]
    pub unit: i32,
}

/// Memory units. Multiples are binary (1 kilobyte = 1024 bytes).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration, Serialize, Deserialize,
)]
#[repr(i32)]
pub enum MemoryUnit {
    Unknown = 0,
    Bit = 1,
    Byte = 2,
    Kilobyte = 3,
    Megabyte = 4,
    Gigabyte = 5,
    Terabyte = 6,
}

impl MemoryUnit {
    /// Left shift that converts a value in this unit to bits.
    /// `None` for `Unknown`.
    pub fn bit_shift(self) -> Option<u32> {
        match self {
            MemoryUnit::Unknown => None,
            MemoryUnit::Bit => Some(0),
            MemoryUnit::Byte => Some(3),
            MemoryUnit::Kilobyte => Some(13),
            MemoryUnit::Megabyte => Some(23),
            MemoryUnit::Gigabyte => Some(33),
            MemoryUnit::Terabyte => Some(43),
        }
    }
}

impl Memory {
    pub fn new(value: u64, unit: MemoryUnit) -> Self {
        Self {
            value,
            unit: unit as i32,
        }
    }

    /// Normalize to bits. Unknown units count as 0; values that would not fit
    /// in 64 bits saturate.
    pub fn to_bits(&self) -> u64 {
        match self.unit().bit_shift() {
            Some(shift) => self
                .value
                .checked_shl(shift)
                .filter(|bits| bits >> shift == self.value)
                .unwrap_or(u64::MAX),
            None => 0,
        }
    }
}
