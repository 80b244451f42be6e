use serde::{Deserialize, Serialize};

use super::{Device, Memory};

/// Search predicate over device specifications.
///
/// All four bounds are conjunctive. A zero bound is satisfied trivially,
/// except `max_price_usd`: a zero price ceiling only admits free devices.
#[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
pub struct Filter {
    #[prost(double, tag = "1")]
    pub max_price_usd: f64,
    #[prost(uint32, tag = "2")]
    pub min_cpu_cores: u32,
    #[prost(double, tag = "3")]
    pub min_cpu_ghz: f64,
    #[prost(message, optional, tag = "4")]
    pub min_ram: Option<Memory>,
}

impl Filter {
    /// Whether `device` satisfies every bound of this filter.
    pub fn is_qualified(&self, device: &Device) -> bool {
        if device.price_usd > self.max_price_usd {
            return false;
        }

        if device.cpu_cores() < self.min_cpu_cores {
            return false;
        }

        if device.cpu_min_ghz() < self.min_cpu_ghz {
            return false;
        }

        let min_ram = self.min_ram.as_ref().map(Memory::to_bits).unwrap_or_default();
        device.ram_bits() >= min_ram
    }
}
