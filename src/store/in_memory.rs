//! InMemoryDeviceStore - HashMap-backed device store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{DeviceStore, StoreError, Visit};
use crate::cancel::CallContext;
use crate::device::{Device, Filter};

/// In-memory device store backed by a HashMap keyed by device id.
///
/// Clone-friendly via Arc: clones share the same records.
#[derive(Clone)]
pub struct InMemoryDeviceStore {
    storage: Arc<RwLock<HashMap<String, Device>>>,
}

impl Default for InMemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored devices.
    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl DeviceStore for InMemoryDeviceStore {
    fn save(&self, device: &Device) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("save"))?;

        if storage.contains_key(&device.id) {
            return Err(StoreError::AlreadyExists(device.id.clone()));
        }

        storage.insert(device.id.clone(), device.clone());
        Ok(())
    }

    fn find(&self, id: &str) -> Result<Device, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("find"))?;

        storage
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn search(
        &self,
        filter: &Filter,
        ctx: &CallContext,
        visit: &mut Visit<'_>,
    ) -> Result<(), StoreError> {
        // Matches are copied out under the read guard and visited after it
        // is released, so a slow visitor never holds up writers.
        let matches = {
            let storage = self
                .storage
                .read()
                .map_err(|_| StoreError::LockPoisoned("search"))?;

            let mut matches = Vec::new();
            for device in storage.values() {
                ctx.check()?;
                if filter.is_qualified(device) {
                    matches.push(device.clone());
                }
            }
            matches
        };

        for device in matches {
            if let Err(reason) = ctx.check() {
                debug!(%reason, "search aborted");
                return Err(reason.into());
            }
            visit(device)?;
        }

        Ok(())
    }
}
