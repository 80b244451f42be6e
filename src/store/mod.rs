//! Stores: the catalog's state, each behind its own capability trait.
//!
//! - [`DeviceStore`]: keyed device records with filtered, cancellable search.
//! - [`RatingStore`]: running (count, sum) aggregate per device.
//! - [`AttachmentStore`]: binary blobs attached to a device.
//!
//! The in-memory implementations guard one collection with one `RwLock`:
//! writers exclude each other and readers, readers share. Every value crosses
//! the boundary by clone, so neither side can alias the other's copy.
//!
//! ## Example
//!
//! ```ignore
//! use devicebook::store::{DeviceStore, InMemoryDeviceStore};
//! use devicebook::{CallContext, Filter};
//!
//! let store = InMemoryDeviceStore::new();
//! store.save(&device)?;
//! let found = store.find(&device.id)?;
//!
//! store.search(&filter, &CallContext::new(), &mut |device| {
//!     println!("{}", device.id);
//!     Ok(())
//! })?;
//! ```

mod attachment;
mod error;
mod in_memory;
mod rating;

pub use attachment::{AttachmentRecord, AttachmentStore, DiskAttachmentStore, InMemoryAttachmentStore};
pub use error::StoreError;
pub use in_memory::InMemoryDeviceStore;
pub use rating::{InMemoryRatingStore, Rating, RatingStore};

use crate::cancel::CallContext;
use crate::device::{Device, Filter};

/// Callback invoked by [`DeviceStore::search`] for each qualifying device.
/// Returning an error stops the scan and propagates that error.
pub type Visit<'a> = dyn FnMut(Device) -> Result<(), StoreError> + Send + 'a;

/// Abstract storage for device records.
pub trait DeviceStore: Send + Sync {
    /// Store a copy of `device`. Fails with `AlreadyExists` if the id is taken;
    /// the stored value is left untouched in that case.
    fn save(&self, device: &Device) -> Result<(), StoreError>;

    /// A copy of the stored device, or `NotFound`.
    fn find(&self, id: &str) -> Result<Device, StoreError>;

    /// Scan every record in unspecified order and hand a copy of each one
    /// matching `filter` to `visit`.
    ///
    /// `ctx` is polled before each record; a fired signal aborts the scan
    /// with `StoreError::Interrupted` and no further visits. `visit` may
    /// block, so no store lock is held while it runs.
    fn search(
        &self,
        filter: &Filter,
        ctx: &CallContext,
        visit: &mut Visit<'_>,
    ) -> Result<(), StoreError>;
}
